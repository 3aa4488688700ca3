//! Type definitions

pub mod column;
pub mod messages;
pub mod row;
pub mod schedule;
pub mod table;

pub use column::*;
pub use messages::*;
pub use row::*;
pub use schedule::*;
pub use table::*;
