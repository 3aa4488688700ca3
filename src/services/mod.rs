//! Business logic services

pub mod distance;
pub mod filter;
pub mod geo;
pub mod paginator;
pub mod row_store;
pub mod schedule;
pub mod snapshot;
pub mod sorter;
pub mod table_view;
