//! Database queries

pub mod rows;
