//! Delivery route table engine
//!
//! Classifies rows into schedule tiers, orders them (tier grouping, column
//! sort, hub pinning), measures cumulative travel distance along the order
//! and pages the result. The worker binary serves this over NATS with rows
//! stored in PostgreSQL.

pub mod cli;
pub mod config;
pub mod db;
pub mod defaults;
pub mod handlers;
pub mod services;
pub mod types;
