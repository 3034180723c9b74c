//! # SQL Query Inspector Library
//!
//! Inspection of parsed SQL statement trees: the columns a query filters by,
//! and budget-aware truncation of rendered queries.

pub mod aliases;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod deparse;
pub mod error;
pub mod filter;
pub mod node;
pub mod output;
pub mod query;
pub mod truncate;
