//! Command-line front end
//!
//! The `ankarakart` binary parses arguments with clap and hands them to
//! [`query::run_query_mode`].

pub mod query;

pub use query::{QueryArgs, QueryKind, run_query_mode};
