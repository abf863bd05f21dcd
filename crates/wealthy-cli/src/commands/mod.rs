//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (load_config, open_pipeline)
//! - `assess` - Evaluate a record and print the snapshot
//! - `report` - Evaluate a record and write the summary document
//! - `schema` - Schema and model bundle inspection
//! - `serve` - Web server command

pub mod assess;
pub mod common;
pub mod report;
pub mod schema;
pub mod serve;

// Re-export command functions for main.rs
pub use assess::*;
pub use common::*;
pub use report::*;
pub use schema::*;
pub use serve::*;
