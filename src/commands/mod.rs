//! CLI command implementations for nvme-smart-exporter.
//!
//! - `test`: read every configured device once and print the result


// Re-export command functions
pub use test::command_test;
