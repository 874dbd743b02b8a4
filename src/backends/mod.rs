//! Backends module - filesystem operations
//!
//! Provides:
//! - scan: concurrent walk, extract and match over a directory tree
//! - sink: copying matched files and writing the unmatched-token report

pub mod scan;
pub mod sink;
