//! Core module - the pure pieces of the scan pipeline
//!
//! This module provides:
//! - Token set loading and normalization
//! - Whole-word matching of tokens against file names and content
//! - The text-extraction seam used by the scan backend

pub mod extract;
pub mod matcher;
pub mod tokens;
