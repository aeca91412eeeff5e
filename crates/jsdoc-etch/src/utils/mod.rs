//! Utilities for jsdoc-etch
//!
//! This module provides utilities for:
//! - SWC/deno_ast TypeScript parsing
//! - Mapping swc positions to offsets in the source text
//! - Doc comment lookup

pub mod swc;

pub use swc::{parse_source, ExistingDoc, ParsedModule, SourceInfo};
