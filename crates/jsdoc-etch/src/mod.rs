//! jsdoc-etch: TypeScript to JavaScript with JSDoc
//!
//! This crate erases the types of a TypeScript module and keeps them as
//! JSDoc comments:
//! - Parsing TypeScript/TSX using deno_ast/SWC
//! - Documenting imports, interfaces, type aliases, variables, functions
//!   and classes, merged with the documentation already present
//! - Erasing types with the deno_ast transpiler
//! - Restoring blank lines, line endings and the typedef blocks of
//!   declarations that do not survive erasure
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ TypeScript text │
//! └────────┬────────┘
//!          ▼
//!   ┌──────────────┐     ┌────────────────┐
//!   │ documenters  │────▶│ typedef blocks │
//!   └──────┬───────┘     └───────┬────────┘
//!          ▼ edits               │
//!   ┌──────────────┐             │
//!   │ type erasure │             │
//!   └──────┬───────┘             │
//!          └──────────┬──────────┘
//!                     ▼
//!           ┌──────────────────┐
//!           │ JavaScript+JSDoc │
//!           └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use jsdoc_etch::{translate, TranslateOptions};
//!
//! let source = "export function greet(name: string): string {\n  return `Hello ${name}`;\n}\n";
//! match translate(source, false, &TranslateOptions::default()) {
//!     Ok(javascript) => println!("{javascript}"),
//!     Err(error) => eprintln!("{error}"),
//! }
//! ```

// Text handling
pub mod doc_type;
pub mod edits;
pub mod js_doc;
pub mod merge;
pub mod sanitize;

// Declaration documenters
pub mod class;
pub mod function;
pub mod import;
pub mod interface;
pub mod params;
pub mod ts_type_params;
pub mod type_alias;
pub mod variable;

// Parsing, inference and the pipeline
pub mod context;
pub mod diagnostics;
pub mod infer;
pub mod transpile;
pub mod utils;

// Re-exports for convenience
pub use diagnostics::{EtchError, EtchResult};
pub use doc_type::{to_doc_type, to_doc_type_or_unknown, UNKNOWN_TYPE};
pub use js_doc::{JsDoc, JsDocTag};
pub use merge::{harvest, CommentLookup};
pub use sanitize::sanitize;
pub use transpile::{translate, TranslateError, TranslateOptions, TranslateOutcome};
