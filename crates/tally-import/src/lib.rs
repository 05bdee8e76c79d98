//! # tally-import
//!
//! Parses ERP stock extracts (CSV) into [`ExtractRow`]s ready for
//! `tally_engine::create_assignments`, plus an [`ExtensionAttributes`]
//! side-table for every column that is not part of the row model.
//!
//! Bad rows never abort an import. They are collected as [`RowError`]s with
//! their line number so the caller can report them next to the accepted rows.
//! Only file-level problems (unreadable input, a missing required column, too
//! many rows) surface as [`ImportError`].
//!
//! [`ExtractRow`]: tally_core::entities::ExtractRow
//! [`ExtensionAttributes`]: tally_core::entities::ExtensionAttributes

pub mod columns;
pub mod error;
pub mod parser;

pub use error::{ImportError, RowError, RowErrorKind};
pub use parser::{ExtractParser, ParsedExtract};
