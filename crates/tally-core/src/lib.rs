//! # tally-core
//!
//! Core types, ID generation, and error types for Tally.
//!
//! This crate provides the foundational types shared across all Tally crates:
//! - Entity structs for extract rows, assignments, sessions, and reports
//! - Status enums with state machine transitions
//! - ID prefix constants and the id-generation collaborator
//! - The reconciliation error taxonomy and cross-cutting errors
//! - Trail operation envelope for JSONL persistence
//! - CLI response types
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod trail;
