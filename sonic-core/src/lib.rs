//! Sonic Core
//!
//! Core types for the Sonic task runner.
//!
//! This crate contains the domain types shared by the runner and the CLI:
//! - Image references and runner resolution
//! - Stage execution units and volume mounts
//! - Audit log records
//!
//! Nothing in here performs I/O.

pub mod domain;
