//! # calm-core
//!
//! Core types, ID generation, and error types for the CalmNest
//! comprehensive assessment engine.
//!
//! This crate provides the foundational types shared across all `calm-*` crates:
//! - The fixed step sequence and session status state machines
//! - Step result shapes (scored questionnaires, emotion summaries, wellness survey)
//! - The assessment session envelope and the composite analysis artifact
//! - Session ID generation and validation
//! - Cross-cutting error types

pub mod analysis;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod results;
pub mod session;

pub use errors::CoreError;
