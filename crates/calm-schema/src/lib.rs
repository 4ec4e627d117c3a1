//! # calm-schema
//!
//! JSON Schemas for the payloads that cross the engine boundary: answer
//! sheets and classifier samples coming in, sessions and analyses going out.
//!
//! Types derive `JsonSchema` where they are defined (`calm-core`,
//! `calm-scoring`). This crate collects them into a [`SchemaRegistry`] for
//! export (`calm schema`) and validates raw JSON before it is deserialized,
//! so a malformed file gets every problem reported at once.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
