//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching data source responses
//! - `convert.rs` — `From` conversions with lenient parsing
//! - `engine.rs` — Pure derivations over the domain types
//! - `state.rs` — State containers with update methods (app-owned)

pub mod pair;
