//! # sv-core
//!
//! Core types, identifiers, and error types for Surveyor.
//!
//! This crate provides the foundational types shared across all Surveyor crates:
//! - Entity structs for questionnaires, components, answers and answer items
//! - `ComponentType` and the `PublishState` lifecycle
//! - The `QuestionnaireId` newtype and its parsing rules
//! - The `EngineError` taxonomy surfaced to callers
//! - Read-side views (cache snapshot, list pages)

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
