//! # huddle-core
//!
//! Core types, ID generation, and error types for Huddle.
//!
//! This crate provides the foundational types shared across all Huddle crates:
//! - Entity structs for all document shapes (tasks, projects, messages, activity)
//! - Status enums with state machine transitions
//! - The tagged `Document` union decoded at the store-adapter boundary
//! - Session identity for the signed-in user
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types

pub mod document;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
