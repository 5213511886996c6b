//! `atelier-core` — shared domain foundation.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the business error taxonomy and the strongly-typed identifiers used across
//! the workspace.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ClientId, InvoiceId, MaterialId, ProductId, ProductionId, SessionId, UserId};
