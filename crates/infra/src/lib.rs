//! `atelier-infra` — Postgres-backed execution layer.
//!
//! Owns every store round-trip: the credential/session store, the login
//! orchestration, the transactional stock ledger, the production engine,
//! the invoice status machine, and the session-expiry sweeper.
//!
//! Transaction discipline: every multi-step operation acquires one
//! `sqlx::Transaction`; an early `?` return drops it, which rolls back.
//! The caller never observes partially-applied stock or status changes.

pub mod authenticator;
pub mod db;
pub mod error;
pub mod invoices;
pub mod ledger;
pub mod login_attempts;
pub mod production;
pub mod sessions;
pub mod sweeper;
pub mod users;

pub use authenticator::{Authenticator, LoginOutcome, NewUser};
pub use db::connect;
pub use error::InfraError;
pub use invoices::InvoiceEngine;
pub use ledger::StockLedger;
pub use production::ProductionEngine;
pub use sessions::SessionRecord;
pub use sweeper::spawn_session_sweeper;
pub use users::PublicUser;
