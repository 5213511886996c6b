//! `atelier-stock` — article model and stock-adjustment rules.
//!
//! The ledger's transactional execution lives in `atelier-infra`; this crate
//! owns the pure parts: article snapshots, adjustment tags/audit records,
//! and the non-negativity arithmetic every mutation goes through.

pub mod adjustment;
pub mod article;

pub use adjustment::{apply_delta, AdjustmentTag, StockAdjustment};
pub use article::{Article, ArticleKind, ArticleRef};
