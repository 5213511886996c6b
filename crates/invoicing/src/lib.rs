//! `atelier-invoicing` — document kinds, the status state machine, lines and
//! derived totals, and pure delivery planning.
//!
//! Status writes and the delivered-triggers-deduction transaction live in
//! `atelier-infra`; the rules they enforce are all here.

pub mod delivery;
pub mod invoice;
pub mod status;

pub use delivery::{plan_delivery, LineDeduction, ProductStockView};
pub use invoice::{Invoice, InvoiceLine, Totals};
pub use status::{check_transition, DocumentKind, InvoiceStatus};
