//! `atelier-production` — recipes, availability checks, production planning.
//!
//! Pure decision logic for converting raw-material stock into finished
//! products. The transactional execution (ledger deductions, run insertion)
//! lives in `atelier-infra`; keeping the decisions here makes the
//! all-or-nothing properties testable without a database.

pub mod availability;
pub mod recipe;
pub mod run;

pub use availability::{check_availability, Availability, IngredientAvailability, IngredientStock};
pub use recipe::{plan_production, PlannedDeduction, RecipeLine};
pub use run::{check_rejected_bounds, ProduceRequest, ProductionRun};
