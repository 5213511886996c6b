//! Infrastructure wiring shared by every handler.

use sqlx::PgPool;

use atelier_auth::TokenSigner;
use atelier_infra::{Authenticator, InvoiceEngine, ProductionEngine, StockLedger};

pub struct AppServices {
    pool: PgPool,
    authenticator: Authenticator,
    ledger: StockLedger,
    production: ProductionEngine,
    invoices: InvoiceEngine,
}

impl AppServices {
    pub fn new(pool: PgPool, signer: TokenSigner) -> Self {
        Self {
            authenticator: Authenticator::new(pool.clone(), signer),
            ledger: StockLedger::new(pool.clone()),
            production: ProductionEngine::new(pool.clone()),
            invoices: InvoiceEngine::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    pub fn production(&self) -> &ProductionEngine {
        &self.production
    }

    pub fn invoices(&self) -> &InvoiceEngine {
        &self.invoices
    }
}
