//! Shared application state.

use std::sync::Arc;

use storefront_db::Database;
use storefront_service::{CheckoutEngine, LockStrategy, ReportingFacade, SalesAggregator};

/// Handles shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub checkout: Arc<CheckoutEngine<Database>>,
    pub reporting: Arc<ReportingFacade<Database>>,
}

impl AppState {
    /// Wires the services on top of one database handle.
    pub fn new(db: Database, strategy: LockStrategy) -> Self {
        let checkout = CheckoutEngine::new(db.clone(), strategy);
        let reporting = ReportingFacade::new(SalesAggregator::new(db.clone()));

        AppState {
            db,
            checkout: Arc::new(checkout),
            reporting: Arc::new(reporting),
        }
    }
}
