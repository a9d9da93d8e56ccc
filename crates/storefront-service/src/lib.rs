//! # storefront-service: Checkout and Sales Reporting
//!
//! The business operations of the storefront, written against the store
//! traits in [`store`] so they run unchanged on SQLite and on test fakes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   HTTP handlers (apps/api)                                              │
//! │        │                         │                                      │
//! │        ▼                         ▼                                      │
//! │  ┌───────────────────┐   ┌─────────────────────────┐                   │
//! │  │  CheckoutEngine   │   │    ReportingFacade      │                   │
//! │  │                   │   │          │              │                   │
//! │  │ validate → lock → │   │          ▼              │                   │
//! │  │ price → decrement │   │    SalesAggregator      │                   │
//! │  │ → order → lines   │   │                         │                   │
//! │  └─────────┬─────────┘   └────────────┬────────────┘                   │
//! │            │ CheckoutStore            │ SalesStore                      │
//! │            ▼                          ▼                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-db (Database)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`checkout`] - Atomic cart-to-order conversion with a lock strategy
//! - [`aggregator`] - Revenue, order count, and top seller per window
//! - [`reporting`] - Window selection and summary assembly
//! - [`store`] - Store boundary traits and their SQLite implementations
//! - [`error`] - Service error kinds

pub mod aggregator;
pub mod checkout;
pub mod error;
pub mod reporting;
pub mod store;

pub use aggregator::SalesAggregator;
pub use checkout::{
    CheckoutEngine, LockStrategy, ParseLockStrategyError, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_BACKOFF,
};
pub use error::{ServiceError, ServiceResult};
pub use reporting::ReportingFacade;
pub use store::{CheckoutStore, CheckoutTx, SalesStore};
