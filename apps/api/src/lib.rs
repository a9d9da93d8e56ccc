//! # storefront-api: HTTP Server
//!
//! axum front end for checkout and sales reporting.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Server                                    │
//! │                                                                         │
//! │  client ──► Router (routes) ──► AppState ──► CheckoutEngine ──┐        │
//! │                   │                      └─► ReportingFacade ─┤        │
//! │                   │                                           ▼        │
//! │              ApiError ◄──── ServiceError / DbError ◄──── Database     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResponse, ApiResult, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
