//! # Repository Module
//!
//! Database repository implementations for Storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service layer                                                         │
//! │       │                                                                 │
//! │       │  db.orders().begin()        db.sales().totals(&window)         │
//! │       ▼                                                                 │
//! │  CategoryRepository    category rows (list, lookup, upsert, delete)    │
//! │  ProductRepository     catalog rows (list, lookup, insert, update,     │
//! │                        delete, count)                                  │
//! │  OrderRepository       checkout unit of work + order read-back         │
//! │  SalesRepository       aggregate queries over a report window          │
//! │       │                                                                 │
//! │       │  SQL                                                           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives only here; callers see domain types from storefront-core.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod order;
pub mod product;
pub mod sales;

