//! Core transaction record keeping and business logic
//!
//! - models: stored records and incoming payloads
//! - merge: create defaults and update overlay rules
//! - query: filter predicates and parameter validation
//! - store: record storage backends
//! - service: the operations exposed to the API layer

pub mod error;
pub mod merge;
pub mod models;
pub mod query;
pub mod service;
pub mod store;
pub mod time;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use models::{CustomerId, NewTransaction, Transaction, TransactionId, TransactionInput};
pub use query::{AmountRange, TransactionFilter};
pub use service::TransactionService;
pub use store::{open_store, FileStore, MemoryStore, StoreRef, TransactionStore};
pub use time::{Clock, ClockRef, FixedClock, SystemClock};
