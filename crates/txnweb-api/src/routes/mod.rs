//! Route modules for the API server
//!
//! - transactions: record CRUD, filters and the per-customer total
//! - status: liveness endpoints
//!
//! Every handler answers with the `Reply` envelope.

pub mod status;
pub mod transactions;
