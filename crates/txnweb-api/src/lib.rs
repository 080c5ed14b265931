//! HTTP API server for transaction records
//!
//! Routes are organized into modules:
//! - routes::transactions: record CRUD, filters and customer totals
//! - routes::status: liveness endpoints
//!
//! Everything is mounted under `/v1` and answers with the `Reply` envelope.

pub mod error;
pub mod reply;
pub mod routes;

use axum::{
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use txnweb_config::Config;
use txnweb_core::TransactionService;

pub use error::ApiError;
pub use reply::Reply;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: TransactionService,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::status::{api_hello, api_status};
    use routes::transactions::{
        api_create_transaction, api_customer_total, api_delete_transaction,
        api_search_transactions, api_transaction_detail, api_transactions,
        api_transactions_by_amount_range, api_transactions_by_customer, api_update_transaction,
        api_valid_transactions,
    };

    let cors = state.config.server.cors;

    let v1 = Router::new()
        .route("/hello", get(api_hello).fallback(wrong_method))
        .route("/status", get(api_status).fallback(wrong_method))
        .route(
            "/transactions",
            get(api_transactions)
                .post(api_create_transaction)
                .fallback(wrong_method),
        )
        .route("/transactions/valid", get(api_valid_transactions).fallback(wrong_method))
        .route("/transactions/search", get(api_search_transactions).fallback(wrong_method))
        .route(
            "/transactions/amount-range",
            get(api_transactions_by_amount_range).fallback(wrong_method),
        )
        .route(
            "/transactions/customer/:customer_id",
            get(api_transactions_by_customer).fallback(wrong_method),
        )
        .route(
            "/transactions/customer/:customer_id/total",
            get(api_customer_total).fallback(wrong_method),
        )
        .route(
            "/transactions/:id",
            get(api_transaction_detail)
                .put(api_update_transaction)
                .delete(api_delete_transaction)
                .fallback(wrong_method),
        );

    let router = Router::new()
        .nest("/v1", v1)
        .fallback(unknown_route)
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Envelope for paths no route matches
async fn unknown_route() -> Reply<()> {
    Reply::not_found()
}

/// Envelope for a known path called with an unsupported method
async fn wrong_method() -> Reply<()> {
    Reply::method_not_allowed()
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(config: Config, service: TransactionService) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let state = AppState { service, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txnweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /v1/transactions (list, create)");
    log::info!("  - /v1/transactions/:id (detail, update, delete)");
    log::info!("  - /v1/transactions/{{valid,search,amount-range}} (filters)");
    log::info!("  - /v1/transactions/customer/:customer_id[/total]");
    log::info!("  - /v1/hello, /v1/status");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

// ==================== Tests ====================
