// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Estate Ledger contributors

use estate_ledger_server::{
    api::router, config::Config, ledger::LedgerSession, purchase::PurchaseFlow, state::AppState,
    storage, storage::TransactionRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let pool = storage::connect(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");
    storage::init_schema(&pool)
        .await
        .expect("Failed to initialize the database schema");

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create the upload directory");

    match config.ledger() {
        Some(ledger_config) => {
            // Sweep purchase records left pending by an earlier run:
            // recover each confirmed sale's hash from the ledger and
            // promote the row. Best effort; the server starts either way.
            let reconcile_pool = pool.clone();
            tokio::spawn(async move {
                match LedgerSession::connect(&ledger_config).await {
                    Ok(session) => {
                        let outbox = TransactionRepository::new(&reconcile_pool);
                        let flow = PurchaseFlow::new(&session, &outbox);
                        match flow.reconcile().await {
                            Ok(promoted) => {
                                tracing::info!(
                                    promoted,
                                    chain_id = session.chain_id(),
                                    "pending purchase records reconciled"
                                );
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "pending-record reconciliation failed");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ledger unavailable; skipping pending-record reconciliation");
                    }
                }
            });
        }
        None => {
            tracing::warn!(
                "CONTRACT_ADDRESS or SIGNER_PRIVATE_KEY unset; /api/purchase will return 503"
            );
        }
    }

    let addr = config.bind_addr();
    let state = AppState::new(pool, config);
    let app = router(state);

    tracing::info!("Estate Ledger server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .expect("Server failed");
}
