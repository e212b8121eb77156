//! One-shot database seeding for development/demo environments.
//!
//! Re-running is safe: rows are created only where the natural key (customer
//! email, product name) is absent.

use relaycrm_infra::entity_store::{InMemoryEntityStore, PostgresEntityStore};
use relaycrm_infra::seed::{seed, SeedReport};

#[tokio::main]
async fn main() {
    relaycrm_observability::init();

    let report: SeedReport = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PostgresEntityStore::connect(&url)
                .await
                .expect("failed to connect to database");
            store.ensure_schema().await.expect("failed to create schema");
            seed(&store).await.expect("seeding failed")
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; seeding an in-memory store (discarded on exit)");
            let store = InMemoryEntityStore::new();
            seed(&store).await.expect("seeding failed")
        }
    };

    tracing::info!(
        customers = report.customers_created,
        products = report.products_created,
        "database seeded"
    );
}
