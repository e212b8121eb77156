//! Store selection and service construction.

use std::sync::Arc;

use relaycrm_infra::{
    entity_store::{EntityStoreError, InMemoryEntityStore, PostgresEntityStore},
    CrmService,
};

/// Everything the route handlers need, behind one `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub crm: CrmService,
}

impl AppServices {
    /// In-memory backend (tests, local development without a database).
    pub fn in_memory() -> Self {
        Self {
            crm: CrmService::in_memory(),
        }
    }

    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub async fn from_env() -> Result<Self, EntityStoreError> {
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let store = PostgresEntityStore::connect(&url).await?;
                store.ensure_schema().await?;
                tracing::info!("entity store: postgres");
                Ok(Self {
                    crm: CrmService::new(Arc::new(store)),
                })
            }
            Err(_) => {
                tracing::warn!("DATABASE_URL not set; using in-memory entity store");
                Ok(Self {
                    crm: CrmService::new(Arc::new(InMemoryEntityStore::new())),
                })
            }
        }
    }
}
