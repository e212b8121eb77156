//! Postgres-backed entity store implementation.
//!
//! Durability and referential integrity live in the schema; the unique index
//! on `customers.email` is the safety net behind the service-level duplicate
//! pre-check, and the order insert runs as one transaction so the order row
//! and its associations become visible together or not at all.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `EntityStoreError` as follows:
//!
//! | PostgreSQL Error Code | EntityStoreError | Scenario |
//! |-----------------------|------------------|----------|
//! | `23505` (unique violation) | `UniqueViolation` | Duplicate `customers.email`, replayed order id |
//! | `23503` (foreign key violation) | `ForeignKey` | Order referencing a missing customer/product |
//! | Any other | `Backend` | Check violations, connection loss, pool closed |

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use async_trait::async_trait;

use relaycrm_core::{CustomerId, Entity, OrderId, ProductId};
use relaycrm_customers::Customer;
use relaycrm_orders::Order;
use relaycrm_products::Product;

use super::r#trait::{EntityStore, EntityStoreError};

/// Schema expected (and created) by this store.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id    UUID PRIMARY KEY,
    name  TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT
);

CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents > 0),
    stock       BIGINT NOT NULL DEFAULT 0 CHECK (stock >= 0)
);

CREATE TABLE IF NOT EXISTS orders (
    id                 UUID PRIMARY KEY,
    customer_id        UUID NOT NULL REFERENCES customers(id),
    order_date         TIMESTAMPTZ NOT NULL,
    total_amount_cents BIGINT NOT NULL
);

CREATE TABLE IF NOT EXISTS order_products (
    order_id   UUID NOT NULL REFERENCES orders(id),
    product_id UUID NOT NULL REFERENCES products(id),
    PRIMARY KEY (order_id, product_id)
);
"#;

/// Postgres-backed entity store.
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PostgresEntityStore {
    pool: PgPool,
}

impl PostgresEntityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a small pool to the given database URL.
    pub async fn connect(database_url: &str) -> Result<Self, EntityStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Self::new(pool))
    }

    /// Create the schema if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), EntityStoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn map_sqlx_error(e: sqlx::Error) -> EntityStoreError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            Some("23505") => {
                return EntityStoreError::unique(db.constraint().unwrap_or("unknown"));
            }
            Some("23503") => {
                return EntityStoreError::ForeignKey(
                    db.constraint().unwrap_or("unknown").to_string(),
                );
            }
            _ => {}
        }
    }

    EntityStoreError::backend(e.to_string())
}

fn customer_from_row(row: &sqlx::postgres::PgRow) -> Result<Customer, EntityStoreError> {
    Ok(Customer::from_stored(
        CustomerId::from_uuid(row.try_get("id").map_err(map_sqlx_error)?),
        row.try_get("name").map_err(map_sqlx_error)?,
        row.try_get("email").map_err(map_sqlx_error)?,
        row.try_get("phone").map_err(map_sqlx_error)?,
    ))
}

fn product_from_row(row: &sqlx::postgres::PgRow) -> Result<Product, EntityStoreError> {
    Ok(Product::from_stored(
        ProductId::from_uuid(row.try_get("id").map_err(map_sqlx_error)?),
        row.try_get("name").map_err(map_sqlx_error)?,
        row.try_get("price_cents").map_err(map_sqlx_error)?,
        row.try_get("stock").map_err(map_sqlx_error)?,
    ))
}

fn order_from_row(row: &sqlx::postgres::PgRow) -> Result<Order, EntityStoreError> {
    let product_ids: Vec<Uuid> = row.try_get("product_ids").map_err(map_sqlx_error)?;

    Ok(Order::from_stored(
        OrderId::from_uuid(row.try_get("id").map_err(map_sqlx_error)?),
        CustomerId::from_uuid(row.try_get("customer_id").map_err(map_sqlx_error)?),
        product_ids.into_iter().map(ProductId::from_uuid).collect(),
        row.try_get("order_date").map_err(map_sqlx_error)?,
        row.try_get("total_amount_cents").map_err(map_sqlx_error)?,
    ))
}

#[async_trait]
impl EntityStore for PostgresEntityStore {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id()), err)]
    async fn insert_customer(&self, customer: Customer) -> Result<Customer, EntityStoreError> {
        sqlx::query("INSERT INTO customers (id, name, email, phone) VALUES ($1, $2, $3, $4)")
            .bind(customer.id().as_uuid())
            .bind(customer.name())
            .bind(customer.email())
            .bind(customer.phone())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(customer)
    }

    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, EntityStoreError> {
        let row = sqlx::query("SELECT id, name, email, phone FROM customers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn customer_by_email(&self, email: &str) -> Result<Option<Customer>, EntityStoreError> {
        let row = sqlx::query("SELECT id, name, email, phone FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, EntityStoreError> {
        let rows = sqlx::query("SELECT id, name, email, phone FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(customer_from_row).collect()
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn insert_product(&self, product: Product) -> Result<Product, EntityStoreError> {
        sqlx::query("INSERT INTO products (id, name, price_cents, stock) VALUES ($1, $2, $3, $4)")
            .bind(product.id().as_uuid())
            .bind(product.name())
            .bind(product.price_cents())
            .bind(product.stock())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(product)
    }

    async fn product_by_name(&self, name: &str) -> Result<Option<Product>, EntityStoreError> {
        let row = sqlx::query("SELECT id, name, price_cents, stock FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, EntityStoreError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows =
            sqlx::query("SELECT id, name, price_cents, stock FROM products WHERE id = ANY($1)")
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn list_products(&self) -> Result<Vec<Product>, EntityStoreError> {
        let rows = sqlx::query("SELECT id, name, price_cents, stock FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, order), fields(order_id = %order.id()), err)]
    async fn insert_order(&self, order: Order) -> Result<Order, EntityStoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "INSERT INTO orders (id, customer_id, order_date, total_amount_cents) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id().as_uuid())
        .bind(order.customer_id().as_uuid())
        .bind(order.order_date())
        .bind(order.total_amount_cents())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for product_id in order.product_ids() {
            sqlx::query("INSERT INTO order_products (order_id, product_id) VALUES ($1, $2)")
                .bind(order.id().as_uuid())
                .bind(product_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, EntityStoreError> {
        let rows = sqlx::query(
            "SELECT o.id, o.customer_id, o.order_date, o.total_amount_cents, \
                    COALESCE(array_agg(op.product_id) \
                             FILTER (WHERE op.product_id IS NOT NULL), '{}') AS product_ids \
             FROM orders o \
             LEFT JOIN order_products op ON op.order_id = o.id \
             GROUP BY o.id, o.customer_id, o.order_date, o.total_amount_cents \
             ORDER BY o.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(order_from_row).collect()
    }
}
