//! Order reminder job.
//!
//! Queries the CRM API for orders and customers, joins them client-side,
//! selects orders whose date falls inside the recency window, and logs one
//! line per (order id, customer email) pair. The outcome goes back to the
//! invoker; scheduling is someone else's problem (cron, systemd timer).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ReminderConfig;
use crate::outcome::{JobOutcome, RetryPolicy};

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Order as the API lists it.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_date: DateTime<Utc>,
}

/// Customer as the API lists it.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct ItemsEnvelope<T> {
    items: Vec<T>,
}

/// A reminder to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub order_id: Uuid,
    pub customer_email: String,
}

/// Pick the orders worth reminding about: order date within the last
/// `window_days` days (inclusive on both ends), joined to a known customer.
/// An order whose customer is missing from the listing is skipped.
pub fn select_reminders(
    orders: &[OrderRecord],
    customers: &[CustomerRecord],
    now: DateTime<Utc>,
    window_days: i64,
) -> Vec<Reminder> {
    let cutoff = now - Duration::days(window_days);
    let emails: HashMap<Uuid, &str> = customers
        .iter()
        .map(|c| (c.id, c.email.as_str()))
        .collect();

    orders
        .iter()
        .filter(|o| o.order_date >= cutoff && o.order_date <= now)
        .filter_map(|o| {
            emails.get(&o.customer_id).map(|email| Reminder {
                order_id: o.id,
                customer_email: (*email).to_string(),
            })
        })
        .collect()
}

/// Run the job once against the configured API endpoint.
pub async fn run(config: &ReminderConfig) -> JobOutcome {
    match run_inner(config).await {
        Ok(reminders) => {
            tracing::info!(reminders, "order reminders processed");
            JobOutcome::Completed { reminders }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to process order reminders");
            JobOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn run_inner(config: &ReminderConfig) -> Result<usize, ReminderError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()?;

    let orders: Vec<OrderRecord> =
        fetch_items(&client, &format!("{}/orders", config.endpoint), &config.retry).await?;
    let customers: Vec<CustomerRecord> =
        fetch_items(&client, &format!("{}/customers", config.endpoint), &config.retry).await?;

    let reminders = select_reminders(&orders, &customers, Utc::now(), config.window_days);
    for reminder in &reminders {
        tracing::info!(
            order_id = %reminder.order_id,
            customer_email = %reminder.customer_email,
            "pending order reminder"
        );
    }

    Ok(reminders.len())
}

async fn fetch_items<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    retry: &RetryPolicy,
) -> Result<Vec<T>, ReminderError> {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match try_fetch::<T>(client, url).await {
            Ok(items) => return Ok(items),
            Err(e) if attempt <= retry.max_attempts => {
                tracing::warn!(url, attempt, error = %e, "fetch failed; retrying");
                tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn try_fetch<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<T>, ReminderError> {
    let envelope: ItemsEnvelope<T> = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(envelope.items)
}
