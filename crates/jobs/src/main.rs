use relaycrm_jobs::{reminders, JobOutcome, ReminderConfig};

#[tokio::main]
async fn main() {
    relaycrm_observability::init();

    let endpoint =
        std::env::var("CRM_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let config = ReminderConfig::new(endpoint);

    match reminders::run(&config).await {
        JobOutcome::Completed { reminders } => {
            tracing::info!(reminders, "order reminder run finished");
        }
        JobOutcome::Failed { error } => {
            tracing::error!(error = %error, "order reminder run failed");
            std::process::exit(1);
        }
    }
}
