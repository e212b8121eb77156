#[tokio::main]
async fn main() {
    relaycrm_observability::init();

    let services = relaycrm_api::app::services::AppServices::from_env()
        .await
        .expect("failed to initialize entity store");

    let app = relaycrm_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
