use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use relaycrm_customers::NewCustomer;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/bulk", post(bulk_create_customers))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCustomerRequest>,
) -> axum::response::Response {
    let new = NewCustomer {
        name: body.name,
        email: body.email,
        phone: body.phone,
    };

    match services.crm.create_customer(new).await {
        Ok(customer) => {
            (StatusCode::CREATED, Json(dto::customer_to_json(&customer))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn bulk_create_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BulkCreateCustomersRequest>,
) -> axum::response::Response {
    let items = body.customers.into_iter().map(Into::into).collect();

    match services.crm.bulk_create_customers(items).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "created": outcome.created.iter().map(dto::customer_to_json).collect::<Vec<_>>(),
                "errors": outcome.errors,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.crm.list_customers().await {
        Ok(customers) => {
            let items = customers.iter().map(dto::customer_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
