//! API request handlers

use super::models::{DrinkListResponse, HealthResponse};
use super::routes::AppState;
use crate::error::{ApiError, ApiResult};
use crate::serializer::{self, ValidationErrors};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

/// Methods served on `/drinks`
pub const COLLECTION_ALLOW: &str = "GET, POST, HEAD, OPTIONS";
/// Methods served on `/drinks/{id}`
pub const ITEM_ALLOW: &str = "GET, PUT, DELETE, HEAD, OPTIONS";

/// Request method as seen by the drink handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Other,
}

impl From<&Method> for Verb {
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => Verb::Get,
            Method::HEAD => Verb::Head,
            Method::POST => Verb::Post,
            Method::PUT => Verb::Put,
            Method::DELETE => Verb::Delete,
            Method::OPTIONS => Verb::Options,
            _ => Verb::Other,
        }
    }
}

/// GET /health - Store connectivity check
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.drinks.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// GET /metrics - Prometheus metrics
pub async fn metrics(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// /drinks - List and create
pub async fn drink_collection(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> ApiResult<Response> {
    match Verb::from(&method) {
        Verb::Get | Verb::Head => list_drinks(&state).await,
        Verb::Post => create_drink(&state, &body).await,
        Verb::Options => Ok(options(COLLECTION_ALLOW)),
        Verb::Put | Verb::Delete | Verb::Other => Err(ApiError::MethodNotAllowed {
            method,
            allow: COLLECTION_ALLOW,
        }),
    }
}

/// /drinks/{id} - Retrieve, replace and delete
///
/// The record is looked up before the body is read, so a missing id wins
/// over an invalid payload.
pub async fn drink_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    method: Method,
    body: Bytes,
) -> ApiResult<Response> {
    let verb = Verb::from(&method);
    match verb {
        Verb::Options => return Ok(options(ITEM_ALLOW)),
        Verb::Post | Verb::Other => {
            return Err(ApiError::MethodNotAllowed {
                method,
                allow: ITEM_ALLOW,
            });
        }
        _ => {}
    }

    let id = parse_id(&raw_id)?;
    let drink = state.drinks.get(id).await?.ok_or(ApiError::NotFound)?;

    match verb {
        Verb::Put => {
            let payload = parse_body(&body)?;
            let fields = serializer::decode(&payload).map_err(|e| rejected("replace", e))?;

            let updated = state
                .drinks
                .replace(drink.id, fields)
                .await?
                .ok_or(ApiError::NotFound)?;

            tracing::info!(drink_id = updated.id, "Drink replaced");
            crate::metrics::record_drink_updated();

            Ok(Json(updated).into_response())
        }
        Verb::Delete => {
            if !state.drinks.delete(drink.id).await? {
                return Err(ApiError::NotFound);
            }

            tracing::info!(drink_id = drink.id, "Drink deleted");
            crate::metrics::record_drink_deleted();

            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => Ok(Json(drink).into_response()),
    }
}

async fn list_drinks(state: &AppState) -> ApiResult<Response> {
    let drinks = state.drinks.list().await?;

    tracing::debug!(count = drinks.len(), "Listed drinks");
    crate::metrics::update_drink_count(drinks.len());

    Ok(Json(DrinkListResponse { drinks }).into_response())
}

async fn create_drink(state: &AppState, body: &Bytes) -> ApiResult<Response> {
    let payload = parse_body(body)?;
    let fields = serializer::decode(&payload).map_err(|e| rejected("create", e))?;

    let drink = state.drinks.insert(fields).await?;

    tracing::info!(drink_id = drink.id, name = %drink.name, "Drink created");
    crate::metrics::record_drink_created();

    Ok((StatusCode::CREATED, Json(drink)).into_response())
}

fn options(allow: &'static str) -> Response {
    (StatusCode::OK, [(header::ALLOW, allow)]).into_response()
}

fn rejected(operation: &'static str, errors: ValidationErrors) -> ApiError {
    tracing::warn!(operation, fields = ?errors.fields(), "Drink payload rejected");
    crate::metrics::record_validation_failure(operation);
    ApiError::Validation(errors)
}

/// An empty body reads as an empty object
fn parse_body(body: &Bytes) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Only plain decimal digits name a record
fn parse_id(raw: &str) -> ApiResult<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::NotFound);
    }
    raw.parse().map_err(|_| ApiError::NotFound)
}
