use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use common_auth::Claims;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::drinks::RecipeInput;
use crate::store::StoreError;
use crate::ApiError;

#[derive(Deserialize)]
pub struct NewDrink {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

#[derive(Deserialize)]
pub struct UpdateDrink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::DuplicateTitle(_) => ApiError::Unprocessable { message: None },
        }
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|err| {
        tracing::debug!(error = %err, "rejected request body");
        ApiError::bad_request()
    })
}

/// Ids are integers; anything else names no drink.
fn drink_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|err| {
        tracing::debug!(error = %err, "rejected drink id");
        ApiError::NotFound
    })
}

fn normalize_title(title: Option<String>) -> Result<Option<String>, ApiError> {
    match title.map(|value| value.trim().to_string()) {
        Some(value) if value.is_empty() => Err(ApiError::unprocessable()),
        other => Ok(other),
    }
}

pub async fn list_drinks(State(state): State<AppState>) -> Json<Value> {
    let drinks: Vec<_> = state.store.list().await.iter().map(|drink| drink.short()).collect();
    Json(json!({ "success": true, "drinks": drinks }))
}

pub async fn list_drinks_detail(State(state): State<AppState>, _claims: Claims) -> Json<Value> {
    let drinks: Vec<_> = state.store.list().await.iter().map(|drink| drink.long()).collect();
    Json(json!({ "success": true, "drinks": drinks }))
}

pub async fn create_drink(
    State(state): State<AppState>,
    claims: Claims,
    payload: Result<Json<NewDrink>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(payload)?;
    let title = normalize_title(body.title)?.ok_or_else(ApiError::unprocessable)?;
    let recipe = body.recipe.ok_or_else(ApiError::unprocessable)?;

    let drink = state.store.insert(title, recipe.into()).await?;
    tracing::info!(drink_id = drink.id, subject = ?claims.subject, "drink created");
    Ok(Json(json!({ "success": true, "drinks": [drink.long()] })))
}

/// Requires `post:drinks`, the same permission as create.
pub async fn update_drink(
    State(state): State<AppState>,
    claims: Claims,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDrink>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let drink_id = drink_id(path)?;
    let body = json_body(payload)?;
    let title = normalize_title(body.title)?;

    let drink = state
        .store
        .update(drink_id, title, body.recipe.map(Into::into))
        .await?;
    tracing::info!(drink_id, subject = ?claims.subject, "drink updated");
    Ok(Json(json!({ "success": true, "drinks": [drink.long()] })))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    claims: Claims,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let drink_id = drink_id(path)?;
    state.store.delete(drink_id).await?;
    tracing::info!(drink_id, subject = ?claims.subject, "drink deleted");
    Ok(Json(json!({ "success": true, "delete": drink_id })))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
