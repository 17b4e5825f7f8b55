use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use pizzeria_service::models::{NewRestaurantPizza, Price};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::models::*;
use crate::serializer::serialize_restaurant_pizza_detail;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Pizza priced at restaurant", body = RestaurantPizzaDetail),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizzaDetail>), ApiError> {
    // Every failure below is reported as the same generic 400.
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "rejected restaurant pizza payload");
        ApiError::Validation
    })?;

    let price = Price::new(payload.price).map_err(|e| {
        warn!(error = %e, "rejected restaurant pizza price");
        ApiError::Validation
    })?;
    let new = NewRestaurantPizza::new(
        price,
        Some(payload.pizza_id),
        Some(payload.restaurant_id),
    );

    let details = state
        .with_store(move |store| store.create_restaurant_pizza(&new))
        .await
        .map_err(|_| ApiError::Validation)?;

    info!(
        restaurant_pizza_id = details.restaurant_pizza.id,
        "created restaurant pizza"
    );
    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza_detail(&details)),
    ))
}
