use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::models::*;
use crate::serializer::{serialize_restaurant_detail, serialize_restaurant_summary};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

/// Non-integer ids match no restaurant.
fn restaurant_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound("Restaurant not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = Vec<RestaurantSummary>),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let restaurants = state.with_store(|store| store.list_restaurants()).await?;

    Ok(Json(
        restaurants.iter().map(serialize_restaurant_summary).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant with its pizzas", body = RestaurantDetail),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    let id = restaurant_id(path)?;

    let (restaurant, restaurant_pizzas) = state
        .with_store(move |store| {
            let restaurant = store.find_restaurant(id)?;
            let restaurant_pizzas = store.restaurant_pizzas_of(&restaurant)?;
            Ok((restaurant, restaurant_pizzas))
        })
        .await?;

    Ok(Json(serialize_restaurant_detail(
        &restaurant,
        &restaurant_pizzas,
    )))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizza prices deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = restaurant_id(path)?;

    state
        .with_store(move |store| store.delete_restaurant(id))
        .await?;

    info!(restaurant_id = id, "deleted restaurant");
    Ok(StatusCode::NO_CONTENT)
}
