use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PizzaSummary {
    pub id: i32,
    pub ingredients: String,
    pub name: String,
}

/// A restaurant with its menu. Nested join rows carry their pizza but never
/// point back at the restaurant.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RestaurantDetail {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizzaWithPizza>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RestaurantPizzaWithPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: Option<i32>,
    pub restaurant_id: Option<i32>,
    pub pizza: Option<PizzaSummary>,
}

/// A join row with both ends, neither of which re-expands its join rows.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RestaurantPizzaDetail {
    pub id: i32,
    pub price: i32,
    pub pizza_id: Option<i32>,
    pub restaurant_id: Option<i32>,
    pub pizza: Option<PizzaSummary>,
    pub restaurant: Option<RestaurantSummary>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price in whole units, between 1 and 30
    pub price: i32,
    /// Identifier of an existing pizza
    pub pizza_id: i32,
    /// Identifier of an existing restaurant
    pub restaurant_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Always `["validation errors"]`
    pub errors: Vec<String>,
}
