pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

use axum::{Router, response::Html, routing::get};
use pizzeria_service::{Database, RestaurantStore, StoreError};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs `f` against a pooled connection on the blocking thread pool.
    async fn with_store<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut RestaurantStore<'_>) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.connection()?;
            f(&mut RestaurantStore::new(&mut conn))
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("Store task failed: {e}")))?
        .map_err(|e| {
            warn!(error = %e, "store operation failed");
            ApiError::from(e)
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(restaurant::router())
        .merge(pizza::router())
        .merge(restaurant_pizza::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn index() -> Html<&'static str> {
    Html("<h1>Code challenge</h1>")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::models::RestaurantSummary,
            crate::models::RestaurantDetail,
            crate::models::RestaurantPizzaWithPizza,
            crate::models::PizzaSummary,
            crate::models::RestaurantPizzaDetail,
            crate::models::CreateRestaurantPizzaRequest,
            crate::models::ApiErrorResponse,
            crate::models::ValidationErrorResponse
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "pizzas", description = "Pizza endpoints"),
        (name = "restaurant_pizzas", description = "Pizza pricing per restaurant")
    ),
    info(
        title = "Pizzeria API",
        description = "Restaurants, pizzas and the prices restaurants charge for them",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use diesel::prelude::*;
    use pizzeria_service::{
        DatabaseConfig,
        models::{NewPizza, NewRestaurant},
        schema::restaurant_pizzas,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    // Two restaurants (ids 1, 2) and two pizzas (ids 1, 2), no join rows.
    fn setup_app() -> (Router, Database) {
        let db = Database::connect(&DatabaseConfig::in_memory()).unwrap();
        db.run_pending_migrations().unwrap();

        {
            let conn = &mut db.connection().unwrap();
            let mut store = RestaurantStore::new(conn);
            for (name, address) in [
                ("Karen's Pizza Shack", "address1"),
                ("Sanjay's Pizza", "address2"),
            ] {
                store.create_restaurant(&NewRestaurant { name, address }).unwrap();
            }
            for (name, ingredients) in [
                ("Emma", "Dough, Tomato Sauce, Cheese"),
                ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
            ] {
                store.create_pizza(&NewPizza { name, ingredients }).unwrap();
            }
        }

        (router(AppState::new(db.clone())), db)
    }

    fn join_row_count(db: &Database) -> i64 {
        let conn: &mut SqliteConnection = &mut db.connection().unwrap();
        restaurant_pizzas::table.count().get_result(conn).unwrap()
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn post_restaurant_pizza(app: &Router, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, "/restaurant_pizzas", Some(&body.to_string())).await
    }

    #[tokio::test]
    async fn test_index() {
        let (app, _) = setup_app();
        let (status, body) = send(&app, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("<h1>Code challenge</h1>".to_string()));
    }

    #[tokio::test]
    async fn test_list_restaurants_has_no_associations() {
        let (app, _) = setup_app();
        post_restaurant_pizza(&app, json!({"price": 5, "pizza_id": 1, "restaurant_id": 1})).await;

        let (status, body) = send(&app, Method::GET, "/restaurants", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 1, "name": "Karen's Pizza Shack", "address": "address1"},
                {"id": 2, "name": "Sanjay's Pizza", "address": "address2"}
            ])
        );
    }

    #[tokio::test]
    async fn test_list_pizzas() {
        let (app, _) = setup_app();
        let (status, body) = send(&app, Method::GET, "/pizzas", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 1, "ingredients": "Dough, Tomato Sauce, Cheese", "name": "Emma"},
                {"id": 2, "ingredients": "Dough, Tomato Sauce, Cheese, Pepperoni", "name": "Geri"}
            ])
        );
    }

    #[tokio::test]
    async fn test_get_restaurant_without_pizzas() {
        let (app, _) = setup_app();
        let (status, body) = send(&app, Method::GET, "/restaurants/2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": 2,
                "name": "Sanjay's Pizza",
                "address": "address2",
                "restaurant_pizzas": []
            })
        );
    }

    #[tokio::test]
    async fn test_get_missing_restaurant() {
        let (app, _) = setup_app();

        let (status, body) = send(&app, Method::GET, "/restaurants/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Restaurant not found"}));

        let (status, _) = send(&app, Method::GET, "/restaurants/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_restaurant_pizza_then_get_restaurant() {
        let (app, _) = setup_app();

        let (status, body) = post_restaurant_pizza(
            &app,
            json!({"price": 5, "pizza_id": 1, "restaurant_id": 1}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "id": 1,
                "price": 5,
                "pizza_id": 1,
                "restaurant_id": 1,
                "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"},
                "restaurant": {"id": 1, "name": "Karen's Pizza Shack", "address": "address1"}
            })
        );

        let (status, body) = send(&app, Method::GET, "/restaurants/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["restaurant_pizzas"],
            json!([{
                "id": 1,
                "price": 5,
                "pizza_id": 1,
                "restaurant_id": 1,
                "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"}
            }])
        );
    }

    #[tokio::test]
    async fn test_create_restaurant_pizza_price_out_of_range() {
        let (app, db) = setup_app();

        for price in [0, 31, 50] {
            let (status, body) = post_restaurant_pizza(
                &app,
                json!({"price": price, "pizza_id": 1, "restaurant_id": 1}),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"errors": ["validation errors"]}));
        }

        let (_, body) = send(&app, Method::GET, "/restaurants/1", None).await;
        assert_eq!(body["restaurant_pizzas"], json!([]));
        assert_eq!(join_row_count(&db), 0);
    }

    #[tokio::test]
    async fn test_create_restaurant_pizza_unknown_references() {
        let (app, db) = setup_app();

        for body in [
            json!({"price": 5, "pizza_id": 99, "restaurant_id": 1}),
            json!({"price": 5, "pizza_id": 1, "restaurant_id": 99}),
        ] {
            let (status, body) = post_restaurant_pizza(&app, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"errors": ["validation errors"]}));
        }

        assert_eq!(join_row_count(&db), 0);
    }

    #[tokio::test]
    async fn test_create_restaurant_pizza_malformed_body() {
        let (app, db) = setup_app();

        for body in [
            "not json",
            r#"{"price": 5, "pizza_id": 1}"#,
            r#"{"price": "5", "pizza_id": 1, "restaurant_id": 1}"#,
            r#"{"price": null, "pizza_id": 1, "restaurant_id": 1}"#,
        ] {
            let (status, body) = send(&app, Method::POST, "/restaurant_pizzas", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"errors": ["validation errors"]}));
        }

        assert_eq!(join_row_count(&db), 0);
    }

    #[tokio::test]
    async fn test_delete_restaurant_cascades() {
        let (app, db) = setup_app();
        post_restaurant_pizza(&app, json!({"price": 5, "pizza_id": 1, "restaurant_id": 1})).await;
        post_restaurant_pizza(&app, json!({"price": 12, "pizza_id": 2, "restaurant_id": 1})).await;
        post_restaurant_pizza(&app, json!({"price": 7, "pizza_id": 1, "restaurant_id": 2})).await;
        assert_eq!(join_row_count(&db), 3);

        let (status, body) = send(&app, Method::DELETE, "/restaurants/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::GET, "/restaurants/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(join_row_count(&db), 1);

        let (_, body) = send(&app, Method::GET, "/pizzas", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_restaurant() {
        let (app, _) = setup_app();
        let (status, body) = send(&app, Method::DELETE, "/restaurants/999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Restaurant not found"}));
    }
}
