use pizzeria_service::models;
use pizzeria_service::store::{RestaurantPizzaDetails, RestaurantPizzaWithPizza};

use crate::models::{
    PizzaSummary, RestaurantDetail, RestaurantPizzaDetail, RestaurantSummary,
    RestaurantPizzaWithPizza as RestaurantPizzaWithPizzaView,
};

pub fn serialize_restaurant_summary(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza_summary(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        ingredients: pizza.ingredients.clone(),
        name: pizza.name.clone(),
    }
}

pub fn serialize_restaurant_detail(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[RestaurantPizzaWithPizza],
) -> RestaurantDetail {
    RestaurantDetail {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|entry| RestaurantPizzaWithPizzaView {
                id: entry.restaurant_pizza.id,
                price: entry.restaurant_pizza.price,
                pizza_id: entry.restaurant_pizza.pizza_id,
                restaurant_id: entry.restaurant_pizza.restaurant_id,
                pizza: entry.pizza.as_ref().map(serialize_pizza_summary),
            })
            .collect(),
    }
}

pub fn serialize_restaurant_pizza_detail(
    details: &RestaurantPizzaDetails,
) -> RestaurantPizzaDetail {
    RestaurantPizzaDetail {
        id: details.restaurant_pizza.id,
        price: details.restaurant_pizza.price,
        pizza_id: details.restaurant_pizza.pizza_id,
        restaurant_id: details.restaurant_pizza.restaurant_id,
        pizza: details.pizza.as_ref().map(serialize_pizza_summary),
        restaurant: details.restaurant.as_ref().map(serialize_restaurant_summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn restaurant() -> models::Restaurant {
        models::Restaurant {
            id: 1,
            name: "Karen's Pizza Shack".to_string(),
            address: "address1".to_string(),
        }
    }

    fn pizza() -> models::Pizza {
        models::Pizza {
            id: 2,
            name: "Emma".to_string(),
            ingredients: "Dough, Tomato Sauce, Cheese".to_string(),
        }
    }

    fn join_row() -> models::RestaurantPizza {
        models::RestaurantPizza {
            id: 3,
            price: 5,
            pizza_id: Some(2),
            restaurant_id: Some(1),
        }
    }

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        keys.sort();
        keys
    }

    #[test]
    fn test_summaries_expose_only_listed_fields() {
        let restaurant = serde_json::to_value(serialize_restaurant_summary(&restaurant())).unwrap();
        assert_eq!(keys(&restaurant), vec!["address", "id", "name"]);

        let pizza = serde_json::to_value(serialize_pizza_summary(&pizza())).unwrap();
        assert_eq!(keys(&pizza), vec!["id", "ingredients", "name"]);
    }

    #[test]
    fn test_restaurant_detail_omits_back_reference() {
        let entries = vec![RestaurantPizzaWithPizza {
            restaurant_pizza: join_row(),
            pizza: Some(pizza()),
        }];
        let detail = serialize_restaurant_detail(&restaurant(), &entries);
        let value = serde_json::to_value(detail).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Karen's Pizza Shack",
                "address": "address1",
                "restaurant_pizzas": [{
                    "id": 3,
                    "price": 5,
                    "pizza_id": 2,
                    "restaurant_id": 1,
                    "pizza": {
                        "id": 2,
                        "name": "Emma",
                        "ingredients": "Dough, Tomato Sauce, Cheese"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_restaurant_pizza_detail_stops_at_both_ends() {
        let details = RestaurantPizzaDetails {
            restaurant_pizza: join_row(),
            pizza: Some(pizza()),
            restaurant: Some(restaurant()),
        };
        let value = serde_json::to_value(serialize_restaurant_pizza_detail(&details)).unwrap();

        assert_eq!(
            keys(&value),
            vec!["id", "pizza", "pizza_id", "price", "restaurant", "restaurant_id"]
        );
        assert_eq!(keys(&value["pizza"]), vec!["id", "ingredients", "name"]);
        assert_eq!(keys(&value["restaurant"]), vec!["address", "id", "name"]);
    }
}
