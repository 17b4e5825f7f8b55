use std::collections::HashMap;

use diesel::prelude::*;
use diesel::{delete, insert_into, SqliteConnection};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

/// A join row together with the pizza it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantPizzaWithPizza {
    pub restaurant_pizza: RestaurantPizza,
    pub pizza: Option<Pizza>,
}

/// A join row with both ends loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantPizzaDetails {
    pub restaurant_pizza: RestaurantPizza,
    pub pizza: Option<Pizza>,
    pub restaurant: Option<Restaurant>,
}

pub struct RestaurantStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> RestaurantStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn list_restaurants(&mut self) -> Result<Vec<Restaurant>, StoreError> {
        Ok(restaurants::table
            .order(restaurants::id)
            .select(Restaurant::as_select())
            .load(self.conn)?)
    }

    pub fn find_restaurant(&mut self, restaurant_id: i32) -> Result<Restaurant, StoreError> {
        restaurants::table
            .find(restaurant_id)
            .select(Restaurant::as_select())
            .first(self.conn)
            .optional()?
            .ok_or(StoreError::NotFound("Restaurant"))
    }

    pub fn create_restaurant(&mut self, new: &NewRestaurant) -> Result<Restaurant, StoreError> {
        Ok(insert_into(restaurants::table)
            .values(new)
            .returning(Restaurant::as_returning())
            .get_result(self.conn)?)
    }

    /// Removes the restaurant and every join row referencing it.
    pub fn delete_restaurant(&mut self, restaurant_id: i32) -> Result<(), StoreError> {
        self.conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let restaurant = RestaurantStore::new(conn).find_restaurant(restaurant_id)?;

            let removed = delete(RestaurantPizza::belonging_to(&restaurant)).execute(conn)?;
            delete(&restaurant).execute(conn)?;

            debug!(restaurant_id, removed, "deleted restaurant");
            Ok(())
        })
    }

    pub fn list_pizzas(&mut self) -> Result<Vec<Pizza>, StoreError> {
        Ok(pizzas::table
            .order(pizzas::id)
            .select(Pizza::as_select())
            .load(self.conn)?)
    }

    pub fn find_pizza(&mut self, pizza_id: i32) -> Result<Pizza, StoreError> {
        pizzas::table
            .find(pizza_id)
            .select(Pizza::as_select())
            .first(self.conn)
            .optional()?
            .ok_or(StoreError::NotFound("Pizza"))
    }

    pub fn create_pizza(&mut self, new: &NewPizza) -> Result<Pizza, StoreError> {
        Ok(insert_into(pizzas::table)
            .values(new)
            .returning(Pizza::as_returning())
            .get_result(self.conn)?)
    }

    /// Removes the pizza and every join row referencing it.
    pub fn delete_pizza(&mut self, pizza_id: i32) -> Result<(), StoreError> {
        self.conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let pizza = RestaurantStore::new(conn).find_pizza(pizza_id)?;

            let removed = delete(RestaurantPizza::belonging_to(&pizza)).execute(conn)?;
            delete(&pizza).execute(conn)?;

            debug!(pizza_id, removed, "deleted pizza");
            Ok(())
        })
    }

    /// Join rows of a restaurant, each with its pizza, in insertion order.
    pub fn restaurant_pizzas_of(
        &mut self,
        restaurant: &Restaurant,
    ) -> Result<Vec<RestaurantPizzaWithPizza>, StoreError> {
        let rows = RestaurantPizza::belonging_to(restaurant)
            .order(restaurant_pizzas::id)
            .select(RestaurantPizza::as_select())
            .load(self.conn)?;

        let pizza_ids = rows.iter().filter_map(|r| r.pizza_id).collect::<Vec<_>>();
        let pizzas_by_id = pizzas::table
            .filter(pizzas::id.eq_any(pizza_ids))
            .select(Pizza::as_select())
            .load(self.conn)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect::<HashMap<_, _>>();

        Ok(rows
            .into_iter()
            .map(|restaurant_pizza| {
                let pizza = restaurant_pizza
                    .pizza_id
                    .and_then(|id| pizzas_by_id.get(&id).cloned());
                RestaurantPizzaWithPizza {
                    restaurant_pizza,
                    pizza,
                }
            })
            .collect())
    }

    /// Pizzas served by a restaurant, one per join row.
    pub fn pizzas_of_restaurant(
        &mut self,
        restaurant: &Restaurant,
    ) -> Result<Vec<Pizza>, StoreError> {
        Ok(self
            .restaurant_pizzas_of(restaurant)?
            .into_iter()
            .filter_map(|entry| entry.pizza)
            .collect())
    }

    /// Restaurants serving a pizza, one per join row.
    pub fn restaurants_of_pizza(
        &mut self,
        pizza: &Pizza,
    ) -> Result<Vec<Restaurant>, StoreError> {
        let restaurant_ids = RestaurantPizza::belonging_to(pizza)
            .order(restaurant_pizzas::id)
            .select(restaurant_pizzas::restaurant_id)
            .load::<Option<i32>>(self.conn)?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let restaurants_by_id = restaurants::table
            .filter(restaurants::id.eq_any(restaurant_ids.clone()))
            .select(Restaurant::as_select())
            .load(self.conn)?
            .into_iter()
            .map(|r| (r.id, r))
            .collect::<HashMap<_, _>>();

        Ok(restaurant_ids
            .iter()
            .filter_map(|id| restaurants_by_id.get(id).cloned())
            .collect())
    }

    /// Inserts a join row after checking that both referenced rows exist.
    /// Runs in a single `BEGIN IMMEDIATE` transaction; nothing is written on
    /// error.
    pub fn create_restaurant_pizza(
        &mut self,
        new: &NewRestaurantPizza,
    ) -> Result<RestaurantPizzaDetails, StoreError> {
        self.conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let pizza = match new.pizza_id() {
                Some(id) => Some(referenced(
                    RestaurantStore::new(conn).find_pizza(id),
                    "pizzas",
                    id,
                )?),
                None => None,
            };
            let restaurant = match new.restaurant_id() {
                Some(id) => Some(referenced(
                    RestaurantStore::new(conn).find_restaurant(id),
                    "restaurants",
                    id,
                )?),
                None => None,
            };

            let restaurant_pizza = insert_into(restaurant_pizzas::table)
                .values(new)
                .returning(RestaurantPizza::as_returning())
                .get_result(conn)?;

            Ok(RestaurantPizzaDetails {
                restaurant_pizza,
                pizza,
                restaurant,
            })
        })
    }
}

fn referenced<T>(
    found: Result<T, StoreError>,
    table: &'static str,
    id: i32,
) -> Result<T, StoreError> {
    match found {
        Err(StoreError::NotFound(_)) => Err(StoreError::MissingReference { table, id }),
        found => found,
    }
}
