use diesel::prelude::*;

use crate::error::StoreError;
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurant<'a> {
    pub name: &'a str,
    pub address: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = pizzas)]
pub struct NewPizza<'a> {
    pub name: &'a str,
    pub ingredients: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(belongs_to(Pizza))]
#[diesel(table_name = restaurant_pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: Option<i32>,
    pub restaurant_id: Option<i32>,
}

/// Price of a pizza at a restaurant, always within `Price::MIN..=Price::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i32);

impl Price {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 30;

    pub fn new(value: i32) -> Result<Self, StoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StoreError::InvalidPrice(value))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Price {
    type Error = StoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Insert payload for the join table. Only constructible from a validated
/// [`Price`], so an out-of-range price never reaches the database.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurant_pizzas)]
pub struct NewRestaurantPizza {
    price: i32,
    pizza_id: Option<i32>,
    restaurant_id: Option<i32>,
}

impl NewRestaurantPizza {
    pub fn new(price: Price, pizza_id: Option<i32>, restaurant_id: Option<i32>) -> Self {
        Self {
            price: price.get(),
            pizza_id,
            restaurant_id,
        }
    }

    pub fn price(&self) -> i32 {
        self.price
    }

    pub fn pizza_id(&self) -> Option<i32> {
        self.pizza_id
    }

    pub fn restaurant_id(&self) -> Option<i32> {
        self.restaurant_id
    }
}
