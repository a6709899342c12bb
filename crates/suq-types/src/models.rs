use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The storefront's fixed set of furniture categories. The Amharic names are
/// the wire and storage representation; they are what the storefront writes
/// and what existing product rows contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "አልጋ")]
    Bed,
    #[serde(rename = "ቲቪ ስታንድ")]
    TvStand,
    #[serde(rename = "ቁምሳጥን")]
    Wardrobe,
    #[serde(rename = "ድሪሲንግ")]
    Dresser,
    #[serde(rename = "መጅሊስ")]
    Majlis,
    #[serde(rename = "ቡፌ")]
    Buffet,
}

#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Bed,
        Category::TvStand,
        Category::Wardrobe,
        Category::Dresser,
        Category::Majlis,
        Category::Buffet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bed => "አልጋ",
            Category::TvStand => "ቲቪ ስታንድ",
            Category::Wardrobe => "ቁምሳጥን",
            Category::Dresser => "ድሪሲንግ",
            Category::Majlis => "መጅሊስ",
            Category::Buffet => "ቡፌ",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status. New orders start in `Review`; status is the only
/// field an admin mutates after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Review,
    Pending,
    Failed,
    Delivered,
}

#[derive(Debug, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Review => "Review",
            OrderStatus::Pending => "Pending",
            OrderStatus::Failed => "Failed",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Review" => Ok(OrderStatus::Review),
            "Pending" => Ok(OrderStatus::Pending),
            "Failed" => Ok(OrderStatus::Failed),
            "Delivered" => Ok(OrderStatus::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storefront account. Created by the storefront app, never by the admin
/// console; the admin console lists and deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub online: bool,
    pub listed_products: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub description: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Customer details captured at checkout. This is a snapshot embedded in the
/// order, not a reference to a user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub payment_proof: Option<String>,
}

/// One ordered product. `product_id` is informational only: the name and
/// price here are the values at order time, and deleting the product later
/// leaves this snapshot untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Chat message between the admin and a storefront user. Immutable once
/// created; there is no edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub sender_email: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names_round_trip() {
        for c in Category::ALL {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("sofa".parse::<Category>().is_err());
    }

    #[test]
    fn order_status_defaults_to_review() {
        assert_eq!(OrderStatus::default(), OrderStatus::Review);
        assert_eq!("Delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }
}
