use std::{fmt::Display, str::FromStr};

pub use bazaar_common::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------      UserType        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Owns shops, uploads price lists and fulfils orders.
    Seller,
    /// Builds baskets and places orders.
    Buyer,
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Seller => write!(f, "seller"),
            UserType::Buyer => write!(f, "buyer"),
        }
    }
}

impl FromStr for UserType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seller" | "shop" => Ok(Self::Seller),
            "buyer" => Ok(Self::Buyer),
            _ => Err(ConversionError(format!("Unknown user type: {s}"))),
        }
    }
}

//--------------------------------------     SessionUser      ---------------------------------------------------------
/// The identity attached to a request by the authentication layer. The engine takes it at face value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub user_type: UserType,
    pub is_active: bool,
}

impl SessionUser {
    pub fn new(id: i64, user_type: UserType) -> Self {
        Self { id, user_type, is_active: true }
    }

    pub fn is_seller(&self) -> bool {
        self.user_type == UserType::Seller
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// Order lifecycle. Sellers may write any status string, so values outside the known set are carried verbatim in
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatusType {
    /// The buyer's open basket. Mutable by the buyer.
    Basket,
    /// Placed by the buyer, waiting for the seller.
    New,
    Confirmed,
    Assembled,
    Sent,
    Delivered,
    Canceled,
    Other(String),
}

impl OrderStatusType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basket => "basket",
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::Assembled => "assembled",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_basket(&self) -> bool {
        matches!(self, Self::Basket)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OrderStatusType {
    fn from(value: &str) -> Self {
        match value {
            "basket" => Self::Basket,
            "new" => Self::New,
            "confirmed" => Self::Confirmed,
            "assembled" => Self::Assembled,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl Serialize for OrderStatusType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatusType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

//--------------------------------------      Catalog         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub seller_id: Option<i64>,
    /// Whether the shop currently accepts orders
    pub is_work: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub category_id: i64,
}

/// A product as sold by one shop. This is what order items point at.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub shop_id: i64,
    pub product_id: i64,
    /// The shop's own identifier for the good
    pub ext_id: i64,
    /// Units in stock
    pub quantity: i64,
    pub price: Price,
    /// Recommended retail price
    pub price_rrc: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Parameter {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: i64,
    pub product_id: i64,
    pub parameter_id: i64,
    pub value: String,
}

//--------------------------------------       Contact        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub country: String,
    pub region: String,
    pub zip: String,
    pub city: String,
    pub street: String,
    pub house: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub country: String,
    pub region: String,
    pub zip: String,
    pub city: String,
    pub street: String,
    pub house: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: String,
}

/// A partial contact update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub country: Option<String>,
    pub region: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the fields a new contact must have but this one lacks.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("country", &self.country),
            ("region", &self.region),
            ("zip", &self.zip),
            ("city", &self.city),
            ("street", &self.street),
            ("house", &self.house),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect()
    }

    /// Converts the update into a complete contact. Fails with the names of the missing required fields.
    pub fn into_new_contact(self) -> Result<NewContact, Vec<&'static str>> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(missing);
        }
        Ok(NewContact {
            country: self.country.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            zip: self.zip.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            house: self.house.unwrap_or_default(),
            building: self.building,
            apartment: self.apartment,
            phone: self.phone.unwrap_or_default(),
        })
    }

    pub fn apply_to(self, contact: &mut Contact) {
        fn set(field: &mut String, value: Option<String>) {
            if let Some(v) = value {
                *field = v;
            }
        }
        set(&mut contact.country, self.country);
        set(&mut contact.region, self.region);
        set(&mut contact.zip, self.zip);
        set(&mut contact.city, self.city);
        set(&mut contact.street, self.street);
        set(&mut contact.house, self.house);
        set(&mut contact.phone, self.phone);
        if self.building.is_some() {
            contact.building = self.building;
        }
        if self.apartment.is_some() {
            contact.apartment = self.apartment;
        }
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub listing_id: i64,
    pub quantity: i64,
}

/// A validated (listing, quantity) pair destined for a basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub listing_id: i64,
    pub quantity: i64,
}

impl NewOrderItem {
    pub fn new(listing_id: i64, quantity: i64) -> Self {
        Self { listing_id, quantity }
    }
}
