use serde::{Deserialize, Serialize};

/// Envelope of the business search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Businesses {
    pub businesses: Vec<Restaurant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub alias: String,
    pub name: String,
    pub image_url: String,
    pub is_closed: bool,
    pub url: String,
    pub review_count: u32,
    pub categories: Vec<Category>,
    pub rating: f64,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub transactions: Option<Vec<String>>,
    #[serde(default)]
    pub price: Option<String>,
    pub location: Location,
    pub phone: String,
    pub display_phone: String,
    /// meters from the searched location
    pub distance: f64,
}

impl Restaurant {
    pub fn primary_address(&self) -> Option<&str> {
        self.location.address1.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub alias: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub address3: Option<String>,
    pub city: String,
    pub zip_code: String,
    pub country: String,
    pub state: String,
    #[serde(default)]
    pub display_address: Option<Vec<String>>,
}
