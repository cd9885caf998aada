use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Server-assigned product identifier (the backend's `_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
}

/// A product record as served by the dashboard API.
///
/// The client only ever holds read-only copies; unknown fields in the
/// payload are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            id: ProductId::new(id),
            title: title.into(),
            price,
            quantity,
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(ProductImage { url: url.into() });
        self
    }

    /// Only the first image is ever displayed; an empty URL counts as absent.
    pub fn cover_image_url(&self) -> Option<&str> {
        self.images
            .first()
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }
}
