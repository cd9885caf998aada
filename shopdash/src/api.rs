//! Client side of the dashboard product API.
//!
//! [`ProductApi`] is the seam the product list talks through; the production
//! implementation is [`HttpProductApi`], tests substitute scripted fakes.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::product::{Product, ProductId};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub const PRODUCTS_PATH: &str = "/dashboard/get-all-products";
pub const DELETE_PRODUCT_PATH: &str = "/dashboard/product/delete-product";

/// Body of a delete response. Only `statusCode == 200` counts as success,
/// regardless of the HTTP status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReply {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
}

impl DeleteReply {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

pub trait ProductApi: Send + Sync + 'static {
    /// Fetches the full product collection.
    ///
    /// Resolves to `Ok(None)` when the response carries no `data` field, in
    /// which case callers must leave their current snapshot alone.
    fn fetch_products(&self) -> BoxFuture<'_, Result<Option<Vec<Product>>>>;

    fn delete_product<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<DeleteReply>>;
}

/// Extracts the `data` array from a product list response body.
pub fn decode_product_list(body: &[u8]) -> Result<Option<Vec<Product>>> {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "product list response is not JSON, ignoring");
            return Ok(None);
        }
    };

    match payload.get("data") {
        None | Some(Value::Null) => {
            warn!("product list response has no data field, ignoring");
            Ok(None)
        }
        Some(data) => Ok(Some(Vec::<Product>::deserialize(data)?)),
    }
}

pub fn decode_delete_reply(body: &[u8]) -> Result<DeleteReply> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpProductApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        let api = Self::new(config.api_base_url.clone());
        match &config.bearer_token {
            Some(token) => api.with_bearer_token(token.clone()),
            None => api,
        }
    }

    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_products(&self) -> Result<Option<Vec<Product>>> {
        let url = format!("{}{}", self.base_url, PRODUCTS_PATH);
        debug!(%url, "fetching products");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        decode_product_list(&body)
    }

    async fn send_delete(&self, id: &ProductId) -> Result<DeleteReply> {
        let url = format!("{}{}/{}", self.base_url, DELETE_PRODUCT_PATH, id);
        debug!(%url, product_id = %id, "deleting product");
        let response = self
            .authorize(self.client.delete(&url))
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        decode_delete_reply(&body)
    }
}

impl ProductApi for HttpProductApi {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Option<Vec<Product>>>> {
        self.get_products().boxed()
    }

    fn delete_product<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<DeleteReply>> {
        self.send_delete(id).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    #[test]
    fn decodes_data_array() {
        let body = br#"{"success": true, "data": [{"_id": "a1", "title": "Red Shoe", "price": 12, "quantity": 4, "images": []}]}"#;
        let products = decode_product_list(body).unwrap().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Red Shoe");
    }

    #[test]
    fn missing_or_null_data_is_no_update() {
        assert_eq!(decode_product_list(br#"{"message": "ok"}"#).unwrap(), None);
        assert_eq!(decode_product_list(br#"{"data": null}"#).unwrap(), None);
        assert_eq!(decode_product_list(b"[1, 2, 3]").unwrap(), None);
        assert_eq!(decode_product_list(b"<html>bad gateway</html>").unwrap(), None);
    }

    #[test]
    fn empty_data_is_an_update() {
        assert_eq!(decode_product_list(br#"{"data": []}"#).unwrap(), Some(vec![]));
    }

    #[test]
    fn malformed_products_are_rejected() {
        let result = decode_product_list(br#"{"data": [{"_id": "a1", "price": 1, "quantity": 1}]}"#);
        assert!(matches!(result, Err(DashboardError::UnexpectedShape(_))));
    }

    #[test]
    fn delete_reply_status() {
        let reply = decode_delete_reply(br#"{"statusCode": 200, "message": "Product deleted"}"#).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.message, "Product deleted");

        let reply = decode_delete_reply(br#"{"statusCode": 404}"#).unwrap();
        assert!(!reply.is_success());
        assert!(reply.message.is_empty());

        assert!(decode_delete_reply(b"nope").is_err());
    }

    #[test]
    fn base_url_is_normalised() {
        let api = HttpProductApi::new("http://localhost:8080/api/").with_bearer_token("t");
        assert_eq!(api.base_url(), "http://localhost:8080/api");
    }
}
