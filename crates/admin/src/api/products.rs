//! Product catalog operations.

use backoffice_core::{
    CreateProductRequest, DataEnvelope, Page, Product, ProductId, ProductsQuery,
    UpdateProductRequest,
};
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiError, BackofficeClient, require_token};

impl BackofficeClient {
    /// Fetch one page of products, with its pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_products(
        &self,
        query: &ProductsQuery,
        token: Option<&SecretString>,
    ) -> Result<Page<Product>, ApiError> {
        self.get_with_query("/products", query, token).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns error if the product is not found or the API request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        id: &ProductId,
        token: Option<&SecretString>,
    ) -> Result<Product, ApiError> {
        let path = format!("/products/{id}");
        let response: DataEnvelope<Product> = self.get(&path, token).await?;
        Ok(response.data)
    }

    /// Create a product. The backend derives the sale price.
    ///
    /// Returns the raw response body (`null` when empty).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` without a token, or the backend
    /// message (fallback `"Failed to create product"`).
    #[instrument(skip(self, request, token), fields(name = %request.name))]
    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let token = require_token(token)?;
        let body = self
            .post("/products", request, Some(token), "Failed to create product")
            .await?;
        tracing::info!("Product created");
        Ok(body)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` without a token, or the backend
    /// message (fallback `"Failed to update product"`).
    #[instrument(skip(self, request, token), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        request: &UpdateProductRequest,
        token: Option<&SecretString>,
    ) -> Result<serde_json::Value, ApiError> {
        let token = require_token(token)?;
        let path = format!("/products/{id}");
        let body = self
            .put(&path, request, Some(token), "Failed to update product")
            .await?;
        tracing::info!("Product updated");
        Ok(body)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` without a token, or the backend
    /// message (fallback `"Failed to delete product"`).
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        id: &ProductId,
        token: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        let token = require_token(token)?;
        let path = format!("/products/{id}");
        self.delete(&path, Some(token), "Failed to delete product")
            .await?;
        tracing::info!("Product deleted");
        Ok(())
    }
}
