//! Catalog reads: categories, products, options.

use std::collections::HashMap;

use forkful_core::catalog::{ProductOptionRow, ProductRow, options_from_rows};
use forkful_core::{Category, CategoryId, Product, ProductId, ProductOption};
use serde::Deserialize;

use crate::{BackendClient, BackendError, Direction, Query, Table};

/// Storefront listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// All categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        let query = Query::new()
            .order("position", Direction::Asc)
            .order("name", Direction::Asc);
        self.client.select(Table::Categories, &query).await
    }

    /// Available products matching `filter`, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, BackendError> {
        let rows: Vec<ProductRow> = self
            .client
            .select(Table::Products, &products_query(filter))
            .await?;
        Ok(rows
            .into_iter()
            .map(Product::from)
            .filter(|p| p.available)
            .collect())
    }

    /// One product with its category name.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no product has this id.
    pub async fn product(&self, id: ProductId) -> Result<Product, BackendError> {
        let query = Query::new().select(PRODUCT_COLUMNS).eq("id", id);
        let row: ProductRow = self.client.select_one(Table::Products, query).await?;
        Ok(row.into())
    }

    /// A product's options with their variations, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn options(&self, product_id: ProductId) -> Result<Vec<ProductOption>, BackendError> {
        let query = Query::new()
            .select("*,option_variations(*)")
            .eq("product_id", product_id)
            .order("position", Direction::Asc);
        let rows: Vec<ProductOptionRow> = self.client.select(Table::ProductOptions, &query).await?;
        Ok(options_from_rows(rows))
    }

    /// Resolve product names for a set of ids in one request.
    ///
    /// Ids with no matching product are absent from the map.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn product_names(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, String>, BackendError> {
        #[derive(Deserialize)]
        struct NameRow {
            id: ProductId,
            name: String,
        }

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = Query::new().select("id,name").in_list("id", ids);
        let rows: Vec<NameRow> = self.client.select(Table::Products, &query).await?;
        Ok(rows.into_iter().map(|r| (r.id, r.name)).collect())
    }
}

const PRODUCT_COLUMNS: &str = "*,categories(name)";

fn products_query(filter: &ProductFilter) -> Query {
    let mut query = Query::new()
        .select(PRODUCT_COLUMNS)
        .order("name", Direction::Asc);
    if let Some(category) = filter.category {
        query = query.eq("category_id", category);
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.ilike("name", search);
    }
    query
}
