//! # Product Commands
//!
//! Catalog browsing, selling, and inventory maintenance.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Sale Flow                                    │
//! │                                                                         │
//! │  fiado catalogo vender 3                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sell_product(db, shop, "3")                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  stock > 0?                               │                         │
//! │  │  YES: stock - 1, re-stamp, write-through  │──► Sold { remaining }   │
//! │  │  NO:  nothing changes, nothing written    │──► OutOfStock           │
//! │  └───────────────────────────────────────────┘                         │
//! │                                                                         │
//! │  A sale never creates a ledger entry.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use fiado_core::catalog::{self, ProductFields, SaleOutcome};
use fiado_core::validation::parse_price;
use fiado_core::Product;

use crate::error::ApiError;
use crate::state::{DbState, ShopState};

/// Product as shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock: i64,
    pub unit: String,
    pub last_updated: DateTime<Utc>,
    /// Catalog badge: "últimas unidades".
    pub last_units: bool,
    /// Inventory badge: "estoque baixo".
    pub low_stock: bool,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            id: p.id.clone(),
            name: p.name.clone(),
            category: p.category.clone(),
            description: p.description.clone(),
            image: p.image.clone(),
            price_cents: p.price_cents,
            cost_cents: p.cost_cents,
            stock: p.stock,
            unit: p.unit.clone(),
            last_updated: p.last_updated,
            last_units: catalog::is_last_units(p),
            low_stock: catalog::is_inventory_low(p),
        }
    }
}

/// Result of a sale attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub product_id: String,
    pub product_name: String,
    pub sold: bool,
    pub remaining: Option<i64>,
}

/// Product form fields exactly as typed. Prices use `,` or `.` decimals.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<String>,
    pub cost: Option<String>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
}

impl ProductInput {
    /// Parses the price fields into centavos.
    pub fn into_fields(self) -> Result<ProductFields, ApiError> {
        let price_cents = self
            .price
            .map(|p| parse_price("price", &p))
            .transpose()?
            .map(|m| m.cents());
        let cost_cents = self
            .cost
            .map(|c| parse_price("cost", &c))
            .transpose()?
            .map(|m| m.cents());

        Ok(ProductFields {
            name: self.name,
            category: self.category,
            description: self.description,
            image: self.image,
            price_cents,
            cost_cents,
            stock: self.stock,
            unit: self.unit,
        })
    }
}

// =============================================================================
// Read Side
// =============================================================================

/// Catalog listing: name filter within a category (`Todos` for all).
pub async fn list_catalog(
    shop: &ShopState,
    query: &str,
    category: &str,
) -> Result<Vec<ProductDto>, ApiError> {
    debug!(query = %query, category = %category, "list_catalog command");

    shop.with_shop(|s| {
        catalog::filter_catalog(&s.products, query, category)
            .map(|found| found.into_iter().map(ProductDto::from).collect::<Vec<_>>())
    })
    .await
    .map_err(ApiError::from)
}

/// Category choices for the catalog filter.
pub async fn list_categories(shop: &ShopState) -> Vec<String> {
    shop.with_shop(|s| catalog::categories(&s.products)).await
}

/// Inventory listing: name or category filter.
pub async fn search_inventory(shop: &ShopState, query: &str) -> Result<Vec<ProductDto>, ApiError> {
    debug!(query = %query, "search_inventory command");

    shop.with_shop(|s| {
        catalog::search_inventory(&s.products, query)
            .map(|found| found.into_iter().map(ProductDto::from).collect::<Vec<_>>())
    })
    .await
    .map_err(ApiError::from)
}

/// Single product by id.
pub async fn get_product(shop: &ShopState, product_id: &str) -> Result<ProductDto, ApiError> {
    shop.with_shop(|s| catalog::find_product(&s.products, product_id).map(ProductDto::from))
        .await
        .map_err(ApiError::from)
}

// =============================================================================
// Mutations
// =============================================================================

/// Sells one unit of a product.
pub async fn sell_product(
    db: &DbState,
    shop: &ShopState,
    product_id: &str,
) -> Result<SaleResponse, ApiError> {
    debug!(product_id = %product_id, "sell_product command");

    let outcome = shop
        .apply(db, |s| catalog::sell(&mut s.products, product_id, Utc::now()))
        .await?;

    let response = match outcome {
        SaleOutcome::Sold {
            product_name,
            remaining,
        } => {
            info!(product_id = %product_id, remaining = remaining, "Unit sold");
            SaleResponse {
                product_id: product_id.to_string(),
                product_name,
                sold: true,
                remaining: Some(remaining),
            }
        }
        SaleOutcome::OutOfStock { product_name } => {
            debug!(product_id = %product_id, "Sale ignored, out of stock");
            SaleResponse {
                product_id: product_id.to_string(),
                product_name,
                sold: false,
                remaining: None,
            }
        }
    };

    Ok(response)
}

/// Adds a product; unset fields take the catalog defaults.
pub async fn add_product(
    db: &DbState,
    shop: &ShopState,
    input: ProductInput,
) -> Result<ProductDto, ApiError> {
    debug!(?input, "add_product command");
    let fields = input.into_fields()?;

    let product = shop
        .apply(db, |s| catalog::add_product(&mut s.products, fields, Utc::now()))
        .await?;

    info!(product_id = %product.id, name = %product.name, "Product added");
    Ok(ProductDto::from(&product))
}

/// Edits the fields that were given.
pub async fn update_product(
    db: &DbState,
    shop: &ShopState,
    product_id: &str,
    input: ProductInput,
) -> Result<ProductDto, ApiError> {
    debug!(product_id = %product_id, ?input, "update_product command");
    let fields = input.into_fields()?;

    if fields.is_empty() {
        return Err(ApiError::validation("Nenhum campo para alterar"));
    }

    let product = shop
        .apply(db, |s| {
            catalog::update_product(&mut s.products, product_id, fields, Utc::now())
        })
        .await?;

    info!(product_id = %product.id, "Product updated");
    Ok(ProductDto::from(&product))
}

/// Deletes a product. Needs `confirmed`; there is no undo.
pub async fn delete_product(
    db: &DbState,
    shop: &ShopState,
    product_id: &str,
    confirmed: bool,
) -> Result<ProductDto, ApiError> {
    debug!(product_id = %product_id, confirmed, "delete_product command");

    if !confirmed {
        let product = get_product(shop, product_id).await?;
        return Err(ApiError::confirmation_required(format!(
            "Excluir o produto \"{}\"? Esta ação não pode ser desfeita.",
            product.name
        )));
    }

    let removed = shop
        .apply(db, |s| catalog::delete_product(&mut s.products, product_id))
        .await?;

    info!(product_id = %removed.id, name = %removed.name, "Product deleted");
    Ok(ProductDto::from(&removed))
}
