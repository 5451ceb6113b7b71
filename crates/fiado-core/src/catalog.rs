//! # Catalog Module
//!
//! Product mutations and the read-side projections over the catalog.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_product(fields)      defaults fill the gaps, new id, prepended     │
//! │  update_product(id, f)    merge set fields, re-stamp last_updated       │
//! │  delete_product(id)       remove (operator confirms first)              │
//! │  sell(id)                 stock > 0 ? stock - 1 : unchanged             │
//! │                                                                         │
//! │  filter_catalog(q, cat)   name contains q AND (cat = Todos OR exact)    │
//! │  search_inventory(q)      name OR category contains q                   │
//! │  categories()             Todos, then distinct categories               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale never appends a ledger entry; it only moves stock.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{new_id, Product};
use crate::validation::{validate_price_cents, validate_product_name, validate_search_query, validate_stock};
use crate::{ALL_CATEGORIES, INVENTORY_LOW_STOCK, LAST_UNITS_THRESHOLD};

/// Name given to a product added without one.
pub const DEFAULT_PRODUCT_NAME: &str = "Novo Produto";

/// Category given to a product added without one.
pub const DEFAULT_CATEGORY: &str = "Geral";

/// Unit label given to a product added without one.
pub const DEFAULT_UNIT: &str = "Unid";

// =============================================================================
// Input Types
// =============================================================================

/// A partial product: the fields the operator actually filled in.
///
/// Used both to create a product (unset fields take defaults) and to edit
/// one (unset fields are left alone).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price_cents: Option<i64>,
    pub cost_cents: Option<i64>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
}

impl ProductFields {
    /// Checks if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == ProductFields::default()
    }

    fn validate(&self) -> CoreResult<()> {
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(price) = self.price_cents {
            validate_price_cents("price", price)?;
        }
        if let Some(cost) = self.cost_cents {
            validate_price_cents("cost", cost)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

/// Result of a sale attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleOutcome {
    /// One unit left the shelf.
    Sold { product_name: String, remaining: i64 },
    /// Nothing changed.
    OutOfStock { product_name: String },
}

// =============================================================================
// Mutations
// =============================================================================

/// Adds a product to the front of the catalog.
///
/// ## Defaults
/// - name "Novo Produto", category "Geral", unit "Unid"
/// - prices and stock 0
pub fn add_product(
    products: &mut Vec<Product>,
    fields: ProductFields,
    now: DateTime<Utc>,
) -> CoreResult<Product> {
    fields.validate()?;

    let product = Product {
        id: new_id(),
        name: non_blank(fields.name).unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
        category: non_blank(fields.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        description: non_blank(fields.description),
        image: non_blank(fields.image),
        price_cents: fields.price_cents.unwrap_or(0),
        cost_cents: fields.cost_cents.unwrap_or(0),
        stock: fields.stock.unwrap_or(0),
        unit: non_blank(fields.unit).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        last_updated: now,
    };

    products.insert(0, product.clone());
    Ok(product)
}

/// Merges the set fields into an existing product and re-stamps it.
pub fn update_product(
    products: &mut [Product],
    product_id: &str,
    fields: ProductFields,
    now: DateTime<Utc>,
) -> CoreResult<Product> {
    fields.validate()?;

    let product = products
        .iter_mut()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if let Some(name) = fields.name {
        product.name = name.trim().to_string();
    }
    if let Some(category) = non_blank(fields.category) {
        product.category = category;
    }
    if let Some(description) = fields.description {
        product.description = non_blank(Some(description));
    }
    if let Some(image) = fields.image {
        product.image = non_blank(Some(image));
    }
    if let Some(price) = fields.price_cents {
        product.price_cents = price;
    }
    if let Some(cost) = fields.cost_cents {
        product.cost_cents = cost;
    }
    if let Some(stock) = fields.stock {
        product.stock = stock;
    }
    if let Some(unit) = non_blank(fields.unit) {
        product.unit = unit;
    }
    product.last_updated = now;

    Ok(product.clone())
}

/// Removes a product. Returns what was removed.
pub fn delete_product(products: &mut Vec<Product>, product_id: &str) -> CoreResult<Product> {
    let index = products
        .iter()
        .position(|p| p.id == product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    Ok(products.remove(index))
}

/// Sells one unit.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use fiado_core::catalog::{sell, SaleOutcome};
/// use fiado_core::seed;
///
/// let mut products = seed::products();
/// let id = products[0].id.clone();
/// let before = products[0].stock;
/// let outcome = sell(&mut products, &id, Utc::now()).unwrap();
///
/// assert!(matches!(outcome, SaleOutcome::Sold { .. }));
/// assert_eq!(products[0].stock, before - 1);
/// ```
pub fn sell(products: &mut [Product], product_id: &str, now: DateTime<Utc>) -> CoreResult<SaleOutcome> {
    let product = products
        .iter_mut()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if !product.can_sell() {
        return Ok(SaleOutcome::OutOfStock {
            product_name: product.name.clone(),
        });
    }

    product.stock -= 1;
    product.last_updated = now;

    Ok(SaleOutcome::Sold {
        product_name: product.name.clone(),
        remaining: product.stock,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Projections
// =============================================================================

/// Finds a product by id.
pub fn find_product<'a>(products: &'a [Product], product_id: &str) -> CoreResult<&'a Product> {
    products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
}

/// Catalog view: name substring (case-insensitive) within a category.
///
/// `"Todos"` or an empty category matches everything.
pub fn filter_catalog<'a>(
    products: &'a [Product],
    query: &str,
    category: &str,
) -> CoreResult<Vec<&'a Product>> {
    let needle = validate_search_query(query)?.to_lowercase();
    let category = category.trim();
    let any_category = category.is_empty() || category == ALL_CATEGORIES;

    Ok(products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .filter(|p| any_category || p.category == category)
        .collect())
}

/// Inventory view: name or category substring (case-insensitive).
pub fn search_inventory<'a>(products: &'a [Product], query: &str) -> CoreResult<Vec<&'a Product>> {
    let needle = validate_search_query(query)?.to_lowercase();

    Ok(products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .collect())
}

/// Category choices: `"Todos"`, the shop's standard categories, then any
/// other category found on a product, each once, in first-seen order.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut list = vec![ALL_CATEGORIES.to_string()];

    let standard = crate::seed::CATEGORIES.iter().copied();
    let found = products.iter().map(|p| p.category.as_str());

    for category in standard.chain(found) {
        if !list.iter().any(|c| c == category) {
            list.push(category.to_string());
        }
    }
    list
}

/// Catalog badge: running out but still sellable.
pub fn is_last_units(product: &Product) -> bool {
    product.stock > 0 && product.stock <= LAST_UNITS_THRESHOLD
}

/// Inventory badge: time to reorder.
pub fn is_inventory_low(product: &Product) -> bool {
    product.stock < INVENTORY_LOW_STOCK
}

// =============================================================================
// Unit Tests
// =============================================================================
