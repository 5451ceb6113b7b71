//! # Seed Data
//!
//! The catalog and customer list a fresh install starts with. Loaded when
//! a collection has never been saved, and again after a full reset.

use chrono::{DateTime, Utc};

use crate::types::{Customer, Product};

/// Standard category choices offered by the shop, `"Todos"` first.
pub const CATEGORIES: [&str; 7] = [
    "Todos",
    "Grãos e Cereais",
    "Óleos e Temperos",
    "Açúcar e Sal",
    "Bebidas",
    "Massas",
    "Laticínios",
];

/// 2025-01-01T00:00:00Z, stamped on seed products by [`products`].
const SEED_EPOCH_SECS: i64 = 1_735_689_600;

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
    image: &'static str,
    price_cents: i64,
    cost_cents: i64,
    stock: i64,
    unit: &'static str,
}

const PRODUCTS: [SeedProduct; 5] = [
    SeedProduct {
        id: "1",
        name: "Arroz Tipo 1",
        category: "Grãos e Cereais",
        description: "Arroz branco de qualidade, pacote de 5kg",
        image: "https://images.unsplash.com/photo-1586201375761-83865001e31c?auto=format&fit=crop&w=400&q=80",
        price_cents: 2290,
        cost_cents: 1500,
        stock: 45,
        unit: "5kg",
    },
    SeedProduct {
        id: "2",
        name: "Feijão Carioca",
        category: "Grãos e Cereais",
        description: "Feijão carioca selecionado, pacote de 1kg",
        image: "https://images.unsplash.com/photo-1551462147-37885acc3c41?auto=format&fit=crop&w=400&q=80",
        price_cents: 850,
        cost_cents: 520,
        stock: 60,
        unit: "1kg",
    },
    SeedProduct {
        id: "3",
        name: "Óleo de Soja",
        category: "Óleos e Temperos",
        description: "Óleo de soja refinado 900ml",
        image: "https://images.unsplash.com/photo-1474979266404-7eaacbcd87c5?auto=format&fit=crop&w=400&q=80",
        price_cents: 690,
        cost_cents: 480,
        stock: 30,
        unit: "900ml",
    },
    SeedProduct {
        id: "4",
        name: "Açúcar Cristal",
        category: "Açúcar e Sal",
        description: "Açúcar cristal refinado 1kg",
        image: "https://images.unsplash.com/photo-1581441363689-1f3c3c414635?auto=format&fit=crop&w=400&q=80",
        price_cents: 420,
        cost_cents: 290,
        stock: 50,
        unit: "1kg",
    },
    SeedProduct {
        id: "5",
        name: "Leite Integral",
        category: "Laticínios",
        description: "Leite UHT integral 1L",
        image: "https://images.unsplash.com/photo-1563636619-e9107da5a1bb?auto=format&fit=crop&w=400&q=80",
        price_cents: 550,
        cost_cents: 380,
        stock: 24,
        unit: "1L",
    },
];

const CUSTOMERS: [(&str, &str, &str, i64); 3] = [
    ("c1", "João Silva", "+5511999998888", 4550),
    ("c2", "Maria Oliveira", "+5511888887777", 1200),
    ("c3", "Ricardo Santos", "+5511777776666", 0),
];

/// Seed catalog stamped with a fixed date.
pub fn products() -> Vec<Product> {
    products_at(DateTime::from_timestamp(SEED_EPOCH_SECS, 0).unwrap_or_default())
}

/// Seed catalog stamped with `now`.
pub fn products_at(now: DateTime<Utc>) -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|p| Product {
            id: p.id.to_string(),
            name: p.name.to_string(),
            category: p.category.to_string(),
            description: Some(p.description.to_string()),
            image: Some(p.image.to_string()),
            price_cents: p.price_cents,
            cost_cents: p.cost_cents,
            stock: p.stock,
            unit: p.unit.to_string(),
            last_updated: now,
        })
        .collect()
}

/// Seed customers. Opening balances carry no history.
pub fn customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|(id, name, phone, balance)| Customer {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            balance_cents: *balance,
            history: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let products = products();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].price_cents, 2290);
        assert_eq!(products[4].unit, "1L");
        assert!(products.iter().all(|p| p.stock > 0));

        let customers = customers();
        assert_eq!(customers.len(), 3);
        assert_eq!(customers[0].balance_cents, 4550);
        assert!(customers.iter().all(|c| c.history.is_empty()));
    }

    #[test]
    fn test_products_at_uses_given_time() {
        let now = Utc::now();
        assert!(products_at(now).iter().all(|p| p.last_updated == now));
    }
}
