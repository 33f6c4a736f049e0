use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::normalizer::normalize_label;

fn active_by_default() -> bool {
    true
}

/// Tenant-supplied product, related to the signals that make it relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "active_by_default")]
    pub active: bool,
    #[serde(default)]
    pub recommended_with: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl CatalogProduct {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            priority: 0,
            active: true,
            recommended_with: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    fn related_signals(&self) -> BTreeSet<String> {
        self.recommended_with
            .iter()
            .chain(self.dependencies.iter())
            .map(|signal| normalize_label(signal))
            .filter(|signal| !signal.is_empty())
            .collect()
    }
}

/// Ordered product list; insertion order breaks ranking ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    products: Vec<CatalogProduct>,
}

impl ProductCatalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Active products related to at least one of `signals`, best first.
    pub fn recommend(&self, signals: &BTreeSet<String>) -> Vec<Recommendation> {
        let mut ranked: Vec<(usize, &CatalogProduct, Vec<String>)> = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, product)| product.active)
            .filter_map(|(position, product)| {
                let matched: Vec<String> = product
                    .related_signals()
                    .into_iter()
                    .filter(|signal| signals.contains(signal))
                    .collect();
                (!matched.is_empty()).then_some((position, product, matched))
            })
            .collect();

        ranked.sort_by_key(|(position, product, matched)| {
            (Reverse(matched.len()), Reverse(product.priority), *position)
        });

        ranked
            .into_iter()
            .enumerate()
            .map(|(index, (_, product, matched))| Recommendation {
                rank: index + 1,
                product_id: product.id.clone(),
                name: product.name.clone(),
                priority: product.priority,
                matched_signals: matched,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rank: usize,
    pub product_id: String,
    pub name: String,
    pub priority: i32,
    pub matched_signals: Vec<String>,
}
