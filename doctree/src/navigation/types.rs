use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::structure::compare_names;

/// A leaf page reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub title: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
}

/// A group of items. `path` is `None` for sections without a page of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSection {
    pub title: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub items: Vec<NavigationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
}

fn order_key(order: Option<f64>) -> f64 {
    order.filter(|n| !n.is_nan()).unwrap_or(f64::INFINITY)
}

fn by_order_then_title(a: (Option<f64>, &str), b: (Option<f64>, &str)) -> Ordering {
    order_key(a.0)
        .total_cmp(&order_key(b.0))
        .then_with(|| compare_names(a.1, b.1))
}

impl NavigationItem {
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        by_order_then_title((self.order, &self.title), (other.order, &other.title))
    }
}

impl NavigationSection {
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        by_order_then_title((self.order, &self.title), (other.order, &other.title))
    }
}

/// Where a navigation came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationSource {
    /// An explicit override file, by name (`.navigation` or `_navigation.json`).
    Override(String),
    /// Folded from the document tree.
    Derived,
}

/// Resolved navigation plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub sections: Vec<NavigationSection>,
    pub source: NavigationSource,
}
