//! Half-and-half composition.
//!
//! A split item combines the product being configured with one sibling from
//! the same category. Its base price is the average of the two base prices
//! and each flavor contributes half.

use menu_commerce::cart::FlavorShare;
use menu_commerce::catalog::{ProductWithModifiers, SimpleProduct};
use menu_commerce::{CommerceError, Money};
use serde::{Deserialize, Serialize};

use crate::config::SplitConfig;

/// Share of each flavor in a two-flavor split.
pub const HALF: f64 = 0.5;

/// Decides which categories offer half-and-half items.
pub trait SplitEligibility: Send + Sync {
    fn allows_split(&self, category_name: &str) -> bool;
}

impl<F> SplitEligibility for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn allows_split(&self, category_name: &str) -> bool {
        self(category_name)
    }
}

/// Keyword match on the category name, case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPolicy {
    keywords: Vec<String>,
}

impl SplitPolicy {
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &SplitConfig) -> Self {
        Self::new(config.categories.iter().cloned())
    }
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self::from_config(&SplitConfig::default())
    }
}

impl SplitEligibility for SplitPolicy {
    fn allows_split(&self, category_name: &str) -> bool {
        let category = category_name.to_lowercase();
        self.keywords.iter().any(|k| category.contains(k.as_str()))
    }
}

/// Progress of the optional second flavor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "flavor", rename_all = "snake_case")]
pub enum SplitState {
    /// Single-flavor item.
    #[default]
    Off,
    /// Split requested but no second flavor chosen yet.
    Pending,
    /// Split with its second flavor.
    Complete(SimpleProduct),
}

impl SplitState {
    pub fn is_active(&self) -> bool {
        !matches!(self, SplitState::Off)
    }

    pub fn second_flavor(&self) -> Option<&SimpleProduct> {
        match self {
            SplitState::Complete(p) => Some(p),
            _ => None,
        }
    }
}

/// Name, base price and flavor shares of a two-flavor item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitComposite {
    pub name: String,
    pub base_price: Money,
    pub flavors: Vec<FlavorShare>,
}

/// Combine the configured product with its second flavor.
pub fn compose(first: &ProductWithModifiers, second: &SimpleProduct) -> Result<SplitComposite, CommerceError> {
    if first.base_price.currency != second.base_price.currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: first.base_price.currency.code().to_string(),
            got: second.base_price.currency.code().to_string(),
        });
    }
    let base_price =
        Money::try_average(&first.base_price, &second.base_price).ok_or(CommerceError::Overflow)?;

    Ok(SplitComposite {
        name: format!("{} + {}", first.name, second.name),
        base_price,
        flavors: vec![
            FlavorShare {
                product_id: first.id.clone(),
                product_name: first.name.clone(),
                fraction: HALF,
                price: first.base_price,
            },
            FlavorShare {
                product_id: second.id.clone(),
                product_name: second.name.clone(),
                fraction: HALF,
                price: second.base_price,
            },
        ],
    })
}
