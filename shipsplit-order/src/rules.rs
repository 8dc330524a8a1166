use serde::{Deserialize, Serialize};

use crate::splitter::SplitError;

pub const DEFAULT_PRIMARY_SKU_PREFIX: &str = "ba001";
pub const DEFAULT_PRIMARY_SUFFIX: &str = "-banner";
pub const DEFAULT_SECONDARY_SUFFIX: &str = "-split";

/// How line items are told apart and how derived orders are named.
///
/// Sku matching is a case-sensitive prefix test with no normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitRules {
    pub primary_sku_prefix: String,
    pub primary_suffix: String,
    pub secondary_suffix: String,
}

impl SplitRules {
    pub fn new(primary_sku_prefix: impl Into<String>) -> Result<Self, SplitError> {
        Self::with_suffixes(primary_sku_prefix, DEFAULT_PRIMARY_SUFFIX, DEFAULT_SECONDARY_SUFFIX)
    }

    pub fn with_suffixes(
        primary_sku_prefix: impl Into<String>,
        primary_suffix: impl Into<String>,
        secondary_suffix: impl Into<String>,
    ) -> Result<Self, SplitError> {
        let rules = Self {
            primary_sku_prefix: primary_sku_prefix.into(),
            primary_suffix: primary_suffix.into(),
            secondary_suffix: secondary_suffix.into(),
        };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), SplitError> {
        if self.primary_sku_prefix.is_empty() {
            return Err(SplitError::InvalidRules("primary sku prefix must not be empty".to_string()));
        }
        if self.primary_suffix.is_empty() || self.secondary_suffix.is_empty() {
            return Err(SplitError::InvalidRules("order number suffixes must not be empty".to_string()));
        }
        if self.primary_suffix == self.secondary_suffix {
            return Err(SplitError::InvalidRules(format!(
                "primary and secondary suffixes must differ, both are '{}'",
                self.primary_suffix
            )));
        }
        Ok(())
    }

    pub fn is_primary(&self, sku: &str) -> bool {
        sku.starts_with(&self.primary_sku_prefix)
    }

    pub fn primary_order_number(&self, order_number: &str) -> String {
        format!("{}{}", order_number, self.primary_suffix)
    }

    pub fn secondary_order_number(&self, order_number: &str) -> String {
        format!("{}{}", order_number, self.secondary_suffix)
    }
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            primary_sku_prefix: DEFAULT_PRIMARY_SKU_PREFIX.to_string(),
            primary_suffix: DEFAULT_PRIMARY_SUFFIX.to_string(),
            secondary_suffix: DEFAULT_SECONDARY_SUFFIX.to_string(),
        }
    }
}
