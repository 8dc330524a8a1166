use serde::{Deserialize, Serialize};

use crate::models::Order;
use crate::rules::SplitRules;

/// Which fulfillment sources an order's items come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceMix {
    Empty,
    PrimaryOnly,
    SecondaryOnly,
    Mixed,
}

/// Decides whether an order has to be split
pub struct Classifier;

impl Classifier {
    pub fn classify(order: &Order, rules: &SplitRules) -> SourceMix {
        let mut has_primary = false;
        let mut has_secondary = false;

        for item in &order.items {
            if rules.is_primary(&item.sku) {
                has_primary = true;
            } else {
                has_secondary = true;
            }

            if has_primary && has_secondary {
                return SourceMix::Mixed;
            }
        }

        match (has_primary, has_secondary) {
            (false, false) => SourceMix::Empty,
            (true, false) => SourceMix::PrimaryOnly,
            (false, true) => SourceMix::SecondaryOnly,
            (true, true) => SourceMix::Mixed,
        }
    }

    /// True iff at least one item carries the primary prefix and at least one does not.
    pub fn needs_split(order: &Order, rules: &SplitRules) -> bool {
        Self::classify(order, rules) == SourceMix::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use proptest::prelude::*;

    fn order_with(skus: &[&str]) -> Order {
        Order::new("1001", skus.iter().map(|s| LineItem::new(*s)).collect())
    }

    #[test]
    fn test_mixed_order_needs_split() {
        let rules = SplitRules::default();
        let order = order_with(&["ba001-red", "xyz-blue"]);
        assert_eq!(Classifier::classify(&order, &rules), SourceMix::Mixed);
        assert!(Classifier::needs_split(&order, &rules));
    }

    #[test]
    fn test_all_primary_is_left_alone() {
        let rules = SplitRules::default();
        let order = order_with(&["ba001-a", "ba001-b"]);
        assert_eq!(Classifier::classify(&order, &rules), SourceMix::PrimaryOnly);
        assert!(!Classifier::needs_split(&order, &rules));
    }

    #[test]
    fn test_all_secondary_is_left_alone() {
        let rules = SplitRules::default();
        let order = order_with(&["xyz-blue", "abc-green"]);
        assert_eq!(Classifier::classify(&order, &rules), SourceMix::SecondaryOnly);
        assert!(!Classifier::needs_split(&order, &rules));
    }

    #[test]
    fn test_empty_order_is_left_alone() {
        let rules = SplitRules::default();
        let order = order_with(&[]);
        assert_eq!(Classifier::classify(&order, &rules), SourceMix::Empty);
        assert!(!Classifier::needs_split(&order, &rules));
    }

    #[test]
    fn test_upper_case_prefix_is_secondary() {
        let rules = SplitRules::default();
        let order = order_with(&["BA001-red", "ba001-red"]);
        assert!(Classifier::needs_split(&order, &rules));

        let order = order_with(&["BA001-red", "xyz-blue"]);
        assert!(!Classifier::needs_split(&order, &rules));
    }

    #[test]
    fn test_injected_prefix() {
        let rules = SplitRules::new("wh2-").unwrap();
        let order = order_with(&["wh2-lamp", "ba001-red"]);
        assert!(Classifier::needs_split(&order, &rules));

        let order = order_with(&["ba001-red", "xyz-blue"]);
        assert!(!Classifier::needs_split(&order, &rules));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: single-source orders never need a split.
        #[test]
        fn single_source_never_splits(
            suffixes in prop::collection::vec("[a-z0-9-]{0,8}", 1..12),
            primary in any::<bool>()
        ) {
            let rules = SplitRules::default();
            let skus: Vec<String> = suffixes
                .iter()
                .map(|s| if primary { format!("ba001{}", s) } else { format!("zz{}", s) })
                .collect();
            let order = Order::new("1001", skus.into_iter().map(LineItem::new).collect());
            prop_assert!(!Classifier::needs_split(&order, &rules));
        }

        /// Property: one item from each source always needs a split, whichever comes first.
        #[test]
        fn mixed_sources_always_split(
            primary in prop::collection::vec("ba001[a-z0-9-]{0,8}", 1..6),
            secondary in prop::collection::vec("[c-z][a-z0-9-]{0,8}", 1..6),
            secondary_first in any::<bool>()
        ) {
            let rules = SplitRules::default();
            let skus: Vec<String> = if secondary_first {
                secondary.into_iter().chain(primary).collect()
            } else {
                primary.into_iter().chain(secondary).collect()
            };
            let order = Order::new("1001", skus.into_iter().map(LineItem::new).collect());
            prop_assert!(Classifier::needs_split(&order, &rules));
        }
    }
}
