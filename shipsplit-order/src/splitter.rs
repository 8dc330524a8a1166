use crate::classifier::{Classifier, SourceMix};
use crate::models::{LineItem, Order};
use crate::rules::SplitRules;

/// The two sibling orders derived from one mixed-source order
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPair {
    /// Keeps the source order's identity and totals
    pub primary: Order,
    /// Created upstream as a brand-new order with zeroed totals
    pub secondary: Order,
}

impl SplitPair {
    /// Primary first, secondary second. Submission relies on this order.
    pub fn into_vec(self) -> Vec<Order> {
        vec![self.primary, self.secondary]
    }
}

/// Derives two single-source orders from a mixed-source one
pub struct Splitter;

impl Splitter {
    /// Split `order` by fulfillment source. The input is never modified.
    pub fn split(order: &Order, rules: &SplitRules) -> Result<SplitPair, SplitError> {
        order.validate()?;

        let mix = Classifier::classify(order, rules);
        if mix != SourceMix::Mixed {
            return Err(SplitError::PreconditionViolation {
                order_number: order.order_number.clone(),
                mix,
            });
        }

        let (primary_items, secondary_items): (Vec<LineItem>, Vec<LineItem>) = order
            .items
            .iter()
            .cloned()
            .partition(|item| rules.is_primary(&item.sku));

        let primary = order.derive(rules.primary_order_number(&order.order_number), primary_items);

        let mut secondary = order.derive(rules.secondary_order_number(&order.order_number), secondary_items);
        // A fresh upstream entity: no identity, accounting handled elsewhere.
        secondary.order_key = None;
        secondary.order_id = None;
        secondary.amount_paid = Some(0.0);
        secondary.tax_amount = Some(0.0);
        secondary.shipping_amount = Some(0.0);

        Ok(SplitPair { primary, secondary })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("Malformed order {}: {reason}", .order_number.as_deref().unwrap_or("<unknown>"))]
    MalformedOrder {
        order_number: Option<String>,
        reason: String,
    },

    #[error("Order {order_number} does not need a split (items are {mix:?})")]
    PreconditionViolation {
        order_number: String,
        mix: SourceMix,
    },

    #[error("Invalid split rules: {0}")]
    InvalidRules(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn scenario_order() -> Order {
        Order::from_value(json!({
            "orderNumber": "1001",
            "orderKey": "K1",
            "orderId": 987654,
            "items": [{ "sku": "ba001-red" }, { "sku": "xyz-blue" }],
            "amountPaid": 50,
            "taxAmount": 5,
            "shippingAmount": 3
        }))
        .unwrap()
    }

    #[test]
    fn test_split_mixed_order() {
        let rules = SplitRules::default();
        let order = scenario_order();

        let pair = Splitter::split(&order, &rules).unwrap();

        assert_eq!(pair.primary.order_number, "1001-banner");
        assert_eq!(pair.primary.order_key.as_deref(), Some("K1"));
        assert_eq!(pair.primary.order_id, Some(json!(987654)));
        assert_eq!(pair.primary.items, vec![LineItem::new("ba001-red")]);
        assert_eq!(pair.primary.amount_paid, Some(50.0));
        assert_eq!(pair.primary.tax_amount, Some(5.0));
        assert_eq!(pair.primary.shipping_amount, Some(3.0));

        assert_eq!(pair.secondary.order_number, "1001-split");
        assert_eq!(pair.secondary.order_key, None);
        assert_eq!(pair.secondary.order_id, None);
        assert_eq!(pair.secondary.items, vec![LineItem::new("xyz-blue")]);
        assert_eq!(pair.secondary.amount_paid, Some(0.0));
        assert_eq!(pair.secondary.tax_amount, Some(0.0));
        assert_eq!(pair.secondary.shipping_amount, Some(0.0));
    }

    #[test]
    fn test_secondary_identity_keys_are_removed_on_the_wire() {
        let pair = Splitter::split(&scenario_order(), &SplitRules::default()).unwrap();
        let values: Vec<serde_json::Value> = pair
            .into_vec()
            .iter()
            .map(|o| o.to_value().unwrap())
            .collect();

        assert_eq!(values[0]["orderNumber"], "1001-banner");
        assert_eq!(values[0]["orderKey"], "K1");

        let secondary = values[1].as_object().unwrap();
        assert_eq!(secondary["orderNumber"], "1001-split");
        assert!(!secondary.contains_key("orderKey"));
        assert!(!secondary.contains_key("orderId"));
        assert_eq!(secondary["amountPaid"], 0.0);
        assert_eq!(secondary["shippingAmount"], 0.0);
    }

    #[test]
    fn test_split_keeps_relative_item_order_and_opaque_fields() {
        let order = Order::from_value(json!({
            "orderNumber": "2002",
            "customerEmail": "jane@example.com",
            "items": [
                { "sku": "xyz-1", "quantity": 1 },
                { "sku": "ba001-1", "quantity": 2 },
                { "sku": "xyz-2", "quantity": 3 },
                { "sku": "ba001-2", "quantity": 4 }
            ]
        }))
        .unwrap();

        let pair = Splitter::split(&order, &SplitRules::default()).unwrap();

        let primary: Vec<&str> = pair.primary.items.iter().map(|i| i.sku.as_str()).collect();
        let secondary: Vec<&str> = pair.secondary.items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(primary, vec!["ba001-1", "ba001-2"]);
        assert_eq!(secondary, vec!["xyz-1", "xyz-2"]);
        assert_eq!(pair.secondary.items[1].extra["quantity"], 3);
        assert_eq!(pair.primary.extra["customerEmail"], "jane@example.com");
        assert_eq!(pair.secondary.extra["customerEmail"], "jane@example.com");
    }

    #[test]
    fn test_split_does_not_mutate_input() {
        let order = scenario_order();
        let before = order.clone();

        let mut pair = Splitter::split(&order, &SplitRules::default()).unwrap();
        pair.primary.items.push(LineItem::new("ba001-extra"));
        pair.secondary.extra.insert("note".to_string(), json!("changed"));

        assert_eq!(order, before);
        assert!(!pair.primary.extra.contains_key("note"));
    }

    #[test]
    fn test_single_source_order_is_a_precondition_violation() {
        let order = Order::new("1001", vec![LineItem::new("ba001-a"), LineItem::new("ba001-b")]);
        let err = Splitter::split(&order, &SplitRules::default()).unwrap_err();
        assert_eq!(
            err,
            SplitError::PreconditionViolation {
                order_number: "1001".to_string(),
                mix: SourceMix::PrimaryOnly,
            }
        );
    }

    #[test]
    fn test_empty_sku_counts_as_secondary() {
        let order = Order::from_value(json!({
            "orderNumber": "9",
            "items": [{ "sku": "ba001-a" }, { "sku": "" }]
        }))
        .unwrap();

        let pair = Splitter::split(&order, &SplitRules::default()).unwrap();

        assert_eq!(pair.primary.items, vec![LineItem::new("ba001-a")]);
        assert_eq!(pair.secondary.items, vec![LineItem::new("")]);
        assert_eq!(pair.secondary.order_number, "9-split");
    }

    #[test]
    fn test_blank_order_number_is_malformed() {
        let order = Order::new("  ", vec![LineItem::new("ba001-a"), LineItem::new("xyz-b")]);
        let err = Splitter::split(&order, &SplitRules::default()).unwrap_err();
        assert!(matches!(err, SplitError::MalformedOrder { order_number: None, .. }));
    }

    #[test]
    fn test_custom_suffixes() {
        let rules = SplitRules::with_suffixes("ba001", "-east", "-west").unwrap();
        let pair = Splitter::split(&scenario_order(), &rules).unwrap();
        assert_eq!(pair.primary.order_number, "1001-east");
        assert_eq!(pair.secondary.order_number, "1001-west");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the two derived item lists partition the source items exactly.
        #[test]
        fn split_partitions_items(
            skus in prop::collection::vec(prop_oneof!["ba001[a-z0-9]{1,6}", "[c-z][a-z0-9]{1,6}"], 2..16)
        ) {
            let rules = SplitRules::default();
            let items: Vec<LineItem> = skus
                .iter()
                .enumerate()
                .map(|(pos, sku)| {
                    let mut item = LineItem::new(sku.clone());
                    item.extra.insert("lineItemKey".to_string(), json!(pos));
                    item
                })
                .collect();
            let order = Order::new("1001", items);
            prop_assume!(Classifier::needs_split(&order, &rules));

            let pair = Splitter::split(&order, &rules).unwrap();

            prop_assert!(pair.primary.items.iter().all(|i| rules.is_primary(&i.sku)));
            prop_assert!(pair.secondary.items.iter().all(|i| !rules.is_primary(&i.sku)));

            let mut keys: Vec<u64> = pair
                .primary
                .items
                .iter()
                .chain(pair.secondary.items.iter())
                .filter_map(|i| i.extra["lineItemKey"].as_u64())
                .collect();
            keys.sort_unstable();
            let expected: Vec<u64> = (0..order.items.len() as u64).collect();
            prop_assert_eq!(keys, expected);
        }
    }
}
