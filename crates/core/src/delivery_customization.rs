//! Checkout delivery customization for shipping A/B tests.
//!
//! Storefront visitors are assigned a shipping variant (stored as a cart
//! attribute). Shipping rates whose title ends in a variant tag such as
//! `"Standard Shipping (A)"` are only shown to visitors in that variant;
//! untagged rates are shown to everyone. Carts containing a subscription
//! line are left untouched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    /// Whether the line is bought on a selling plan (subscription).
    #[serde(default)]
    pub has_selling_plan: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryOption {
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryGroup {
    #[serde(default)]
    pub delivery_options: Vec<DeliveryOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cart {
    pub shipping_variant: Option<String>,
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub delivery_groups: Vec<DeliveryGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HideOperation {
    pub delivery_option_handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub hide: HideOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomizationResult {
    pub operations: Vec<Operation>,
}

/// Extract the variant tag from a title ending in `" (X)"`, where X is a
/// single ASCII alphanumeric character.
pub fn extract_variant_suffix(title: &str) -> Option<&str> {
    let bytes = title.as_bytes();
    let len = bytes.len();
    if len < 4 {
        return None;
    }
    let tagged = bytes[len - 1] == b')'
        && bytes[len - 3] == b'('
        && bytes[len - 4] == b' '
        && bytes[len - 2].is_ascii_alphanumeric();
    tagged.then(|| &title[len - 2..len - 1])
}

/// Whether an option with `title` must be hidden from `variant`.
pub fn should_hide_option(title: &str, variant: &str) -> bool {
    extract_variant_suffix(title).is_some_and(|suffix| suffix != variant)
}

/// Compute the hide operations for a cart.
pub fn customize(cart: &Cart) -> CustomizationResult {
    let variant = cart
        .shipping_variant
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let Some(variant) = variant else {
        return CustomizationResult { operations: vec![] };
    };

    if cart.lines.iter().any(|line| line.has_selling_plan) {
        return CustomizationResult { operations: vec![] };
    }

    let operations = cart
        .delivery_groups
        .iter()
        .flat_map(|group| &group.delivery_options)
        .filter(|option| should_hide_option(&option.title, variant))
        .map(|option| Operation {
            hide: HideOperation {
                delivery_option_handle: option.handle.clone(),
            },
        })
        .collect();

    CustomizationResult { operations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(handle: &str, title: &str) -> DeliveryOption {
        DeliveryOption {
            handle: handle.into(),
            title: title.into(),
        }
    }

    fn cart(variant: Option<&str>, subscription: bool) -> Cart {
        Cart {
            shipping_variant: variant.map(Into::into),
            lines: vec![CartLine {
                has_selling_plan: subscription,
            }],
            delivery_groups: vec![DeliveryGroup {
                delivery_options: vec![
                    option("std-a", "Standard Shipping (A)"),
                    option("std-b", "Standard Shipping (B)"),
                    option("express", "Express Shipping"),
                ],
            }],
        }
    }

    fn hidden(result: &CustomizationResult) -> Vec<&str> {
        result
            .operations
            .iter()
            .map(|op| op.hide.delivery_option_handle.as_str())
            .collect()
    }

    #[test]
    fn suffix_extraction() {
        assert_eq!(extract_variant_suffix("Standard Shipping (A)"), Some("A"));
        assert_eq!(extract_variant_suffix("Test (1)"), Some("1"));
        assert_eq!(extract_variant_suffix("Standard Shipping"), None);
        assert_eq!(extract_variant_suffix("Standard (AB)"), None);
        assert_eq!(extract_variant_suffix("(A)"), None);
        assert_eq!(extract_variant_suffix("Rate (-)"), None);
        assert_eq!(extract_variant_suffix(""), None);
    }

    #[test]
    fn hide_rules() {
        assert!(!should_hide_option("Standard Shipping (A)", "A"));
        assert!(should_hide_option("Standard Shipping (B)", "A"));
        assert!(!should_hide_option("Express Shipping", "B"));
    }

    #[test]
    fn variant_sees_only_its_tagged_rates() {
        assert_eq!(hidden(&customize(&cart(Some("A"), false))), vec!["std-b"]);
        assert_eq!(hidden(&customize(&cart(Some("B"), false))), vec!["std-a"]);
    }

    #[test]
    fn unassigned_visitor_sees_everything() {
        assert!(customize(&cart(None, false)).operations.is_empty());
        assert!(customize(&cart(Some("  "), false)).operations.is_empty());
    }

    #[test]
    fn subscription_carts_are_untouched() {
        assert!(customize(&cart(Some("A"), true)).operations.is_empty());
    }

    #[test]
    fn result_serializes_hide_operations() {
        let json = serde_json::to_value(customize(&cart(Some("A"), false))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"operations": [{"hide": {"delivery_option_handle": "std-b"}}]})
        );
    }
}
