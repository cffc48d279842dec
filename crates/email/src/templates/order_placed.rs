use askama::Template;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Layout;

pub const ORDER_PLACED: &str = "order-placed";

const DEFAULT_PREVIEW: &str = "Thank you for your order!";

/// Order numbers arrive either as numbers or as preformatted strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayId {
    Number(u64),
    Text(String),
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayId::Number(n) => write!(f, "{n}"),
            DisplayId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub title: String,
    pub quantity: u32,
    /// Minor currency units.
    pub unit_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub display_id: DisplayId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    pub items: Vec<OrderItem>,
    /// Minor currency units.
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl ShippingAddress {
    fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();

        (!parts.is_empty()).then(|| parts.join(" "))
    }

    fn lines(&self) -> Vec<String> {
        let locality: Vec<&str> = [
            self.postal_code.as_deref(),
            self.city.as_deref(),
            self.province.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        [
            self.full_name(),
            self.address_1.clone(),
            self.address_2.clone(),
            (!locality.is_empty()).then(|| locality.join(" ")),
            self.country_code.as_ref().map(|c| c.to_uppercase()),
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedTemplateData {
    pub order: OrderSummary,
    #[serde(rename = "shippingAddress", default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

pub struct ItemRow {
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Template)]
#[template(path = "order_placed.html")]
pub struct OrderPlacedTemplate<'a> {
    pub layout: Layout<'a>,
    pub customer_name: Option<String>,
    pub display_id: String,
    pub items: Vec<ItemRow>,
    pub total: String,
    pub shipping_lines: Option<Vec<String>>,
}

impl OrderPlacedTemplateData {
    pub fn template(&self) -> OrderPlacedTemplate<'_> {
        let currency = self.order.currency_code.as_deref();

        let items = self
            .order
            .items
            .iter()
            .map(|item| ItemRow {
                title: item.title.clone(),
                quantity: item.quantity,
                unit_price: format_amount(item.unit_price, currency),
                line_total: format_amount(
                    item.unit_price.saturating_mul(i64::from(item.quantity)),
                    currency,
                ),
            })
            .collect();

        let customer_name = self
            .shipping_address
            .as_ref()
            .and_then(ShippingAddress::full_name);

        let shipping_lines = self
            .shipping_address
            .as_ref()
            .map(ShippingAddress::lines)
            .filter(|lines| !lines.is_empty());

        OrderPlacedTemplate {
            layout: Layout::new(
                Some(self.preview.as_deref().unwrap_or(DEFAULT_PREVIEW)),
                Some("Order Confirmation"),
            ),
            customer_name,
            display_id: self.order.display_id.to_string(),
            items,
            total: format_amount(self.order.total, currency),
            shipping_lines,
        }
    }
}

/// Formats minor units with two decimals, prefixed by the upper-cased currency
/// code when one is known.
pub fn format_amount(minor_units: i64, currency_code: Option<&str>) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    let amount = format!("{sign}{}.{:02}", abs / 100, abs % 100);

    match currency_code.filter(|c| !c.is_empty()) {
        Some(code) => format!("{} {amount}", code.to_uppercase()),
        None => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{EmailTemplateData, generate_email_template};
    use serde_json::json;

    fn order_data() -> serde_json::Value {
        json!({
            "order": {
                "display_id": "TEST-1234",
                "email": "buyer@example.com",
                "currency_code": "eur",
                "items": [
                    { "title": "Test Product", "quantity": 2, "unit_price": 1000 },
                    { "title": "Sticker", "quantity": 1, "unit_price": 250 }
                ],
                "total": 2250
            },
            "shippingAddress": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "address_1": "12 Analytical Row",
                "city": "London",
                "postal_code": "N1 9GU",
                "country_code": "gb"
            }
        })
    }

    #[test]
    fn formats_amounts() {
        assert_eq!(format_amount(1000, None), "10.00");
        assert_eq!(format_amount(5, Some("usd")), "USD 0.05");
        assert_eq!(format_amount(-1999, Some("")), "-19.99");
    }

    #[test]
    fn accepts_numeric_display_id() {
        let mut data = order_data();
        data["order"]["display_id"] = json!(1042);

        match generate_email_template(ORDER_PLACED, &data).unwrap() {
            EmailTemplateData::OrderPlaced(data) => {
                assert_eq!(data.order.display_id.to_string(), "1042");
            }
            other => panic!("unexpected template data: {other:?}"),
        }
    }

    #[test]
    fn requires_order() {
        let err = generate_email_template(ORDER_PLACED, &json!({ "shippingAddress": {} }))
            .unwrap_err();
        assert!(err.message().contains(ORDER_PLACED));
    }

    #[test]
    fn requires_order_total() {
        let mut data = order_data();
        data["order"].as_object_mut().unwrap().remove("total");

        assert!(generate_email_template(ORDER_PLACED, &data).is_err());
    }

    #[test]
    fn requires_order_items() {
        let err = generate_email_template(
            ORDER_PLACED,
            &json!({ "order": { "display_id": "X", "total": 100 } }),
        )
        .unwrap_err();

        assert!(err.message().contains(ORDER_PLACED));
    }

    #[test]
    fn renders_items_totals_and_address() {
        let html = generate_email_template(ORDER_PLACED, &order_data())
            .unwrap()
            .render()
            .unwrap();

        assert!(html.contains("order #TEST-1234"));
        assert!(html.contains("Test Product"));
        assert!(html.contains("EUR 10.00"));
        assert!(html.contains("EUR 20.00"));
        assert!(html.contains("EUR 22.50"));
        assert!(html.contains("Dear Ada Lovelace,"));
        assert!(html.contains("N1 9GU London"));
        assert!(html.contains("GB"));
    }

    #[test]
    fn renders_without_shipping_address() {
        let mut data = order_data();
        data.as_object_mut().unwrap().remove("shippingAddress");

        let html = generate_email_template(ORDER_PLACED, &data)
            .unwrap()
            .render()
            .unwrap();

        assert!(html.contains("Hello,"));
        assert!(!html.contains("Shipping address"));
    }
}
