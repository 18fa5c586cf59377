//! Order types as read from the commerce platform

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::round2;

/// Suffix the platform appends to display names of single-variant products
const DEFAULT_VARIANT_SUFFIX: &str = " - Default Title";

// ============================================================================
// Order
// ============================================================================

/// An order with everything needed to build the edit view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order gid
    pub id: String,
    /// Display name (e.g. `#1001`)
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Every line item, including app-generated upcharges and refunded lines
    pub line_items: Vec<LineItem>,
    /// Order-level list of discount applications (manual, code, automatic...)
    pub discount_applications: Vec<DiscountApplication>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Customer {
    /// "First Last", falling back to "Guest"
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("Guest");
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{first} {last}"),
            _ => first.to_string(),
        }
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// A line item of a placed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Line item gid
    pub id: String,
    pub title: String,
    /// Refundable (still editable) quantity; `< 1` means fully refunded
    pub quantity: i64,
    /// Unit price after every allocated line-level discount
    pub unit_price_after_discounts: Decimal,
    /// Absent for custom items (including upcharges added by this app)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl LineItem {
    /// Whether the line still has an editable quantity
    pub fn is_editable(&self) -> bool {
        self.quantity >= 1
    }

    /// Total currently billed for this line (`unit price × quantity`)
    pub fn discounted_total(&self) -> Decimal {
        round2(
            self.unit_price_after_discounts
                .saturating_mul(Decimal::from(self.quantity)),
        )
    }

    /// Variant display name without the default-variant suffix, else the title
    pub fn display_title(&self) -> String {
        match &self.variant {
            Some(variant) if !variant.display_name.is_empty() => variant
                .display_name
                .trim_end_matches(DEFAULT_VARIANT_SUFFIX)
                .to_string(),
            _ => self.title.clone(),
        }
    }
}

/// Product variant of a line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub id: String,
    pub display_name: String,
    pub list_price: Decimal,
    /// Ordered option values, one of which may encode a weight ("Weight: 2lb")
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

// ============================================================================
// Discount Applications
// ============================================================================

/// Kind of discount application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountApplicationKind {
    /// Added by staff (or by this app during an order edit)
    Manual,
    DiscountCode,
    Script,
    Automatic,
    Other,
}

/// Value of a discount application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountValue {
    Fixed(Decimal),
    Percentage(Decimal),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountApplication {
    pub kind: DiscountApplicationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: DiscountValue,
}

impl DiscountApplication {
    /// Description if present and non-empty, else the title
    pub fn text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.title.as_deref())
    }
}
