//! Record model for the shopping dataset
//!
//! A customer contributes one [`UserRecord`] (who they are) and one
//! [`ItemRecord`] (what they bought). Attribute fields are optional so the
//! encoder can apply its missing-value policy instead of the loader.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer identifier shared by user and item records
pub type CustomerId = u32;

/// Sentinel category substituted for missing values
pub const UNKNOWN: &str = "Unknown";

/// Demographic and behavioural attributes of one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub previous_purchases: Option<f64>,
    #[serde(default)]
    pub purchase_frequency: Option<String>,
    #[serde(default)]
    pub subscription_status: Option<String>,
}

/// The transaction of one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub purchase_amount: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

impl ItemRecord {
    /// Purchase amount, 0 when absent
    pub fn price(&self) -> f64 {
        self.purchase_amount.unwrap_or(0.0)
    }
}

/// Every attribute the encoder knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Gender,
    Location,
    Size,
    PreviousPurchases,
    PurchaseFrequency,
    SubscriptionStatus,
    ItemName,
    Category,
    PurchaseAmount,
    Color,
    Season,
}

const SIZE_ORDER: &[(&str, f32)] = &[("S", 0.0), ("M", 1.0), ("L", 2.0), ("XL", 3.0)];

const FREQUENCY_ORDER: &[(&str, f32)] = &[
    ("Rarely", 0.0),
    ("Occasionally", 1.0),
    ("Monthly", 2.0),
    ("Weekly", 3.0),
    ("Often", 4.0),
];

const SUBSCRIPTION_MAP: &[(&str, f32)] = &[("Yes", 1.0), ("No", 0.0)];

/// How a field is turned into numeric columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Min-max scaled to [0, 1] over the encoded record set
    Numeric,
    /// Fixed rank table; unseen values map to -1
    Ordinal(&'static [(&'static str, f32)]),
    /// Yes/No style flag; unseen values map to -1
    Binary(&'static [(&'static str, f32)]),
    /// One-hot expanded in discovery order
    Categorical,
}

impl Field {
    pub const USER_FIELDS: [Field; 7] = [
        Field::Age,
        Field::Gender,
        Field::Location,
        Field::Size,
        Field::PreviousPurchases,
        Field::PurchaseFrequency,
        Field::SubscriptionStatus,
    ];

    pub const ITEM_FIELDS: [Field; 5] = [
        Field::ItemName,
        Field::Category,
        Field::PurchaseAmount,
        Field::Color,
        Field::Season,
    ];

    /// Encoding kind of this field.
    ///
    /// `PurchaseAmount` is deliberately categorical: amounts are one-hot
    /// expanded by exact value, not scaled.
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Age | Field::PreviousPurchases => FieldKind::Numeric,
            Field::Size => FieldKind::Ordinal(SIZE_ORDER),
            Field::PurchaseFrequency => FieldKind::Ordinal(FREQUENCY_ORDER),
            Field::SubscriptionStatus => FieldKind::Binary(SUBSCRIPTION_MAP),
            _ => FieldKind::Categorical,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::Location => "Location",
            Field::Size => "Size",
            Field::PreviousPurchases => "PreviousPurchases",
            Field::PurchaseFrequency => "PurchaseFrequency",
            Field::SubscriptionStatus => "SubscriptionStatus",
            Field::ItemName => "ItemName",
            Field::Category => "Category",
            Field::PurchaseAmount => "PurchaseAmount",
            Field::Color => "Color",
            Field::Season => "Season",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw attribute value as read from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> FieldValue<'a> {
    fn text(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(FieldValue::Missing, FieldValue::Text)
    }

    fn number(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => FieldValue::Number(v),
            _ => FieldValue::Missing,
        }
    }
}

/// Anything the feature encoder can read fields from
pub trait Record {
    /// Record kind used in diagnostics
    const KIND: &'static str;

    /// Fields this record kind carries
    const FIELDS: &'static [Field];

    fn customer_id(&self) -> CustomerId;

    /// Value of `field`, or `None` when this record kind does not carry it
    fn value(&self, field: Field) -> Option<FieldValue<'_>>;
}

impl Record for UserRecord {
    const KIND: &'static str = "user";
    const FIELDS: &'static [Field] = &Field::USER_FIELDS;

    fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    fn value(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::Age => FieldValue::number(self.age),
            Field::Gender => FieldValue::text(&self.gender),
            Field::Location => FieldValue::text(&self.location),
            Field::Size => FieldValue::text(&self.size),
            Field::PreviousPurchases => FieldValue::number(self.previous_purchases),
            Field::PurchaseFrequency => FieldValue::text(&self.purchase_frequency),
            Field::SubscriptionStatus => FieldValue::text(&self.subscription_status),
            _ => return None,
        };
        Some(value)
    }
}

impl Record for ItemRecord {
    const KIND: &'static str = "item";
    const FIELDS: &'static [Field] = &Field::ITEM_FIELDS;

    fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    fn value(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::ItemName => FieldValue::text(&self.item_name),
            Field::Category => FieldValue::text(&self.category),
            Field::PurchaseAmount => FieldValue::number(self.purchase_amount),
            Field::Color => FieldValue::text(&self.color),
            Field::Season => FieldValue::text(&self.season),
            _ => return None,
        };
        Some(value)
    }
}
