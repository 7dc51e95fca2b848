//! Transaction schema variants.
//!
//! The source system shipped several incompatible request schemas over its
//! lifetime. Each one is kept here as a distinct, selectable variant with its
//! own required-field list, categorical vocabularies and encoding order,
//! rather than collapsed into a single guessed schema.

use std::fmt;
use std::str::FromStr;

/// Named schema variant, selected by `SCHEMA_VARIANT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Legacy schema: label-style city/device fields plus behavioral flags,
    /// all required.
    V1,
    /// Current schema: demographic and browser fields required, behavioral
    /// flags optional.
    V2,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::V1 => write!(f, "v1"),
            SchemaVariant::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "legacy" => Ok(SchemaVariant::V1),
            "v2" | "sophisticated" => Ok(SchemaVariant::V2),
            other => Err(format!("unknown schema variant: {other}")),
        }
    }
}

impl SchemaVariant {
    pub fn schema(self) -> &'static FeatureSchema {
        match self {
            SchemaVariant::V1 => &V1_SCHEMA,
            SchemaVariant::V2 => &V2_SCHEMA,
        }
    }
}

/// One categorical field with its training-time vocabulary.
///
/// The first vocabulary entry is the reference category: it gets no indicator
/// slot and is implied when all sibling indicators are zero.
#[derive(Debug)]
pub struct CategoricalField {
    pub name: &'static str,
    pub vocabulary: &'static [&'static str],
}

impl CategoricalField {
    /// Non-reference values, one indicator slot each.
    pub fn indicator_values(&self) -> &'static [&'static str] {
        &self.vocabulary[1..]
    }
}

/// Field layout for one schema variant.
#[derive(Debug)]
pub struct FeatureSchema {
    pub variant: SchemaVariant,
    /// Numeric (and boolean) fields, in canonical encoding order.
    pub numeric_fields: &'static [&'static str],
    /// Categorical fields, in canonical encoding order.
    pub categorical_fields: &'static [CategoricalField],
    /// Fields a request must carry before scoring is attempted.
    pub required_fields: &'static [&'static str],
}

/// One slot of the model's feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Raw numeric pass-through of the named field.
    Numeric(&'static str),
    /// 0/1 indicator: 1 iff the named field equals `value`.
    Indicator {
        field: &'static str,
        value: &'static str,
    },
}

impl FeatureSchema {
    /// Canonical column names, in schema-defined order. This is what training
    /// persists into the artifact; serving never re-derives order from data.
    pub fn feature_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .numeric_fields
            .iter()
            .map(|f| f.to_string())
            .collect();
        for cat in self.categorical_fields {
            for value in cat.indicator_values() {
                columns.push(format!("{}_{}", cat.name, value));
            }
        }
        columns
    }

    /// Resolve a persisted column name into its vector slot, or `None` if the
    /// name belongs to no field of this schema.
    pub fn resolve_column(&self, name: &str) -> Option<ColumnSpec> {
        if let Some(field) = self.numeric_fields.iter().copied().find(|f| *f == name) {
            return Some(ColumnSpec::Numeric(field));
        }
        for cat in self.categorical_fields {
            let Some(rest) = name.strip_prefix(cat.name).and_then(|r| r.strip_prefix('_'))
            else {
                continue;
            };
            if let Some(value) = cat.indicator_values().iter().copied().find(|v| *v == rest) {
                return Some(ColumnSpec::Indicator {
                    field: cat.name,
                    value,
                });
            }
        }
        None
    }
}

static V1_SCHEMA: FeatureSchema = FeatureSchema {
    variant: SchemaVariant::V1,
    numeric_fields: &[
        "amount",
        "age",
        "hour",
        "day_of_week",
        "is_weekend",
        "is_new_device",
        "is_different_city",
        "failed_attempts",
        "shipping_billing_match",
        "account_age",
        "transaction_frequency",
    ],
    categorical_fields: &[
        CategoricalField {
            name: "payment_method",
            vocabulary: &["Card", "Cash", "NetBanking", "UPI", "Wallet"],
        },
        CategoricalField {
            name: "category",
            vocabulary: &["books", "clothing", "electronics", "groceries", "travel"],
        },
        CategoricalField {
            name: "city",
            vocabulary: &[
                "Bangalore",
                "Chennai",
                "Delhi",
                "Hyderabad",
                "Kolkata",
                "Mumbai",
                "Pune",
            ],
        },
        CategoricalField {
            name: "device_type",
            vocabulary: &["desktop", "mobile", "tablet"],
        },
    ],
    required_fields: &[
        "amount",
        "payment_method",
        "category",
        "city",
        "age",
        "device_type",
        "hour",
        "day_of_week",
        "is_weekend",
        "is_new_device",
        "is_different_city",
        "failed_attempts",
        "shipping_billing_match",
        "account_age",
        "transaction_frequency",
    ],
};

static V2_SCHEMA: FeatureSchema = FeatureSchema {
    variant: SchemaVariant::V2,
    numeric_fields: &["amount", "hour", "day_of_week", "age", "item_quantity"],
    categorical_fields: &[
        CategoricalField {
            name: "category",
            vocabulary: &[
                "books",
                "clothing",
                "electronics",
                "food_delivery",
                "groceries",
                "mobile_recharge",
            ],
        },
        CategoricalField {
            name: "gender",
            vocabulary: &["F", "M"],
        },
        CategoricalField {
            name: "country",
            vocabulary: &[
                "Bangalore",
                "Chennai",
                "Delhi",
                "Hyderabad",
                "Kolkata",
                "Mumbai",
                "Pune",
            ],
        },
        CategoricalField {
            name: "device",
            vocabulary: &["desktop", "mobile", "tablet"],
        },
        CategoricalField {
            name: "payment_method",
            vocabulary: &["credit_card", "debit_card", "net_banking", "upi", "wallet"],
        },
        CategoricalField {
            name: "shipping_address",
            vocabulary: &["Different", "Same as billing"],
        },
        CategoricalField {
            name: "browser_info",
            vocabulary: &["Chrome", "Edge", "Firefox", "Safari"],
        },
    ],
    required_fields: &[
        "amount",
        "hour",
        "day_of_week",
        "category",
        "age",
        "gender",
        "country",
        "device",
        "payment_method",
        "item_quantity",
        "shipping_address",
        "browser_info",
    ],
};
