//! Inbound transaction records.
//!
//! Requests are decoded strictly against the active schema variant before any
//! scoring logic runs: required fields are checked first (so the client is
//! told exactly which field is missing), then every present field is coerced
//! to its declared type or rejected with the field named.

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::schema::FeatureSchema;

/// A validated transaction, typed and schema-checked.
///
/// All fields are optional at the type level; which ones are guaranteed
/// present is decided by the schema variant the record was validated against.
#[derive(Debug, Clone, Default)]
pub struct TransactionRecord {
    pub amount: Option<f64>,
    pub hour: Option<u32>,
    pub day_of_week: Option<u32>,
    pub age: Option<u32>,
    pub item_quantity: Option<u32>,
    pub failed_attempts: Option<u32>,
    pub account_age: Option<u32>,
    pub transaction_frequency: Option<f64>,

    pub category: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device: Option<String>,
    pub device_type: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<String>,
    pub browser_info: Option<String>,

    pub is_weekend: Option<bool>,
    pub is_new_device: Option<bool>,
    pub is_different_city: Option<bool>,
    pub shipping_billing_match: Option<bool>,
}

impl TransactionRecord {
    /// Decode a request body against a schema variant.
    ///
    /// Fails with `MissingField` (first missing required field, in the
    /// schema's declared order) or `InvalidInput` (present but wrong shape).
    pub fn from_value(value: &Value, schema: &FeatureSchema) -> AppResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| AppError::InvalidInput("request body must be a JSON object".into()))?;

        for field in schema.required_fields {
            if !map.contains_key(*field) {
                return Err(AppError::MissingField(field.to_string()));
            }
        }

        Ok(Self {
            amount: take_number(map, "amount")?,
            hour: take_uint(map, "hour")?,
            day_of_week: take_uint(map, "day_of_week")?,
            age: take_uint(map, "age")?,
            item_quantity: take_uint(map, "item_quantity")?,
            failed_attempts: take_uint(map, "failed_attempts")?,
            account_age: take_uint(map, "account_age")?,
            transaction_frequency: take_number(map, "transaction_frequency")?,

            category: take_text(map, "category")?,
            gender: take_text(map, "gender")?,
            country: take_text(map, "country")?,
            city: take_text(map, "city")?,
            device: take_text(map, "device")?,
            device_type: take_text(map, "device_type")?,
            payment_method: take_text(map, "payment_method")?,
            shipping_address: take_text(map, "shipping_address")?,
            browser_info: take_text(map, "browser_info")?,

            is_weekend: take_flag(map, "is_weekend")?,
            is_new_device: take_flag(map, "is_new_device")?,
            is_different_city: take_flag(map, "is_different_city")?,
            shipping_billing_match: take_flag(map, "shipping_billing_match")?,
        })
    }

    /// Numeric view of a field by name. Boolean flags coerce to 0/1 so the
    /// encoder can treat them as plain numeric slots.
    pub fn number_field(&self, name: &str) -> Option<f64> {
        match name {
            "amount" => self.amount,
            "hour" => self.hour.map(f64::from),
            "day_of_week" => self.day_of_week.map(f64::from),
            "age" => self.age.map(f64::from),
            "item_quantity" => self.item_quantity.map(f64::from),
            "failed_attempts" => self.failed_attempts.map(f64::from),
            "account_age" => self.account_age.map(f64::from),
            "transaction_frequency" => self.transaction_frequency,
            "is_weekend" => self.is_weekend.map(flag_to_f64),
            "is_new_device" => self.is_new_device.map(flag_to_f64),
            "is_different_city" => self.is_different_city.map(flag_to_f64),
            "shipping_billing_match" => self.shipping_billing_match.map(flag_to_f64),
            _ => None,
        }
    }

    /// Categorical view of a field by name.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "category" => &self.category,
            "gender" => &self.gender,
            "country" => &self.country,
            "city" => &self.city,
            "device" => &self.device,
            "device_type" => &self.device_type,
            "payment_method" => &self.payment_method,
            "shipping_address" => &self.shipping_address,
            "browser_info" => &self.browser_info,
            _ => &None,
        };
        value.as_deref()
    }
}

fn flag_to_f64(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn take_number(map: &Map<String, Value>, name: &str) -> AppResult<Option<f64>> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| AppError::InvalidInput(format!("{name} is not a valid number"))),
        Some(_) => Err(AppError::InvalidInput(format!("{name} must be a number"))),
    }
}

fn take_uint(map: &Map<String, Value>, name: &str) -> AppResult<Option<u32>> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                AppError::InvalidInput(format!("{name} must be a non-negative integer"))
            }),
        Some(_) => Err(AppError::InvalidInput(format!("{name} must be a number"))),
    }
}

fn take_text(map: &Map<String, Value>, name: &str) -> AppResult<Option<String>> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::InvalidInput(format!("{name} must be a string"))),
    }
}

/// Flags arrive as booleans from current clients and as 0/1 from the legacy
/// dataset tooling; both are accepted.
fn take_flag(map: &Map<String, Value>, name: &str) -> AppResult<Option<bool>> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(AppError::InvalidInput(format!("{name} must be a boolean"))),
        },
        Some(_) => Err(AppError::InvalidInput(format!("{name} must be a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaVariant;
    use serde_json::json;

    fn v2_body() -> Value {
        json!({
            "amount": 4500.0,
            "hour": 14,
            "day_of_week": 2,
            "category": "groceries",
            "age": 34,
            "gender": "F",
            "country": "Mumbai",
            "device": "mobile",
            "payment_method": "upi",
            "item_quantity": 2,
            "shipping_address": "Same as billing",
            "browser_info": "Chrome"
        })
    }

    #[test]
    fn valid_body_decodes() {
        let record =
            TransactionRecord::from_value(&v2_body(), SchemaVariant::V2.schema()).unwrap();
        assert_eq!(record.amount, Some(4500.0));
        assert_eq!(record.payment_method.as_deref(), Some("upi"));
        assert_eq!(record.is_new_device, None);
    }

    #[test]
    fn every_missing_required_field_is_named() {
        let schema = SchemaVariant::V2.schema();
        for field in schema.required_fields {
            let mut body = v2_body();
            body.as_object_mut().unwrap().remove(*field);
            match TransactionRecord::from_value(&body, schema) {
                Err(AppError::MissingField(name)) => assert_eq!(name, *field),
                other => panic!("{field}: expected MissingField, got {other:?}"),
            }
        }
    }

    #[test]
    fn v1_required_list_applies() {
        let body = json!({"amount": 100.0});
        match TransactionRecord::from_value(&body, SchemaVariant::V1.schema()) {
            Err(AppError::MissingField(name)) => assert_eq!(name, "payment_method"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn wrong_type_names_the_field() {
        let mut body = v2_body();
        body["amount"] = json!("a lot");
        match TransactionRecord::from_value(&body, SchemaVariant::V2.schema()) {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains("amount")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        let body = json!([1, 2, 3]);
        assert!(matches!(
            TransactionRecord::from_value(&body, SchemaVariant::V2.schema()),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn flags_accept_bool_and_binary_numbers() {
        let mut body = v2_body();
        body["is_new_device"] = json!(1);
        body["is_different_city"] = json!(false);
        let record =
            TransactionRecord::from_value(&body, SchemaVariant::V2.schema()).unwrap();
        assert_eq!(record.is_new_device, Some(true));
        assert_eq!(record.is_different_city, Some(false));
    }

    #[test]
    fn boolean_flags_coerce_to_binary_numbers() {
        let record = TransactionRecord {
            is_weekend: Some(true),
            shipping_billing_match: Some(false),
            ..Default::default()
        };
        assert_eq!(record.number_field("is_weekend"), Some(1.0));
        assert_eq!(record.number_field("shipping_billing_match"), Some(0.0));
        assert_eq!(record.number_field("amount"), None);
    }
}
