//! Feature encoding.
//!
//! Turns a validated transaction into the exact feature vector the fitted
//! model was trained against. The column list is the one persisted inside the
//! model artifact; order and length are the artifact's contract and are never
//! re-derived here.

use crate::error::{AppError, AppResult};
use crate::schema::ColumnSpec;
use crate::types::TransactionRecord;

/// Encode a record into the artifact's column order.
///
/// Numeric columns pass the raw value through. Indicator columns emit 1.0
/// when the record's categorical value matches the column's value; a value
/// outside the training vocabulary therefore leaves all of its field's
/// indicators at zero, which is exactly the reference-category encoding.
pub fn encode(record: &TransactionRecord, columns: &[ColumnSpec]) -> AppResult<Vec<f64>> {
    let mut features = Vec::with_capacity(columns.len());
    for column in columns {
        match column {
            ColumnSpec::Numeric(field) => {
                let value = record.number_field(field).ok_or_else(|| {
                    AppError::EncodingError(format!("numeric field {field} absent after validation"))
                })?;
                features.push(value);
            }
            ColumnSpec::Indicator { field, value } => {
                let hit = record.text_field(field) == Some(*value);
                features.push(if hit { 1.0 } else { 0.0 });
            }
        }
    }
    Ok(features)
}
