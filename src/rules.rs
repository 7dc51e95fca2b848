//! Rule-based risk factor analysis.
//!
//! Each schema variant carries an ordered table of independent rules. A rule
//! inspects the raw record and contributes at most one human-readable factor;
//! rules never suppress each other and never fail. A rule whose fields are
//! absent from the record (variant differences, optional flags) simply skips.

use crate::schema::SchemaVariant;
use crate::types::TransactionRecord;

/// One predicate + message pair. Adding a rule is a data change.
pub struct RiskRule {
    pub name: &'static str,
    check: fn(&TransactionRecord) -> Option<String>,
}

impl RiskRule {
    pub fn evaluate(&self, record: &TransactionRecord) -> Option<String> {
        (self.check)(record)
    }
}

/// Evaluate the variant's rule table in its fixed order.
pub fn evaluate(record: &TransactionRecord, variant: SchemaVariant) -> Vec<String> {
    let mut factors = Vec::new();
    for rule in rules_for(variant) {
        if let Some(message) = rule.evaluate(record) {
            tracing::trace!(rule = rule.name, %message, "Risk rule fired");
            factors.push(message);
        }
    }
    factors
}

pub fn rules_for(variant: SchemaVariant) -> &'static [RiskRule] {
    match variant {
        SchemaVariant::V1 => &V1_RULES,
        SchemaVariant::V2 => &V2_RULES,
    }
}

// --- V2 rules -------------------------------------------------------------

/// Amount bands are mutually exclusive: only the highest matching band fires.
fn amount_band(record: &TransactionRecord) -> Option<String> {
    let amount = record.amount?;
    if amount > 200_000.0 {
        Some("Very high transaction amount (>₹2L)".to_string())
    } else if amount > 100_000.0 {
        Some("High transaction amount (>₹1L)".to_string())
    } else if amount > 50_000.0 {
        Some("Above average transaction amount (>₹50K)".to_string())
    } else if amount < 10.0 {
        Some("Unusually low transaction amount".to_string())
    } else {
        None
    }
}

fn payment_method_risk(record: &TransactionRecord) -> Option<String> {
    let method = record.payment_method.as_deref()?;
    if ["cash"].contains(&method) {
        Some(format!("High-risk payment method: {method}"))
    } else if ["wallet", "net_banking"].contains(&method) {
        Some(format!("Higher risk payment method: {method}"))
    } else {
        None
    }
}

fn late_night_hour(record: &TransactionRecord) -> Option<String> {
    let hour = record.hour?;
    (hour < 5 || hour >= 23).then(|| "Late night/early morning transaction".to_string())
}

fn off_hours(record: &TransactionRecord) -> Option<String> {
    let hour = record.hour?;
    (hour < 8 || hour > 20).then(|| "Off-hours transaction".to_string())
}

fn weekend(record: &TransactionRecord) -> Option<String> {
    let day = record.day_of_week?;
    (day == 0 || day == 6).then(|| "Weekend transaction".to_string())
}

fn new_device(record: &TransactionRecord) -> Option<String> {
    record
        .is_new_device?
        .then(|| "Transaction from new/unrecognized device".to_string())
}

fn different_city(record: &TransactionRecord) -> Option<String> {
    record
        .is_different_city?
        .then(|| "Transaction from different city than usual".to_string())
}

fn failed_attempts(record: &TransactionRecord) -> Option<String> {
    let attempts = record.failed_attempts?;
    if attempts > 3 {
        Some("Multiple failed authentication attempts".to_string())
    } else if attempts > 0 {
        Some("Recent failed authentication attempts".to_string())
    } else {
        None
    }
}

fn billing_mismatch(record: &TransactionRecord) -> Option<String> {
    (!record.shipping_billing_match?)
        .then(|| "Shipping and billing address mismatch".to_string())
}

fn shipping_differs(record: &TransactionRecord) -> Option<String> {
    (record.shipping_address.as_deref()? == "Different")
        .then(|| "Shipping address differs from billing".to_string())
}

fn account_age_band(record: &TransactionRecord) -> Option<String> {
    let days = record.account_age?;
    if days < 7 {
        Some("New account (less than 1 week)".to_string())
    } else if days < 30 {
        Some("New account (less than 1 month)".to_string())
    } else if days < 90 {
        Some("New account (less than 3 months)".to_string())
    } else {
        None
    }
}

fn frequency_extremes(record: &TransactionRecord) -> Option<String> {
    let freq = record.transaction_frequency?;
    if freq > 20.0 {
        Some("Unusually high transaction frequency".to_string())
    } else if freq < 0.5 {
        Some("Unusually low transaction frequency".to_string())
    } else {
        None
    }
}

fn risky_category(record: &TransactionRecord) -> Option<String> {
    let category = record.category.as_deref()?;
    ["electronics", "jewelry"]
        .contains(&category)
        .then(|| format!("High-risk category: {category}"))
}

fn age_extremes(record: &TransactionRecord) -> Option<String> {
    let age = record.age?;
    if age < 18 {
        Some("Account holder under 18".to_string())
    } else if age > 80 {
        Some("Unusual account holder age".to_string())
    } else {
        None
    }
}

fn desktop_device(record: &TransactionRecord) -> Option<String> {
    (record.device.as_deref()? == "desktop")
        .then(|| "Transaction from desktop device".to_string())
}

fn uncommon_browser(record: &TransactionRecord) -> Option<String> {
    let browser = record.browser_info.as_deref()?;
    (!["Chrome", "Firefox", "Safari"].contains(&browser))
        .then(|| format!("Uncommon browser: {browser}"))
}

static V2_RULES: [RiskRule; 16] = [
    RiskRule { name: "amount_band", check: amount_band },
    RiskRule { name: "payment_method_risk", check: payment_method_risk },
    RiskRule { name: "late_night_hour", check: late_night_hour },
    RiskRule { name: "off_hours", check: off_hours },
    RiskRule { name: "weekend", check: weekend },
    RiskRule { name: "new_device", check: new_device },
    RiskRule { name: "different_city", check: different_city },
    RiskRule { name: "failed_attempts", check: failed_attempts },
    RiskRule { name: "billing_mismatch", check: billing_mismatch },
    RiskRule { name: "shipping_differs", check: shipping_differs },
    RiskRule { name: "account_age_band", check: account_age_band },
    RiskRule { name: "frequency_extremes", check: frequency_extremes },
    RiskRule { name: "risky_category", check: risky_category },
    RiskRule { name: "age_extremes", check: age_extremes },
    RiskRule { name: "desktop_device", check: desktop_device },
    RiskRule { name: "uncommon_browser", check: uncommon_browser },
];

// --- V1 rules -------------------------------------------------------------
// Wording preserved from the legacy deployment.

fn v1_high_amount(record: &TransactionRecord) -> Option<String> {
    (record.amount? > 50_000.0).then(|| "High transaction amount".to_string())
}

fn v1_payment_risk(record: &TransactionRecord) -> Option<String> {
    ["Cash", "Wallet"]
        .contains(&record.payment_method.as_deref()?)
        .then(|| "High-risk payment method".to_string())
}

fn v1_unusual_time(record: &TransactionRecord) -> Option<String> {
    let hour = record.hour?;
    (hour < 6 || hour > 22).then(|| "Unusual transaction time".to_string())
}

fn v1_new_device(record: &TransactionRecord) -> Option<String> {
    record.is_new_device?.then(|| "New device used".to_string())
}

fn v1_different_city(record: &TransactionRecord) -> Option<String> {
    record
        .is_different_city?
        .then(|| "Different city transaction".to_string())
}

fn v1_failed_attempts(record: &TransactionRecord) -> Option<String> {
    (record.failed_attempts? > 2).then(|| "Multiple failed attempts".to_string())
}

fn v1_address_mismatch(record: &TransactionRecord) -> Option<String> {
    (!record.shipping_billing_match?).then(|| "Address mismatch".to_string())
}

fn v1_new_account(record: &TransactionRecord) -> Option<String> {
    (record.account_age? < 30).then(|| "New account".to_string())
}

static V1_RULES: [RiskRule; 8] = [
    RiskRule { name: "high_amount", check: v1_high_amount },
    RiskRule { name: "payment_risk", check: v1_payment_risk },
    RiskRule { name: "unusual_time", check: v1_unusual_time },
    RiskRule { name: "new_device", check: v1_new_device },
    RiskRule { name: "different_city", check: v1_different_city },
    RiskRule { name: "failed_attempts", check: v1_failed_attempts },
    RiskRule { name: "address_mismatch", check: v1_address_mismatch },
    RiskRule { name: "new_account", check: v1_new_account },
];
