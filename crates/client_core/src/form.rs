//! Raw feature draft edited by the operator and its conversion into a
//! scoring request.

use std::{collections::BTreeMap, str::FromStr};

use shared::{
    domain::FeatureField,
    protocol::{CustomerFeatures, Numeric},
};

use crate::error::FormError;

/// Operator-edited values, stored exactly as typed or chosen.
///
/// A missing entry is a null value; only `TotalCharges` starts out null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDraft {
    values: BTreeMap<FeatureField, String>,
}

impl Default for FeatureDraft {
    fn default() -> Self {
        let defaults = [
            (FeatureField::CustomerId, "TEST-0001"),
            (FeatureField::Gender, "Female"),
            (FeatureField::SeniorCitizen, "0"),
            (FeatureField::Partner, "Yes"),
            (FeatureField::Dependents, "No"),
            (FeatureField::Tenure, "1"),
            (FeatureField::PhoneService, "Yes"),
            (FeatureField::MultipleLines, "No"),
            (FeatureField::InternetService, "DSL"),
            (FeatureField::OnlineSecurity, "No"),
            (FeatureField::OnlineBackup, "Yes"),
            (FeatureField::DeviceProtection, "No"),
            (FeatureField::TechSupport, "No"),
            (FeatureField::StreamingTv, "No"),
            (FeatureField::StreamingMovies, "No"),
            (FeatureField::Contract, "Month-to-month"),
            (FeatureField::PaperlessBilling, "Yes"),
            (FeatureField::PaymentMethod, "Electronic check"),
            (FeatureField::MonthlyCharges, "70"),
        ];
        Self {
            values: defaults
                .into_iter()
                .map(|(field, value)| (field, value.to_string()))
                .collect(),
        }
    }
}

impl FeatureDraft {
    pub fn set_field(&mut self, field: FeatureField, raw: impl Into<String>) {
        self.values.insert(field, raw.into());
    }

    pub fn set_field_by_name(&mut self, name: &str, raw: impl Into<String>) -> Result<(), FormError> {
        let field = name.parse::<FeatureField>()?;
        self.set_field(field, raw);
        Ok(())
    }

    pub fn clear_field(&mut self, field: FeatureField) {
        self.values.remove(&field);
    }

    pub fn raw(&self, field: FeatureField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn build_request(&self) -> Result<CustomerFeatures, FormError> {
        Ok(CustomerFeatures {
            customer_id: self.text(FeatureField::CustomerId).to_string(),
            gender: self.choice(FeatureField::Gender)?,
            senior_citizen: self.number(FeatureField::SeniorCitizen),
            partner: self.choice(FeatureField::Partner)?,
            dependents: self.choice(FeatureField::Dependents)?,
            tenure: self.number(FeatureField::Tenure),
            phone_service: self.choice(FeatureField::PhoneService)?,
            multiple_lines: self.choice(FeatureField::MultipleLines)?,
            internet_service: self.choice(FeatureField::InternetService)?,
            online_security: self.choice(FeatureField::OnlineSecurity)?,
            online_backup: self.choice(FeatureField::OnlineBackup)?,
            device_protection: self.choice(FeatureField::DeviceProtection)?,
            tech_support: self.choice(FeatureField::TechSupport)?,
            streaming_tv: self.choice(FeatureField::StreamingTv)?,
            streaming_movies: self.choice(FeatureField::StreamingMovies)?,
            contract: self.choice(FeatureField::Contract)?,
            paperless_billing: self.choice(FeatureField::PaperlessBilling)?,
            payment_method: self.choice(FeatureField::PaymentMethod)?,
            monthly_charges: self.number(FeatureField::MonthlyCharges),
            total_charges: self.optional_number(FeatureField::TotalCharges),
        })
    }

    fn text(&self, field: FeatureField) -> &str {
        self.raw(field).unwrap_or_default()
    }

    fn number(&self, field: FeatureField) -> Numeric {
        Numeric(coerce_number(self.text(field)))
    }

    fn optional_number(&self, field: FeatureField) -> Option<Numeric> {
        match self.raw(field) {
            None | Some("") => None,
            Some(raw) => Some(Numeric(coerce_number(raw))),
        }
    }

    fn choice<T>(&self, field: FeatureField) -> Result<T, FormError>
    where
        T: FromStr<Err = shared::error::UnknownChoice>,
    {
        self.text(field)
            .parse::<T>()
            .map_err(|source| FormError::InvalidChoice { field, source })
    }
}

/// Converts operator text to a number the way a browser's `Number()` does:
/// blank text is zero and anything unparseable is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    if unsigned.len() > 2 && unsigned.as_bytes()[0] == b'0' {
        let radix = match unsigned.as_bytes()[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            // Prefixed integers do not take a sign.
            if sign < 0.0 || text.starts_with('+') {
                return f64::NAN;
            }
            return u64::from_str_radix(&unsigned[2..], radix)
                .map(|value| value as f64)
                .unwrap_or(f64::NAN);
        }
    }

    let starts_like_number = unsigned
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_digit() || b == b'.');
    let is_decimal_literal = starts_like_number
        && unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal_literal {
        return f64::NAN;
    }
    unsigned
        .parse::<f64>()
        .map(|value| sign * value)
        .unwrap_or(f64::NAN)
}
