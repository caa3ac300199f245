use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{
    Contract, Gender, InternetAddon, InternetService, PaymentMethod, PhoneLines, YesNo,
};

/// A coerced numeric field.
///
/// Integral values go over the wire without a fractional part and non-finite
/// values (failed coercion) go over the wire as `null`, so the service sees the
/// same body a browser would have produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric(pub f64);

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Numeric {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_finite()
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if !value.is_finite() {
            return serializer.serialize_none();
        }
        if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
            return serializer.serialize_i64(value as i64);
        }
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(Numeric(value.unwrap_or(f64::NAN)))
    }
}

/// Body of `POST /predict_churn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub gender: Gender,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: Numeric,
    #[serde(rename = "Partner")]
    pub partner: YesNo,
    #[serde(rename = "Dependents")]
    pub dependents: YesNo,
    pub tenure: Numeric,
    #[serde(rename = "PhoneService")]
    pub phone_service: YesNo,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: PhoneLines,
    #[serde(rename = "InternetService")]
    pub internet_service: InternetService,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: InternetAddon,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: InternetAddon,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: InternetAddon,
    #[serde(rename = "TechSupport")]
    pub tech_support: InternetAddon,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: InternetAddon,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: InternetAddon,
    #[serde(rename = "Contract")]
    pub contract: Contract,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: YesNo,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: Numeric,
    #[serde(rename = "TotalCharges")]
    pub total_charges: Option<Numeric>,
}

/// A scored customer as produced by the service.
///
/// `/predict_churn` answers without `id` and `predicted_at`; history rows carry
/// both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPrediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub churn_probability: f64,
    pub risk_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_at: Option<String>,
}

/// Body of `GET /predictions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionList {
    #[serde(default)]
    pub items: Vec<ScoredPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractChurnRate {
    pub contract: String,
    pub churn_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodChurnRate {
    pub payment_method: String,
    pub churn_rate: f64,
}

/// Body of `GET /stats/churn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnStats {
    pub total_customers: u64,
    pub churn_rate_overall: f64,
    pub churn_rate_by_contract: Vec<ContractChurnRate>,
    pub churn_rate_by_payment_method: Vec<PaymentMethodChurnRate>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
