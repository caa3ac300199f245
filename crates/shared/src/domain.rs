use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{UnknownChoice, UnknownField};

macro_rules! choice_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(UnknownChoice::new(stringify!($name), raw)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(Gender {
    Female => "Female",
    Male => "Male",
});

choice_enum!(YesNo {
    Yes => "Yes",
    No => "No",
});

choice_enum!(PhoneLines {
    No => "No",
    Yes => "Yes",
    NoPhoneService => "No phone service",
});

choice_enum!(InternetService {
    Dsl => "DSL",
    FiberOptic => "Fiber optic",
    No => "No",
});

choice_enum!(InternetAddon {
    No => "No",
    Yes => "Yes",
    NoInternetService => "No internet service",
});

choice_enum!(Contract {
    MonthToMonth => "Month-to-month",
    OneYear => "One year",
    TwoYear => "Two year",
});

choice_enum!(PaymentMethod {
    ElectronicCheck => "Electronic check",
    MailedCheck => "Mailed check",
    BankTransfer => "Bank transfer (automatic)",
    CreditCard => "Credit card (automatic)",
});

/// One entry of a closed choice control: what the operator sees and what the
/// draft stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: &'static str,
}

macro_rules! plain_options {
    ($($value:literal),+ $(,)?) => {
        &[$(ChoiceOption { label: $value, value: $value }),+]
    };
}

const GENDER_OPTIONS: &[ChoiceOption] = plain_options!("Female", "Male");
const SENIOR_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        label: "No",
        value: "0",
    },
    ChoiceOption {
        label: "Yes",
        value: "1",
    },
];
const YES_NO_OPTIONS: &[ChoiceOption] = plain_options!("Yes", "No");
const NO_YES_OPTIONS: &[ChoiceOption] = plain_options!("No", "Yes");
const PHONE_LINES_OPTIONS: &[ChoiceOption] = plain_options!("No", "Yes", "No phone service");
const INTERNET_OPTIONS: &[ChoiceOption] = plain_options!("DSL", "Fiber optic", "No");
const ADDON_OPTIONS: &[ChoiceOption] = plain_options!("No", "Yes", "No internet service");
const CONTRACT_OPTIONS: &[ChoiceOption] = plain_options!("Month-to-month", "One year", "Two year");
const PAYMENT_OPTIONS: &[ChoiceOption] = plain_options!(
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
);

/// How a field is presented to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldControl {
    Text,
    Number,
    /// Numeric input whose empty value means "absent".
    OptionalNumber,
    Choice(&'static [ChoiceOption]),
}

/// The customer attributes that make up a feature vector, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureField {
    CustomerId,
    Gender,
    SeniorCitizen,
    Partner,
    Dependents,
    Tenure,
    PhoneService,
    MultipleLines,
    InternetService,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    Contract,
    PaperlessBilling,
    PaymentMethod,
    MonthlyCharges,
    TotalCharges,
}

impl FeatureField {
    pub const ALL: &'static [FeatureField] = &[
        FeatureField::CustomerId,
        FeatureField::Gender,
        FeatureField::SeniorCitizen,
        FeatureField::Partner,
        FeatureField::Dependents,
        FeatureField::Tenure,
        FeatureField::PhoneService,
        FeatureField::MultipleLines,
        FeatureField::InternetService,
        FeatureField::OnlineSecurity,
        FeatureField::OnlineBackup,
        FeatureField::DeviceProtection,
        FeatureField::TechSupport,
        FeatureField::StreamingTv,
        FeatureField::StreamingMovies,
        FeatureField::Contract,
        FeatureField::PaperlessBilling,
        FeatureField::PaymentMethod,
        FeatureField::MonthlyCharges,
        FeatureField::TotalCharges,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FeatureField::CustomerId => "customerID",
            FeatureField::Gender => "gender",
            FeatureField::SeniorCitizen => "SeniorCitizen",
            FeatureField::Partner => "Partner",
            FeatureField::Dependents => "Dependents",
            FeatureField::Tenure => "tenure",
            FeatureField::PhoneService => "PhoneService",
            FeatureField::MultipleLines => "MultipleLines",
            FeatureField::InternetService => "InternetService",
            FeatureField::OnlineSecurity => "OnlineSecurity",
            FeatureField::OnlineBackup => "OnlineBackup",
            FeatureField::DeviceProtection => "DeviceProtection",
            FeatureField::TechSupport => "TechSupport",
            FeatureField::StreamingTv => "StreamingTV",
            FeatureField::StreamingMovies => "StreamingMovies",
            FeatureField::Contract => "Contract",
            FeatureField::PaperlessBilling => "PaperlessBilling",
            FeatureField::PaymentMethod => "PaymentMethod",
            FeatureField::MonthlyCharges => "MonthlyCharges",
            FeatureField::TotalCharges => "TotalCharges",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeatureField::CustomerId => "Customer ID",
            FeatureField::Gender => "Gender",
            FeatureField::SeniorCitizen => "Senior Citizen",
            FeatureField::Partner => "Partner",
            FeatureField::Dependents => "Dependents",
            FeatureField::Tenure => "Tenure (months)",
            FeatureField::PhoneService => "Phone Service",
            FeatureField::MultipleLines => "Multiple Lines",
            FeatureField::InternetService => "Internet Service",
            FeatureField::OnlineSecurity => "Online Security",
            FeatureField::OnlineBackup => "Online Backup",
            FeatureField::DeviceProtection => "Device Protection",
            FeatureField::TechSupport => "Tech Support",
            FeatureField::StreamingTv => "Streaming TV",
            FeatureField::StreamingMovies => "Streaming Movies",
            FeatureField::Contract => "Contract",
            FeatureField::PaperlessBilling => "Paperless Billing",
            FeatureField::PaymentMethod => "Payment Method",
            FeatureField::MonthlyCharges => "Monthly Charges",
            FeatureField::TotalCharges => "Total Charges (optional)",
        }
    }

    pub fn control(self) -> FieldControl {
        match self {
            FeatureField::CustomerId => FieldControl::Text,
            FeatureField::Tenure | FeatureField::MonthlyCharges => FieldControl::Number,
            FeatureField::TotalCharges => FieldControl::OptionalNumber,
            FeatureField::Gender => FieldControl::Choice(GENDER_OPTIONS),
            FeatureField::SeniorCitizen => FieldControl::Choice(SENIOR_OPTIONS),
            FeatureField::Partner | FeatureField::PhoneService | FeatureField::PaperlessBilling => {
                FieldControl::Choice(YES_NO_OPTIONS)
            }
            FeatureField::Dependents => FieldControl::Choice(NO_YES_OPTIONS),
            FeatureField::MultipleLines => FieldControl::Choice(PHONE_LINES_OPTIONS),
            FeatureField::InternetService => FieldControl::Choice(INTERNET_OPTIONS),
            FeatureField::OnlineSecurity
            | FeatureField::OnlineBackup
            | FeatureField::DeviceProtection
            | FeatureField::TechSupport
            | FeatureField::StreamingTv
            | FeatureField::StreamingMovies => FieldControl::Choice(ADDON_OPTIONS),
            FeatureField::Contract => FieldControl::Choice(CONTRACT_OPTIONS),
            FeatureField::PaymentMethod => FieldControl::Choice(PAYMENT_OPTIONS),
        }
    }
}

impl FromStr for FeatureField {
    type Err = UnknownField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        FeatureField::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownField(name.to_string()))
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_enums_parse_their_wire_values_only() {
        assert_eq!(
            "Bank transfer (automatic)".parse::<PaymentMethod>().expect("payment"),
            PaymentMethod::BankTransfer
        );
        assert_eq!(
            "No internet service".parse::<InternetAddon>().expect("addon"),
            InternetAddon::NoInternetService
        );
        let err = "month-to-month".parse::<Contract>().expect_err("case sensitive");
        assert_eq!(err.value, "month-to-month");
    }

    #[test]
    fn every_choice_option_parses_into_its_enum() {
        for value in ADDON_OPTIONS.iter().map(|o| o.value) {
            value.parse::<InternetAddon>().expect("addon option");
        }
        for value in PAYMENT_OPTIONS.iter().map(|o| o.value) {
            value.parse::<PaymentMethod>().expect("payment option");
        }
        for value in CONTRACT_OPTIONS.iter().map(|o| o.value) {
            value.parse::<Contract>().expect("contract option");
        }
        assert_eq!(PaymentMethod::ALL.len(), PAYMENT_OPTIONS.len());
    }

    #[test]
    fn field_names_resolve_case_insensitively() {
        assert_eq!(
            "totalcharges".parse::<FeatureField>().expect("field"),
            FeatureField::TotalCharges
        );
        assert_eq!(
            " customerID ".parse::<FeatureField>().expect("field"),
            FeatureField::CustomerId
        );
        assert!("Churn".parse::<FeatureField>().is_err());
    }

    #[test]
    fn only_customer_id_and_numbers_are_free_inputs() {
        let free: Vec<_> = FeatureField::ALL
            .iter()
            .filter(|field| !matches!(field.control(), FieldControl::Choice(_)))
            .map(|field| field.wire_name())
            .collect();
        assert_eq!(
            free,
            vec!["customerID", "tenure", "MonthlyCharges", "TotalCharges"]
        );
    }
}
