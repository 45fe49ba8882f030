use masking::Secret;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// Monetary amount as carried on the wire: decimal string plus ISO 4217
/// currency code. Amounts are never parsed into floats; equality is string
/// equality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructedAmount {
    pub amount: String,
    pub currency: String,
}

/// Identification of a debtor or creditor account. The identification and
/// name are personal data and only appear masked in debug output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentification {
    pub scheme_name: String,
    pub identification: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<Secret<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unstructured: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// The initiation details of a payment: who pays whom, how much, and (for
/// scheduled payments) when. These are the economically significant fields a
/// submission is validated against the consent on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInitiation {
    pub instruction_identification: String,
    pub end_to_end_identification: String,
    pub instructed_amount: InstructedAmount,
    #[serde(
        default,
        with = "common_utils::custom_serde::iso8601::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub requested_execution_date_time: Option<PrimitiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debtor_account: Option<AccountIdentification>,
    pub creditor_account: AccountIdentification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remittance_information: Option<RemittanceInformation>,
}

/// The normalized payload a submission stores durably. Structural equality
/// over this type is what decides replay vs. conflict for retried requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    pub initiation: PaymentInitiation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplementary_data: Option<serde_json::Value>,
}

/// Body of a payment submission request against an authorised consent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentsSubmissionRequest {
    pub consent_id: String,
    pub initiation: PaymentInitiation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplementary_data: Option<serde_json::Value>,
}

/// Response for a created (or replayed) payment submission. Replays are
/// byte-for-byte identical to the original response, including
/// `creation_date_time`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentsSubmissionResponse {
    pub payment_id: String,
    pub consent_id: String,
    pub status: crate::enums::SubmissionStatus,
    #[serde(with = "common_utils::custom_serde::iso8601")]
    pub creation_date_time: PrimitiveDateTime,
    #[serde(with = "common_utils::custom_serde::iso8601")]
    pub status_update_date_time: PrimitiveDateTime,
    pub initiation: PaymentInitiation,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub charges: Vec<crate::consents::ChargeDetails>,
}

/// Response for a funds-confirmation read against an authorised consent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsConfirmationResponse {
    pub funds_available: bool,
    #[serde(with = "common_utils::custom_serde::iso8601")]
    pub funds_available_date_time: PrimitiveDateTime,
}
