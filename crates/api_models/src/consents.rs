use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    enums::ConsentStatus,
    payments::{InstructedAmount, PaymentData},
};

/// A charge computed by the bank at consent creation time; immutable
/// afterwards and echoed back on submission responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeDetails {
    pub charge_bearer: String,
    #[serde(rename = "type")]
    pub charge_type: String,
    pub amount: InstructedAmount,
}

/// A payment consent as held by the consent store.
///
/// The resource server references consents but never owns them: `request`
/// and `charges` are immutable after creation, and status transitions happen
/// only inside the consent store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consent {
    pub consent_id: String,
    pub api_client_id: String,
    pub status: ConsentStatus,
    pub request: PaymentData,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub charges: Vec<ChargeDetails>,
    #[serde(with = "common_utils::custom_serde::iso8601")]
    pub creation_date_time: PrimitiveDateTime,
    #[serde(with = "common_utils::custom_serde::iso8601")]
    pub status_update_date_time: PrimitiveDateTime,
}
