use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a payment consent, owned by the consent store.
///
/// Transitions are monotonic: `AwaitingAuthorisation -> Authorised ->
/// Consumed`, or `AwaitingAuthorisation -> Rejected`. Only `Authorised`
/// consents may be consumed by a payment submission.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ConsentStatus {
    AwaitingAuthorisation,
    Authorised,
    Rejected,
    Consumed,
}

/// Lifecycle status of a payment submission, distinct from the consent
/// status. Submissions start as `InitiationPending`; settlement states are
/// advanced by downstream execution.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum SubmissionStatus {
    #[default]
    InitiationPending,
    InitiationCompleted,
    InitiationFailed,
    Pending,
}

/// The payment product a consent was created for, encoded in the consent id
/// prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentType {
    DomesticPayment,
    DomesticScheduledPayment,
}

impl ConsentType {
    /// The id prefix identifying this consent type.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::DomesticPayment => "pdc",
            Self::DomesticScheduledPayment => "pdsc",
        }
    }

    /// Recover the consent type from a consent id such as `pdc_Fy2...`.
    pub fn from_consent_id(consent_id: &str) -> Option<Self> {
        let prefix = consent_id.split_once('_')?.0;
        match prefix {
            "pdc" => Some(Self::DomesticPayment),
            "pdsc" => Some(Self::DomesticScheduledPayment),
            _ => None,
        }
    }
}

/// Supported versions of the API, ordered oldest to newest.
///
/// The derived ordering backs resource version visibility: a resource is
/// readable from the version it was created under and every later one.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ApiVersion {
    #[serde(rename = "v3.0")]
    #[strum(serialize = "v3.0")]
    V3_0,
    #[serde(rename = "v3.1")]
    #[strum(serialize = "v3.1")]
    V3_1,
    #[serde(rename = "v4.0")]
    #[strum(serialize = "v4.0")]
    V4_0,
}

impl ApiVersion {
    /// Parse a version path segment such as `v3.1`.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::from_str(segment).ok()
    }
}
