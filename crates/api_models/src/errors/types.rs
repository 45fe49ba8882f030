use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorType {
    InvalidRequestError,
    ResourceServerError,
}

/// Internal representation of an API error: a stable sub-code plus a numeric
/// identifier, a human-readable message, and optional structured context.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub sub_code: &'static str,
    pub error_identifier: u16,
    pub error_message: String,
    pub extra: Option<Extra>,
}

impl ApiError {
    pub fn new(
        sub_code: &'static str,
        error_identifier: u16,
        error_message: impl ToString,
        extra: Option<Extra>,
    ) -> Self {
        Self {
            sub_code,
            error_identifier,
            error_message: error_message.to_string(),
            extra,
        }
    }
}

/// The serialized error envelope returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub error_message: String,
    pub error_code: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ErrorResponse {
    pub fn new(error_type: ErrorType, error: &ApiError) -> Self {
        Self {
            error_type: error_type.to_string(),
            error_message: error.error_message.clone(),
            error_code: format!("{}_{}", error.sub_code, error.error_identifier),
            extra: error.extra.clone().unwrap_or_default(),
        }
    }
}

/// Structured context carried alongside an error so client tooling can
/// disambiguate failure modes (e.g. version conflict vs. not-found) without
/// parsing messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extra {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatched_fields: Option<Vec<String>>,
}
