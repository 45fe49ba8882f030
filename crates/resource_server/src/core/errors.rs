pub mod utils;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use api_models::{
    enums::{ApiVersion, ConsentStatus},
    errors::types::{ApiError, ErrorResponse, ErrorType, Extra},
};
pub use common_utils::errors::{ApplicationError, ApplicationResult, CustomResult};
pub use storage_impl::errors::StorageError;

pub use self::utils::{ConsentStoreErrorExt, StorageErrorExt};
use crate::services;

/// Result of a core operation, carrying the client-facing error taxonomy.
pub type RouterResult<T> = CustomResult<T, ApiErrorResponse>;

/// Result of a core operation as handed back to the HTTP layer.
pub type RouterResponse<T> = CustomResult<services::ApplicationResponse<T>, ApiErrorResponse>;

/// Client-facing error taxonomy of the resource server.
///
/// Every failure a request can surface is one of these variants; callers of
/// the core must handle each case explicitly rather than match on messages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiErrorResponse {
    #[error("Something went wrong")]
    InternalServerError,
    #[error("Consent does not exist in our records")]
    ConsentNotFound,
    #[error("Consent is held by a different client")]
    ConsentForbidden,
    #[error("Consent status is {status}, expected Authorised")]
    ConsentStatusNotAuthorised { status: ConsentStatus },
    #[error("Payment submission already exists with incompatible data")]
    IdempotencyConflict,
    #[error("Payment does not match the consent initiation")]
    ValidationMismatch { fields: Vec<String> },
    #[error("Payment does not exist in our records")]
    PaymentNotFound,
    #[error("Payment was submitted by a different client")]
    PaymentForbidden,
    #[error(
        "Resource was created under {resource_version} and is not readable from {requested_version}"
    )]
    ResourceVersionConflict {
        resource_version: ApiVersion,
        requested_version: ApiVersion,
    },
    #[error("Missing required header: {header_name}")]
    MissingRequiredHeader { header_name: &'static str },
    #[error("{message}")]
    InvalidRequestData { message: String },
}

impl ApiErrorResponse {
    fn error_type(&self) -> ErrorType {
        match self {
            Self::InternalServerError => ErrorType::ResourceServerError,
            _ => ErrorType::InvalidRequestError,
        }
    }

    fn api_error(&self) -> ApiError {
        match self {
            Self::InternalServerError => ApiError::new("RS", 0, self.to_string(), None),
            Self::ConsentNotFound => ApiError::new("RS", 1, self.to_string(), None),
            Self::ConsentForbidden => ApiError::new("RS", 2, self.to_string(), None),
            Self::ConsentStatusNotAuthorised { status } => ApiError::new(
                "RS",
                3,
                self.to_string(),
                Some(Extra {
                    consent_status: Some(status.to_string()),
                    ..Default::default()
                }),
            ),
            Self::IdempotencyConflict => ApiError::new("RS", 4, self.to_string(), None),
            Self::ValidationMismatch { fields } => ApiError::new(
                "RS",
                5,
                self.to_string(),
                Some(Extra {
                    mismatched_fields: Some(fields.clone()),
                    ..Default::default()
                }),
            ),
            Self::PaymentNotFound => ApiError::new("RS", 6, self.to_string(), None),
            Self::PaymentForbidden => ApiError::new("RS", 7, self.to_string(), None),
            Self::ResourceVersionConflict {
                resource_version,
                requested_version,
            } => ApiError::new(
                "RS",
                8,
                self.to_string(),
                Some(Extra {
                    resource_version: Some(resource_version.to_string()),
                    requested_version: Some(requested_version.to_string()),
                    ..Default::default()
                }),
            ),
            Self::MissingRequiredHeader { .. } => ApiError::new("RS", 9, self.to_string(), None),
            Self::InvalidRequestData { .. } => ApiError::new("RS", 10, self.to_string(), None),
        }
    }
}

impl ResponseError for ApiErrorResponse {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConsentNotFound | Self::PaymentNotFound => StatusCode::NOT_FOUND,
            Self::ConsentForbidden | Self::PaymentForbidden => StatusCode::FORBIDDEN,
            Self::ResourceVersionConflict { .. } => StatusCode::CONFLICT,
            Self::ConsentStatusNotAuthorised { .. }
            | Self::IdempotencyConflict
            | Self::ValidationMismatch { .. }
            | Self::MissingRequiredHeader { .. }
            | Self::InvalidRequestData { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "error": ErrorResponse::new(self.error_type(), &self.api_error())
        });
        HttpResponse::build(self.status_code())
            .insert_header(actix_web::http::header::ContentType::json())
            .body(body.to_string())
    }
}
