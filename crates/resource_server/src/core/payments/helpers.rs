use api_models::{
    consents::Consent,
    enums::{ApiVersion, ConsentStatus, ConsentType},
    payments::PaymentData,
};
use common_utils::consts::MAX_IDEMPOTENCY_KEY_LENGTH;
use error_stack::report;

use crate::{
    core::errors::{ApiErrorResponse, RouterResult},
    db::{payment_submission::PaymentSubmissionInterface, StorageInterface},
    headers,
    types::storage::PaymentSubmission,
};

pub fn parse_api_version(segment: &str) -> RouterResult<ApiVersion> {
    ApiVersion::from_path_segment(segment).ok_or_else(|| {
        report!(ApiErrorResponse::InvalidRequestData {
            message: format!("Unsupported API version: {segment}"),
        })
    })
}

/// The idempotency key is a required request element; absence and emptiness
/// are rejected before the submission engine is reached.
pub fn validate_idempotency_key(idempotency_key: Option<String>) -> RouterResult<String> {
    let idempotency_key = idempotency_key.ok_or_else(|| {
        report!(ApiErrorResponse::MissingRequiredHeader {
            header_name: headers::X_IDEMPOTENCY_KEY,
        })
    })?;

    if idempotency_key.trim().is_empty() {
        return Err(report!(ApiErrorResponse::InvalidRequestData {
            message: format!("{} must not be empty", headers::X_IDEMPOTENCY_KEY),
        }));
    }
    if idempotency_key.len() > MAX_IDEMPOTENCY_KEY_LENGTH {
        return Err(report!(ApiErrorResponse::InvalidRequestData {
            message: format!(
                "{} must not exceed {MAX_IDEMPOTENCY_KEY_LENGTH} characters",
                headers::X_IDEMPOTENCY_KEY
            ),
        }));
    }
    Ok(idempotency_key)
}

pub fn consent_type_matches(consent_id: &str, expected: ConsentType) -> bool {
    ConsentType::from_consent_id(consent_id) == Some(expected)
}

/// Consent status gate: only `Authorised` consents may back a submission or
/// a funds-confirmation read.
pub fn validate_consent_status(consent: &Consent) -> RouterResult<()> {
    if consent.status != ConsentStatus::Authorised {
        return Err(report!(ApiErrorResponse::ConsentStatusNotAuthorised {
            status: consent.status,
        }));
    }
    Ok(())
}

/// Decide replay / conflict / first-submission for an incoming payment.
///
/// - no stored submission for the consent: `Ok(None)`, proceed with creation;
/// - stored submission owned by a different client: `PaymentForbidden`;
///   another provider's submission must not be observable, let alone
///   replayable;
/// - same idempotency key and structurally equal payload: `Ok(Some(_))`, the
///   caller must answer with the stored record unchanged and perform no
///   further side effects;
/// - anything else: `IdempotencyConflict`.
pub async fn find_existing_payment(
    db: &dyn StorageInterface,
    new_payment: &PaymentData,
    consent_id: &str,
    api_client_id: &str,
    idempotency_key: &str,
) -> RouterResult<Option<PaymentSubmission>> {
    let existing = match db.find_payment_submission_by_id(consent_id).await {
        Ok(existing) => existing,
        Err(err) if err.current_context().is_db_not_found() => return Ok(None),
        Err(err) => return Err(err.change_context(ApiErrorResponse::InternalServerError)),
    };

    if existing.api_client_id != api_client_id {
        return Err(report!(ApiErrorResponse::PaymentForbidden));
    }

    if existing.idempotency_key == idempotency_key && existing.payment == *new_payment {
        return Ok(Some(existing));
    }

    Err(report!(ApiErrorResponse::IdempotencyConflict))
}
