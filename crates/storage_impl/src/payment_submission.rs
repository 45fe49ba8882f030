use api_models::{
    enums::{ApiVersion, SubmissionStatus},
    payments::PaymentData,
};
use time::PrimitiveDateTime;

/// Durable record of a submitted payment.
///
/// `id` equals the consent id for single-payment-per-consent products; the
/// uniqueness of `id` in the backing store is the only concurrency-control
/// primitive the submission engine relies on. Identity and payload fields
/// are immutable after creation; only `status`/`modified_at` may be advanced
/// by downstream execution.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentSubmission {
    pub id: String,
    pub consent_id: String,
    pub api_client_id: String,
    pub idempotency_key: String,
    pub payment: PaymentData,
    pub status: SubmissionStatus,
    pub ob_version: ApiVersion,
    pub created_at: PrimitiveDateTime,
    pub modified_at: PrimitiveDateTime,
}

/// A submission about to be persisted; timestamps are assigned by the store
/// at insert time.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentSubmissionNew {
    pub id: String,
    pub consent_id: String,
    pub api_client_id: String,
    pub idempotency_key: String,
    pub payment: PaymentData,
    pub status: SubmissionStatus,
    pub ob_version: ApiVersion,
}

impl PaymentSubmissionNew {
    /// Stamp the record with store-assigned timestamps.
    pub fn into_submission(self, now: PrimitiveDateTime) -> PaymentSubmission {
        PaymentSubmission {
            id: self.id,
            consent_id: self.consent_id,
            api_client_id: self.api_client_id,
            idempotency_key: self.idempotency_key,
            payment: self.payment,
            status: self.status,
            ob_version: self.ob_version,
            created_at: now,
            modified_at: now,
        }
    }
}
