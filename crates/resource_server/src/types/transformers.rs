use api_models::{consents::ChargeDetails, payments::PaymentsSubmissionResponse};

use crate::types::storage::PaymentSubmission;

/// Crate-local counterpart of `From`, so conversions between types owned by
/// other crates can live here.
pub trait ForeignFrom<F> {
    fn foreign_from(from: F) -> Self;
}

pub trait ForeignInto<T> {
    fn foreign_into(self) -> T;
}

impl<F, T> ForeignInto<T> for F
where
    T: ForeignFrom<F>,
{
    fn foreign_into(self) -> T {
        T::foreign_from(self)
    }
}

impl ForeignFrom<(&PaymentSubmission, &[ChargeDetails])> for PaymentsSubmissionResponse {
    fn foreign_from((submission, charges): (&PaymentSubmission, &[ChargeDetails])) -> Self {
        Self {
            payment_id: submission.id.clone(),
            consent_id: submission.consent_id.clone(),
            status: submission.status,
            creation_date_time: submission.created_at,
            status_update_date_time: submission.modified_at,
            initiation: submission.payment.initiation.clone(),
            charges: charges.to_vec(),
        }
    }
}
