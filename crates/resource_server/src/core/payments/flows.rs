use api_models::{
    consents::{ChargeDetails, Consent},
    enums::ConsentType,
    payments::{
        PaymentData, PaymentInitiation, PaymentsSubmissionRequest, PaymentsSubmissionResponse,
    },
};

use crate::types::{storage::PaymentSubmission, transformers::ForeignFrom};

/// The per-product capability set threaded through the generic submission
/// orchestration.
///
/// The idempotency and consumption logic in [`super::payments_submit_core`]
/// is written once; what varies between payment products (which consents
/// they submit against, how requests normalize, which fields must match the
/// consent, how responses are shaped) is captured here.
pub trait PaymentFlow: Send + Sync + 'static {
    /// The consent type this product submits against.
    fn consent_type() -> ConsentType;

    /// Build the normalized payload that is persisted and compared against
    /// on replays.
    fn normalize(request: &PaymentsSubmissionRequest) -> PaymentData;

    /// Compare the economically significant initiation fields with the
    /// consent's original request. Returns the offending field names on
    /// mismatch.
    fn validate_against_consent(consent: &Consent, payment: &PaymentData)
        -> Result<(), Vec<String>>;

    /// Shape a stored submission into this product's response.
    fn build_response(
        submission: &PaymentSubmission,
        charges: &[ChargeDetails],
    ) -> PaymentsSubmissionResponse;
}

fn initiation_mismatches(
    expected: &PaymentInitiation,
    got: &PaymentInitiation,
    check_execution_date: bool,
) -> Vec<String> {
    let mut fields = Vec::new();
    if expected.instructed_amount.amount != got.instructed_amount.amount {
        fields.push("instructed_amount.amount".to_string());
    }
    if expected.instructed_amount.currency != got.instructed_amount.currency {
        fields.push("instructed_amount.currency".to_string());
    }
    if expected.creditor_account != got.creditor_account {
        fields.push("creditor_account".to_string());
    }
    if expected.debtor_account != got.debtor_account {
        fields.push("debtor_account".to_string());
    }
    if expected.end_to_end_identification != got.end_to_end_identification {
        fields.push("end_to_end_identification".to_string());
    }
    if check_execution_date
        && expected.requested_execution_date_time != got.requested_execution_date_time
    {
        fields.push("requested_execution_date_time".to_string());
    }
    fields
}

/// Single immediate domestic payments.
pub struct DomesticPayments;

impl PaymentFlow for DomesticPayments {
    fn consent_type() -> ConsentType {
        ConsentType::DomesticPayment
    }

    fn normalize(request: &PaymentsSubmissionRequest) -> PaymentData {
        PaymentData {
            initiation: request.initiation.clone(),
            supplementary_data: request.supplementary_data.clone(),
        }
    }

    fn validate_against_consent(
        consent: &Consent,
        payment: &PaymentData,
    ) -> Result<(), Vec<String>> {
        let fields = initiation_mismatches(&consent.request.initiation, &payment.initiation, false);
        if fields.is_empty() {
            Ok(())
        } else {
            Err(fields)
        }
    }

    fn build_response(
        submission: &PaymentSubmission,
        charges: &[ChargeDetails],
    ) -> PaymentsSubmissionResponse {
        PaymentsSubmissionResponse::foreign_from((submission, charges))
    }
}

/// Domestic payments executing at a future date; the execution date is part
/// of what the consent authorised, so it participates in validation.
pub struct DomesticScheduledPayments;

impl PaymentFlow for DomesticScheduledPayments {
    fn consent_type() -> ConsentType {
        ConsentType::DomesticScheduledPayment
    }

    fn normalize(request: &PaymentsSubmissionRequest) -> PaymentData {
        PaymentData {
            initiation: request.initiation.clone(),
            supplementary_data: request.supplementary_data.clone(),
        }
    }

    fn validate_against_consent(
        consent: &Consent,
        payment: &PaymentData,
    ) -> Result<(), Vec<String>> {
        let fields = initiation_mismatches(&consent.request.initiation, &payment.initiation, true);
        if fields.is_empty() {
            Ok(())
        } else {
            Err(fields)
        }
    }

    fn build_response(
        submission: &PaymentSubmission,
        charges: &[ChargeDetails],
    ) -> PaymentsSubmissionResponse {
        PaymentsSubmissionResponse::foreign_from((submission, charges))
    }
}
