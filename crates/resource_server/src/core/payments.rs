pub mod flows;
pub mod helpers;

use api_models::{
    enums::{ConsentType, SubmissionStatus},
    payments::{FundsConfirmationResponse, PaymentsSubmissionRequest, PaymentsSubmissionResponse},
};
use common_utils::date_time;
use error_stack::{report, ResultExt};
use tracing::instrument;

use self::flows::PaymentFlow;
use crate::{
    core::{
        errors::{ApiErrorResponse, ConsentStoreErrorExt, RouterResponse, StorageErrorExt},
        versioning,
    },
    db::payment_submission::PaymentSubmissionInterface,
    logger,
    routes::AppState,
    services::{api::ApplicationResponse, authentication::AuthenticationData},
    types::storage::PaymentSubmissionNew,
};

/// A payment submission request together with the request elements it was
/// carried with: the API version from the URL and the idempotency key header.
#[derive(Debug)]
pub struct PaymentsSubmitPayload {
    pub version: String,
    pub idempotency_key: Option<String>,
    pub request: PaymentsSubmissionRequest,
}

#[derive(Debug)]
pub struct PaymentsRetrievePayload {
    pub version: String,
    pub payment_id: String,
}

#[derive(Debug)]
pub struct FundsConfirmationPayload {
    pub version: String,
    pub consent_id: String,
}

/// Create a payment submission against an authorised consent, or replay the
/// original response for a retried request.
///
/// The submission id equals the consent id, so the store's insert-if-absent
/// is what guarantees at most one submission per consent: of N concurrent
/// first-time submitters exactly one insert succeeds and the rest fall back
/// to the replay read. Consent consumption happens exactly once, strictly
/// after a genuinely new submission is durable.
#[instrument(skip_all, fields(consent_id, payment_id))]
pub async fn payments_submit_core<F: PaymentFlow>(
    state: AppState,
    auth: AuthenticationData,
    payload: PaymentsSubmitPayload,
) -> RouterResponse<PaymentsSubmissionResponse> {
    let version = helpers::parse_api_version(&payload.version)?;
    let idempotency_key = helpers::validate_idempotency_key(payload.idempotency_key)?;
    let request = payload.request;
    tracing::Span::current().record("consent_id", request.consent_id.as_str());

    if !helpers::consent_type_matches(&request.consent_id, F::consent_type()) {
        return Err(report!(ApiErrorResponse::ConsentNotFound));
    }

    let consent = state
        .consent_store
        .get_consent(&request.consent_id, &auth.api_client_id)
        .await
        .map_err(ConsentStoreErrorExt::to_consent_response)?;

    let payment = F::normalize(&request);

    // The replay check runs before the status gate: the first submission
    // consumes the consent, so a retried request arrives with the consent
    // already `Consumed` and must still be answered with the original
    // response.
    if let Some(existing) = helpers::find_existing_payment(
        &*state.store,
        &payment,
        &request.consent_id,
        &auth.api_client_id,
        &idempotency_key,
    )
    .await?
    {
        logger::info!(payment_id = %existing.id, "Replaying existing payment submission");
        return Ok(ApplicationResponse::JsonCreated(F::build_response(
            &existing,
            &consent.charges,
        )));
    }

    helpers::validate_consent_status(&consent)?;

    F::validate_against_consent(&consent, &payment)
        .map_err(|fields| report!(ApiErrorResponse::ValidationMismatch { fields }))?;

    let submission_new = PaymentSubmissionNew {
        id: request.consent_id.clone(),
        consent_id: request.consent_id.clone(),
        api_client_id: auth.api_client_id.clone(),
        idempotency_key: idempotency_key.clone(),
        payment: payment.clone(),
        status: SubmissionStatus::default(),
        ob_version: version,
    };

    let submission = match state.store.insert_payment_submission(submission_new).await {
        Ok(submission) => submission,
        Err(err) if err.current_context().is_db_unique_violation() => {
            // Lost the insert race; the winning record answers this request.
            let existing = helpers::find_existing_payment(
                &*state.store,
                &payment,
                &request.consent_id,
                &auth.api_client_id,
                &idempotency_key,
            )
            .await?
            .ok_or_else(|| report!(ApiErrorResponse::InternalServerError))
            .attach_printable("lost an insert race but the winning submission is missing")?;
            logger::info!(payment_id = %existing.id, "Replaying submission after lost insert race");
            return Ok(ApplicationResponse::JsonCreated(F::build_response(
                &existing,
                &consent.charges,
            )));
        }
        Err(err) => return Err(err.change_context(ApiErrorResponse::InternalServerError)),
    };
    tracing::Span::current().record("payment_id", submission.id.as_str());

    // A crash between the insert above and this call is recovered by the
    // client retry replaying the stored submission without reaching here
    // again; the consent store treats repeat consumption for the same client
    // as a no-op success.
    state
        .consent_store
        .consume_consent(&request.consent_id, &auth.api_client_id)
        .await
        .map_err(ConsentStoreErrorExt::to_consent_response)?;

    logger::info!("Created payment submission and consumed consent");
    Ok(ApplicationResponse::JsonCreated(F::build_response(
        &submission,
        &consent.charges,
    )))
}

/// Fetch a stored submission, subject to client ownership and API-version
/// visibility.
#[instrument(skip_all, fields(payment_id))]
pub async fn payments_retrieve_core<F: PaymentFlow>(
    state: AppState,
    auth: AuthenticationData,
    payload: PaymentsRetrievePayload,
) -> RouterResponse<PaymentsSubmissionResponse> {
    let version = helpers::parse_api_version(&payload.version)?;
    tracing::Span::current().record("payment_id", payload.payment_id.as_str());

    if !helpers::consent_type_matches(&payload.payment_id, F::consent_type()) {
        return Err(report!(ApiErrorResponse::PaymentNotFound));
    }

    let submission = state
        .store
        .find_payment_submission_by_id(&payload.payment_id)
        .await
        .map_err(|err| err.to_not_found_response(ApiErrorResponse::PaymentNotFound))?;

    if submission.api_client_id != auth.api_client_id {
        return Err(report!(ApiErrorResponse::PaymentForbidden));
    }

    versioning::validate_resource_access(submission.ob_version, version)?;

    let consent = state
        .consent_store
        .get_consent(&submission.consent_id, &auth.api_client_id)
        .await
        .map_err(ConsentStoreErrorExt::to_consent_response)?;

    Ok(ApplicationResponse::Json(F::build_response(
        &submission,
        &consent.charges,
    )))
}

/// Funds-confirmation read against a payment consent. Only the consent
/// status gate lives here; availability itself is resolved by the account
/// servicer upstream of this server.
#[instrument(skip_all, fields(consent_id))]
pub async fn funds_confirmation_core(
    state: AppState,
    auth: AuthenticationData,
    payload: FundsConfirmationPayload,
) -> RouterResponse<FundsConfirmationResponse> {
    helpers::parse_api_version(&payload.version)?;
    tracing::Span::current().record("consent_id", payload.consent_id.as_str());

    if !helpers::consent_type_matches(&payload.consent_id, ConsentType::DomesticPayment) {
        return Err(report!(ApiErrorResponse::ConsentNotFound));
    }

    let consent = state
        .consent_store
        .get_consent(&payload.consent_id, &auth.api_client_id)
        .await
        .map_err(ConsentStoreErrorExt::to_consent_response)?;
    helpers::validate_consent_status(&consent)?;

    Ok(ApplicationResponse::Json(FundsConfirmationResponse {
        funds_available: true,
        funds_available_date_time: date_time::now(),
    }))
}
