use actix_web::{web, HttpRequest, HttpResponse};
use api_models::payments::PaymentsSubmissionRequest;
use tracing::instrument;

use super::app::AppState;
use crate::{
    core::payments::{
        self,
        flows::{DomesticPayments, DomesticScheduledPayments},
        FundsConfirmationPayload, PaymentsRetrievePayload, PaymentsSubmitPayload,
    },
    env::Flow,
    headers,
    services::{api, authentication as auth},
};

fn idempotency_key_from_headers(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(headers::X_IDEMPOTENCY_KEY)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

#[instrument(skip_all, fields(flow = ?Flow::DomesticPaymentsCreate))]
pub async fn domestic_payments_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    json_payload: web::Json<PaymentsSubmissionRequest>,
) -> HttpResponse {
    let payload = PaymentsSubmitPayload {
        version: path.into_inner(),
        idempotency_key: idempotency_key_from_headers(&req),
        request: json_payload.into_inner(),
    };
    api::server_wrap(
        Flow::DomesticPaymentsCreate,
        state,
        &req,
        payload,
        payments::payments_submit_core::<DomesticPayments>,
        &auth::ApiClientAuth,
    )
    .await
}

#[instrument(skip_all, fields(flow = ?Flow::DomesticPaymentsRetrieve))]
pub async fn domestic_payments_retrieve(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (version, payment_id) = path.into_inner();
    let payload = PaymentsRetrievePayload {
        version,
        payment_id,
    };
    api::server_wrap(
        Flow::DomesticPaymentsRetrieve,
        state,
        &req,
        payload,
        payments::payments_retrieve_core::<DomesticPayments>,
        &auth::ApiClientAuth,
    )
    .await
}

#[instrument(skip_all, fields(flow = ?Flow::DomesticScheduledPaymentsCreate))]
pub async fn domestic_scheduled_payments_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    json_payload: web::Json<PaymentsSubmissionRequest>,
) -> HttpResponse {
    let payload = PaymentsSubmitPayload {
        version: path.into_inner(),
        idempotency_key: idempotency_key_from_headers(&req),
        request: json_payload.into_inner(),
    };
    api::server_wrap(
        Flow::DomesticScheduledPaymentsCreate,
        state,
        &req,
        payload,
        payments::payments_submit_core::<DomesticScheduledPayments>,
        &auth::ApiClientAuth,
    )
    .await
}

#[instrument(skip_all, fields(flow = ?Flow::DomesticScheduledPaymentsRetrieve))]
pub async fn domestic_scheduled_payments_retrieve(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (version, payment_id) = path.into_inner();
    let payload = PaymentsRetrievePayload {
        version,
        payment_id,
    };
    api::server_wrap(
        Flow::DomesticScheduledPaymentsRetrieve,
        state,
        &req,
        payload,
        payments::payments_retrieve_core::<DomesticScheduledPayments>,
        &auth::ApiClientAuth,
    )
    .await
}

#[instrument(skip_all, fields(flow = ?Flow::FundsConfirmation))]
pub async fn funds_confirmation(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (version, consent_id) = path.into_inner();
    let payload = FundsConfirmationPayload {
        version,
        consent_id,
    };
    api::server_wrap(
        Flow::FundsConfirmation,
        state,
        &req,
        payload,
        payments::funds_confirmation_core,
        &auth::ApiClientAuth,
    )
    .await
}
