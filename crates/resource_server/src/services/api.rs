use std::{fmt::Debug, future::Future, time::Instant};

use actix_web::{body, web, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::instrument;

use crate::{
    core::errors::{ApiErrorResponse, CustomResult},
    env::Flow,
    logger,
    routes::AppState,
    services::authentication as auth,
};

/// What a core operation hands back to the HTTP layer.
#[derive(Debug, Eq, PartialEq)]
pub enum ApplicationResponse<R> {
    Json(R),
    /// Same as [`Self::Json`] but answered with `201 Created`; used by
    /// submission endpoints, including replays, which must be
    /// indistinguishable from the original response.
    JsonCreated(R),
    StatusOk,
    TextPlain(String),
}

#[instrument(skip(state, request, payload, func, api_auth), fields(api_client_id))]
async fn server_wrap_util<T, Q, F, Fut>(
    state: &web::Data<AppState>,
    request: &HttpRequest,
    payload: T,
    func: F,
    api_auth: &dyn auth::AuthenticateAndFetch,
) -> CustomResult<ApplicationResponse<Q>, ApiErrorResponse>
where
    F: Fn(AppState, auth::AuthenticationData, T) -> Fut,
    Fut: Future<Output = CustomResult<ApplicationResponse<Q>, ApiErrorResponse>>,
    Q: Serialize + Debug,
    T: Debug,
{
    let auth_out = api_auth.authenticate_and_fetch(request.headers()).await?;
    tracing::Span::current().record("api_client_id", auth_out.api_client_id.as_str());

    func(state.get_ref().clone(), auth_out, payload).await
}

#[instrument(
    skip(state, request, payload, func, api_auth),
    fields(request_method, request_url_path)
)]
pub async fn server_wrap<T, Q, F, Fut>(
    flow: Flow,
    state: web::Data<AppState>,
    request: &HttpRequest,
    payload: T,
    func: F,
    api_auth: &dyn auth::AuthenticateAndFetch,
) -> HttpResponse
where
    F: Fn(AppState, auth::AuthenticationData, T) -> Fut,
    Fut: Future<Output = CustomResult<ApplicationResponse<Q>, ApiErrorResponse>>,
    Q: Serialize + Debug,
    T: Debug,
{
    let request_method = request.method().as_str();
    let url_path = request.path();
    tracing::Span::current().record("request_method", request_method);
    tracing::Span::current().record("request_url_path", url_path);

    let start_instant = Instant::now();
    logger::info!(flow = %flow, payload = ?payload, "Begin request");

    let res = match server_wrap_util(&state, request, payload, func, api_auth).await {
        Ok(ApplicationResponse::Json(response)) => match serde_json::to_string(&response) {
            Ok(res) => http_response_json(res),
            Err(_) => http_serialization_error_response(),
        },
        Ok(ApplicationResponse::JsonCreated(response)) => match serde_json::to_string(&response) {
            Ok(res) => http_response_created(res),
            Err(_) => http_serialization_error_response(),
        },
        Ok(ApplicationResponse::StatusOk) => http_response_ok(),
        Ok(ApplicationResponse::TextPlain(text)) => http_response_plaintext(text),
        Err(error) => log_and_return_error_response(error),
    };

    let response_code = res.status().as_u16();
    let request_duration = Instant::now().saturating_duration_since(start_instant);
    logger::info!(
        flow = %flow,
        status_code = response_code,
        time_taken_ms = request_duration.as_millis(),
        "End request"
    );

    res
}

pub fn http_response_json<T: body::MessageBody + 'static>(response: T) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::APPLICATION_JSON)
        .body(response)
}

pub fn http_response_created<T: body::MessageBody + 'static>(response: T) -> HttpResponse {
    HttpResponse::Created()
        .content_type(mime::APPLICATION_JSON)
        .body(response)
}

pub fn http_response_plaintext<T: body::MessageBody + 'static>(response: T) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN)
        .body(response)
}

pub fn http_response_ok() -> HttpResponse {
    HttpResponse::Ok().finish()
}

fn http_serialization_error_response() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(mime::APPLICATION_JSON)
        .body(r#"{"error":{"message":"Error serializing response"}}"#)
}

pub fn log_and_return_error_response<T>(error: error_stack::Report<T>) -> HttpResponse
where
    T: error_stack::Context + Clone + ResponseError,
{
    logger::error!(?error);
    HttpResponse::from_error(error.current_context().clone())
}
