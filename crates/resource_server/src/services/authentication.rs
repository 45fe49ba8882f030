use actix_web::http::header::HeaderMap;
use error_stack::report;

use crate::{
    core::errors::{ApiErrorResponse, RouterResult},
    headers,
};

/// The caller identity attached to a request after authentication.
///
/// Transport-level authentication (MTLS, token validation) terminates at the
/// gateway in front of this server; what arrives here is the already
/// established client identity header.
#[derive(Clone, Debug)]
pub struct AuthenticationData {
    pub api_client_id: String,
}

#[async_trait::async_trait]
pub trait AuthenticateAndFetch: Send + Sync {
    async fn authenticate_and_fetch(&self, headers: &HeaderMap)
        -> RouterResult<AuthenticationData>;
}

/// Reads the gateway-supplied client identity header.
pub struct ApiClientAuth;

#[async_trait::async_trait]
impl AuthenticateAndFetch for ApiClientAuth {
    async fn authenticate_and_fetch(
        &self,
        headers: &HeaderMap,
    ) -> RouterResult<AuthenticationData> {
        let api_client_id = headers
            .get(headers::X_API_CLIENT_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                report!(ApiErrorResponse::MissingRequiredHeader {
                    header_name: headers::X_API_CLIENT_ID,
                })
            })?;

        Ok(AuthenticationData {
            api_client_id: api_client_id.to_string(),
        })
    }
}
