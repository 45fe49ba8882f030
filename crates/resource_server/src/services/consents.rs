use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use api_models::{consents::Consent, enums::ConsentStatus};
use common_utils::{date_time, errors::CustomResult};
use error_stack::report;
use futures::lock::Mutex;

use crate::{configs::settings::ConsentStoreConfig, headers, logger};

/// Failures of the consent store, as seen by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConsentStoreError {
    #[error("Consent not found")]
    NotFound,
    #[error("Consent is held by a different client")]
    Forbidden,
    #[error("Consent store is unavailable")]
    Unavailable,
    #[error("Unexpected response from the consent store")]
    UnexpectedResponse,
}

/// The consent store owns consent documents and their lifecycle; this server
/// only reads them and asks for consumption.
#[async_trait::async_trait]
pub trait ConsentStoreInterface: Send + Sync {
    /// Fetch a consent. The store enforces ownership: a consent requested
    /// with a non-matching `api_client_id` yields [`ConsentStoreError::Forbidden`].
    async fn get_consent(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<Consent, ConsentStoreError>;

    /// Transition an authorised consent to `Consumed`.
    ///
    /// Idempotent: consuming an already consumed consent for the same client
    /// succeeds without effect, which is what lets a submit retry recover
    /// from a crash between submission insert and consumption.
    async fn consume_consent(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<(), ConsentStoreError>;
}

/// HTTP client for the consent store service.
#[derive(Clone, Debug)]
pub struct ConsentServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConsentServiceClient {
    pub fn new(conf: &ConsentStoreConfig) -> CustomResult<Self, ConsentStoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(conf.timeout_secs))
            .build()
            .map_err(|_| report!(ConsentStoreError::Unavailable))?;
        Ok(Self {
            client,
            base_url: conf.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_error_status(status: reqwest::StatusCode) -> ConsentStoreError {
        match status {
            reqwest::StatusCode::NOT_FOUND => ConsentStoreError::NotFound,
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::UNAUTHORIZED => {
                ConsentStoreError::Forbidden
            }
            _ => ConsentStoreError::Unavailable,
        }
    }
}

#[async_trait::async_trait]
impl ConsentStoreInterface for ConsentServiceClient {
    async fn get_consent(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<Consent, ConsentStoreError> {
        let response = self
            .client
            .get(format!("{}/consents/{}", self.base_url, consent_id))
            .header(headers::X_API_CLIENT_ID, api_client_id)
            .send()
            .await
            .map_err(|error| {
                logger::error!(%error, "Consent store request failed");
                report!(ConsentStoreError::Unavailable)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(report!(Self::map_error_status(status)));
        }

        response
            .json::<Consent>()
            .await
            .map_err(|_| report!(ConsentStoreError::UnexpectedResponse))
    }

    async fn consume_consent(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<(), ConsentStoreError> {
        let response = self
            .client
            .post(format!("{}/consents/{}/consume", self.base_url, consent_id))
            .header(headers::X_API_CLIENT_ID, api_client_id)
            .send()
            .await
            .map_err(|error| {
                logger::error!(%error, "Consent store request failed");
                report!(ConsentStoreError::Unavailable)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(report!(Self::map_error_status(status)));
        }
        Ok(())
    }
}

/// In-memory consent store used in mock mode and by the test suites. Counts
/// consumption calls so tests can assert consumption happened exactly once.
#[derive(Clone, Debug, Default)]
pub struct MockConsentStore {
    consents: Arc<Mutex<HashMap<String, Consent>>>,
    consume_calls: Arc<AtomicUsize>,
}

impl MockConsentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_consent(&self, consent: Consent) {
        self.consents
            .lock()
            .await
            .insert(consent.consent_id.clone(), consent);
    }

    pub async fn get_consent_status(&self, consent_id: &str) -> Option<ConsentStatus> {
        self.consents
            .lock()
            .await
            .get(consent_id)
            .map(|consent| consent.status)
    }

    pub fn consume_call_count(&self) -> usize {
        self.consume_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ConsentStoreInterface for MockConsentStore {
    async fn get_consent(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<Consent, ConsentStoreError> {
        let consents = self.consents.lock().await;
        let consent = consents
            .get(consent_id)
            .ok_or(report!(ConsentStoreError::NotFound))?;
        if consent.api_client_id != api_client_id {
            return Err(report!(ConsentStoreError::Forbidden));
        }
        Ok(consent.clone())
    }

    async fn consume_consent(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<(), ConsentStoreError> {
        self.consume_calls.fetch_add(1, Ordering::SeqCst);

        let mut consents = self.consents.lock().await;
        let consent = consents
            .get_mut(consent_id)
            .ok_or(report!(ConsentStoreError::NotFound))?;
        if consent.api_client_id != api_client_id {
            return Err(report!(ConsentStoreError::Forbidden));
        }
        match consent.status {
            ConsentStatus::Authorised => {
                consent.status = ConsentStatus::Consumed;
                consent.status_update_date_time = date_time::now();
                Ok(())
            }
            // Already consumed for this client: a no-op success.
            ConsentStatus::Consumed => Ok(()),
            _ => Err(report!(ConsentStoreError::UnexpectedResponse)),
        }
    }
}
