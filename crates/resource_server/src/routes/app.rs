use std::sync::Arc;

use actix_web::{web, Scope};
use common_utils::errors::{ApplicationError, ApplicationResult};

use super::{health::*, payments::*};
use crate::{
    configs::settings::Settings,
    db::{MockDb, StorageImpl, StorageInterface},
    services::{
        consents::{ConsentServiceClient, ConsentStoreInterface, MockConsentStore},
        Store,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub store: Box<dyn StorageInterface>,
    pub consent_store: Arc<dyn ConsentStoreInterface>,
    pub conf: Settings,
}

impl AppState {
    pub async fn with_storage(
        conf: Settings,
        storage_impl: StorageImpl,
    ) -> ApplicationResult<Self> {
        let store: Box<dyn StorageInterface> = match storage_impl {
            StorageImpl::Postgresql => Box::new(
                Store::new(&conf.database.connection_string(), conf.database.pool_size)
                    .await
                    .map_err(|err| ApplicationError::ConfigurationError(err.to_string()))?,
            ),
            StorageImpl::Mock => Box::new(MockDb::new()),
        };

        let consent_store: Arc<dyn ConsentStoreInterface> = if conf.consent_store.mock {
            Arc::new(MockConsentStore::new())
        } else {
            Arc::new(
                ConsentServiceClient::new(&conf.consent_store)
                    .map_err(|err| ApplicationError::ConfigurationError(err.to_string()))?,
            )
        };

        Ok(Self {
            store,
            consent_store,
            conf,
        })
    }

    pub async fn new(conf: Settings) -> ApplicationResult<Self> {
        Self::with_storage(conf, StorageImpl::Postgresql).await
    }

    /// Assemble a state from already constructed collaborators; the test
    /// suites use this to share one store across concurrent callers.
    pub fn with_stores(
        conf: Settings,
        store: Box<dyn StorageInterface>,
        consent_store: Arc<dyn ConsentStoreInterface>,
    ) -> Self {
        Self {
            store,
            consent_store,
            conf,
        }
    }
}

pub struct Health;

impl Health {
    pub fn server(state: AppState) -> Scope {
        web::scope("")
            .app_data(web::Data::new(state))
            .service(web::resource("/health").route(web::get().to(health)))
    }
}

pub struct Payments;

impl Payments {
    pub fn server(state: AppState) -> Scope {
        web::scope("/open-banking/{version}/pisp")
            .app_data(web::Data::new(state))
            .service(
                web::resource("/domestic-payments")
                    .route(web::post().to(domestic_payments_create)),
            )
            .service(
                web::resource("/domestic-payments/{payment_id}")
                    .route(web::get().to(domestic_payments_retrieve)),
            )
            .service(
                web::resource("/domestic-scheduled-payments")
                    .route(web::post().to(domestic_scheduled_payments_create)),
            )
            .service(
                web::resource("/domestic-scheduled-payments/{payment_id}")
                    .route(web::get().to(domestic_scheduled_payments_retrieve)),
            )
            .service(
                web::resource("/domestic-payment-consents/{consent_id}/funds-confirmation")
                    .route(web::get().to(funds_confirmation)),
            )
    }
}
