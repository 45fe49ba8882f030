use crate::{core::errors, logger, services::consents::ConsentStoreError};

pub trait StorageErrorExt {
    fn to_not_found_response(
        self,
        not_found_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse>;

    fn to_duplicate_response(
        self,
        duplicate_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse>;
}

impl StorageErrorExt for error_stack::Report<errors::StorageError> {
    fn to_not_found_response(
        self,
        not_found_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse> {
        if self.current_context().is_db_not_found() {
            self.change_context(not_found_response)
        } else {
            self.change_context(errors::ApiErrorResponse::InternalServerError)
        }
    }

    fn to_duplicate_response(
        self,
        duplicate_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse> {
        if self.current_context().is_db_unique_violation() {
            self.change_context(duplicate_response)
        } else {
            self.change_context(errors::ApiErrorResponse::InternalServerError)
        }
    }
}

pub trait ConsentStoreErrorExt {
    fn to_consent_response(self) -> error_stack::Report<errors::ApiErrorResponse>;
}

impl ConsentStoreErrorExt for error_stack::Report<ConsentStoreError> {
    fn to_consent_response(self) -> error_stack::Report<errors::ApiErrorResponse> {
        let error = match self.current_context() {
            ConsentStoreError::NotFound => errors::ApiErrorResponse::ConsentNotFound,
            ConsentStoreError::Forbidden => errors::ApiErrorResponse::ConsentForbidden,
            ConsentStoreError::Unavailable | ConsentStoreError::UnexpectedResponse => {
                logger::error!("Consent store call failed");
                errors::ApiErrorResponse::InternalServerError
            }
        };
        self.change_context(error)
    }
}
