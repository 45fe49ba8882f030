use crate::{
    core::errors::{CustomResult, StorageError},
    types::storage::{PaymentSubmission, PaymentSubmissionNew},
};

#[async_trait::async_trait]
pub trait PaymentSubmissionInterface {
    /// Insert-if-absent. Fails with a unique violation when a submission with
    /// the same id already exists; it never overwrites. This failure mode is
    /// what converts a race between concurrent first-time submitters into
    /// "one insert wins, the rest fall back to a replay read".
    async fn insert_payment_submission(
        &self,
        submission: PaymentSubmissionNew,
    ) -> CustomResult<PaymentSubmission, StorageError>;

    async fn find_payment_submission_by_id(
        &self,
        id: &str,
    ) -> CustomResult<PaymentSubmission, StorageError>;

    async fn find_payment_submission_by_consent_id_api_client_id(
        &self,
        consent_id: &str,
        api_client_id: &str,
    ) -> CustomResult<PaymentSubmission, StorageError>;
}

mod storage {
    use std::str::FromStr;

    use api_models::enums::{ApiVersion, SubmissionStatus};
    use common_utils::date_time;
    use error_stack::report;
    use sqlx::{postgres::PgRow, Row};

    use super::PaymentSubmissionInterface;
    use crate::{
        core::errors::{CustomResult, StorageError},
        services::Store,
        types::storage::{PaymentSubmission, PaymentSubmissionNew},
    };

    fn parse_row(row: &PgRow) -> CustomResult<PaymentSubmission, StorageError> {
        let payment: String = row
            .try_get("payment")
            .map_err(|err| report!(StorageError::from(err)))?;
        let status: String = row
            .try_get("status")
            .map_err(|err| report!(StorageError::from(err)))?;
        let ob_version: String = row
            .try_get("ob_version")
            .map_err(|err| report!(StorageError::from(err)))?;

        Ok(PaymentSubmission {
            id: row
                .try_get("id")
                .map_err(|err| report!(StorageError::from(err)))?,
            consent_id: row
                .try_get("consent_id")
                .map_err(|err| report!(StorageError::from(err)))?,
            api_client_id: row
                .try_get("api_client_id")
                .map_err(|err| report!(StorageError::from(err)))?,
            idempotency_key: row
                .try_get("idempotency_key")
                .map_err(|err| report!(StorageError::from(err)))?,
            payment: serde_json::from_str(&payment)
                .map_err(|_| report!(StorageError::DeserializationFailed))?,
            status: SubmissionStatus::from_str(&status)
                .map_err(|_| report!(StorageError::DeserializationFailed))?,
            ob_version: ApiVersion::from_str(&ob_version)
                .map_err(|_| report!(StorageError::DeserializationFailed))?,
            created_at: row
                .try_get("created_at")
                .map_err(|err| report!(StorageError::from(err)))?,
            modified_at: row
                .try_get("modified_at")
                .map_err(|err| report!(StorageError::from(err)))?,
        })
    }

    #[async_trait::async_trait]
    impl PaymentSubmissionInterface for Store {
        async fn insert_payment_submission(
            &self,
            submission: PaymentSubmissionNew,
        ) -> CustomResult<PaymentSubmission, StorageError> {
            let now = date_time::now();
            let payment = serde_json::to_string(&submission.payment)
                .map_err(|_| report!(StorageError::SerializationFailed))?;

            sqlx::query(
                "INSERT INTO payment_submissions \
                 (id, consent_id, api_client_id, idempotency_key, payment, status, ob_version, \
                  created_at, modified_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(&submission.id)
            .bind(&submission.consent_id)
            .bind(&submission.api_client_id)
            .bind(&submission.idempotency_key)
            .bind(&payment)
            .bind(submission.status.to_string())
            .bind(submission.ob_version.to_string())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|err| report!(StorageError::from(err)))?;

            Ok(submission.into_submission(now))
        }

        async fn find_payment_submission_by_id(
            &self,
            id: &str,
        ) -> CustomResult<PaymentSubmission, StorageError> {
            let row = sqlx::query("SELECT * FROM payment_submissions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|err| report!(StorageError::from(err)))?;

            match row {
                Some(row) => parse_row(&row),
                None => Err(report!(StorageError::ValueNotFound(format!(
                    "payment submission {id}"
                )))),
            }
        }

        async fn find_payment_submission_by_consent_id_api_client_id(
            &self,
            consent_id: &str,
            api_client_id: &str,
        ) -> CustomResult<PaymentSubmission, StorageError> {
            let row = sqlx::query(
                "SELECT * FROM payment_submissions \
                 WHERE consent_id = $1 AND api_client_id = $2",
            )
            .bind(consent_id)
            .bind(api_client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| report!(StorageError::from(err)))?;

            match row {
                Some(row) => parse_row(&row),
                None => Err(report!(StorageError::ValueNotFound(format!(
                    "payment submission for consent {consent_id}"
                )))),
            }
        }
    }
}

mod mock {
    use common_utils::date_time;
    use error_stack::report;

    use super::PaymentSubmissionInterface;
    use crate::{
        core::errors::{CustomResult, StorageError},
        db::MockDb,
        types::storage::{PaymentSubmission, PaymentSubmissionNew},
    };

    #[async_trait::async_trait]
    impl PaymentSubmissionInterface for MockDb {
        async fn insert_payment_submission(
            &self,
            submission: PaymentSubmissionNew,
        ) -> CustomResult<PaymentSubmission, StorageError> {
            // The duplicate check and the push happen under one lock, which
            // gives this insert the same atomicity as the database's unique
            // constraint.
            let mut submissions = self.payment_submissions.lock().await;
            if submissions.iter().any(|item| item.id == submission.id) {
                return Err(report!(StorageError::DuplicateValue {
                    entity: "payment submission",
                    key: Some(submission.id),
                }));
            }
            let submission = submission.into_submission(date_time::now());
            submissions.push(submission.clone());
            Ok(submission)
        }

        async fn find_payment_submission_by_id(
            &self,
            id: &str,
        ) -> CustomResult<PaymentSubmission, StorageError> {
            self.payment_submissions
                .lock()
                .await
                .iter()
                .find(|submission| submission.id == id)
                .cloned()
                .ok_or_else(|| {
                    report!(StorageError::ValueNotFound(format!(
                        "payment submission {id}"
                    )))
                })
        }

        async fn find_payment_submission_by_consent_id_api_client_id(
            &self,
            consent_id: &str,
            api_client_id: &str,
        ) -> CustomResult<PaymentSubmission, StorageError> {
            self.payment_submissions
                .lock()
                .await
                .iter()
                .find(|submission| {
                    submission.consent_id == consent_id
                        && submission.api_client_id == api_client_id
                })
                .cloned()
                .ok_or_else(|| {
                    report!(StorageError::ValueNotFound(format!(
                        "payment submission for consent {consent_id}"
                    )))
                })
        }
    }
}
