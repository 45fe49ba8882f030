use common_utils::errors::CustomResult;
use sqlx::postgres::PgPoolOptions;

use crate::errors::StorageError;

/// Postgres-backed storage. The `payment_submissions` primary key carries
/// the single-submission-per-consent guarantee; see the migrations.
#[derive(Clone, Debug)]
pub struct Store {
    pub pool: sqlx::PgPool,
}

impl Store {
    pub async fn new(database_url: &str, pool_size: u32) -> CustomResult<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .connect(database_url)
            .await
            .map_err(|err| error_stack::report!(StorageError::from(err)))?;
        Ok(Self { pool })
    }
}
