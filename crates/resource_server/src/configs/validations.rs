use common_utils::{
    errors::{ApplicationError, ApplicationResult},
    fp_utils::when,
};

impl super::settings::Settings {
    pub fn validate(&self) -> ApplicationResult<()> {
        when(self.server.host.is_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "server host must not be empty".into(),
            ))
        })?;

        when(self.server.workers == 0, || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "server must have at least one worker".into(),
            ))
        })?;

        when(
            !self.consent_store.mock && self.consent_store.base_url.is_empty(),
            || {
                Err(ApplicationError::InvalidConfigurationValueError(
                    "consent store base url must not be empty".into(),
                ))
            },
        )?;

        when(self.database.pool_size == 0, || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "database pool size must be at least one".into(),
            ))
        })
    }
}
