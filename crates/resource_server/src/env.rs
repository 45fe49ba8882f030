//!
//! Environment of the resource server: logging setup and flow identification.
//!

use strum::Display;

/// API flow, recorded on the request span so log lines can be grouped per
/// operation.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Health check
    HealthCheck,
    /// Domestic payment submission
    DomesticPaymentsCreate,
    /// Domestic payment retrieval
    DomesticPaymentsRetrieve,
    /// Domestic scheduled payment submission
    DomesticScheduledPaymentsCreate,
    /// Domestic scheduled payment retrieval
    DomesticScheduledPaymentsRetrieve,
    /// Funds confirmation against a payment consent
    FundsConfirmation,
}

pub mod logger {
    //!
    //! Logging sub-system: console and optional file output, filtered through
    //! `RUST_LOG` when set, the configured level otherwise.
    //!

    pub use tracing::{debug, error, info, warn};
    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_subscriber::{
        fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    };

    use crate::configs::settings::{Log, LogFormat};

    /// Guard keeping the non-blocking log writers alive; buffered lines are
    /// flushed when it is dropped.
    #[derive(Debug)]
    pub struct TelemetryGuard {
        _log_guards: Vec<WorkerGuard>,
    }

    /// Setup logging sub-system.
    pub fn setup(conf: &Log) -> TelemetryGuard {
        let mut guards = Vec::new();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&conf.console.level));

        let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

        if conf.file.enabled {
            let file_appender =
                tracing_appender::rolling::hourly(&conf.file.path, &conf.file.file_name);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            guards.push(guard);

            layers.push(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .json()
                    .boxed(),
            );
        }

        if conf.console.enabled {
            let console_layer = match conf.console.log_format {
                LogFormat::Default => fmt::layer().boxed(),
                LogFormat::Json => fmt::layer().json().boxed(),
            };
            layers.push(console_layer);
        }

        tracing_subscriber::registry()
            .with(env_filter)
            .with(layers)
            .init();

        TelemetryGuard {
            _log_guards: guards,
        }
    }
}
