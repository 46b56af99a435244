//! Tracing subscriber setup.

use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::{ObservabilityError, settings};

/// Runtime observability state.
#[derive(Debug)]
pub(crate) struct Observability;

impl Observability {
    /// Initialize structured logging and request settings.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(config.observability.slow_request_threshold_ms);

        match config.logging.log_format {
            LogFormat::Compact => init_with_layer(
                &config.logging.log_level,
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )?,
            LogFormat::Json => init_with_layer(
                &config.logging.log_level,
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )?,
        }

        Ok(Self)
    }
}

fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{log_level},h2=warn,hyper=warn,sqlx=warn,reqwest=warn"
        ))
    })
}

fn init_with_layer<L>(log_level: &str, fmt_layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(log_level))
        .try_init()?;

    Ok(())
}
