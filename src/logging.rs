use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_SERVICE_NAME: &str = "rustfolio-view";

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub filter: String,
    pub service_name: String,
    pub environment: String,
    /// Loki push endpoint; `None` keeps logging on stderr only.
    pub loki_url: Option<String>,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `LOKI_URL` is only honoured when `LOKI_ENABLED` is `true` or `1`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let loki_enabled = lookup("LOKI_ENABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        let loki_url = match (loki_enabled, lookup("LOKI_URL")) {
            (false, _) => None,
            (true, Some(url)) if !url.trim().is_empty() => Some(url),
            (true, _) => return Err("LOKI_ENABLED is set but LOKI_URL is missing".to_string()),
        };

        Ok(Self {
            filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            loki_url,
        })
    }
}

/// Installs the global subscriber. Output goes to stderr; stdout carries
/// the rendered views.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.filter)?)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    #[cfg(feature = "loki")]
    let registry = registry.with(loki_layer(config)?);

    registry.try_init()?;

    tracing::debug!(
        service = %config.service_name,
        environment = %config.environment,
        "logging ready"
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(
    config: &LoggingConfig,
) -> Result<Option<tracing_loki::Layer>, Box<dyn std::error::Error>> {
    let Some(endpoint) = config.loki_url.as_deref() else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url::Url::parse(endpoint)?)?;
    tokio::spawn(task);

    Ok(Some(layer))
}
