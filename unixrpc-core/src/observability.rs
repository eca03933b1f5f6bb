//! Logging and OpenTelemetry setup
//!
//! Every crate in the workspace logs through `tracing`. This module installs
//! the subscriber that turns those events into output, and optionally wires
//! traces and metrics to an OTLP collector.
//!
//! # Layers
//!
//! 1. **OpenTelemetry layer** (traces enabled): exports spans over OTLP/gRPC
//! 2. **EnvFilter**: `RUST_LOG` if set, otherwise the configured level
//! 3. **fmt layer** (logs enabled): timestamped lines on stdout, either
//!    human-readable or JSON
//!
//! Traces and metrics are off by default, so a plain server writes local logs
//! only and never tries to reach a collector.
//!
//! # Usage Pattern
//!
//! ```rust,no_run
//! use unixrpc_core::ObservabilityConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ObservabilityConfig::new("rpc-server")
//!         .with_log_level("debug")
//!         .with_json(true);
//!
//!     unixrpc_core::init_observability(config).expect("Failed to init observability");
//!
//!     // ... run the server ...
//!
//!     unixrpc_core::shutdown_observability();
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint
//! - `RUST_LOG`: Log level filter (e.g., "info", "unixrpc_server=debug")

use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Observability configuration
///
/// # Defaults
///
/// - Service name: "unixrpc"
/// - Service version: current crate version
/// - OTLP endpoint: `$OTEL_EXPORTER_OTLP_ENDPOINT` or "http://localhost:4317"
/// - Traces and metrics disabled, logs enabled, human-readable format
/// - Log level: `$RUST_LOG` or "info"
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to exported spans and metrics
    pub service_name: String,
    /// Service version attached to exported spans and metrics
    pub service_version: String,
    /// gRPC endpoint of the OpenTelemetry collector
    pub otlp_endpoint: String,
    /// Export spans over OTLP
    pub enable_traces: bool,
    /// Export metrics over OTLP
    pub enable_metrics: bool,
    /// Write log lines to stdout
    pub enable_logs: bool,
    /// Emit log lines as JSON objects instead of text
    pub json_logs: bool,
    /// Filter directive used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unixrpc".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: false,
            enable_metrics: false,
            enable_logs: true,
            json_logs: false,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ObservabilityConfig {
    /// Create a configuration with a custom service name and default settings.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the OTLP collector endpoint (e.g., "http://collector:4317").
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the log level filter: "error", "warn", "info", "debug" or "trace".
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the service version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Enable or disable span export.
    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    /// Enable or disable metric export.
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Enable or disable local log output.
    pub fn with_logs(mut self, enable: bool) -> Self {
        self.enable_logs = enable;
        self
    }

    /// Switch local log output between JSON and text.
    pub fn with_json(mut self, enable: bool) -> Self {
        self.json_logs = enable;
        self
    }
}

/// Install the global subscriber and, if enabled, OpenTelemetry providers
///
/// Call once at startup. A second call fails because a global subscriber is
/// already set; the error is returned rather than panicking.
pub fn init_observability(
    config: ObservabilityConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // The tracer is created before the subscriber because the telemetry
    // layer needs it.
    let tracer = if config.enable_traces {
        Some(init_tracer(&config)?)
    } else {
        None
    };

    if config.enable_metrics {
        init_metrics(&config)?;
    }

    init_tracing_subscriber(&config, tracer)?;

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        logs = config.enable_logs,
        "Observability initialized"
    );

    Ok(())
}

fn service_resource(config: &ObservabilityConfig) -> opentelemetry_sdk::Resource {
    opentelemetry_sdk::Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                config.service_name.clone(),
            ),
            KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                config.service_version.clone(),
            ),
        ])
        .build()
}

/// Build the OTLP span pipeline and return a tracer for the telemetry layer.
fn init_tracer(
    config: &ObservabilityConfig,
) -> Result<opentelemetry_sdk::trace::Tracer, Box<dyn std::error::Error + Send + Sync>> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(service_resource(config))
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build();

    let tracer = provider.tracer(config.service_name.clone());
    lock_providers().tracer = Some(provider.clone());
    global::set_tracer_provider(provider);

    Ok(tracer)
}

/// Register a meter provider that exports every 30 seconds.
fn init_metrics(
    config: &ObservabilityConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(Duration::from_secs(30))
        .build();

    let provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(service_resource(config))
        .build();

    store_meter_provider(provider.clone());
    global::set_meter_provider(provider);
    Ok(())
}

/// Handles to the installed SDK providers, kept so shutdown can flush them.
/// The global registry only hands back API-level providers.
struct InstalledProviders {
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
}

static PROVIDERS: Mutex<InstalledProviders> = Mutex::new(InstalledProviders {
    tracer: None,
    meter: None,
});

fn lock_providers() -> std::sync::MutexGuard<'static, InstalledProviders> {
    PROVIDERS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store_meter_provider(provider: SdkMeterProvider) {
    lock_providers().meter = Some(provider);
}

fn init_tracing_subscriber(
    config: &ObservabilityConfig,
    tracer: Option<opentelemetry_sdk::trace::Tracer>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let telemetry_layer = tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t));

    let json_layer = (config.enable_logs && config.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .json()
    });
    let text_layer = (config.enable_logs && !config.json_logs)
        .then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    Ok(())
}

/// Flush and shut down the trace and metric providers before exit
///
/// Pending span batches and the last metric interval are exported before
/// this returns. Safe to call more than once; later calls do nothing.
pub fn shutdown_observability() {
    tracing::info!("Shutting down observability");

    let (tracer, meter) = {
        let mut providers = lock_providers();
        (providers.tracer.take(), providers.meter.take())
    };

    if let Some(provider) = tracer {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "Failed to shut down tracer provider");
        }
    }
    if let Some(provider) = meter {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "Failed to shut down meter provider");
        }
    }
}
