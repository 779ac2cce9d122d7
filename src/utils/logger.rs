use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Log output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text format with timestamp, level, target, and message
    #[default]
    Text,
    /// JSON format with structured fields: timestamp, level, target, message
    Json,
}

impl LogFormat {
    /// Parses `text` or `json`, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use billing::utils::logger::LogFormat;
    ///
    /// assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
    /// assert_eq!(LogFormat::parse("xml"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            _ => None,
        }
    }
}

/// Initializes the tracing subscriber with console output and an env filter.
///
/// Sets up the tracing infrastructure with:
/// - `fmt::layer()` in text or JSON form, depending on `format`
/// - an `EnvFilter` built from `filter` (for example `info` or `billing=debug`)
/// - the `LogTracer` bridge so the library's `log` macros reach the subscriber
///
/// Safe to call more than once: when a global subscriber is already set the
/// call returns `Ok(())` without replacing it.
///
/// # Examples
///
/// ```
/// use billing::utils::logger::{init_logging, LogFormat};
///
/// let _ = init_logging(LogFormat::Text, "info");
/// ```
pub fn init_logging(format: LogFormat, filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries the validation result
    match format {
        LogFormat::Text => install(
            tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            ),
        ),
        LogFormat::Json => install(
            tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            ),
        ),
    }

    Ok(())
}

fn install<S>(subscriber: S)
where
    S: Subscriber + Send + Sync + 'static,
{
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Tracing subscriber already initialized, keeping the existing one");
        return;
    }

    // Bridge `log` records into tracing (a second bridge is a no-op)
    let _ = LogTracer::init();
}
