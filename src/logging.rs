use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Initialise logging. With `debug` the level defaults to `debug` and
/// `RUST_LOG` may override it; otherwise it is fixed at `info`.
///
/// Output goes to `log_file` when given, else to stderr so stdout stays free
/// for frame output. Calling this more than once keeps the first subscriber.
pub fn init(debug: bool, log_file: Option<&Path>) {
    // Without debug logging the level is forced to `info` regardless of
    // `RUST_LOG`.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let appender = log_file.map(file_appender);
    let result = match appender {
        Some(Ok(appender)) => builder.with_ansi(false).with_writer(appender).try_init(),
        Some(Err(err)) => {
            let result = builder.with_writer(std::io::stderr).try_init();
            tracing::warn!(%err, "log file unavailable, logging to stderr");
            result
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(err) = result {
        tracing::debug!(%err, "logging already initialised");
    }
}

fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path has no file name: {}", path.display()))?;
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(anyhow::Error::from)
}
