use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt, MakeWriter},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

const MAX_LOG_FILES: usize = 5;

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub prefix: &'static str,
    /// Application directory. Log files go into its `logs` subdirectory. Without it only stdout is
    /// used.
    pub application_data_path: Option<PathBuf>,
    /// Falls back to `RUST_LOG` and then to `info`.
    pub level: Option<LevelFilter>,
    pub show_std: bool,
}

pub fn enable_logging(settings: LogSettings) -> Result<()> {
    let LogSettings {
        prefix,
        application_data_path,
        level,
        show_std,
    } = settings;

    let level = level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    let filter = EnvFilter::new(format!(
        "{}={level}",
        env!("CARGO_PKG_NAME").replace("-", "_"),
    ));

    let stdout = std::io::stdout.with_filter(move |_| show_std);

    match application_data_path {
        Some(path) => install(filter, stdout.and(daily_appender(prefix, &path)?)),
        None => install(filter, stdout),
    }
    Ok(())
}

fn daily_appender(
    prefix: &str,
    application_data_path: &Path,
) -> Result<tracing_appender::rolling::RollingFileAppender> {
    Ok(tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .build(application_data_path.join("logs"))?)
}

fn install<W>(filter: EnvFilter, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .pretty()
        .init();
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
