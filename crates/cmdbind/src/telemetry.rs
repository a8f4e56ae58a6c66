//! Tracing setup for binaries built on cmdbind.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::Settings;

/// Keeps the non-blocking log writer alive; pending lines are flushed on drop.
#[derive(Debug)]
#[must_use = "dropping the guard stops file logging"]
pub struct TelemetryGuard {
    _worker: Option<WorkerGuard>,
}

struct LogSink {
    writer: BoxMakeWriter,
    worker: Option<WorkerGuard>,
    ansi: bool,
}

impl LogSink {
    fn stderr(settings: &Settings) -> Self {
        Self {
            writer: BoxMakeWriter::new(std::io::stderr),
            worker: None,
            ansi: !settings.no_color && std::io::stderr().is_terminal(),
        }
    }

    fn file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let (writer, worker) = tracing_appender::non_blocking(file);
        Ok(Self {
            writer: BoxMakeWriter::new(writer),
            worker: Some(worker),
            ansi: false,
        })
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the settings' default
/// level. A second call is a no-op.
pub fn init_tracing(settings: &Settings) -> TelemetryGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_level()));

    let sink = match settings.log_file.as_deref() {
        None => LogSink::stderr(settings),
        Some(path) => LogSink::file(path).unwrap_or_else(|err| {
            eprintln!("Warning: cannot open log file {}: {}", path.display(), err);
            LogSink::stderr(settings)
        }),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(sink.ansi)
        .with_writer(sink.writer)
        .try_init()
        .is_ok();

    TelemetryGuard {
        _worker: sink.worker.filter(|_| installed),
    }
}
