//! Tracing setup for flutter-setup.
//!
//! Diagnostics go to stderr (or a log file) so they never interleave with the
//! installer's own stdout output. Configured through the environment:
//!
//! - `RUST_LOG` - full `EnvFilter` directive, wins over `LOG_LEVEL`
//! - `LOG_LEVEL` - global level, default `warn`
//! - `LOG_OUTPUT` - `console`, `file`, `both` or `none`
//! - `LOG_FORMAT` - `human` or `json`
//! - `LOG_FILE_PATH` - log file, default `<tmp>/flutter-setup.log`

use std::{
    env,
    ffi::OsString,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, prelude::*, registry, EnvFilter};

// --- Custom "Tee" Writer ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B, W1, W2> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a, Writer = W1>,
    B: MakeWriter<'a, Writer = W2>,
    W1: Write + 'a,
    W2: Write + 'a,
{
    type Writer = Tee<W1, W2>;
    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub output: LogOutput,
    pub format: LogFormat,
    pub file_path: PathBuf,
}

impl LogSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.to_string_lossy().trim().to_lowercase());

        let output = match get("LOG_OUTPUT").as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            Some("none") | Some("off") => LogOutput::None,
            _ => LogOutput::Console,
        };
        let format = match get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };
        let file_path = lookup("LOG_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("flutter-setup.log"));

        Self {
            level: get("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
            output,
            format,
            file_path,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Initializes the global tracing subscriber based on environment variables.
///
/// The returned guard must be kept alive for the rest of `main` when logging
/// to a file, otherwise buffered lines are lost on exit.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(&LogSettings::from_env())
}

pub fn init_with(settings: &LogSettings) -> Option<WorkerGuard> {
    let subscriber = registry().with(settings.env_filter());
    let is_json = settings.format == LogFormat::Json;

    let log_path = settings.file_path.as_path();
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let log_filename = log_path
        .file_name()
        .unwrap_or("flutter-setup.log".as_ref());

    let mut guard: Option<WorkerGuard> = None;

    // A second init (e.g. from tests) keeps the first subscriber.
    let result = match settings.output {
        LogOutput::Both => {
            let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(_guard);

            let tee_writer = MakeTee {
                make_a: io::stderr,
                make_b: non_blocking,
            };
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(tee_writer);
            if is_json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::Console => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            if is_json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer.compact()).try_init()
            }
        }
        LogOutput::File => {
            let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(_guard);

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            if is_json {
                subscriber.with(fmt_layer.json()).try_init()
            } else {
                subscriber.with(fmt_layer).try_init()
            }
        }
        LogOutput::None => subscriber.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Warning: tracing already initialized: {e}");
    }

    guard
}
