//! Console and log-file diagnostics
//!
//! The console follows the verbosity flags. Each run's log file records
//! INFO and above as plain text.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::field::RecordFields;
use tracing_subscriber::fmt::format::{DefaultFields, FormatFields, Writer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Filter directives for the run's log file
pub const FILE_DIRECTIVES: &str = "journal_harvest=info,warn";

/// Boxed layer over any registry-backed subscriber
pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Field formatter for the log file
///
/// `fmt` layers cache formatted span fields per formatter type. A type of
/// its own keeps the file from reusing the console's coloured fields.
#[derive(Debug)]
pub struct PlainFields(DefaultFields);

impl PlainFields {
    pub fn new() -> Self {
        Self(DefaultFields::new())
    }
}

impl Default for PlainFields {
    fn default() -> Self {
        Self::new()
    }
}

impl<'writer> FormatFields<'writer> for PlainFields {
    fn format_fields<R: RecordFields>(
        &self,
        writer: Writer<'writer>,
        fields: R,
    ) -> std::fmt::Result {
        self.0.format_fields(writer, fields)
    }
}

/// Console filter for the given verbosity flags
pub fn console_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        return EnvFilter::new("error");
    }
    match verbose {
        0 => EnvFilter::new("journal_harvest=info,warn"),
        1 => EnvFilter::new("journal_harvest=debug,info"),
        2 => EnvFilter::new("journal_harvest=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Layer printing to stderr
pub fn console_layer<S>(verbose: u8, quiet: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
{
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter(verbose, quiet))
        .boxed()
}

/// Layer appending plain text to an open log file
pub fn file_layer<S>(file: File) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .fmt_fields(PlainFields::new())
        .with_writer(Mutex::new(file))
        .with_filter(EnvFilter::new(FILE_DIRECTIVES))
        .boxed()
}

/// Console-only subscriber, used until the run directory exists
pub fn console_subscriber(verbose: u8, quiet: bool) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(console_layer(verbose, quiet))
}

/// Installs the global subscriber: console plus the run's log file
pub fn init(verbose: u8, quiet: bool, log_path: &Path) -> std::io::Result<()> {
    let log_file = File::create(log_path)?;

    tracing_subscriber::registry()
        .with(console_layer(verbose, quiet))
        .with(file_layer(log_file))
        .init();

    Ok(())
}
