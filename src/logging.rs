use fern::{Dispatch, FormatCallback};
use log::{Level, LevelFilter, Log, Record};
use std::fmt::Arguments;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A log sink owned by whoever constructs it.
///
/// The fern dispatch is never installed as the process-wide logger, so building several clients
/// in one process never duplicates output.
#[derive(Clone)]
pub struct Logger {
    level: LevelFilter,
    sink: Arc<dyn Log>,
}

impl Logger {
    /// Log INFO and above to stdout and to `log_file`, which is opened in append mode.
    pub fn to_stdout_and_file(log_file: &Path) -> io::Result<Self> {
        let (level, sink) = Dispatch::new()
            .format(move |out, message, record| formatter(out, message, record))
            .level(LevelFilter::Info)
            .chain(io::stdout())
            .chain(fern::log_file(log_file)?)
            .into_log();

        Ok(Logger {
            level,
            sink: Arc::from(sink),
        })
    }

    /// A logger that drops everything.
    pub fn discard() -> Self {
        Logger {
            level: LevelFilter::Off,
            sink: Arc::from(Dispatch::new().into_log().1),
        }
    }

    pub fn info(&self, message: Arguments<'_>) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: Arguments<'_>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: Arguments<'_>) {
        self.log(Level::Error, message);
    }

    fn log(&self, level: Level, message: Arguments<'_>) {
        if level > self.level {
            return;
        }
        self.sink.log(
            &Record::builder()
                .level(level)
                .target(module_path!())
                .args(message)
                .build(),
        );
    }
}

fn formatter(out: FormatCallback<'_>, message: &Arguments<'_>, record: &Record<'_>) {
    out.finish(format_args!(
        "{date} - {level} - {message}",
        date = jiff::Zoned::now().strftime("%Y-%m-%d %H:%M:%S"),
        level = record.level(),
        message = message,
    ))
}
