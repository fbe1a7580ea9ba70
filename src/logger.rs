use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

// The terminal belongs to the UI, so log records go to a file.
lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

struct FileLogger;

static LOGGER: FileLogger = FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
        {
            let _ = writeln!(file, "{}", format_record(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
        {
            let _ = file.flush();
        }
    }
}

fn format_record(record: &Record) -> String {
    format!(
        "[{}] {:<5} {}: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Opens `path` in append mode and installs the file logger. Calling it
/// again only swaps the file.
pub fn init(path: &str, level: LevelFilter) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }
    // Already installed on repeat calls.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    Ok(())
}
