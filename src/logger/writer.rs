//! Log file opening for the file output layer

use std::fs::{File, OpenOptions};
use std::sync::Arc;

use crate::logger::{FileConfig, LoggerError};

/// Opens the configured log file, creating its directory first.
///
/// The returned handle is shared by the fmt layer; `&File` is `Write`, so
/// no extra locking is needed around it.
pub fn open_log_file(config: &FileConfig) -> Result<Arc<File>, LoggerError> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(Arc::new(options.open(&config.path)?))
}
