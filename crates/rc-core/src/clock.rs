//! Clock side task
//!
//! Asking the navigator for the time starts one worker thread. The worker
//! takes the keeper's lock, writes the local time into the side file and
//! exits. The caller joins the worker and then reads the file back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

/// Layout of the side file: `01:05pm, Monday, October 19, 2026`
pub const TIME_FORMAT: &str = "%I:%M%P, %A, %B %e, %Y";

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("time file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("clock worker panicked")]
    WorkerPanicked,
}

/// Format a timestamp the way the side file stores it
pub fn format_time(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Owns the side file and the lock serializing writes to it
#[derive(Debug)]
pub struct TimeKeeper {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TimeKeeper {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the worker that stamps the current time into the side file and
    /// wait for it to finish.
    pub fn record(&self) -> Result<(), ClockError> {
        thread::scope(|scope| {
            scope
                .spawn(|| self.write_now())
                .join()
                .map_err(|_| ClockError::WorkerPanicked)?
        })
    }

    /// Current contents of the side file, without the trailing newline
    pub fn read(&self) -> Result<String, ClockError> {
        let text = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        Ok(text.trim_end().to_string())
    }

    /// Record the time, then read it back
    pub fn tell_time(&self) -> Result<String, ClockError> {
        self.record()?;
        self.read()
    }

    fn write_now(&self) -> Result<(), ClockError> {
        // The mutex guards no data, so a poisoned lock is still usable.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let stamp = format_time(&Local::now().naive_local());
        fs::write(&self.path, format!("{stamp}\n")).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), %stamp, "wrote time");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> ClockError {
        ClockError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
