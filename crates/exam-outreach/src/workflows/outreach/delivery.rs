use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One simulated message delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryAttempt {
    pub phone: String,
    pub exams: String,
    pub attempted_at: DateTime<Local>,
}

impl DeliveryAttempt {
    pub fn new(phone: impl Into<String>, exams: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            exams: exams.into(),
            attempted_at: Local::now(),
        }
    }

    pub fn log_line(&self) -> String {
        format!(
            "{} - Mensagem enviada para {} - Exame: {}",
            self.attempted_at.format(TIMESTAMP_FORMAT),
            self.phone,
            self.exams
        )
    }
}

/// Append-only sink for delivery attempts.
pub trait DeliveryLog: Send + Sync {
    fn record(&self, attempt: &DeliveryAttempt) -> Result<(), DeliveryLogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryLogError {
    #[error("unable to write delivery log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("delivery log unavailable: {0}")]
    Unavailable(String),
}

/// Appends one line per attempt to a log file, creating it when absent.
#[derive(Debug)]
pub struct FileDeliveryLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileDeliveryLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DeliveryLogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| DeliveryLogError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeliveryLog for FileDeliveryLog {
    fn record(&self, attempt: &DeliveryAttempt) -> Result<(), DeliveryLogError> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| DeliveryLogError::Unavailable("log file mutex poisoned".to_string()))?;
        writeln!(file, "{}", attempt.log_line()).map_err(|source| DeliveryLogError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps attempts in memory; used for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryDeliveryLog {
    attempts: Mutex<Vec<DeliveryAttempt>>,
}

impl MemoryDeliveryLog {
    pub fn attempts(&self) -> Vec<DeliveryAttempt> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DeliveryLog for MemoryDeliveryLog {
    fn record(&self, attempt: &DeliveryAttempt) -> Result<(), DeliveryLogError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|_| DeliveryLogError::Unavailable("memory log mutex poisoned".to_string()))?;
        guard.push(attempt.clone());
        Ok(())
    }
}
