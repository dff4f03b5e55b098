//! Diagnostic sink for the loader.
//!
//! Diagnostics always go to `tracing`. A logger can additionally capture them
//! in memory, which lets callers inspect what a load reported.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU8, Ordering},
};
use tracing::Level;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl Severity {
    fn from_u8(val: u8) -> Self {
        match val {
            0 => Severity::Debug,
            1 => Severity::Info,
            2 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Debug => write!(f, "debug"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Convert a severity to its tracing level.
pub fn severity_to_tracing(severity: Severity) -> Level {
    match severity {
        Severity::Debug => Level::DEBUG,
        Severity::Info => Level::INFO,
        Severity::Warning => Level::WARN,
        Severity::Error => Level::ERROR,
    }
}

/// Atomic minimum-severity filter shared between logger clones.
pub struct LogLevelFilter(AtomicU8);

impl LogLevelFilter {
    /// Create a new filter with the given minimum severity.
    pub fn new(severity: Severity) -> Self {
        Self(AtomicU8::new(severity as u8))
    }

    /// Get the current minimum severity.
    pub fn get(&self) -> Severity {
        Severity::from_u8(self.0.load(Ordering::Relaxed))
    }

    /// Set the minimum severity.
    pub fn set(&self, severity: Severity) {
        self.0.store(severity as u8, Ordering::Relaxed);
    }

    /// Check if a diagnostic at the given severity should be reported.
    pub fn should_log(&self, severity: Severity) -> bool {
        severity as u8 >= self.0.load(Ordering::Relaxed)
    }
}

impl Default for LogLevelFilter {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}

/// A captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Diagnostic logger used by the resolver.
///
/// Outputs to:
/// 1. tracing - always
/// 2. an in-memory buffer - if capture is enabled
#[derive(Clone, Default)]
pub struct Logger {
    captured: Option<Arc<Mutex<Vec<Diagnostic>>>>,
    level_filter: Arc<LogLevelFilter>,
    name: Option<String>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("capturing", &self.captured.is_some())
            .field("level", &self.level_filter.get())
            .field("name", &self.name)
            .finish()
    }
}

impl Logger {
    /// Create a logger that only writes to tracing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record every reported diagnostic in memory.
    pub fn with_capture(mut self) -> Self {
        self.captured = Some(Arc::new(Mutex::new(Vec::new())));
        self
    }

    /// Set the level filter.
    pub fn with_level_filter(mut self, filter: Arc<LogLevelFilter>) -> Self {
        self.level_filter = filter;
        self
    }

    /// Set the logger name, attached to every tracing event.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Report a diagnostic to all configured outputs.
    pub fn log(&self, severity: Severity, message: &str) {
        if !self.level_filter.should_log(severity) {
            return;
        }

        let name = self.name.as_deref().unwrap_or("spig");
        match severity_to_tracing(severity) {
            Level::ERROR => tracing::error!(logger = %name, "{}", message),
            Level::WARN => tracing::warn!(logger = %name, "{}", message),
            Level::INFO => tracing::info!(logger = %name, "{}", message),
            _ => tracing::debug!(logger = %name, "{}", message),
        }

        if let Some(ref captured) = self.captured
            && let Ok(mut entries) = captured.lock()
        {
            entries.push(Diagnostic {
                severity,
                message: message.to_string(),
            });
        }
    }

    pub fn debug(&self, msg: &str) {
        self.log(Severity::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.log(Severity::Info, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.log(Severity::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.log(Severity::Error, msg);
    }

    /// Diagnostics captured so far (empty when capture is disabled).
    pub fn captured(&self) -> Vec<Diagnostic> {
        self.captured
            .as_ref()
            .and_then(|captured| captured.lock().ok().map(|entries| entries.clone()))
            .unwrap_or_default()
    }

    /// Captured diagnostics of exactly the given severity.
    pub fn captured_at(&self, severity: Severity) -> Vec<Diagnostic> {
        self.captured()
            .into_iter()
            .filter(|d| d.severity == severity)
            .collect()
    }
}
