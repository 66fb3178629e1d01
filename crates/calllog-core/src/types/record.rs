//! Log records produced around an intercepted call

use std::error::Error;

/// Level a record is written at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a failure raised by a wrapped call is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criticality {
    /// Expected failure, logged at warning level
    NonCritical,
    /// Logged at error level
    Critical,
}

impl Criticality {
    /// Severity a failure record of this criticality is written at
    pub fn severity(&self) -> Severity {
        match self {
            Criticality::NonCritical => Severity::Warn,
            Criticality::Critical => Severity::Error,
        }
    }
}

/// A rendered record, handed to a logger and then dropped
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub severity: Severity,
    pub message: &'a str,
    pub error: Option<&'a (dyn Error + 'static)>,
}

impl<'a> LogRecord<'a> {
    pub fn info(message: &'a str) -> Self {
        Self {
            severity: Severity::Info,
            message,
            error: None,
        }
    }

    pub fn failure(
        severity: Severity,
        message: &'a str,
        error: &'a (dyn Error + 'static),
    ) -> Self {
        Self {
            severity,
            message,
            error: Some(error),
        }
    }
}
