// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User-facing notifications.
//!
//! Hosts surface messages to the user through their own non-fatal
//! notification channel (a status bar, an info popup). The bridge emits
//! [`Report`]s into a [`Reporter`] and leaves presentation to whoever
//! installed it. A failed filter run is reported, never panicked on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a report should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Progress or completion notice.
    Info,
    /// A failure the user must act on. Never fatal to the host.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Presentation severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Report {
    /// Creates an informational report.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Creates an error report.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// A sink for user-facing reports.
pub trait Reporter: Send + Sync {
    /// Delivers one report. Must not panic; delivery failures are the
    /// reporter's problem, not the caller's.
    fn report(&self, report: Report);
}

/// A [`Reporter`] that forwards reports to the `log` facade.
///
/// The default reporter when no host notification channel is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, report: Report) {
        match report.severity {
            Severity::Info => log::info!("{}", report.message),
            Severity::Error => log::error!("{}", report.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        assert_eq!(Report::info("ok").severity, Severity::Info);
        assert_eq!(Report::error("bad").severity, Severity::Error);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }
}
