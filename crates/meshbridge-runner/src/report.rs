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

//! A channel-backed report sink.
//!
//! Front ends that want to present reports themselves (rather than let them
//! fall through to the log) install a [`ChannelReporter`] and drain the
//! receiving side after the run.

use crossbeam_channel::{Receiver, Sender};
use meshbridge_core::report::{Report, Reporter};

/// A [`Reporter`] that forwards every report into a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<Report>,
}

impl ChannelReporter {
    /// Creates a reporter and the receiver its reports arrive on.
    #[must_use]
    pub fn new() -> (Self, Receiver<Report>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, report: Report) {
        // A dropped receiver must not take the filter run down with it.
        if let Err(err) = self.sender.send(report) {
            log::warn!("report dropped, receiver is gone: {}", err.0.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshbridge_core::report::Severity;

    #[test]
    fn test_reports_arrive_in_order() {
        let (reporter, receiver) = ChannelReporter::new();
        reporter.report(Report::info("one"));
        reporter.report(Report::error("two"));

        let collected: Vec<Report> = receiver.try_iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].message, "one");
        assert_eq!(collected[1].severity, Severity::Error);
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (reporter, receiver) = ChannelReporter::new();
        drop(receiver);
        reporter.report(Report::info("into the void"));
    }
}
