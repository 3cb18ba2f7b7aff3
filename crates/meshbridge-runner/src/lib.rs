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

//! # Meshbridge Runner
//!
//! The orchestration crate: one filter run is one synchronous
//! export → external-process → import cycle, driven entirely through the
//! [`HostEnvironment`](meshbridge_core::HostEnvironment) contract.
//!
//! There is no state machine here. A run is a linear sequence with two
//! failure exits (server missing, filter failed) and one success exit, all
//! of them passing through the same scope-guaranteed temp-directory
//! cleanup. Nothing is retried and nothing runs in the background: this is
//! a rare, user-triggered action, and blocking the caller until the server
//! exits is the intended behavior.

#![warn(missing_docs)]

pub mod commands;
pub mod report;
pub mod run;
pub mod server;

pub use report::ChannelReporter;
pub use run::{FilterRunError, FilterRunner, NEW_OBJECT_SUFFIX};
pub use server::locate_filter_server;
