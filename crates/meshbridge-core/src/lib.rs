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

//! # Meshbridge Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! that define the bridge's architecture.
//!
//! The bridge hands the active object of a host 3D environment to an external
//! mesh filter server and re-imports the processed result. This crate holds
//! the contracts both sides agree on: the [`host::HostEnvironment`] surface
//! the bridge consumes, the [`scene`] object model exchanged across it, the
//! [`report`] channel user-facing notifications travel through, and the
//! [`command::CommandRegistry`] the front end dispatches into.

#![warn(missing_docs)]

pub mod command;
pub mod config;
pub mod host;
pub mod math;
pub mod report;
pub mod scene;

pub use command::{CommandContext, CommandRegistry};
pub use config::{OutputAttributes, RunnerConfig};
pub use host::{HostEnvironment, HostError};
pub use report::{Report, Reporter, Severity};
pub use scene::{MeshData, ObjectId, SceneObject, Transform};
