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

//! # Meshbridge Host
//!
//! Concrete implementations of the
//! [`HostEnvironment`](meshbridge_core::HostEnvironment) contract. The one
//! host that lives here, [`HeadlessHost`], keeps its scene in memory and
//! speaks PLY through `meshbridge-io`; it backs the command-line front end
//! and the integration tests, standing in for a full 3D content-creation
//! application.

#![warn(missing_docs)]

pub mod headless;

pub use headless::HeadlessHost;
