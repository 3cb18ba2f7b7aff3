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

//! # Meshbridge IO
//!
//! I/O services for the bridge: reading and writing the PLY interchange
//! files exchanged with the filter server, and discovering the filter
//! scripts available for a user to pick from.

#![warn(missing_docs)]

pub mod ply;
pub mod scripts;

pub use ply::{read_ply, write_ply, PlyError};
pub use scripts::find_script_files;
