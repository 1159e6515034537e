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

//! The public-facing SDK of the sprite subsystem.
//!
//! A [`SpriteService`] is built once per process from a [`SpriteConfig`] and
//! shared by every renderer that needs icons. It hides where chunks come from,
//! how they are combined and when the hidden container is written.

#![warn(missing_docs)]

mod config;
mod service;

pub use config::{SourceConfig, SpriteConfig};
pub use service::{symbol_href, SpriteService};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::{SourceConfig, SpriteConfig, SpriteService};
    pub use sigil_core::{Category, CombinedAsset, LoadingStatus, SpriteError, SpriteHandle, Symbol};
}
