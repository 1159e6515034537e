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

//! # Sigil Core
//!
//! Foundational crate containing the traits, core types, and interface contracts
//! of the sprite subsystem. It knows what a category, a chunk and a combined
//! sprite are, but nothing about how chunks are fetched or where symbols end up.

#![warn(missing_docs)]

pub mod asset;
pub mod category;
pub mod error;
pub mod manifest;
pub mod source;
pub mod state;
pub mod surface;
pub mod telemetry;
pub mod vfs;

pub use asset::{AssetHandle, CombinedAsset, SpriteHandle, Symbol};
pub use category::Category;
pub use error::SpriteError;
pub use manifest::{CategoryEntry, ManifestError, SpriteManifest};
pub use source::{ChunkContent, ChunkSource};
pub use state::{LoadingState, LoadingStatus};
pub use surface::SymbolSurface;
