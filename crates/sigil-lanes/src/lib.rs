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

//! Hot-path execution pipelines of the sprite subsystem.
//!
//! - [`sprite_lane`]: turns raw chunk documents into a [`CombinedAsset`](sigil_core::CombinedAsset)
//!   and splits master sprites into chunks at build time.
//! - [`source_lane`]: concrete [`ChunkSource`](sigil_core::ChunkSource) implementations.

#![warn(missing_docs)]

pub mod source_lane;
pub mod sprite_lane;

pub use source_lane::{FsChunkSource, PackChunkSource};
pub use sprite_lane::{ChunkCombiner, SplitError, SpriteSplitter};
