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

//! Provides the foundational types for combined sprite assets.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker for all types that can be shared through an [`AssetHandle`].
//! - [`CombinedAsset`]: the immutable, per-category union of all chunk symbols.
//! - [`Symbol`]: one individually addressable icon definition.

mod handle;
mod sprite;

pub use handle::*;
pub use sprite::*;

/// A marker trait for types that can be managed by the sprite cache.
///
/// The supertraits let an asset be produced on a background task and shared
/// with every caller that awaited it:
/// - `Send` + `Sync`: the asset can be sent between and shared across threads.
/// - `'static`: the asset owns all of its data.
pub trait Asset: Send + Sync + 'static {}
