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

//! The chunk retrieval contract.

use crate::category::Category;
use crate::error::SpriteError;
use async_trait::async_trait;

/// Raw textual content of one chunk.
///
/// Owned by a single load operation and discarded once the chunks of a
/// category have been combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkContent {
    /// 1-based position of the chunk within its category.
    pub index: usize,
    /// The chunk document, usually an SVG file with `<symbol>` children.
    pub text: String,
}

impl ChunkContent {
    /// Creates a chunk from its index and text.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// A source of raw sprite chunks.
///
/// Implementations perform a fresh retrieval on every call; caching is the
/// responsibility of the coordinator above. The concrete sources (filesystem,
/// packed archive) live in `sigil-lanes`.
#[async_trait]
pub trait ChunkSource: Send + Sync {
    /// How many chunks exist for `category`, or `None` if it is not configured.
    fn chunk_count(&self, category: &Category) -> Option<usize>;

    /// Fetches chunk `index` (1-based) of `category`.
    ///
    /// # Errors
    /// - [`SpriteError::ChunkNotFound`] if the category or index is not configured.
    /// - [`SpriteError::ChunkFetch`] if the underlying retrieval fails.
    async fn fetch_chunk(
        &self,
        category: &Category,
        index: usize,
    ) -> Result<ChunkContent, SpriteError>;
}
