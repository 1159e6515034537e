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

//! Chunk index for packed sprite archives.
//!
//! The [`ChunkIndex`] is the runtime form of `index.bin`, written by
//! `cargo xtask sprites pack` next to `data.pack`. It maps every
//! `(category, chunk index)` pair to a byte range inside the pack, and answers
//! chunk-count queries without touching the pack itself.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where one chunk lives inside `data.pack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLocation {
    /// The category the chunk belongs to.
    pub category: Category,
    /// 1-based chunk index.
    pub index: usize,
    /// Byte offset of the chunk in the pack.
    pub offset: u64,
    /// Length of the chunk in bytes.
    pub size: u64,
}

/// In-memory lookup table over a pack's chunk locations.
#[derive(Debug, Default)]
pub struct ChunkIndex {
    locations: HashMap<(Category, usize), ChunkLocation>,
    counts: HashMap<Category, usize>,
}

impl ChunkIndex {
    /// Decodes an index from the bincode bytes of `index.bin`.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the bytes are not a bincode-encoded list of
    /// [`ChunkLocation`].
    pub fn new(index_bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let config = bincode::config::standard();
        let (locations, _): (Vec<ChunkLocation>, _) =
            bincode::serde::decode_from_slice(index_bytes, config)?;
        log::debug!("Decoded chunk index with {} entries", locations.len());
        Ok(Self::from_locations(locations))
    }

    /// Builds an index from a list of locations.
    ///
    /// A category's chunk count is the highest index seen for it.
    pub fn from_locations(locations: impl IntoIterator<Item = ChunkLocation>) -> Self {
        let mut index = Self::default();
        for location in locations {
            let count = index.counts.entry(location.category.clone()).or_insert(0);
            *count = (*count).max(location.index);
            index
                .locations
                .insert((location.category.clone(), location.index), location);
        }
        index
    }

    /// Encodes a list of locations into `index.bin` bytes.
    pub fn encode(locations: &[ChunkLocation]) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(locations, bincode::config::standard())
    }

    /// Looks up the byte range of a chunk.
    pub fn locate(&self, category: &Category, index: usize) -> Option<&ChunkLocation> {
        self.locations.get(&(category.clone(), index))
    }

    /// Number of chunks packed for `category`.
    pub fn chunk_count(&self, category: &Category) -> Option<usize> {
        self.counts.get(category).copied()
    }

    /// Total number of packed chunks across categories.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(category: &str, index: usize, offset: u64, size: u64) -> ChunkLocation {
        ChunkLocation {
            category: Category::new(category),
            index,
            offset,
            size,
        }
    }

    #[test]
    fn decodes_encoded_index() {
        let locations = vec![
            location("status", 1, 0, 120),
            location("status", 2, 120, 80),
            location("magic", 1, 200, 64),
        ];
        let bytes = ChunkIndex::encode(&locations).unwrap();
        let index = ChunkIndex::new(&bytes).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.chunk_count(&"status".into()), Some(2));
        assert_eq!(index.chunk_count(&"magic".into()), Some(1));
        assert_eq!(index.locate(&"status".into(), 2).unwrap().offset, 120);
        assert!(index.locate(&"status".into(), 3).is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(ChunkIndex::new(&[0xff, 0xff, 0xff]).is_err());
    }
}
