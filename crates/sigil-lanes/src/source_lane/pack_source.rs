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

use anyhow::{Context, Result};
use async_trait::async_trait;
use sigil_core::vfs::{ChunkIndex, ChunkLocation};
use sigil_core::{Category, ChunkContent, ChunkSource, SpriteError};
use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
    sync::{Arc, Mutex},
};

/// A "Lane" that reads chunks out of a `data.pack` file described by an `index.bin`.
///
/// Reads seek into the shared pack handle on tokio's blocking pool so that the
/// chunks of a category can be requested concurrently without stalling the
/// async runtime.
#[derive(Debug)]
pub struct PackChunkSource {
    index: ChunkIndex,
    pack_file: Arc<Mutex<File>>,
}

impl PackChunkSource {
    /// Creates a source from decoded index bytes and an open pack file.
    pub fn new(index_bytes: &[u8], pack_file: File) -> Result<Self> {
        let index = ChunkIndex::new(index_bytes).context("Failed to decode chunk index")?;
        Ok(Self {
            index,
            pack_file: Arc::new(Mutex::new(pack_file)),
        })
    }

    /// Opens `index.bin` and `data.pack` from disk.
    pub fn open(index_path: &Path, pack_path: &Path) -> Result<Self> {
        let index_bytes = std::fs::read(index_path)
            .with_context(|| format!("Failed to read chunk index '{}'", index_path.display()))?;
        let pack_file = File::open(pack_path)
            .with_context(|| format!("Failed to open pack file '{}'", pack_path.display()))?;
        Self::new(&index_bytes, pack_file)
    }

    /// The decoded chunk index.
    pub fn index(&self) -> &ChunkIndex {
        &self.index
    }
}

fn read_range(pack_file: &Mutex<File>, location: &ChunkLocation) -> io::Result<Vec<u8>> {
    let mut file = pack_file
        .lock()
        .map_err(|_| io::Error::other("pack file lock poisoned"))?;
    let mut buffer = vec![0; location.size as usize];
    file.seek(SeekFrom::Start(location.offset))?;
    file.read_exact(&mut buffer)?;
    Ok(buffer)
}

#[async_trait]
impl ChunkSource for PackChunkSource {
    fn chunk_count(&self, category: &Category) -> Option<usize> {
        self.index.chunk_count(category)
    }

    async fn fetch_chunk(
        &self,
        category: &Category,
        index: usize,
    ) -> Result<ChunkContent, SpriteError> {
        let location = self
            .index
            .locate(category, index)
            .cloned()
            .ok_or_else(|| SpriteError::ChunkNotFound {
                category: category.clone(),
                index,
            })?;
        let fetch_error = |message: String| SpriteError::ChunkFetch {
            category: category.clone(),
            index,
            message,
        };

        let pack_file = Arc::clone(&self.pack_file);
        let bytes = tokio::task::spawn_blocking(move || read_range(&pack_file, &location))
            .await
            .map_err(|e| fetch_error(e.to_string()))?
            .map_err(|e| fetch_error(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| fetch_error(e.to_string()))?;

        Ok(ChunkContent::new(index, text))
    }
}
