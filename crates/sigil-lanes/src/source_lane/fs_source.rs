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

use async_trait::async_trait;
use sigil_core::{Category, ChunkContent, ChunkSource, SpriteError, SpriteManifest};
use std::path::{Path, PathBuf};

/// A "Lane" that reads chunk files from a directory tree laid out by the manifest.
///
/// Chunk `i` of category `c` is read from `root/<chunk_pattern>` with `{category}`
/// and `{index}` substituted.
#[derive(Debug, Clone)]
pub struct FsChunkSource {
    root: PathBuf,
    manifest: SpriteManifest,
}

impl FsChunkSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, manifest: SpriteManifest) -> Self {
        Self {
            root: root.into(),
            manifest,
        }
    }

    /// The directory chunk paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The manifest describing the chunk layout.
    pub fn manifest(&self) -> &SpriteManifest {
        &self.manifest
    }
}

#[async_trait]
impl ChunkSource for FsChunkSource {
    fn chunk_count(&self, category: &Category) -> Option<usize> {
        self.manifest.chunk_count(category)
    }

    async fn fetch_chunk(
        &self,
        category: &Category,
        index: usize,
    ) -> Result<ChunkContent, SpriteError> {
        let path = self.root.join(self.manifest.chunk_path(category, index)?);
        log::debug!(
            "Reading chunk {index} of '{category}' from '{}'",
            path.display()
        );

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SpriteError::ChunkFetch {
                category: category.clone(),
                index,
                message: format!("{}: {e}", path.display()),
            })?;
        Ok(ChunkContent::new(index, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_chunks_by_pattern() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("status")).unwrap();
        std::fs::write(dir.path().join("status/status-2.svg"), "<svg/>").unwrap();

        let manifest = SpriteManifest::default().with_category("status", 2);
        let source = FsChunkSource::new(dir.path(), manifest);

        let chunk = source.fetch_chunk(&"status".into(), 2).await.unwrap();
        assert_eq!(chunk, ChunkContent::new(2, "<svg/>"));
        assert_eq!(source.chunk_count(&"status".into()), Some(2));
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_error() {
        let dir = tempdir().unwrap();
        let manifest = SpriteManifest::default().with_category("status", 2);
        let source = FsChunkSource::new(dir.path(), manifest);

        let err = source.fetch_chunk(&"status".into(), 1).await.unwrap_err();
        assert!(matches!(err, SpriteError::ChunkFetch { index: 1, .. }));
    }

    #[tokio::test]
    async fn unconfigured_chunks_are_not_found() {
        let dir = tempdir().unwrap();
        let manifest = SpriteManifest::default().with_category("status", 2);
        let source = FsChunkSource::new(dir.path(), manifest);

        assert!(matches!(
            source.fetch_chunk(&"status".into(), 3).await,
            Err(SpriteError::ChunkNotFound { index: 3, .. })
        ));
        assert!(matches!(
            source.fetch_chunk(&"magic".into(), 1).await,
            Err(SpriteError::ChunkNotFound { .. })
        ));
    }
}
