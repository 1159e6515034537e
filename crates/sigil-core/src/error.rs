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

//! Error taxonomy of the sprite loading pipeline.

use crate::category::Category;
use thiserror::Error;

/// An error raised while fetching or assembling a category's sprite.
///
/// Errors are `Clone` because a single failed load is reported to every
/// caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    /// The category is not configured, or the chunk index is out of range.
    #[error("no chunk {index} configured for category '{category}'")]
    ChunkNotFound {
        /// The requested category.
        category: Category,
        /// The requested 1-based chunk index.
        index: usize,
    },
    /// Retrieving a chunk's raw content failed.
    #[error("failed to fetch chunk {index} of '{category}': {message}")]
    ChunkFetch {
        /// The category being loaded.
        category: Category,
        /// The 1-based index of the chunk that failed.
        index: usize,
        /// The underlying I/O or decoding error.
        message: String,
    },
    /// A chunk could not be parsed as a sprite document.
    #[error("chunk {index} of '{category}' is not a valid sprite document: {message}")]
    Combine {
        /// The category being combined.
        category: Category,
        /// The 1-based index of the offending chunk.
        index: usize,
        /// The parser's error message.
        message: String,
    },
    /// The background load task ended without producing a result.
    #[error("loading '{category}' was interrupted: {message}")]
    Interrupted {
        /// The category being loaded.
        category: Category,
        /// Why the task ended.
        message: String,
    },
}

impl SpriteError {
    /// The category this error belongs to.
    pub fn category(&self) -> &Category {
        match self {
            SpriteError::ChunkNotFound { category, .. }
            | SpriteError::ChunkFetch { category, .. }
            | SpriteError::Combine { category, .. }
            | SpriteError::Interrupted { category, .. } => category,
        }
    }

    /// The 1-based chunk index involved, if the error is chunk-level.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            SpriteError::ChunkNotFound { index, .. }
            | SpriteError::ChunkFetch { index, .. }
            | SpriteError::Combine { index, .. } => Some(*index),
            SpriteError::Interrupted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_fetch_display() {
        let err = SpriteError::ChunkFetch {
            category: Category::new("magic"),
            index: 3,
            message: "connection reset".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "failed to fetch chunk 3 of 'magic': connection reset"
        );
        assert_eq!(err.chunk_index(), Some(3));
        assert_eq!(err.category().as_str(), "magic");
    }

    #[test]
    fn interrupted_has_no_chunk_index() {
        let err = SpriteError::Interrupted {
            category: Category::new("status"),
            message: "task panicked".to_string(),
        };
        assert_eq!(err.chunk_index(), None);
        assert!(format!("{err}").contains("status"));
    }
}
