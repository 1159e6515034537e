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

//! The build-time sprite manifest (`Sprites.toml`).
//!
//! The manifest is the single source of truth for which categories exist, how
//! many chunks each one was split into, and where chunk `i` of a category lives
//! relative to the sprite root. It is produced by `cargo xtask sprites split`
//! and consumed by every [`ChunkSource`](crate::ChunkSource) implementation.

use crate::category::Category;
use crate::error::SpriteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Placeholder replaced by the category name in [`SpriteManifest::chunk_pattern`].
pub const CATEGORY_PLACEHOLDER: &str = "{category}";
/// Placeholder replaced by the 1-based chunk index in [`SpriteManifest::chunk_pattern`].
pub const INDEX_PLACEHOLDER: &str = "{index}";

fn default_chunk_pattern() -> String {
    "{category}/{category}-{index}.svg".to_string()
}

/// Per-category manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// How many chunks the category's master sprite was split into.
    pub chunks: usize,
}

/// An error produced while reading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The TOML text could not be parsed.
    #[error("failed to parse sprite manifest: {0}")]
    Parse(#[from] toml::de::Error),
    /// The manifest could not be written back to TOML.
    #[error("failed to serialize sprite manifest: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A category declares zero chunks.
    #[error("category '{0}' must have at least one chunk")]
    EmptyCategory(Category),
    /// The chunk pattern cannot tell chunks apart.
    #[error("chunk pattern '{0}' does not contain the {{index}} placeholder")]
    MissingIndexPlaceholder(String),
}

/// Maps each category to its chunk count and a deterministic chunk location scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteManifest {
    /// Relative path template of a chunk, e.g. `"{category}/{category}-{index}.svg"`.
    #[serde(default = "default_chunk_pattern")]
    pub chunk_pattern: String,
    /// Every known category and its chunk layout.
    #[serde(default)]
    pub categories: BTreeMap<Category, CategoryEntry>,
}

impl Default for SpriteManifest {
    fn default() -> Self {
        Self {
            chunk_pattern: default_chunk_pattern(),
            categories: BTreeMap::new(),
        }
    }
}

impl SpriteManifest {
    /// Parses and validates a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ManifestError> {
        let manifest: SpriteManifest = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serializes the manifest back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ManifestError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Adds or replaces a category, returning the manifest for chaining.
    pub fn with_category(mut self, category: impl Into<Category>, chunks: usize) -> Self {
        self.categories
            .insert(category.into(), CategoryEntry { chunks });
        self
    }

    /// Checks that every category has chunks and that the pattern tells chunks apart.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if !self.chunk_pattern.contains(INDEX_PLACEHOLDER) {
            return Err(ManifestError::MissingIndexPlaceholder(
                self.chunk_pattern.clone(),
            ));
        }
        if let Some((category, _)) = self.categories.iter().find(|(_, e)| e.chunks == 0) {
            return Err(ManifestError::EmptyCategory(category.clone()));
        }
        Ok(())
    }

    /// The number of chunks configured for `category`.
    pub fn chunk_count(&self, category: &Category) -> Option<usize> {
        self.categories.get(category).map(|entry| entry.chunks)
    }

    /// All configured categories, in name order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.keys()
    }

    /// Resolves the relative location of chunk `index` (1-based) of `category`.
    ///
    /// # Errors
    /// Returns [`SpriteError::ChunkNotFound`] if the category is unknown or the
    /// index is outside `1..=chunks`.
    pub fn chunk_path(&self, category: &Category, index: usize) -> Result<String, SpriteError> {
        match self.chunk_count(category) {
            Some(count) if (1..=count).contains(&index) => Ok(self
                .chunk_pattern
                .replace(CATEGORY_PLACEHOLDER, category.as_str())
                .replace(INDEX_PLACEHOLDER, &index.to_string())),
            _ => Err(SpriteError::ChunkNotFound {
                category: category.clone(),
                index,
            }),
        }
    }
}
