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

//! Service configuration, loaded from TOML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sigil_core::Category;
use std::path::{Path, PathBuf};

/// Manifest file name expected next to a chunk tree.
pub const DEFAULT_MANIFEST: &str = "Sprites.toml";

/// Where chunks are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// One file per chunk under `root`, laid out by the manifest.
    Fs {
        /// The chunk tree.
        root: PathBuf,
        /// The manifest; defaults to `root/Sprites.toml`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        manifest: Option<PathBuf>,
    },
    /// A packed `data.pack` described by a bincode `index.bin`.
    Pack {
        /// The chunk index.
        index: PathBuf,
        /// The pack blob.
        data: PathBuf,
    },
}

/// Configuration of a [`SpriteService`](crate::SpriteService).
///
/// ```toml
/// preload = ["status"]
///
/// [source]
/// kind = "fs"
/// root = "assets/sprites"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// The chunk source.
    pub source: SourceConfig,
    /// Categories warmed by [`SpriteService::preload_configured`](crate::SpriteService::preload_configured).
    #[serde(default)]
    pub preload: Vec<Category>,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl SpriteConfig {
    /// A configuration reading chunk files from `root`.
    pub fn fs(root: impl Into<PathBuf>) -> Self {
        Self {
            source: SourceConfig::Fs {
                root: root.into(),
                manifest: None,
            },
            preload: Vec::new(),
            log_filter: default_log_filter(),
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid sprite configuration")
    }

    /// Loads a configuration file. Relative paths inside it are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("While loading '{}'", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        match &mut self.source {
            SourceConfig::Fs { root, manifest } => {
                resolve(root);
                if let Some(manifest) = manifest {
                    resolve(manifest);
                }
            }
            SourceConfig::Pack { index, data } => {
                resolve(index);
                resolve(data);
            }
        }
    }

    /// The manifest path of a filesystem source.
    pub fn manifest_path(&self) -> Option<PathBuf> {
        match &self.source {
            SourceConfig::Fs { root, manifest } => Some(
                manifest
                    .clone()
                    .unwrap_or_else(|| root.join(DEFAULT_MANIFEST)),
            ),
            SourceConfig::Pack { .. } => None,
        }
    }
}
