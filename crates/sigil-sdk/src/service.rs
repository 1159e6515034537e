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

//! The sprite service facade.

use crate::config::{SourceConfig, SpriteConfig};
use anyhow::{Context, Result};
use sigil_agents::{DocumentSurface, LoadCoordinator};
use sigil_core::asset::SVG_NS;
use sigil_core::{
    Category, ChunkSource, LoadingStatus, SpriteError, SpriteHandle, SpriteManifest,
};
use sigil_lanes::{FsChunkSource, PackChunkSource};
use sigil_telemetry::MetricsRegistry;
use std::future::Future;
use std::sync::Arc;

/// The `href` a `<use>` element needs to reference the symbol `icon_id`.
pub fn symbol_href(icon_id: &str) -> String {
    format!("#{icon_id}")
}

/// Loads sprites on demand and renders icon references into them.
///
/// Owns one [`LoadCoordinator`] and the [`DocumentSurface`] its symbols are
/// published to. Renderers call [`render_icon`](Self::render_icon) or, once a
/// category [`is_ready`](Self::is_ready), the synchronous
/// [`icon_markup`](Self::icon_markup); the page embeds [`document`](Self::document)
/// once.
#[derive(Debug)]
pub struct SpriteService {
    coordinator: LoadCoordinator,
    surface: Arc<DocumentSurface>,
    metrics_registry: Arc<MetricsRegistry>,
    preload: Vec<Category>,
}

impl SpriteService {
    /// Creates a service over an arbitrary chunk source.
    pub fn new(source: Arc<dyn ChunkSource>) -> Result<Self> {
        let surface = Arc::new(DocumentSurface::new());
        let metrics_registry = Arc::new(MetricsRegistry::new());
        let coordinator =
            LoadCoordinator::new(source, surface.clone(), metrics_registry.clone())
                .context("Failed to register sprite metrics")?;

        Ok(Self {
            coordinator,
            surface,
            metrics_registry,
            preload: Vec::new(),
        })
    }

    /// Builds the service described by `config`.
    pub fn from_config(config: &SpriteConfig) -> Result<Self> {
        sigil_telemetry::init_logging(&config.log_filter);

        let source: Arc<dyn ChunkSource> = match &config.source {
            SourceConfig::Fs { root, .. } => {
                let manifest_path = config
                    .manifest_path()
                    .context("Filesystem source without a manifest path")?;
                let text = std::fs::read_to_string(&manifest_path).with_context(|| {
                    format!("Failed to read manifest '{}'", manifest_path.display())
                })?;
                let manifest = SpriteManifest::from_toml_str(&text)
                    .with_context(|| format!("Invalid manifest '{}'", manifest_path.display()))?;
                manifest.validate()?;
                log::info!(
                    "Serving {} sprite categories from '{}'",
                    manifest.categories().count(),
                    root.display()
                );
                Arc::new(FsChunkSource::new(root.clone(), manifest))
            }
            SourceConfig::Pack { index, data } => {
                let source = PackChunkSource::open(index, data)?;
                log::info!(
                    "Serving {} sprite chunks from '{}'",
                    source.index().len(),
                    data.display()
                );
                Arc::new(source)
            }
        };

        let mut service = Self::new(source)?;
        service.preload = config.preload.clone();
        Ok(service)
    }

    /// Ensures `category` is loaded and published. See
    /// [`LoadCoordinator::ensure_loaded`].
    pub fn ensure_loaded(
        &self,
        category: &Category,
    ) -> impl Future<Output = Result<SpriteHandle, SpriteError>> + Send + 'static {
        self.coordinator.ensure_loaded(category)
    }

    /// Snapshot of the load state of `category`.
    pub fn loading_state(&self, category: &Category) -> LoadingStatus {
        self.coordinator.loading_state(category)
    }

    /// Returns `true` if `category` is cached and published.
    pub fn is_ready(&self, category: &Category) -> bool {
        self.coordinator.is_ready(category)
    }

    /// Best-effort load of `categories`; failures are only logged.
    pub async fn preload(&self, categories: &[Category]) {
        self.coordinator.preload(categories).await;
    }

    /// Preloads the categories listed in the configuration.
    pub async fn preload_configured(&self) {
        self.coordinator.preload(&self.preload).await;
    }

    /// Markup referencing `icon_id` of a ready `category` at `size` pixels.
    ///
    /// Returns `None` if the category is not ready or has no such symbol.
    pub fn icon_markup(&self, category: &Category, icon_id: &str, size: u32) -> Option<String> {
        if !self.is_ready(category) {
            return None;
        }
        let sprite = self.coordinator.cached(category)?;
        sprite.symbol(icon_id)?;
        Some(format!(
            "<svg xmlns=\"{SVG_NS}\" width=\"{size}\" height=\"{size}\" role=\"img\"><use href=\"{}\"/></svg>",
            symbol_href(icon_id)
        ))
    }

    /// Loads `category` if needed and renders `icon_id` at `size` pixels.
    ///
    /// Resolves to `Ok(None)` if the loaded category has no such symbol.
    pub async fn render_icon(
        &self,
        category: &Category,
        icon_id: &str,
        size: u32,
    ) -> Result<Option<String>, SpriteError> {
        self.ensure_loaded(category).await?;
        Ok(self.icon_markup(category, icon_id, size))
    }

    /// The hidden container holding every published symbol.
    pub fn document(&self) -> String {
        self.surface.render()
    }

    /// The underlying coordinator.
    pub fn coordinator(&self) -> &LoadCoordinator {
        &self.coordinator
    }

    /// The registry holding the `sprites` metrics.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics_registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_tree(root: &Path) {
        let manifest = SpriteManifest::default()
            .with_category("status", 2)
            .with_category("magic", 1);
        std::fs::write(root.join("Sprites.toml"), manifest.to_toml_string().unwrap()).unwrap();

        for (category, index, ids) in [
            ("status", 1, ["burn", "freeze"]),
            ("status", 2, ["poison", "sleep"]),
        ] {
            let dir = root.join(category);
            std::fs::create_dir_all(&dir).unwrap();
            let symbols: String = ids
                .iter()
                .map(|id| format!("<symbol id=\"{id}\"><path d=\"M0 0\"/></symbol>"))
                .collect();
            std::fs::write(
                dir.join(format!("{category}-{index}.svg")),
                format!("<svg xmlns=\"{SVG_NS}\">{symbols}</svg>"),
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn renders_icons_from_a_chunk_tree() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());
        let service = SpriteService::from_config(&SpriteConfig::fs(dir.path())).unwrap();
        let status = Category::new("status");

        assert_eq!(service.icon_markup(&status, "burn", 24), None);

        let markup = service.render_icon(&status, "poison", 24).await.unwrap().unwrap();
        assert!(markup.contains("width=\"24\""));
        assert!(markup.contains("<use href=\"#poison\"/>"));
        assert_eq!(service.render_icon(&status, "missing", 24).await.unwrap(), None);

        let document = service.document();
        assert!(document.contains("aria-hidden=\"true\""));
        assert!(document.contains("id=\"burn\""));
        assert!(document.contains("id=\"sleep\""));
        assert_eq!(service.metrics().counter_value("sprites", "chunk_fetches_total").unwrap(), 2);
    }

    #[tokio::test]
    async fn configured_preload_tolerates_missing_chunks() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());
        let mut config = SpriteConfig::fs(dir.path());
        config.preload = vec![Category::new("status"), Category::new("magic")];
        let service = SpriteService::from_config(&config).unwrap();

        service.preload_configured().await;

        assert!(service.is_ready(&"status".into()));
        let magic = service.loading_state(&"magic".into());
        assert!(!magic.loaded);
        assert!(magic.error.is_some());
    }

    #[test]
    fn missing_manifest_is_a_setup_error() {
        let dir = tempdir().unwrap();
        let err = SpriteService::from_config(&SpriteConfig::fs(dir.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }

    #[test]
    fn href_points_at_the_symbol_id() {
        assert_eq!(symbol_href("status-12"), "#status-12");
    }
}
