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

//! Publishes combined symbols to the rendering surface exactly once.

use sigil_core::{Category, CombinedAsset, SymbolSurface};
use sigil_lanes::sprite_lane::normalize::normalize_symbols;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct PublishState {
    container_created: bool,
    published: HashSet<Category>,
}

/// Makes a category's symbols visible on a [`SymbolSurface`].
///
/// The shared hidden container is created lazily on the first publish of any
/// category. Publishing is idempotent per category: a second call for a
/// published category does nothing.
pub struct SymbolInjector {
    surface: Arc<dyn SymbolSurface>,
    state: Mutex<PublishState>,
}

impl SymbolInjector {
    /// Creates an injector writing to `surface`.
    pub fn new(surface: Arc<dyn SymbolSurface>) -> Self {
        Self {
            surface,
            state: Mutex::new(PublishState::default()),
        }
    }

    /// Appends the symbols of `asset` under `category`, unless already done.
    ///
    /// Assets that were not produced by the combiner are normalized first.
    /// Returns `true` if this call performed the append.
    pub fn publish(&self, category: &Category, asset: &CombinedAsset) -> bool {
        // Held across the surface calls so concurrent publishers cannot both append.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.published.contains(category) {
            return false;
        }

        if !state.container_created {
            self.surface.create_container();
            state.container_created = true;
        }

        let symbols = if asset.is_normalized() {
            Cow::Borrowed(asset.symbols())
        } else {
            Cow::Owned(normalize_symbols(asset.symbols()))
        };
        self.surface.append_symbols(category, &symbols);
        state.published.insert(category.clone());

        log::info!("Published {} symbols of '{category}'", symbols.len());
        true
    }

    /// Returns `true` once `category` has been published.
    pub fn is_published(&self, category: &Category) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .published
            .contains(category)
    }
}

impl std::fmt::Debug for SymbolInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolInjector")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite_agent::DocumentSurface;
    use sigil_core::Symbol;

    fn setup() -> (Arc<DocumentSurface>, SymbolInjector) {
        let surface = Arc::new(DocumentSurface::new());
        let injector = SymbolInjector::new(surface.clone());
        (surface, injector)
    }

    #[test]
    fn publishing_twice_appends_once() {
        let (surface, injector) = setup();
        let category = Category::new("status");
        let asset = CombinedAsset::new(
            category.clone(),
            vec![Symbol::new("burn", "<symbol id=\"burn\"><path d=\"M0 0\"/></symbol>")],
        );

        assert!(injector.publish(&category, &asset));
        assert!(!injector.publish(&category, &asset));

        assert!(injector.is_published(&category));
        assert_eq!(surface.symbol_occurrences("burn"), 1);
        assert_eq!(surface.append_count(&category), 1);
    }

    #[test]
    fn container_is_created_lazily_and_shared() {
        let (surface, injector) = setup();
        assert!(!surface.container_created());

        let status = Category::new("status");
        let magic = Category::new("magic");
        injector.publish(&status, &CombinedAsset::new(status.clone(), vec![]));
        injector.publish(
            &magic,
            &CombinedAsset::new(magic.clone(), vec![Symbol::new("fire", "<symbol id=\"fire\"/>")]),
        );

        assert!(surface.container_created());
        assert_eq!(surface.render().matches("aria-hidden").count(), 1);
        assert!(!injector.is_published(&Category::new("items")));
    }

    #[test]
    fn raw_symbols_are_normalized_before_append() {
        let (surface, injector) = setup();
        let category = Category::new("magic");
        let asset = CombinedAsset::from_raw_symbols(
            category.clone(),
            vec![Symbol::new(
                "fire",
                "<symbol id=\"fire\" inkscape:label=\"Fire\"><use xlink:href=\"#flame\"/></symbol>",
            )],
        );

        injector.publish(&category, &asset);

        let doc = surface.render();
        assert!(doc.contains("<use href=\"#flame\"/>"), "{doc}");
        assert!(!doc.contains("inkscape"));
        assert!(!doc.contains("xlink"));
    }
}
