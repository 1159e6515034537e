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

//! An in-memory rendering surface.

use sigil_core::asset::{HIDDEN_CONTAINER_CLOSE, HIDDEN_CONTAINER_OPEN};
use sigil_core::{Category, Symbol, SymbolSurface};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct DocumentState {
    container: Option<String>,
    appends: HashMap<Category, usize>,
}

/// A [`SymbolSurface`] backed by a string document.
///
/// Holds the single hidden `<svg>` container that icons reference with
/// `<use href="#id">`. Server-side renderers embed [`render`](Self::render)
/// once at the top of the page body.
#[derive(Debug, Default)]
pub struct DocumentSurface {
    state: Mutex<DocumentState>,
}

impl DocumentSurface {
    /// Creates an empty surface with no container.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` once the hidden container exists.
    pub fn container_created(&self) -> bool {
        self.lock().container.is_some()
    }

    /// The hidden container with every appended symbol, or an empty string
    /// before the container is created.
    pub fn render(&self) -> String {
        match &self.lock().container {
            Some(body) => format!("{HIDDEN_CONTAINER_OPEN}{body}{HIDDEN_CONTAINER_CLOSE}"),
            None => String::new(),
        }
    }

    /// How many times a symbol with `id` appears in the container.
    pub fn symbol_occurrences(&self, id: &str) -> usize {
        let needle = format!(" id=\"{id}\"");
        self.lock()
            .container
            .as_deref()
            .map_or(0, |body| body.matches(needle.as_str()).count())
    }

    /// How many times symbols of `category` were appended.
    pub fn append_count(&self, category: &Category) -> usize {
        self.lock().appends.get(category).copied().unwrap_or(0)
    }
}

impl SymbolSurface for DocumentSurface {
    fn create_container(&self) {
        let mut state = self.lock();
        if state.container.is_none() {
            log::debug!("Creating hidden sprite container");
            state.container = Some(String::new());
        }
    }

    fn append_symbols(&self, category: &Category, symbols: &[Symbol]) {
        let mut state = self.lock();
        let Some(body) = state.container.as_mut() else {
            log::error!("Symbols of '{category}' appended before the container was created");
            return;
        };
        for symbol in symbols {
            body.push_str(symbol.markup());
        }
        *state.appends.entry(category.clone()).or_default() += 1;
    }
}
