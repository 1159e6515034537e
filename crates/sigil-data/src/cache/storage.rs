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

//! A write-once, read-many store for assembled sprites.

use sigil_core::{Category, SpriteHandle};
use std::collections::HashMap;

/// The in-memory cache mapping each category to its combined sprite.
///
/// Entries live for the lifetime of the owner; there is no eviction since the
/// number of categories is small and fixed. A category is written at most once:
/// a later [`set`](SpriteCache::set) for a cached category keeps the existing
/// handle, so every caller keeps seeing the same instance.
#[derive(Debug, Default, Clone)]
pub struct SpriteCache {
    storage: HashMap<Category, SpriteHandle>,
}

impl SpriteCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Stores the sprite of `category`.
    ///
    /// Returns `false` and leaves the cache untouched if the category already
    /// holds a sprite.
    pub fn set(&mut self, category: Category, handle: SpriteHandle) -> bool {
        if self.storage.contains_key(&category) {
            log::warn!("Sprite for '{category}' is already cached; keeping the existing one");
            return false;
        }
        self.storage.insert(category, handle);
        true
    }

    /// Retrieves the cached sprite of `category`.
    pub fn get(&self, category: &Category) -> Option<&SpriteHandle> {
        self.storage.get(category)
    }

    /// Returns `true` if `category` has a cached sprite.
    pub fn has(&self, category: &Category) -> bool {
        self.storage.contains_key(category)
    }

    /// Number of cached categories.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Cached categories, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.storage.keys()
    }
}
