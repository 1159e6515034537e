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

//! The rendering-surface capability.

use crate::asset::Symbol;
use crate::category::Category;

/// The live document that rendered icons reference symbols from.
///
/// This is the only seam between the sprite subsystem and a rendering runtime.
/// The `SymbolInjector` in `sigil-agents` guarantees that
/// [`create_container`](SymbolSurface::create_container) is called once before
/// the first append, and that each category is appended at most once.
pub trait SymbolSurface: Send + Sync {
    /// Creates the shared, hidden top-level container that holds all symbols.
    fn create_container(&self);

    /// Appends the symbols of `category` into the shared container.
    fn append_symbols(&self, category: &Category, symbols: &[Symbol]);
}
