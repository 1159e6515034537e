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

use super::Asset;
use crate::category::Category;

/// The SVG namespace every emitted element belongs to.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Opening tag of the hidden container that holds combined symbols.
///
/// The container is never painted; symbols inside it are only referenced
/// through `<use href="#id">`.
pub const HIDDEN_CONTAINER_OPEN: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\" aria-hidden=\"true\" ",
    "style=\"position:absolute;width:0;height:0;overflow:hidden\">"
);

/// Closing tag matching [`HIDDEN_CONTAINER_OPEN`].
pub const HIDDEN_CONTAINER_CLOSE: &str = "</svg>";

/// One named icon definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    id: String,
    markup: String,
}

impl Symbol {
    /// Creates a symbol from its id and its serialized `<symbol>` element.
    pub fn new(id: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            markup: markup.into(),
        }
    }

    /// The symbol's unique name within its category.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The serialized `<symbol>` element.
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// The union of every named symbol of one category, in chunk order.
///
/// A combined asset is immutable. A reload after a failure builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedAsset {
    category: Category,
    symbols: Vec<Symbol>,
    normalized: bool,
}

impl Asset for CombinedAsset {}

impl CombinedAsset {
    /// Creates an asset whose symbols have already been namespace-normalized.
    pub fn new(category: Category, symbols: Vec<Symbol>) -> Self {
        Self {
            category,
            symbols,
            normalized: true,
        }
    }

    /// Creates an asset from symbols whose markup may still carry
    /// editor-specific namespace prefixes (e.g. restored from an earlier warm-up).
    pub fn from_raw_symbols(category: Category, symbols: Vec<Symbol>) -> Self {
        Self {
            category,
            symbols,
            normalized: false,
        }
    }

    /// The category this asset was assembled for.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// All symbols, in chunk order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Whether the symbol markup is already in the canonical SVG namespace.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Number of symbols in the asset.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the asset holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol ids in chunk order.
    pub fn symbol_ids(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(Symbol::id)
    }

    /// Looks up a symbol by id.
    pub fn symbol(&self, id: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.id == id)
    }

    /// Renders the whole asset as one hidden SVG document.
    pub fn document(&self) -> String {
        let body_len: usize = self.symbols.iter().map(|s| s.markup.len()).sum();
        let mut out = String::with_capacity(
            HIDDEN_CONTAINER_OPEN.len() + body_len + HIDDEN_CONTAINER_CLOSE.len(),
        );
        out.push_str(HIDDEN_CONTAINER_OPEN);
        for symbol in &self.symbols {
            out.push_str(&symbol.markup);
        }
        out.push_str(HIDDEN_CONTAINER_CLOSE);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SpriteHandle;

    fn sample() -> CombinedAsset {
        CombinedAsset::new(
            Category::new("status"),
            vec![
                Symbol::new("poison", "<symbol id=\"poison\"/>"),
                Symbol::new("burn", "<symbol id=\"burn\"/>"),
            ],
        )
    }

    #[test]
    fn document_wraps_symbols_in_hidden_container() {
        let doc = sample().document();
        assert!(doc.starts_with(HIDDEN_CONTAINER_OPEN));
        assert!(doc.ends_with(HIDDEN_CONTAINER_CLOSE));
        let poison = doc.find("poison").unwrap();
        let burn = doc.find("burn").unwrap();
        assert!(poison < burn);
    }

    #[test]
    fn lookup_and_ids() {
        let asset = sample();
        assert_eq!(asset.len(), 2);
        assert!(asset.is_normalized());
        assert_eq!(asset.symbol_ids().collect::<Vec<_>>(), vec!["poison", "burn"]);
        assert_eq!(asset.symbol("burn").unwrap().markup(), "<symbol id=\"burn\"/>");
        assert!(asset.symbol("freeze").is_none());
    }

    #[test]
    fn raw_assets_are_not_normalized() {
        let asset = CombinedAsset::from_raw_symbols(Category::new("magic"), Vec::new());
        assert!(!asset.is_normalized());
        assert!(asset.is_empty());
    }

    #[test]
    fn cloned_handles_share_the_instance() {
        let handle = SpriteHandle::new(sample());
        let clone = handle.clone();
        assert!(SpriteHandle::ptr_eq(&handle, &clone));
        assert!(!SpriteHandle::ptr_eq(&handle, &SpriteHandle::new(sample())));
    }
}
