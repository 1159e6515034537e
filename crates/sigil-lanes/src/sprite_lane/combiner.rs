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

use super::normalize::{parse_document, symbol_nodes, write_normalized};
use sigil_core::{Category, ChunkContent, CombinedAsset, SpriteError, Symbol};
use std::collections::HashSet;

/// A lane that merges the chunks of one category into a single [`CombinedAsset`].
///
/// Each chunk is parsed as XML, its named `<symbol>` elements are re-serialized
/// through the namespace normalizer, and the results are concatenated in
/// chunk-index order. The combiner never produces a partial asset: the first
/// chunk that fails to parse aborts the whole category.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChunkCombiner;

impl ChunkCombiner {
    /// Creates a combiner.
    pub fn new() -> Self {
        Self
    }

    /// Combines `chunks` into one asset for `category`.
    ///
    /// Chunks may arrive in any order; they are sorted by index first so that
    /// the output is deterministic. Symbols without an `id` cannot be
    /// referenced and are skipped. A symbol name already seen in an earlier
    /// chunk is a data error in the build output; the first definition is kept.
    ///
    /// # Errors
    /// Returns [`SpriteError::Combine`] naming the first chunk that is not a
    /// well-formed XML document.
    pub fn combine(
        &self,
        category: &Category,
        mut chunks: Vec<ChunkContent>,
    ) -> Result<CombinedAsset, SpriteError> {
        chunks.sort_by_key(|chunk| chunk.index);

        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        for chunk in &chunks {
            let doc = parse_document(&chunk.text).map_err(|e| SpriteError::Combine {
                category: category.clone(),
                index: chunk.index,
                message: e.to_string(),
            })?;

            let mut found = 0usize;
            for node in symbol_nodes(&doc) {
                let Some(id) = node.attribute("id") else {
                    log::debug!(
                        "Skipping unnamed symbol in chunk {} of '{category}'",
                        chunk.index
                    );
                    continue;
                };
                if !seen.insert(id.to_string()) {
                    log::warn!(
                        "Duplicate symbol '{id}' in chunk {} of '{category}'; keeping the first",
                        chunk.index
                    );
                    continue;
                }
                let mut markup = String::new();
                write_normalized(node, &mut markup);
                symbols.push(Symbol::new(id, markup));
                found += 1;
            }
            log::trace!("Chunk {} of '{category}' contributed {found} symbols", chunk.index);
        }

        log::debug!(
            "Combined {} chunks of '{category}' into {} symbols",
            chunks.len(),
            symbols.len()
        );
        Ok(CombinedAsset::new(category.clone(), symbols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, symbols: &[&str]) -> ChunkContent {
        let body: String = symbols
            .iter()
            .map(|id| format!(r#"<symbol id="{id}" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></symbol>"#))
            .collect();
        ChunkContent::new(
            index,
            format!(r#"<svg xmlns="http://www.w3.org/2000/svg">{body}</svg>"#),
        )
    }

    #[test]
    fn symbols_follow_chunk_order_not_arrival_order() {
        let category = Category::new("status");
        let chunks = vec![
            chunk(3, &["stun"]),
            chunk(1, &["poison", "burn"]),
            chunk(2, &["freeze"]),
        ];

        let asset = ChunkCombiner::new().combine(&category, chunks).unwrap();
        assert_eq!(
            asset.symbol_ids().collect::<Vec<_>>(),
            vec!["poison", "burn", "freeze", "stun"]
        );
        assert_eq!(asset.category(), &category);
        assert!(asset.is_normalized());
    }

    #[test]
    fn malformed_chunk_names_its_index() {
        let category = Category::new("magic");
        let chunks = vec![
            chunk(1, &["fireball"]),
            ChunkContent::new(2, "<svg><symbol id=\"broken\"></svg>"),
        ];

        let err = ChunkCombiner::new().combine(&category, chunks).unwrap_err();
        match err {
            SpriteError::Combine { index, category, .. } => {
                assert_eq!(index, 2);
                assert_eq!(category.as_str(), "magic");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn prefixed_attributes_are_normalized() {
        let text = concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">"#,
            r#"<symbol id="shield" inkscape:label="shield">"#,
            r#"<image xlink:href="data:image/png;base64,iVBO" width="24" height="24"/>"#,
            r#"</symbol></svg>"#
        );
        let asset = ChunkCombiner::new()
            .combine(&"status".into(), vec![ChunkContent::new(1, text)])
            .unwrap();

        let markup = asset.symbol("shield").unwrap().markup();
        assert_eq!(
            markup,
            r#"<symbol id="shield"><image href="data:image/png;base64,iVBO" width="24" height="24"/></symbol>"#
        );
        assert!(!asset.document().contains("xlink"));
        assert!(!asset.document().contains("inkscape"));
    }

    #[test]
    fn duplicate_and_unnamed_symbols_are_skipped() {
        let chunks = vec![
            chunk(1, &["poison"]),
            ChunkContent::new(
                2,
                r#"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="poison"/><symbol/><symbol id="burn"/></svg>"#,
            ),
        ];
        let asset = ChunkCombiner::new().combine(&"status".into(), chunks).unwrap();
        assert_eq!(asset.symbol_ids().collect::<Vec<_>>(), vec!["poison", "burn"]);
        assert!(asset.symbol("poison").unwrap().markup().contains("<path"));
    }

    #[test]
    fn empty_chunk_contributes_nothing() {
        let chunks = vec![
            ChunkContent::new(1, r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#),
            chunk(2, &["a"]),
        ];
        let asset = ChunkCombiner::new().combine(&"magic".into(), chunks).unwrap();
        assert_eq!(asset.len(), 1);
    }
}
