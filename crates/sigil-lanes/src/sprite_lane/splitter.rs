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
use std::collections::HashSet;
use thiserror::Error;

const CHUNK_OPEN: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\">";
const CHUNK_CLOSE: &str = "</svg>";

/// An error raised while splitting a master sprite at build time.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The master sprite is not well-formed XML.
    #[error("master sprite is not valid XML: {0}")]
    Parse(#[from] roxmltree::Error),
    /// A chunk size of zero was requested.
    #[error("a chunk must hold at least one symbol")]
    ZeroChunkSize,
    /// Two symbols share a name; the runtime assumes names are unique.
    #[error("symbol '{0}' is defined more than once in the master sprite")]
    DuplicateSymbol(String),
    /// The master sprite holds no named symbols.
    #[error("master sprite contains no named symbols")]
    NoSymbols,
    /// More chunks were requested than there are symbols to fill them.
    #[error("cannot split {symbols} symbols into {chunks} chunks")]
    TooManyChunks { symbols: usize, chunks: usize },
}

/// A build-time lane that splits one category's master sprite into chunks.
///
/// Each chunk is a standalone SVG document holding up to
/// `symbols_per_chunk` consecutive symbols of the master, already normalized,
/// so that the runtime can fetch chunks independently and concatenate them
/// back in index order.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSplitter {
    symbols_per_chunk: usize,
}

impl SpriteSplitter {
    /// Creates a splitter emitting at most `symbols_per_chunk` symbols per chunk.
    pub fn new(symbols_per_chunk: usize) -> Result<Self, SplitError> {
        if symbols_per_chunk == 0 {
            return Err(SplitError::ZeroChunkSize);
        }
        Ok(Self { symbols_per_chunk })
    }

    /// Symbols per chunk.
    pub fn symbols_per_chunk(&self) -> usize {
        self.symbols_per_chunk
    }

    /// Splits `master` into chunk documents, in order.
    ///
    /// # Errors
    /// Fails if the master is malformed, defines a symbol name twice, or
    /// contains no named symbol at all.
    pub fn split(&self, master: &str) -> Result<Vec<String>, SplitError> {
        let symbols = collect_symbols(master)?;
        Ok(symbols
            .chunks(self.symbols_per_chunk)
            .map(chunk_document)
            .collect())
    }

    /// Splits `master` into exactly `chunks` chunk documents.
    ///
    /// Sizes differ by at most one symbol; the first `total % chunks` chunks
    /// hold the extra symbol.
    pub fn split_into(master: &str, chunks: usize) -> Result<Vec<String>, SplitError> {
        if chunks == 0 {
            return Err(SplitError::ZeroChunkSize);
        }
        let symbols = collect_symbols(master)?;
        let total = symbols.len();
        if chunks > total {
            return Err(SplitError::TooManyChunks {
                symbols: total,
                chunks,
            });
        }

        let (base, extra) = (total / chunks, total % chunks);
        let mut documents = Vec::with_capacity(chunks);
        let mut start = 0;
        for n in 0..chunks {
            let end = start + base + usize::from(n < extra);
            documents.push(chunk_document(&symbols[start..end]));
            start = end;
        }
        Ok(documents)
    }
}

fn chunk_document(group: &[String]) -> String {
    let body_len: usize = group.iter().map(String::len).sum();
    let mut doc = String::with_capacity(CHUNK_OPEN.len() + body_len + CHUNK_CLOSE.len());
    doc.push_str(CHUNK_OPEN);
    for markup in group {
        doc.push_str(markup);
    }
    doc.push_str(CHUNK_CLOSE);
    doc
}

fn collect_symbols(master: &str) -> Result<Vec<String>, SplitError> {
    let doc = parse_document(master)?;
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for node in symbol_nodes(&doc) {
        let Some(id) = node.attribute("id") else {
            log::warn!("Master sprite contains an unnamed symbol; it will not be shipped");
            continue;
        };
        if !seen.insert(id) {
            return Err(SplitError::DuplicateSymbol(id.to_string()));
        }
        let mut markup = String::new();
        write_normalized(node, &mut markup);
        symbols.push(markup);
    }
    if symbols.is_empty() {
        return Err(SplitError::NoSymbols);
    }
    Ok(symbols)
}
