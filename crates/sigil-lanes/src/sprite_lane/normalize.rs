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

//! Namespace normalization of SVG symbols.
//!
//! Icon editors leave namespace-prefixed attributes behind (`xlink:href`,
//! `inkscape:label`, `sodipodi:nodetypes`, ...). Strict SVG parsers on some
//! clients reject or silently drop them when symbols are copied verbatim, so
//! every symbol is re-serialized into the canonical form:
//!
//! - elements are emitted un-prefixed and must belong to the SVG namespace
//!   (or to no namespace); foreign elements are dropped with their subtree;
//! - XLink attributes become their plain SVG 2 names (`xlink:href` → `href`),
//!   unless the element already carries the plain attribute;
//! - `xml:*` attributes are kept, every other namespaced attribute is dropped;
//! - namespace declarations, comments and processing instructions are never copied.

use roxmltree::{Document, Node, ParsingOptions};
use sigil_core::asset::SVG_NS;
use sigil_core::Symbol;

/// The XLink namespace.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// The namespace implicitly bound to the `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

// Declares the prefixes icon editors commonly emit so that a bare `<symbol>`
// fragment with undeclared prefixes can still be parsed.
const FRAGMENT_OPEN: &str = concat!(
    "<svg xmlns=\"http://www.w3.org/2000/svg\"",
    " xmlns:xlink=\"http://www.w3.org/1999/xlink\"",
    " xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\"",
    " xmlns:sodipodi=\"http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd\"",
    " xmlns:svgjs=\"http://svgjs.dev/svgjs\">"
);
const FRAGMENT_CLOSE: &str = "</svg>";

/// Parses a sprite document, tolerating a DOCTYPE.
pub fn parse_document(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options)
}

fn is_svg_element(node: Node<'_, '_>) -> bool {
    node.is_element() && matches!(node.tag_name().namespace(), None | Some(SVG_NS))
}

fn is_symbol(node: Node<'_, '_>) -> bool {
    is_svg_element(node) && node.tag_name().name() == "symbol"
}

/// Every outermost `<symbol>` element of the document, in document order.
///
/// Symbols nested inside another symbol are part of their parent's markup and
/// are not returned separately.
pub fn symbol_nodes<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    doc.descendants()
        .filter(|node| is_symbol(*node))
        .filter(|node| !node.ancestors().skip(1).any(is_symbol))
        .collect()
}

/// Serializes `node` and its subtree in canonical form, appending to `out`.
pub fn write_normalized(node: Node<'_, '_>, out: &mut String) {
    if node.is_text() {
        if let Some(text) = node.text() {
            escape_into(text, false, out);
        }
        return;
    }
    if !is_svg_element(node) {
        return;
    }

    let name = node.tag_name().name();
    out.push('<');
    out.push_str(name);
    for attr in node.attributes() {
        match attr.namespace() {
            None => push_attribute(out, None, attr.name(), attr.value()),
            Some(XLINK_NS) => {
                if !has_plain_attribute(node, attr.name()) {
                    push_attribute(out, None, attr.name(), attr.value());
                }
            }
            Some(XML_NS) => push_attribute(out, Some("xml"), attr.name(), attr.value()),
            Some(other) => {
                log::trace!("Dropping attribute '{}' from namespace {other}", attr.name());
            }
        }
    }

    let mut children = node
        .children()
        .filter(|child| child.is_text() || is_svg_element(*child))
        .peekable();
    if children.peek().is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in children {
        write_normalized(child, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

// `Node::attribute(&str)` also matches namespaced attributes, so the namespace
// has to be checked explicitly.
fn has_plain_attribute(node: Node<'_, '_>, name: &str) -> bool {
    node.attributes()
        .any(|attr| attr.namespace().is_none() && attr.name() == name)
}

/// Normalizes one serialized `<symbol>` element.
///
/// Returns `Ok(None)` if the fragment holds no named symbol.
pub fn normalize_fragment(markup: &str) -> Result<Option<Symbol>, roxmltree::Error> {
    let wrapped = format!("{FRAGMENT_OPEN}{markup}{FRAGMENT_CLOSE}");
    let doc = parse_document(&wrapped)?;
    let symbol = symbol_nodes(&doc).into_iter().find_map(|node| {
        let id = node.attribute("id")?;
        let mut out = String::with_capacity(markup.len());
        write_normalized(node, &mut out);
        Some(Symbol::new(id, out))
    });
    Ok(symbol)
}

/// Normalizes raw symbols, skipping (and logging) any that cannot be parsed.
pub fn normalize_symbols(symbols: &[Symbol]) -> Vec<Symbol> {
    symbols
        .iter()
        .filter_map(|symbol| match normalize_fragment(symbol.markup()) {
            Ok(Some(normalized)) => Some(normalized),
            Ok(None) => {
                log::warn!("Symbol '{}' lost its id during normalization", symbol.id());
                None
            }
            Err(e) => {
                log::error!("Skipping symbol '{}': {e}", symbol.id());
                None
            }
        })
        .collect()
}

fn push_attribute(out: &mut String, prefix: Option<&str>, name: &str, value: &str) {
    out.push(' ');
    if let Some(prefix) = prefix {
        out.push_str(prefix);
        out.push(':');
    }
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(markup: &str) -> String {
        normalize_fragment(markup).unwrap().unwrap().markup().to_string()
    }

    #[test]
    fn xlink_href_becomes_plain_href() {
        let out = normalize(
            r##"<symbol id="a" viewBox="0 0 16 16"><use xlink:href="#b"/></symbol>"##,
        );
        assert_eq!(
            out,
            r##"<symbol id="a" viewBox="0 0 16 16"><use href="#b"/></symbol>"##
        );
    }

    #[test]
    fn plain_href_wins_over_xlink() {
        let out = normalize(r##"<symbol id="a"><use href="#x" xlink:href="#y"/></symbol>"##);
        assert_eq!(out, r##"<symbol id="a"><use href="#x"/></symbol>"##);
    }

    #[test]
    fn embedded_image_keeps_its_data_reference() {
        let out = normalize(
            r#"<symbol id="logo"><image width="24" xlink:href="data:image/png;base64,AAAA"/></symbol>"#,
        );
        assert_eq!(
            out,
            r#"<symbol id="logo"><image width="24" href="data:image/png;base64,AAAA"/></symbol>"#
        );
    }

    #[test]
    fn editor_attributes_and_elements_are_dropped() {
        let out = normalize(concat!(
            r#"<symbol id="a" inkscape:label="Layer 1">"#,
            r#"<sodipodi:namedview pagecolor="white"/>"#,
            r#"<path d="M0 0" sodipodi:nodetypes="cc"/>"#,
            r#"</symbol>"#
        ));
        assert_eq!(out, r#"<symbol id="a"><path d="M0 0"/></symbol>"#);
    }

    #[test]
    fn xml_space_is_kept_and_text_escaped() {
        let out = normalize(r#"<symbol id="a" xml:space="preserve"><title>A &amp; B</title></symbol>"#);
        assert_eq!(
            out,
            r#"<symbol id="a" xml:space="preserve"><title>A &amp; B</title></symbol>"#
        );
    }

    #[test]
    fn custom_prefix_bound_to_xlink_is_rewritten() {
        let doc = parse_document(concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:ns1="http://www.w3.org/1999/xlink">"#,
            r#"<symbol id="a"><image ns1:href="data:image/png;base64,AAAA" width="8"/></symbol>"#,
            r#"</svg>"#
        ))
        .unwrap();
        let nodes = symbol_nodes(&doc);
        assert_eq!(nodes.len(), 1);

        let mut out = String::new();
        write_normalized(nodes[0], &mut out);
        assert_eq!(
            out,
            r#"<symbol id="a"><image href="data:image/png;base64,AAAA" width="8"/></symbol>"#
        );
    }

    #[test]
    fn comments_are_not_copied() {
        let out = normalize(r#"<symbol id="a"><!-- exported --><rect width="1"/></symbol>"#);
        assert_eq!(out, r#"<symbol id="a"><rect width="1"/></symbol>"#);
    }

    #[test]
    fn normalize_symbols_skips_broken_markup() {
        let symbols = vec![
            Symbol::new("ok", r##"<symbol id="ok"><use xlink:href="#x"/></symbol>"##),
            Symbol::new("broken", "<symbol id=\"broken\">"),
            Symbol::new("unnamed", "<symbol/>"),
        ];
        let normalized = normalize_symbols(&symbols);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].id(), "ok");
        assert!(normalized[0].markup().contains("href=\"#x\""));
    }
}
