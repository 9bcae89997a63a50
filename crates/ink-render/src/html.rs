//! HTML serialization.

use std::fmt::{self, Write};

use crate::node::{Element, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Display adapter that writes a sequence of nodes as HTML.
pub struct Html<'a>(pub &'a [Node]);

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.0 {
            write_node(f, node)?;
        }
        Ok(())
    }
}

/// Serialize nodes as HTML, escaping text and attribute values.
pub fn to_html(nodes: &[Node]) -> String {
    Html(nodes).to_string()
}

fn write_node(out: &mut impl Write, node: &Node) -> fmt::Result {
    match node {
        Node::Text(text) => write_escaped(out, text, false),
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut impl Write, element: &Element) -> fmt::Result {
    write!(out, "<{}", element.tag)?;
    for (name, value) in &element.attributes {
        write!(out, " {name}=\"")?;
        write_escaped(out, value, true)?;
        out.write_char('"')?;
    }
    out.write_char('>')?;
    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return Ok(());
    }
    for child in &element.children {
        write_node(out, child)?;
    }
    write!(out, "</{}>", element.tag)
}

fn write_escaped(out: &mut impl Write, text: &str, in_attribute: bool) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' if in_attribute => out.write_str("&quot;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}
