//! Applying controller effects to a terminal.

use std::io::{self, Write};

use colored::Colorize;
use ink_controller::Effect;
use ink_render::{to_html, Element, Node};

use crate::cli::OutputFormat;

/// Tags that start a new line in text output.
const BLOCK_TAGS: &[&str] = &["div", "p", "h1", "h2", "h3", "ul", "ol", "li", "section", "article"];

/// Writes effects to an output stream and alerts to an error stream.
pub struct Terminal<O, E> {
    format: OutputFormat,
    out: O,
    err: E,
}

impl Terminal<io::Stdout, io::Stderr> {
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(format, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Terminal<O, E> {
    pub fn new(format: OutputFormat, out: O, err: E) -> Self {
        Self { format, out, err }
    }

    /// Apply `effects` in order. Returns the navigation target, if any;
    /// effects after a navigation are not applied.
    pub fn apply(&mut self, effects: &[Effect]) -> io::Result<Option<String>> {
        for effect in effects {
            match effect {
                Effect::Render { container, nodes } => {
                    writeln!(self.out, "{}", format!("# {}", container.element_id()).dimmed())?;
                    self.write_nodes(nodes)?;
                }
                Effect::RemovePostCard(id) => {
                    let id = id.to_string();
                    writeln!(self.out, "{} Removed post {}", "✓".green(), id.yellow())?;
                }
                Effect::ClearFields(_) => {}
                Effect::Alert(message) => {
                    writeln!(self.err, "{} {}", "!".yellow().bold(), message)?;
                }
                Effect::Navigate(href) => return Ok(Some(href.clone())),
            }
        }
        Ok(None)
    }

    pub fn out(&mut self) -> &mut O {
        &mut self.out
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    fn write_nodes(&mut self, nodes: &[Node]) -> io::Result<()> {
        match self.format {
            OutputFormat::Html => writeln!(self.out, "{}", to_html(nodes)),
            OutputFormat::Text => {
                let mut lines = Vec::new();
                for node in nodes {
                    block_lines(node, &mut lines);
                    lines.push(String::new());
                }
                for line in lines {
                    writeln!(self.out, "{line}")?;
                }
                Ok(())
            }
        }
    }
}

/// Flatten a node into display lines.
///
/// Block elements start a new line; consecutive inline content between them
/// is joined into one line.
fn block_lines(node: &Node, lines: &mut Vec<String>) {
    match node {
        Node::Text(text) => push_line(lines, text),
        Node::Element(element) if element.child_elements().any(is_block) => {
            let mut run = String::new();
            for child in &element.children {
                match child {
                    Node::Element(inner) if is_block(inner) => {
                        push_line(lines, &std::mem::take(&mut run));
                        block_lines(child, lines);
                    }
                    Node::Element(inner) => {
                        let mut piece = String::new();
                        inline_text(inner, &mut piece);
                        join_inline(&mut run, &piece);
                    }
                    Node::Text(text) => join_inline(&mut run, text),
                }
            }
            push_line(lines, &run);
        }
        Node::Element(element) => {
            let mut line = String::new();
            inline_text(element, &mut line);
            if element.tag == "h2" {
                line = line.bold().to_string();
            }
            push_line(lines, &line);
        }
    }
}

fn push_line(lines: &mut Vec<String>, line: &str) {
    let line = line.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
}

fn join_inline(run: &mut String, piece: &str) {
    let touching = run.ends_with(char::is_whitespace) || piece.starts_with(char::is_whitespace);
    if !run.is_empty() && !touching {
        run.push(' ');
    }
    run.push_str(piece);
}

fn inline_text(element: &Element, out: &mut String) {
    match element.tag.as_str() {
        "img" => {
            out.push_str(&format!("[image: {}]", element.attribute("src").unwrap_or_default()));
            return;
        }
        "button" => {
            let label = Node::Element(element.clone()).text_content();
            match element.attribute("data-id") {
                Some(id) => out.push_str(&format!("[{label} {id}]")),
                None => out.push_str(&format!("[{label}]")),
            }
            return;
        }
        _ => {}
    }
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => inline_text(inner, out),
        }
    }
    if element.tag == "a" {
        if let Some(href) = element.attribute("href") {
            out.push_str(&format!(" <{href}>"));
        }
    }
}

fn is_block(element: &Element) -> bool {
    BLOCK_TAGS.contains(&element.tag.as_str())
}
