// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! A minimal textproto-style tree for METADATA files.

use std::fmt;

/// Width of one indentation level.
const INDENT_WIDTH: usize = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MetadataValue {
    Scalar(String),
    Node(MetadataNode),
}

/// A named block holding ordered entries, e.g. `third_party { ... }`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataNode {
    name: String,
    entries: Vec<(String, MetadataValue)>,
}

/// Quotes a string as a textproto string literal.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl MetadataNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Adds a field whose value is printed verbatim, e.g. an enum or a number.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((key.into(), MetadataValue::Scalar(value.into())));
        self
    }

    /// Adds a field whose value is printed as a quoted string.
    pub fn string_field(self, key: impl Into<String>, value: &str) -> Self {
        self.field(key, quote(value))
    }

    /// Adds a nested block, keyed by its own name.
    pub fn node(mut self, child: MetadataNode) -> Self {
        self.entries
            .push((child.name.clone(), MetadataValue::Node(child)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[(String, MetadataValue)] {
        &self.entries
    }
}

fn render_into(out: &mut String, node: &MetadataNode, depth: usize) {
    out.push_str(&node.name);
    out.push_str(" {\n");
    let indent = " ".repeat(INDENT_WIDTH * depth);
    for (key, value) in &node.entries {
        out.push_str(&indent);
        match value {
            MetadataValue::Scalar(value) => {
                out.push_str(&format!("{key}: {value}\n"));
            }
            MetadataValue::Node(child) => render_into(out, child, depth + 1),
        }
    }
    out.push_str(&" ".repeat(INDENT_WIDTH * (depth - 1)));
    out.push_str("}\n");
}

/// Renders `node` and its children as indented text.
pub fn render(node: &MetadataNode) -> String {
    let mut out = String::new();
    render_into(&mut out, node, 1);
    out
}

impl fmt::Display for MetadataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_flat() {
        let node = MetadataNode::new("third_party")
            .field("license_type", "NOTICE")
            .string_field("version", "1.2.13");
        assert_eq!(
            render(&node),
            "third_party {\n  license_type: NOTICE\n  version: \"1.2.13\"\n}\n"
        );
    }

    #[test]
    fn test_render_nested() {
        let node = MetadataNode::new("third_party")
            .field("license_type", "NOTICE")
            .node(
                MetadataNode::new("last_upgrade_date")
                    .field("year", "2024")
                    .field("month", "7"),
            )
            .node(
                MetadataNode::new("identifier")
                    .string_field("type", "Git")
                    .node(MetadataNode::new("extra").field("depth", "3")),
            );
        assert_eq!(
            node.to_string(),
            "third_party {\n\
             \x20 license_type: NOTICE\n\
             \x20 last_upgrade_date {\n\
             \x20   year: 2024\n\
             \x20   month: 7\n\
             \x20 }\n\
             \x20 identifier {\n\
             \x20   type: \"Git\"\n\
             \x20   extra {\n\
             \x20     depth: 3\n\
             \x20   }\n\
             \x20 }\n\
             }\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&MetadataNode::new("name")), "name {\n}\n");
    }

    #[test]
    fn test_entries_keep_order_and_repeats() {
        let node = MetadataNode::new("third_party")
            .node(MetadataNode::new("identifier").string_field("value", "a"))
            .node(MetadataNode::new("identifier").string_field("value", "b"));
        assert_eq!(node.name(), "third_party");
        assert_eq!(
            node.entries()
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>(),
            vec!["identifier", "identifier"]
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }
}
