use std::fmt::{Debug, Write};

use tracing::debug;

use crate::{NodeRef, Trie};

/// Settings for [export].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportSettings {
    /// Indentation added per level of depth.
    pub padding: String,
    /// Type name written in front of each child table, `Node` when unset.
    pub alias: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            padding: "    ".to_string(),
            alias: None,
        }
    }
}

impl ExportSettings {
    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = padding.into();
        self
    }
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
    fn type_name(&self) -> &str {
        self.alias.as_deref().unwrap_or("Node")
    }
}

/// Renders the raw shape of a [Trie] as text, one child per line, for
/// comparing against fixtures in tests. Values are written with their
/// [Debug] representation.
///
/// This is a diagnostic aid and not a stable format.
///
/// ```
/// use rsradix::{ExportSettings, Trie, export};
///
/// let tree = Trie::from([("ab", "first"), ("ac", "second")]);
/// let text = export(&tree, &ExportSettings::default().with_padding("  ").with_alias("T"));
///
/// assert_eq!(text, concat!(
///     "{children: [T; 256]{\n",
///     "  0x61: {label: [0x61], children: [T; 256]{\n",
///     "    0x62: {label: [0x62], value: \"first\"},\n",
///     "    0x63: {label: [0x63], value: \"second\"},\n",
///     "  }},\n",
///     "}}",
/// ));
/// ```
pub fn export<V: Debug>(trie: &Trie<V>, settings: &ExportSettings) -> String {
    debug!(records = trie.len(), nodes = trie.node_count(), "exporting trie");
    let mut out = String::with_capacity(trie.node_count() * 32);
    write_node(&mut out, trie.root(), settings, 0);
    out
}

impl<V: Debug> Trie<V> {
    /// Shorthand for [export].
    pub fn export(&self, settings: &ExportSettings) -> String {
        export(self, settings)
    }
}

fn write_node<V: Debug>(out: &mut String, node: NodeRef<'_, V>, settings: &ExportSettings, depth: usize) {
    let mut first = true;
    let mut field = |out: &mut String| {
        if !first {
            out.push_str(", ");
        }
        first = false;
    };

    out.push('{');
    if !node.label().is_empty() {
        field(out);
        out.push_str("label: ");
        write_bytes(out, node.label());
    }
    if let Some(value) = node.value() {
        field(out);
        // Writing into a String cannot fail.
        let _ = write!(out, "value: {value:?}");
    }
    if node.child_count() > 0 {
        field(out);
        let _ = writeln!(out, "children: [{}; 256]{{", settings.type_name());
        for (byte, child) in node.children() {
            indent(out, &settings.padding, depth + 1);
            let _ = write!(out, "0x{byte:02X}: ");
            write_node(out, child, settings, depth + 1);
            out.push_str(",\n");
        }
        indent(out, &settings.padding, depth);
        out.push('}');
    }
    out.push('}');
}

fn write_bytes(out: &mut String, bytes: &[u8]) {
    out.push('[');
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "0x{byte:02X}");
    }
    out.push(']');
}

fn indent(out: &mut String, padding: &str, depth: usize) {
    for _ in 0..depth {
        out.push_str(padding);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ExportSettings, export};
    use crate::Trie;

    #[test]
    pub fn export_empty() {
        let tree = Trie::<u8>::new();
        assert_eq!(export(&tree, &ExportSettings::default()), "{}");
    }

    #[test]
    pub fn export_root_value() {
        let tree = Trie::from([("", 7)]);
        assert_eq!(export(&tree, &ExportSettings::default()), "{value: 7}");
    }

    #[test]
    pub fn export_emoji_chain() {
        let tree = Trie::from_pairs([
            (vec![0xF0u8, 0x9F, 0x91], "short"),
            (vec![0xF0, 0x9F, 0x91, 0x10], "modified"),
            (vec![0xF0, 0x9F, 0x91, 0xA8], "nokey"),
            (vec![0xF0, 0x9F, 0x91, 0xA8, 0xE2, 0x80, 0x8D], "withsep"),
            (
                vec![0xF0, 0x9F, 0x91, 0xA8, 0xE2, 0x80, 0x8D, 0xF0, 0x9F, 0x94, 0xA7],
                "withkey",
            ),
        ]);
        let settings = ExportSettings::default().with_alias("T");

        let expected = concat!(
            "{children: [T; 256]{\n",
            "    0xF0: {label: [0xF0, 0x9F, 0x91], value: \"short\", children: [T; 256]{\n",
            "        0x10: {label: [0x10], value: \"modified\"},\n",
            "        0xA8: {label: [0xA8], value: \"nokey\", children: [T; 256]{\n",
            "            0xE2: {label: [0xE2, 0x80, 0x8D], value: \"withsep\", children: [T; 256]{\n",
            "                0xF0: {label: [0xF0, 0x9F, 0x94, 0xA7], value: \"withkey\"},\n",
            "            }},\n",
            "        }},\n",
            "    }},\n",
            "}}",
        );
        assert_eq!(tree.export(&settings), expected);
    }

    #[test]
    pub fn export_is_independent_of_insertion_order() {
        let pairs = [
            ("float", 31.7),
            ("float.round", 32.0),
            ("int", 16.0),
            ("uint", 15.0),
            ("uint64", 21.0),
            ("uint32", 20.0),
            ("bool", 1.0),
            ("bytes", 0.0),
        ];
        let forward = Trie::from(pairs);
        let hashed = Trie::from(pairs.into_iter().collect::<HashMap<_, _>>());

        let settings = ExportSettings::default().with_padding("\t");
        let text = forward.export(&settings);
        assert_eq!(text, hashed.export(&settings));

        let expected = concat!(
            "{children: [Node; 256]{\n",
            "\t0x62: {label: [0x62], children: [Node; 256]{\n",
            "\t\t0x6F: {label: [0x6F, 0x6F, 0x6C], value: 1.0},\n",
            "\t\t0x79: {label: [0x79, 0x74, 0x65, 0x73], value: 0.0},\n",
            "\t}},\n",
            "\t0x66: {label: [0x66, 0x6C, 0x6F, 0x61, 0x74], value: 31.7, children: [Node; 256]{\n",
            "\t\t0x2E: {label: [0x2E, 0x72, 0x6F, 0x75, 0x6E, 0x64], value: 32.0},\n",
            "\t}},\n",
            "\t0x69: {label: [0x69, 0x6E, 0x74], value: 16.0},\n",
            "\t0x75: {label: [0x75, 0x69, 0x6E, 0x74], value: 15.0, children: [Node; 256]{\n",
            "\t\t0x33: {label: [0x33, 0x32], value: 20.0},\n",
            "\t\t0x36: {label: [0x36, 0x34], value: 21.0},\n",
            "\t}},\n",
            "}}",
        );
        assert_eq!(text, expected);
    }
}
