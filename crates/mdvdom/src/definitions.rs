//! Definition and footnote resolution for one compilation.
//!
//! [`Definitions`] indexes every `definition` node of a document by
//! upper-cased identifier. [`Footnotes`] starts with every explicit
//! `footnoteDefinition` and grows while inline footnotes are compiled.
//! Both borrow from the source tree and live only as long as one call.

use std::collections::{HashMap, HashSet};

use crate::mdast::{Definition, Node};

/// Link and image definitions keyed by upper-cased identifier.
#[derive(Debug, Default)]
pub struct Definitions<'a> {
    index: HashMap<String, &'a Definition>,
}

impl<'a> Definitions<'a> {
    /// Index all definitions in `root`. When an identifier is defined more
    /// than once, the last definition in document order wins.
    #[must_use]
    pub fn collect(root: &'a Node) -> Self {
        let mut index = HashMap::new();
        root.walk(&mut |node| {
            if let Node::Definition(definition) = node {
                index.insert(definition.identifier.to_uppercase(), definition);
            }
        });
        Self { index }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&'a Definition> {
        self.index.get(&identifier.to_uppercase()).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }
}

/// One footnote body awaiting rendering.
#[derive(Clone, Debug)]
pub struct FootnoteEntry<'a> {
    pub identifier: String,
    pub children: &'a [Node],
}

/// Footnote bodies in the order they will be rendered.
#[derive(Debug, Default)]
pub struct Footnotes<'a> {
    entries: Vec<FootnoteEntry<'a>>,
}

impl<'a> Footnotes<'a> {
    /// Collect all explicit footnote definitions in `root`, in document order.
    #[must_use]
    pub fn collect(root: &'a Node) -> Self {
        let mut entries = Vec::new();
        root.walk(&mut |node| {
            if let Node::FootnoteDefinition(definition) = node {
                entries.push(FootnoteEntry {
                    identifier: definition.identifier.clone(),
                    children: &definition.children,
                });
            }
        });
        Self { entries }
    }

    /// Register an inline footnote body under the lowest positive integer
    /// identifier not yet taken, and return that identifier.
    pub fn push_inline(&mut self, children: &'a [Node]) -> String {
        let taken: HashSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.identifier.as_str())
            .collect();
        let identifier = (1_u64..)
            .map(|n| n.to_string())
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_default();

        tracing::trace!(identifier = %identifier, "Allocated inline footnote identifier");
        self.entries.push(FootnoteEntry {
            identifier: identifier.clone(),
            children,
        });
        identifier
    }

    #[must_use]
    pub fn entries(&self) -> &[FootnoteEntry<'a>] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
