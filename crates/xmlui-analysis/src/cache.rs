//! Version-keyed parse cache.
//!
//! One entry per open document. A parse is reused while the editor-reported
//! version is unchanged and replaced wholesale when it moves; there is no
//! partial invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use xmlui_parser::{Node, ParseResult};

/// A parse together with the text and version it was made from.
#[derive(Debug, Clone)]
pub struct CachedDocument {
    pub version: i32,
    pub source: Arc<str>,
    pub result: Arc<ParseResult>,
}

impl CachedDocument {
    fn parse(version: i32, source: &str) -> Self {
        Self {
            version,
            source: Arc::from(source),
            result: Arc::new(xmlui_parser::parse(source)),
        }
    }

    pub fn root(&self) -> &Node {
        &self.result.node
    }

    /// Text of a node from this document.
    pub fn text(&self, node: &Node, ignore_trivia: bool) -> &str {
        xmlui_parser::get_text(&self.source, node, ignore_trivia)
    }
}

#[derive(Debug)]
struct Entry {
    document: CachedDocument,
    stale: bool,
}

/// Parse results of open documents, keyed by document identifier.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<String, Entry>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the parse of `source` at `version`, reusing the cached one when
    /// the identifier and version match.
    pub fn parse(&mut self, id: &str, version: i32, source: &str) -> CachedDocument {
        if let Some(entry) = self.entries.get(id) {
            if !entry.stale && entry.document.version == version {
                debug!(id, version, "parse cache hit");
                return entry.document.clone();
            }
        }

        debug!(id, version, "parse cache miss");
        let document = CachedDocument::parse(version, source);
        self.entries.insert(
            id.to_string(),
            Entry {
                document: document.clone(),
                stale: false,
            },
        );
        document
    }

    /// The cached parse for `id`, only if it was made at `version`.
    pub fn get(&self, id: &str, version: i32) -> Option<CachedDocument> {
        self.entries
            .get(id)
            .filter(|entry| !entry.stale && entry.document.version == version)
            .map(|entry| entry.document.clone())
    }

    /// Force the next [`parse`](Self::parse) of `id` to re-parse, whatever
    /// version it is called with. Returns whether `id` was cached.
    pub fn invalidate(&mut self, id: &str) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                debug!(id, "parse cache invalidated");
                entry.stale = true;
                true
            }
            None => false,
        }
    }

    /// Forget a closed document.
    pub fn remove(&mut self, id: &str) -> Option<CachedDocument> {
        self.entries.remove(id).map(|entry| entry.document)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_version_is_reused() {
        let mut cache = DocumentCache::new();
        let first = cache.parse("a.xmlui", 1, "<A/>");
        let second = cache.parse("a.xmlui", 1, "<B/>");
        assert!(Arc::ptr_eq(&first.result, &second.result));
        assert_eq!(&*second.source, "<A/>");
    }

    #[test]
    fn test_new_version_replaces_entry() {
        let mut cache = DocumentCache::new();
        let first = cache.parse("a.xmlui", 1, "<A/>");
        let second = cache.parse("a.xmlui", 2, "<A></B>");
        assert!(!Arc::ptr_eq(&first.result, &second.result));
        assert_eq!(second.result.errors.len(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a.xmlui", 1).is_none());
        assert!(cache.get("a.xmlui", 2).is_some());
    }

    #[test]
    fn test_documents_are_independent() {
        let mut cache = DocumentCache::new();
        cache.parse("a", 1, "<A/>");
        cache.parse("b", 1, "<B x='1' x='2'/>");
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a", 1).unwrap().result.errors.is_empty());
        assert_eq!(cache.get("b", 1).unwrap().result.errors.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reparse() {
        let mut cache = DocumentCache::new();
        let first = cache.parse("a", 3, "<A/>");
        assert!(cache.invalidate("a"));
        assert!(cache.get("a", 3).is_none());
        let second = cache.parse("a", 3, "<A/>");
        assert!(!Arc::ptr_eq(&first.result, &second.result));
        assert!(!cache.invalidate("missing"));
    }

    #[test]
    fn test_remove() {
        let mut cache = DocumentCache::new();
        cache.parse("a", 1, "<A/>");
        assert_eq!(cache.remove("a").map(|d| d.version), Some(1));
        assert!(cache.is_empty());
        assert!(cache.remove("a").is_none());
    }

    #[test]
    fn test_text_accessor() {
        let mut cache = DocumentCache::new();
        let doc = cache.parse("a", 1, "  <A/>");
        let element = &doc.root().children[0];
        assert_eq!(doc.text(element, true), "<A/>");
        assert_eq!(doc.text(element, false), "  <A/>");
    }
}
