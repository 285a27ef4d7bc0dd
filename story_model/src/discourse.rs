//! Discourse coordinates: documents and positions inside them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ModelError;

/// Identifier of a source document (usually one chapter file).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create a document id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Narrative position of a span inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoursePosition {
    /// Explicit chapter number, when the document carries one.
    pub chapter: Option<u32>,
    /// Paragraph index within the document.
    pub paragraph: u32,
    /// Sentence index within the paragraph.
    pub sentence: Option<u32>,
}

impl DiscoursePosition {
    /// Create a position at a paragraph.
    pub fn new(paragraph: u32) -> Self {
        Self {
            chapter: None,
            paragraph,
            sentence: None,
        }
    }

    /// Set the explicit chapter.
    pub fn with_chapter(mut self, chapter: u32) -> Self {
        self.chapter = Some(chapter);
        self
    }

    /// Set the sentence.
    pub fn with_sentence(mut self, sentence: u32) -> Self {
        self.sentence = Some(sentence);
        self
    }
}

/// Cross-document ordering metadata: (document, order index) pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentOrder {
    indices: HashMap<DocumentId, u32>,
}

impl DocumentOrder {
    /// Create an empty ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the ordering from upstream pairs, rejecting repeated documents.
    pub fn from_pairs<I, D>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (D, u32)>,
        D: Into<DocumentId>,
    {
        let mut indices: HashMap<DocumentId, u32> = HashMap::new();
        for (doc, index) in pairs {
            let doc = doc.into();
            if let Some(first) = indices.get(&doc) {
                return Err(ModelError::DuplicateDocument {
                    document: doc,
                    first: *first,
                    second: index,
                });
            }
            indices.insert(doc, index);
        }
        Ok(Self { indices })
    }

    /// Order index of a listed document.
    pub fn index_of(&self, doc: &DocumentId) -> Option<u32> {
        self.indices.get(doc).copied()
    }

    /// Sort rank of a document; documents missing from the metadata go last.
    pub fn rank(&self, doc: &DocumentId) -> u32 {
        self.index_of(doc).unwrap_or(u32::MAX)
    }

    /// Chapter number for a document: its order index, or one past the
    /// largest known index when the document is missing, so it sorts after
    /// every listed document the same way [`rank`](Self::rank) does.
    pub fn chapter_of(&self, doc: &DocumentId) -> u32 {
        self.index_of(doc).unwrap_or_else(|| {
            self.indices
                .values()
                .max()
                .map_or(0, |last| last.saturating_add(1))
        })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_ranks() {
        let order = DocumentOrder::from_pairs(vec![("ch1", 0), ("ch2", 1)]).unwrap();

        assert_eq!(order.index_of(&DocumentId::from("ch2")), Some(1));
        assert_eq!(order.rank(&DocumentId::from("appendix")), u32::MAX);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_missing_document_chapter_follows_listed() {
        let order = DocumentOrder::from_pairs(vec![("ch1", 1), ("ch2", 2)]).unwrap();

        assert_eq!(order.chapter_of(&DocumentId::from("ch1")), 1);
        assert_eq!(order.chapter_of(&DocumentId::from("epilogue")), 3);
        assert_eq!(DocumentOrder::new().chapter_of(&DocumentId::from("epilogue")), 0);
    }

    #[test]
    fn test_document_order_rejects_duplicates() {
        let err = DocumentOrder::from_pairs(vec![("ch1", 0), ("ch1", 3)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateDocument {
                document: DocumentId::from("ch1"),
                first: 0,
                second: 3,
            }
        );
    }
}
