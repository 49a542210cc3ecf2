use std::fmt;

use serde::{Deserialize, Serialize};

/// Source texts are split into one document per `##` section.
pub const SECTION_DELIMITER: &str = "##";

/// Index-wide document identifier, allocated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Name of the source text the document was cut from.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalDocument {
    pub id: DocumentId,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// A document paired with its similarity to a query. Higher is closer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: RetrievalDocument,
    pub score: f32,
}

/// Splits `full_text` on the section delimiter, dropping whitespace-only sections.
/// Sections are trimmed and returned in source order.
pub fn split_sections(full_text: &str) -> Vec<&str> {
    full_text
        .split(SECTION_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_markdown_sections() {
        let text = "# Handbook\n\n## Vacation\n30 days.\n\n## Remote work\nTwo days a week.\n";
        assert_eq!(
            split_sections(text),
            vec!["# Handbook", "Vacation\n30 days.", "Remote work\nTwo days a week."]
        );
    }

    #[test]
    fn test_split_drops_empty_sections() {
        assert_eq!(split_sections("##\n\n##  ##a##"), vec!["a"]);
        assert!(split_sections("").is_empty());
        assert!(split_sections("   \n").is_empty());
    }

    #[test]
    fn test_text_without_delimiter_is_one_section() {
        assert_eq!(split_sections("just one paragraph"), vec!["just one paragraph"]);
    }

    #[test]
    fn test_document_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&DocumentId(7)).unwrap(), "7");
    }
}
