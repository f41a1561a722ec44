//! Core domain types: the knowledge-base export as read, and the flat row
//! written to the main TSV file.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Question used when a document has no questions.
pub const DEFAULT_QUESTION: &str = "";
/// Answer used when a document has none.
pub const DEFAULT_ANSWER: &str = "";
/// Source used when a document has none.
pub const DEFAULT_SOURCE: &str = "";
/// Identifier text used when a document has no `id`.
pub const DEFAULT_ID: &str = "";
/// `context.isContextOnly` when absent.
pub const DEFAULT_IS_CONTEXT_ONLY: bool = false;
/// The export format never populates suggested questions.
pub const SUGGESTED_QUESTIONS: &str = "[]";

// ---------------------------------------------------------------------------
// QnaExport
// ---------------------------------------------------------------------------

/// Root structure of a knowledge-base export file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QnaExport {
    /// The document collection. Absent or `null` means empty.
    #[serde(
        rename = "qnaDocuments",
        default,
        deserialize_with = "null_as_default"
    )]
    pub documents: Vec<SourceDocument>,
}

impl QnaExport {
    /// Parse an export from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// SourceDocument
// ---------------------------------------------------------------------------

/// One entry of the `qnaDocuments` collection.
///
/// Every field is optional. Fields are read only through the resolver
/// methods below, which apply the `DEFAULT_*` constants; an explicit JSON
/// `null` resolves exactly like a missing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    /// A `null` entry stands for an empty question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Key/value entries, kept verbatim (order included).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<DocumentContext>,
}

impl SourceDocument {
    /// Questions in source order; never empty.
    ///
    /// An absent, `null` or empty `questions` array resolves to a single
    /// [`DEFAULT_QUESTION`] so that every document yields at least one row.
    /// `null` entries resolve to [`DEFAULT_QUESTION`] in place.
    pub fn questions(&self) -> Vec<&str> {
        match self.questions.as_deref() {
            Some(qs) if !qs.is_empty() => qs
                .iter()
                .map(|q| q.as_deref().unwrap_or(DEFAULT_QUESTION))
                .collect(),
            _ => vec![DEFAULT_QUESTION],
        }
    }

    /// Whether the document carried an explicit but empty `questions` array.
    pub fn has_empty_questions(&self) -> bool {
        self.questions.as_ref().is_some_and(Vec::is_empty)
    }

    pub fn answer(&self) -> &str {
        self.answer.as_deref().unwrap_or(DEFAULT_ANSWER)
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }

    pub fn metadata(&self) -> &[Value] {
        self.metadata.as_deref().unwrap_or_default()
    }

    pub fn is_context_only(&self) -> bool {
        self.context
            .as_ref()
            .and_then(|c| c.is_context_only)
            .unwrap_or(DEFAULT_IS_CONTEXT_ONLY)
    }

    pub fn prompts(&self) -> &[Value] {
        self.context
            .as_ref()
            .and_then(|c| c.prompts.as_deref())
            .unwrap_or_default()
    }

    /// The identifier as text, [`DEFAULT_ID`] when absent.
    pub fn id_text(&self) -> String {
        self.id
            .as_ref()
            .map_or_else(|| DEFAULT_ID.to_string(), ToString::to_string)
    }
}

/// The optional `context` block of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentContext {
    #[serde(
        rename = "isContextOnly",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_context_only: Option<bool>,
    /// Follow-up prompts, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// DocumentId
// ---------------------------------------------------------------------------

/// A document identifier, numeric or textual in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputRow
// ---------------------------------------------------------------------------

/// One row of the main TSV file: a single (document, question) pair.
///
/// All text columns are already sanitized when the row is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub question: String,
    pub answer: String,
    pub source: String,
    /// Embedded JSON text of the metadata entries.
    pub metadata: String,
    pub suggested_questions: String,
    /// `True` or `False`.
    pub is_context_only: String,
    /// Embedded JSON text of the prompts.
    pub prompts: String,
    pub qna_id: String,
    pub source_display_name: String,
}

impl OutputRow {
    /// Column names, in output order.
    pub const HEADER: [&'static str; 9] = [
        "Question",
        "Answer",
        "Source",
        "Metadata",
        "SuggestedQuestions",
        "IsContextOnly",
        "Prompts",
        "QnaId",
        "SourceDisplayName",
    ];

    /// The header line, without line terminator.
    pub fn header_line() -> String {
        Self::HEADER.join("\t")
    }

    /// Column values, in output order.
    pub fn columns(&self) -> [&str; 9] {
        [
            &self.question,
            &self.answer,
            &self.source,
            &self.metadata,
            &self.suggested_questions,
            &self.is_context_only,
            &self.prompts,
            &self.qna_id,
            &self.source_display_name,
        ]
    }

    /// Tab-joined columns, without line terminator.
    pub fn to_tsv_line(&self) -> String {
        self.columns().join("\t")
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Canonical text form of a boolean column.
pub fn bool_text(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collection_is_empty() {
        let export = QnaExport::from_json("{}").unwrap();
        assert!(export.documents.is_empty());

        let export = QnaExport::from_json(r#"{"qnaDocuments": null}"#).unwrap();
        assert!(export.documents.is_empty());
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(QnaExport::from_json("[1, 2, 3]").is_err());
        assert!(QnaExport::from_json(r#"{"qnaDocuments": [1]}"#).is_err());
        assert!(QnaExport::from_json(r#"{"qnaDocuments": {"id": 1}}"#).is_err());
    }

    #[test]
    fn absent_fields_resolve_to_defaults() {
        let export = QnaExport::from_json(r#"{"qnaDocuments": [{}]}"#).unwrap();
        let doc = &export.documents[0];
        assert_eq!(doc.questions(), vec![""]);
        assert_eq!(doc.answer(), "");
        assert_eq!(doc.source(), "");
        assert!(doc.metadata().is_empty());
        assert!(!doc.is_context_only());
        assert!(doc.prompts().is_empty());
        assert_eq!(doc.id_text(), "");
    }

    #[test]
    fn null_fields_resolve_like_absent_ones() {
        let json = r#"{"qnaDocuments": [{
            "id": null, "questions": null, "answer": null, "source": null,
            "metadata": null, "context": {"isContextOnly": null, "prompts": null}
        }]}"#;
        let export = QnaExport::from_json(json).unwrap();
        let doc = &export.documents[0];
        assert_eq!(doc.questions(), vec![""]);
        assert_eq!(doc.answer(), "");
        assert!(!doc.is_context_only());
        assert_eq!(doc.id_text(), "");
    }

    #[test]
    fn empty_questions_array_still_yields_one_question() {
        let export = QnaExport::from_json(r#"{"qnaDocuments": [{"questions": []}]}"#).unwrap();
        let doc = &export.documents[0];
        assert!(doc.has_empty_questions());
        assert_eq!(doc.questions(), vec![""]);
    }

    #[test]
    fn null_question_entry_resolves_to_default() {
        let export =
            QnaExport::from_json(r#"{"qnaDocuments": [{"questions": ["Hi", null, "Bye"]}]}"#)
                .unwrap();
        let doc = &export.documents[0];
        assert!(!doc.has_empty_questions());
        assert_eq!(doc.questions(), vec!["Hi", "", "Bye"]);
    }

    #[test]
    fn numeric_and_text_ids_render_as_text() {
        let json = r#"{"qnaDocuments": [{"id": 42}, {"id": "abc-1"}, {"id": 2.5}]}"#;
        let export = QnaExport::from_json(json).unwrap();
        let ids: Vec<String> = export.documents.iter().map(SourceDocument::id_text).collect();
        assert_eq!(ids, vec!["42", "abc-1", "2.5"]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"qnaDocuments": [{"id": 1, "lastUpdatedTimestamp": "2020-01-01", "isDocumentText": false}]}"#;
        let export = QnaExport::from_json(json).unwrap();
        assert_eq!(export.documents.len(), 1);
    }

    #[test]
    fn metadata_keeps_key_order() {
        let json = r#"{"qnaDocuments": [{"metadata": [{"value": "b", "name": "a"}]}]}"#;
        let export = QnaExport::from_json(json).unwrap();
        let text = serde_json::to_string(export.documents[0].metadata()).unwrap();
        assert_eq!(text, r#"[{"value":"b","name":"a"}]"#);
    }

    #[test]
    fn row_line_follows_header_order() {
        let row = OutputRow {
            question: "Q".into(),
            answer: "A".into(),
            source: "S".into(),
            metadata: "[]".into(),
            suggested_questions: SUGGESTED_QUESTIONS.into(),
            is_context_only: bool_text(true).into(),
            prompts: "[]".into(),
            qna_id: "7".into(),
            source_display_name: "S".into(),
        };
        assert_eq!(row.to_tsv_line(), "Q\tA\tS\t[]\t[]\tTrue\t[]\t7\tS");
        assert_eq!(
            OutputRow::header_line(),
            "Question\tAnswer\tSource\tMetadata\tSuggestedQuestions\tIsContextOnly\tPrompts\tQnaId\tSourceDisplayName"
        );
    }
}
