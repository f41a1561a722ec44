//! Record flattener.
//!
//! Turns each source document with N questions into N output rows. Every
//! column except `Question` is computed once per document and replicated
//! across its rows.

use serde_json::Value;
use tracing::warn;

use qnatsv_shared::{OutputRow, QnaExport, SUGGESTED_QUESTIONS, SourceDocument, bool_text};
use qnatsv_text::sanitize;

/// Columns shared by every row derived from one document.
#[derive(Debug, Clone)]
struct SharedColumns {
    answer: String,
    source: String,
    metadata: String,
    is_context_only: String,
    prompts: String,
    qna_id: String,
    source_display_name: String,
}

impl SharedColumns {
    fn resolve(doc: &SourceDocument) -> Self {
        let source = sanitize(doc.source());
        Self {
            answer: sanitize(doc.answer()),
            metadata: embedded_json(doc.metadata()),
            is_context_only: bool_text(doc.is_context_only()).to_string(),
            prompts: embedded_json(doc.prompts()),
            qna_id: sanitize(&doc.id_text()),
            // No display-name field is read; it mirrors `source`.
            source_display_name: source.clone(),
            source,
        }
    }

    fn row(&self, question: &str) -> OutputRow {
        OutputRow {
            question: sanitize(question),
            answer: self.answer.clone(),
            source: self.source.clone(),
            metadata: self.metadata.clone(),
            suggested_questions: SUGGESTED_QUESTIONS.to_string(),
            is_context_only: self.is_context_only.clone(),
            prompts: self.prompts.clone(),
            qna_id: self.qna_id.clone(),
            source_display_name: self.source_display_name.clone(),
        }
    }
}

/// Lazily flatten `export` into rows, in document order and, within a
/// document, question order.
pub fn flatten(export: &QnaExport) -> impl Iterator<Item = OutputRow> + '_ {
    export.documents.iter().flat_map(flatten_document)
}

/// Rows derived from a single document; never empty.
pub fn flatten_document(doc: &SourceDocument) -> impl Iterator<Item = OutputRow> + '_ {
    if doc.has_empty_questions() {
        warn!(id = %doc.id_text(), "document has an empty questions array, emitting one blank question");
    }

    let shared = SharedColumns::resolve(doc);
    doc.questions()
        .into_iter()
        .map(move |question| shared.row(question))
}

/// Number of rows [`flatten`] yields for `export`.
pub fn row_count(export: &QnaExport) -> usize {
    export
        .documents
        .iter()
        .map(|doc| doc.questions().len())
        .sum()
}

/// Serialize a structured value into a single cell.
///
/// serde_json escapes control characters, so the result never holds a raw
/// tab or line break. Non-ASCII text is written as UTF-8, not `\u` escapes.
fn embedded_json(values: &[Value]) -> String {
    serde_json::to_string(values).expect("JSON values always serialize")
}
