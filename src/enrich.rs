//! Optional issue counts from the tracker.
//!
//! A lookup only ever adds information: when it fails the annotation is kept
//! as built, without a count.

use crate::error::Error;
use crate::types::{Annotation, ErrorQuery};

/// Source of open-issue counts for an error search.
pub trait IssueLookup {
    /// Number of unresolved issues matching `query`, optionally within one project.
    ///
    /// # Errors
    ///
    /// Returns `Error::LookupFailed` when the tracker cannot be reached or
    /// answers with something unusable.
    fn open_issue_count(&self, project_id: Option<&str>, query: &str) -> Result<u64, Error>;
}

/// Attach issue counts to annotations built from `queries`.
///
/// Annotations and queries are paired by position, as produced by the
/// annotation builder. Failed lookups are logged and leave `issue_count` unset.
pub fn enrich(
    annotations: &mut [Annotation],
    queries: &[ErrorQuery],
    project_id: Option<&str>,
    lookup: &dyn IssueLookup,
) {
    for (annotation, query) in annotations.iter_mut().zip(queries) {
        if annotation.link_url.is_empty() {
            continue;
        }
        match lookup.open_issue_count(project_id, &query.text) {
            Ok(count) => annotation.issue_count = Some(count),
            Err(e) => log::warn!("line {}: annotating without issue count: {e}", query.line_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Lookup answering from a fixed table; unknown queries fail.
    struct TableLookup(HashMap<&'static str, u64>);

    impl IssueLookup for TableLookup {
        fn open_issue_count(&self, _project_id: Option<&str>, query: &str) -> Result<u64, Error> {
            self.0.get(query).copied().ok_or_else(|| Error::LookupFailed {
                query: query.to_string(),
                reason: "503 Service Unavailable".to_string(),
            })
        }
    }

    fn annotation(line_number: usize, link_url: &str) -> Annotation {
        Annotation {
            background_color: "#e03e2f".to_string(),
            content_text: "View logs »".to_string(),
            hover_text: "View logs »".to_string(),
            issue_count: None,
            line_number,
            link_url: link_url.to_string(),
        }
    }

    fn query(line_number: usize, text: &str) -> ErrorQuery {
        ErrorQuery { line_number, text: text.to_string() }
    }

    #[test]
    fn counts_are_attached_and_failures_degrade() {
        let lookup = TableLookup(HashMap::from([("boom", 3)]));
        let mut annotations = vec![annotation(1, "https://x"), annotation(4, "https://y")];
        let queries = vec![query(1, "boom"), query(4, "unknown")];

        enrich(&mut annotations, &queries, Some("1"), &lookup);

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].issue_count, Some(3));
        assert_eq!(annotations[1].issue_count, None);
        assert_eq!(annotations[1].link_url, "https://y");
    }

    #[test]
    fn unlinked_annotations_are_not_looked_up() {
        let lookup = TableLookup(HashMap::from([("boom", 3)]));
        let mut annotations = vec![annotation(0, "")];
        enrich(&mut annotations, &[query(0, "boom")], None, &lookup);
        assert_eq!(annotations[0].issue_count, None);
    }
}
