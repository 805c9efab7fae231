//! One document through the whole chain: identifier, match, scan, annotate.

use crate::completeness::{self, ConfigValue};
use crate::config::Config;
use crate::enrich::{self, IssueLookup};
use crate::identifier;
use crate::matcher;
use crate::scanner;
use crate::types::{Annotation, DocumentIdentifier, ErrorQuery, MatchResult};

/// Everything computed for one document, kept together for reporting.
#[derive(Debug)]
pub struct DocumentReport<'c> {
    /// Rendered annotations, one per query.
    pub annotations: Vec<Annotation>,
    /// Repository and file derived from the URI.
    pub identifier: DocumentIdentifier,
    /// Matcher output, or the root-marker result when settings are absent.
    pub match_result: Option<MatchResult<'c>>,
    /// Error statements found in the text.
    pub queries: Vec<ErrorQuery>,
}

/// Annotate a document's text. `lookup`, when given, attaches issue counts.
pub fn annotate_document<'c>(
    config: &'c Config,
    uri: &str,
    text: &str,
    lookup: Option<&dyn IssueLookup>,
) -> DocumentReport<'c> {
    let identifier = identifier::extract(uri, &config.code_hosts);
    let match_result = match_document(config, &identifier);

    if !config.inline {
        log::debug!("inline annotations disabled, skipping {uri}");
        return DocumentReport {
            annotations: Vec::new(),
            identifier,
            match_result,
            queries: Vec::new(),
        };
    }

    let project = match_result.as_ref().and_then(|m| return m.project);
    let queries = scanner::scan_with_patterns(text, project.and_then(|p| return p.line_patterns.as_deref()));
    let mut annotations = config.link_builder().build(match_result.as_ref(), &queries);

    if let Some(lookup) = lookup {
        let project_id = project.and_then(|p| return p.known_project_id());
        enrich::enrich(&mut annotations, &queries, project_id, lookup);
    }

    return DocumentReport {
        annotations,
        identifier,
        match_result,
        queries,
    };
}

/// Match a document against the settings.
///
/// An absent `projects` block yields a project-less result carrying the
/// root marker so the annotation copy asks for configuration.
pub fn match_document<'c>(config: &'c Config, identifier: &DocumentIdentifier) -> Option<MatchResult<'c>> {
    let Some(projects) = config.projects.as_deref() else {
        return Some(MatchResult {
            missing_configs: completeness::find_missing(&ConfigValue::from_projects(None), ""),
            project: None,
        });
    };
    return matcher::match_project(identifier, projects);
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::error::Error;

    fn config(content: &str) -> Config {
        Config::parse(content, Path::new(".logref.toml")).unwrap()
    }

    const WIDGETS: &str = r#"
organization = "acme"

[[projects]]
project_id = "7"

[[projects.filters]]
repository_patterns = ["acme/widgets"]
file_patterns = ['\.tsx?$']
"#;

    const DOCUMENT: &str = "import React from 'react'\n\nexport function App() {\n    throw new Error('boom')\n}\n";

    #[test]
    fn matched_document_gets_scoped_links() {
        let config = config(WIDGETS);
        let report = annotate_document(&config, "git://github.com/acme/widgets?abc#web/app.tsx", DOCUMENT, None);

        assert_eq!(report.identifier.repository.as_deref(), Some("acme/widgets"));
        assert_eq!(report.annotations.len(), 1);
        let annotation = &report.annotations[0];
        assert_eq!(annotation.line_number, 3);
        assert_eq!(annotation.content_text, "View logs »");
        assert_eq!(annotation.hover_text, "View logs »");
        assert_eq!(annotation.background_color, "#e03e2f");
        assert!(annotation.link_url.contains("project=7"));
        assert!(annotation.link_url.contains("query=is%3Aunresolved+\"boom\""));
        assert!(report.match_result.unwrap().missing_configs.is_empty());
    }

    #[test]
    fn empty_line_patterns_also_use_builtins() {
        let config = config(&WIDGETS.replace("project_id = \"7\"", "project_id = \"7\"\nline_patterns = []"));
        let report = annotate_document(&config, "git://github.com/acme/widgets#web/app.tsx", DOCUMENT, None);
        assert_eq!(report.annotations.len(), 1);
        assert_eq!(report.annotations[0].content_text, "View logs »");
        assert_eq!(report.annotations[0].background_color, "#e03e2f");
    }

    #[test]
    fn absent_settings_ask_for_configuration() {
        let config = config("organization = \"acme\"\n");
        let report = annotate_document(&config, "git://github.com/acme/widgets#web/app.tsx", DOCUMENT, None);
        let result = report.match_result.unwrap();
        assert_eq!(result.missing_configs, vec!["settings".to_string()]);
        assert_eq!(report.annotations[0].content_text, "Configure the extension to view logs");
        assert_eq!(report.annotations[0].link_url, "");
    }

    #[test]
    fn unmatched_document_falls_back_to_builtins() {
        let config = config(WIDGETS);
        let report = annotate_document(&config, "untitled:scratch", "throw new Error('x')\n", None);
        assert!(report.match_result.is_none());
        assert_eq!(report.queries.len(), 1);
        assert_eq!(report.annotations[0].link_url, "https://sentry.io/organizations/acme/issues/");
    }

    #[test]
    fn disabled_inline_produces_nothing() {
        let config = config("inline = false\norganization = \"acme\"\n");
        let report = annotate_document(&config, "git://github.com/acme/widgets#a.ts", DOCUMENT, None);
        assert!(report.annotations.is_empty());
        assert!(report.queries.is_empty());
    }

    #[test]
    fn failing_lookup_keeps_annotations() {
        struct Down;
        impl IssueLookup for Down {
            fn open_issue_count(&self, _: Option<&str>, query: &str) -> Result<u64, Error> {
                Err(Error::LookupFailed { query: query.to_string(), reason: "timeout".to_string() })
            }
        }

        let config = config(WIDGETS);
        let report = annotate_document(&config, "git://github.com/acme/widgets#web/app.tsx", DOCUMENT, Some(&Down));
        assert_eq!(report.annotations.len(), 1);
        assert_eq!(report.annotations[0].issue_count, None);
        assert!(!report.annotations[0].link_url.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let config = config(WIDGETS);
        let uri = "git://github.com/acme/widgets#web/app.tsx";
        let first = annotate_document(&config, uri, DOCUMENT, None).annotations;
        let second = annotate_document(&config, uri, DOCUMENT, None).annotations;
        assert_eq!(first, second);
    }
}
