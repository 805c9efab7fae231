//! Turns a project match and scan results into per-line annotations.
//!
//! Copy and link scope come from an ordered rule table; the first rule whose
//! condition holds decides for the whole document.

use crate::completeness::{self, ROOT_MARKER};
use crate::link;
use crate::types::{Annotation, ErrorQuery, MatchResult};

/// Background of a fully configured annotation.
const COMPLETE_COLOR: &str = "#e03e2f";

/// Background of every degraded annotation.
const WARNING_COLOR: &str = "#f2736d";

/// Content text shown while the configuration is incomplete.
const INCOMPLETE_CONTENT: &str = "View logs (incomplete)» ";

/// Evaluation order, first match wins; `Complete` always applies.
const RULES: [Rule; 6] = [
    Rule::Unconfigured,
    Rule::SettingsAbsent,
    Rule::RepositoryMissing,
    Rule::NoProject,
    Rule::Incomplete,
    Rule::Complete,
];

/// Which part of the tracker a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkScope {
    /// No link at all.
    Empty,
    /// The organization's issues page.
    Organization,
    /// Project issues filtered by the line's error text; org-level without a project id.
    Project,
}

/// Conditions of the rule table. [`RULES`] fixes the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Project matched and fully configured.
    Complete,
    /// Some other setting is absent or empty.
    Incomplete,
    /// No project accepted the document.
    NoProject,
    /// The matched project does not constrain repositories.
    RepositoryMissing,
    /// The settings block is absent altogether.
    SettingsAbsent,
    /// No organization configured.
    Unconfigured,
}

/// Document-wide inputs the rules look at.
struct RuleContext<'r, 'a> {
    /// Matcher output; `None` when no project accepted the document.
    match_result: Option<&'r MatchResult<'a>>,
    /// Configured organization, blank treated as unset.
    organization: Option<&'r str>,
}

impl RuleContext<'_, '_> {
    /// The missing-settings report, empty when nothing matched.
    fn missing(&self) -> &[String] {
        let Some(matched) = self.match_result else {
            return &[];
        };
        return &matched.missing_configs;
    }
}

impl Rule {
    /// Whether the rule's condition holds.
    fn applies(self, ctx: &RuleContext<'_, '_>) -> bool {
        return match self {
            Self::Unconfigured => ctx.organization.is_none(),
            Self::SettingsAbsent => ctx.missing().iter().any(|p| return p == ROOT_MARKER),
            Self::RepositoryMissing => ctx.missing().iter().any(|p| return completeness::is_repository_path(p)),
            Self::NoProject => ctx.match_result.is_none_or(|m| return m.project.is_none()),
            Self::Incomplete => !ctx.missing().is_empty(),
            Self::Complete => true,
        };
    }

    /// Content text, hover text, color, and link scope for this rule.
    fn decoration(self, ctx: &RuleContext<'_, '_>) -> Decoration {
        return match self {
            Self::Unconfigured | Self::SettingsAbsent => Decoration {
                color: WARNING_COLOR,
                content: "Configure the extension to view logs".to_string(),
                hover: "Configure the extension to view logs in the issue tracker.".to_string(),
                scope: LinkScope::Empty,
            },
            Self::RepositoryMissing => Decoration {
                color: WARNING_COLOR,
                content: INCOMPLETE_CONTENT.to_string(),
                hover: "Add this repository to your settings for project matching.".to_string(),
                scope: LinkScope::Project,
            },
            Self::NoProject => Decoration {
                color: WARNING_COLOR,
                content: INCOMPLETE_CONTENT.to_string(),
                hover: "Add projects to your settings for project matching.".to_string(),
                scope: LinkScope::Organization,
            },
            Self::Incomplete => Decoration {
                color: WARNING_COLOR,
                content: INCOMPLETE_CONTENT.to_string(),
                hover: format!(
                    "Please fill out the following configurations in your settings: {}",
                    ctx.missing().join(", ")
                ),
                scope: LinkScope::Project,
            },
            Self::Complete => Decoration {
                color: COMPLETE_COLOR,
                content: "View logs »".to_string(),
                hover: "View logs »".to_string(),
                scope: LinkScope::Project,
            },
        };
    }
}

/// Outcome of the rule table, shared by every annotation of a document.
struct Decoration {
    /// Background color.
    color: &'static str,
    /// Short text after the line.
    content: String,
    /// Hover text.
    hover: String,
    /// Link target.
    scope: LinkScope,
}

/// Builds annotations and their deep links for one tracker organization.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    /// Tracker host, e.g. `sentry.io`.
    pub host: String,
    /// Tracker organization; blank or `None` means unconfigured.
    pub organization: Option<String>,
    /// Relative lookback window appended to scoped links.
    pub stats_period: String,
}

impl LinkBuilder {
    /// One annotation per query, at the query's line, in query order.
    pub fn build(&self, match_result: Option<&MatchResult<'_>>, queries: &[ErrorQuery]) -> Vec<Annotation> {
        let ctx = RuleContext {
            match_result,
            organization: self.organization.as_deref().filter(|org| return !org.trim().is_empty()),
        };
        let rule = RULES
            .iter()
            .copied()
            .find(|rule| return rule.applies(&ctx))
            .unwrap_or(Rule::Complete);
        let decoration = rule.decoration(&ctx);
        let project_id = match_result
            .and_then(|m| return m.project)
            .and_then(|p| return p.known_project_id());

        return queries
            .iter()
            .map(|query| {
                return Annotation {
                    background_color: decoration.color.to_string(),
                    content_text: decoration.content.clone(),
                    hover_text: decoration.hover.clone(),
                    issue_count: None,
                    line_number: query.line_number,
                    link_url: self.link_for(ctx.organization, decoration.scope, project_id, &query.text),
                };
            })
            .collect();
    }

    /// Render the link for one query.
    fn link_for(
        &self,
        organization: Option<&str>,
        scope: LinkScope,
        project_id: Option<&str>,
        error_text: &str,
    ) -> String {
        let Some(org) = organization else {
            return String::new();
        };
        return match (scope, project_id) {
            (LinkScope::Empty, _) => String::new(),
            (LinkScope::Organization, _) | (LinkScope::Project, None) => {
                link::organization_issues_url(&self.host, org)
            },
            (LinkScope::Project, Some(id)) => {
                link::project_issues_url(&self.host, org, id, error_text, &self.stats_period)
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pattern, ProjectConfig, ProjectFilter};

    fn builder(org: Option<&str>) -> LinkBuilder {
        LinkBuilder {
            host: link::DEFAULT_HOST.to_string(),
            organization: org.map(str::to_string),
            stats_period: link::DEFAULT_STATS_PERIOD.to_string(),
        }
    }

    fn project() -> ProjectConfig {
        ProjectConfig {
            filters: Some(vec![ProjectFilter {
                file_patterns: None,
                repository_patterns: Some(vec![Pattern::new("sourcegraph").unwrap()]),
            }]),
            line_patterns: None,
            name: None,
            project_id: Some("134412".to_string()),
        }
    }

    fn queries() -> Vec<ErrorQuery> {
        vec![
            ErrorQuery { line_number: 5, text: "cannot determine file path".to_string() },
            ErrorQuery { line_number: 9, text: "cannot determine file path".to_string() },
        ]
    }

    #[test]
    fn unconfigured_organization_has_no_link() {
        let project = project();
        let matched = MatchResult { missing_configs: Vec::new(), project: Some(&project) };
        for org in [None, Some(""), Some("  ")] {
            let annotations = builder(org).build(Some(&matched), &queries());
            assert_eq!(annotations.len(), 2);
            for a in &annotations {
                assert_eq!(a.content_text, "Configure the extension to view logs");
                assert_eq!(a.hover_text, "Configure the extension to view logs in the issue tracker.");
                assert_eq!(a.link_url, "");
            }
        }
    }

    #[test]
    fn absent_settings_ask_for_configuration() {
        let absent = MatchResult { missing_configs: vec![ROOT_MARKER.to_string()], project: None };
        let annotations = builder(Some("sourcegraph")).build(Some(&absent), &queries());
        assert_eq!(annotations[0].content_text, "Configure the extension to view logs");
        assert_eq!(annotations[0].link_url, "");
    }

    #[test]
    fn complete_match_links_to_project_search() {
        let project = project();
        let matched = MatchResult { missing_configs: Vec::new(), project: Some(&project) };
        let annotations = builder(Some("sourcegraph")).build(Some(&matched), &queries());
        let first = &annotations[0];
        assert_eq!(first.line_number, 5);
        assert_eq!(first.content_text, "View logs »");
        assert_eq!(first.hover_text, "View logs »");
        assert_eq!(first.background_color, COMPLETE_COLOR);
        assert_eq!(
            first.link_url,
            "https://sentry.io/organizations/sourcegraph/issues/?project=134412\
             &query=is%3Aunresolved+\"cannot+determine+file+path\"&statsPeriod=14d"
        );
        assert_eq!(annotations[1].line_number, 9);
        assert_eq!(annotations[1].link_url, first.link_url);
    }

    #[test]
    fn missing_repository_asks_to_add_it() {
        let project = project();
        let matched = MatchResult {
            missing_configs: vec![
                "projects[0].line_patterns[0]".to_string(),
                "projects[0].filters[0].repository_patterns".to_string(),
            ],
            project: Some(&project),
        };
        let annotations = builder(Some("sourcegraph")).build(Some(&matched), &queries());
        assert_eq!(annotations[0].content_text, "View logs (incomplete)» ");
        assert_eq!(annotations[0].hover_text, "Add this repository to your settings for project matching.");
        assert!(annotations[0].link_url.contains("project=134412"));
        assert_eq!(annotations[0].background_color, WARNING_COLOR);
    }

    #[test]
    fn missing_repository_without_project_id_links_to_organization() {
        let mut project = project();
        project.project_id = None;
        let matched = MatchResult {
            missing_configs: vec![
                "projects[0].project_id".to_string(),
                "projects[0].filters[0].repository_patterns".to_string(),
            ],
            project: Some(&project),
        };
        let annotations = builder(Some("sourcegraph")).build(Some(&matched), &queries());
        assert_eq!(annotations[0].link_url, "https://sentry.io/organizations/sourcegraph/issues/");
    }

    #[test]
    fn no_match_links_to_organization() {
        let annotations = builder(Some("sourcegraph")).build(None, &queries());
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].hover_text, "Add projects to your settings for project matching.");
        assert_eq!(annotations[0].link_url, "https://sentry.io/organizations/sourcegraph/issues/");
    }

    #[test]
    fn other_gaps_are_enumerated() {
        let project = project();
        let matched = MatchResult {
            missing_configs: vec!["projects[0].project_id".to_string(), "projects[0].line_patterns[2]".to_string()],
            project: Some(&project),
        };
        let annotations = builder(Some("sourcegraph")).build(Some(&matched), &queries());
        assert_eq!(
            annotations[0].hover_text,
            "Please fill out the following configurations in your settings: \
             projects[0].project_id, projects[0].line_patterns[2]"
        );
        assert!(annotations[0].link_url.contains("query=is%3Aunresolved+\"cannot+determine+file+path\""));
    }

    #[test]
    fn unconfigured_organization_wins_over_no_match() {
        let annotations = builder(None).build(None, &queries());
        assert_eq!(annotations[0].content_text, "Configure the extension to view logs");
        assert_eq!(annotations[0].link_url, "");
    }

    #[test]
    fn no_queries_no_annotations() {
        assert!(builder(Some("sourcegraph")).build(None, &[]).is_empty());
    }
}
