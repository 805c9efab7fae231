/// Core domain types for logref documents, projects, and annotations.
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Repository and file extracted from a document URI.
/// Either half may be unknown; scratch buffers and untracked hosts are common.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentIdentifier {
    /// Path of the file inside the repository, without the `#` separator.
    pub file_path: Option<String>,
    /// `owner/name` of the repository on a recognized code host.
    pub repository: Option<String>,
}

/// A compiled regular expression that keeps its source text.
///
/// Deserialized from a plain TOML string; compilation failures surface as
/// deserialization errors so a bad pattern never loads silently.
#[derive(Debug, Clone)]
pub struct Pattern(
    /// The compiled expression.
    Regex,
);

impl Pattern {
    /// The source text the pattern was compiled from.
    pub fn as_str(&self) -> &str {
        return self.0.as_str();
    }

    /// Unanchored search, case-sensitive unless the pattern says otherwise.
    pub fn is_match(&self, haystack: &str) -> bool {
        return self.0.is_match(haystack);
    }

    /// Compile a pattern from its source text.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for invalid sources.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        return Ok(Self(Regex::new(source)?));
    }

    /// The compiled expression.
    pub const fn regex(&self) -> &Regex {
        return &self.0;
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        return Self::new(&source).map_err(|e| {
            return serde::de::Error::custom(format!("invalid pattern `{source}`: {e}"));
        });
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return serializer.serialize_str(self.as_str());
    }
}

/// One repository/file gate of a project. Both axes are optional;
/// an absent or empty list places no constraint on that axis.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectFilter {
    /// Patterns searched against the document's file path.
    pub file_patterns: Option<Vec<Pattern>>,
    /// Patterns searched against the document's repository.
    pub repository_patterns: Option<Vec<Pattern>>,
}

/// A tracker project as written in the settings.
///
/// Every field is optional at load time: gaps are reported by the
/// completeness checker instead of failing the parse.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Ordered filters, OR'd together.
    pub filters: Option<Vec<ProjectFilter>>,
    /// Patterns for error-emitting lines. Each carries at least one capture group.
    pub line_patterns: Option<Vec<Pattern>>,
    /// Human-readable label, never required.
    pub name: Option<String>,
    /// Tracker project identifier used in deep links.
    pub project_id: Option<String>,
}

impl ProjectConfig {
    /// The project id when it is set and non-blank.
    pub fn known_project_id(&self) -> Option<&str> {
        return self.project_id.as_deref().filter(|id| return !id.trim().is_empty());
    }
}

/// Outcome of matching a document against the configured projects.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    /// Paths of absent or empty settings, in declaration order.
    pub missing_configs: Vec<String>,
    /// The accepted project. `None` only when the settings block is absent.
    pub project: Option<&'a ProjectConfig>,
}

/// One error-logging occurrence found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorQuery {
    /// Zero-based line index.
    pub line_number: usize,
    /// Captured error message.
    pub text: String,
}

/// Render instruction for one matched line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Decoration background color.
    pub background_color: String,
    /// Short text shown after the line.
    pub content_text: String,
    /// Longer text shown on hover.
    pub hover_text: String,
    /// Open issue count, filled only by the optional tracker lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<u64>,
    /// Zero-based line index the annotation belongs to.
    pub line_number: usize,
    /// Deep link into the tracker, empty when the extension is unconfigured.
    pub link_url: String,
}
