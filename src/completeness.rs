//! Reports absent or empty settings as dotted/indexed paths.
//!
//! Settings are lowered into a small tagged tree ([`ConfigValue`]) and walked
//! recursively. The walk never fails; its depth is bounded by the project
//! schema (project, filters, filter fields).

use crate::types::{Pattern, ProjectConfig, ProjectFilter};

/// Path reported when the whole settings block is absent.
pub const ROOT_MARKER: &str = "settings";

/// Shape of a configuration value as seen by the completeness walk.
#[derive(Debug, Clone)]
pub enum ConfigValue<'a> {
    /// Field not present at all.
    Absent,
    /// Record where at least one alternative field must be present and non-empty.
    /// When none is, the first alternative's path is reported.
    AnyOf(Vec<(&'static str, ConfigValue<'a>)>),
    /// Ordered sequence; empty counts as missing.
    List(Vec<ConfigValue<'a>>),
    /// Record whose fields are each required.
    Record(Vec<(&'static str, ConfigValue<'a>)>),
    /// Leaf text; blank counts as missing.
    Scalar(&'a str),
}

impl<'a> ConfigValue<'a> {
    /// The two alternative axes of a filter, repository first.
    fn filter_axes(repository: Option<&'a [Pattern]>, file: Option<&'a [Pattern]>) -> Self {
        return Self::AnyOf(vec![
            ("repository_patterns", Self::pattern_list(repository)),
            ("file_patterns", Self::pattern_list(file)),
        ]);
    }

    /// Lower a filter: one of its two axes must be constrained.
    fn from_filter(filter: &'a ProjectFilter) -> Self {
        return Self::filter_axes(filter.repository_patterns.as_deref(), filter.file_patterns.as_deref());
    }

    /// Lower a project into its completeness tree.
    ///
    /// `name` is optional and left out. `line_patterns` is only checked when
    /// it lists something: without patterns the scanner uses its built-in set,
    /// so only blank sources inside the list are gaps. Absent or empty
    /// `filters` become a single all-absent filter so the report points at
    /// the field to add.
    pub fn from_project(project: &'a ProjectConfig) -> Self {
        let filters = match project.filters.as_deref() {
            Some(filters) if !filters.is_empty() => {
                Self::List(filters.iter().map(Self::from_filter).collect())
            },
            Some(_) | None => Self::List(vec![Self::filter_axes(None, None)]),
        };
        let line_patterns = project
            .line_patterns
            .as_deref()
            .filter(|list| return !list.is_empty())
            .map(|list| return ("line_patterns", Self::pattern_list(Some(list))));

        let fields = [
            Some(("project_id", Self::optional_scalar(project.project_id.as_deref()))),
            line_patterns,
            Some(("filters", filters)),
        ];
        return Self::Record(fields.into_iter().flatten().collect());
    }

    /// Lower the full project list; an absent list is the root marker case.
    pub fn from_projects(projects: Option<&'a [ProjectConfig]>) -> Self {
        return projects.map_or(Self::Absent, |list| {
            return Self::List(list.iter().map(Self::from_project).collect());
        });
    }

    /// Whether this value would produce no report entries.
    fn is_complete(&self) -> bool {
        return find_missing(self, "placeholder").is_empty();
    }

    /// `Scalar` for present text, `Absent` otherwise.
    fn optional_scalar(value: Option<&'a str>) -> Self {
        return value.map_or(Self::Absent, Self::Scalar);
    }

    /// `List` of pattern sources, `Absent` when the field is unset.
    fn pattern_list(patterns: Option<&'a [Pattern]>) -> Self {
        return patterns.map_or(Self::Absent, |list| {
            return Self::List(list.iter().map(|p| return Self::Scalar(p.as_str())).collect());
        });
    }
}

/// Every absent or empty path under `value`, in declaration order.
/// An empty `path_prefix` with an absent value yields [`ROOT_MARKER`].
pub fn find_missing(value: &ConfigValue<'_>, path_prefix: &str) -> Vec<String> {
    return match value {
        ConfigValue::Absent => vec![path_or_root(path_prefix)],
        ConfigValue::Scalar(text) if text.trim().is_empty() => vec![path_or_root(path_prefix)],
        ConfigValue::Scalar(_) => Vec::new(),
        ConfigValue::List(items) if items.is_empty() => vec![path_or_root(path_prefix)],
        ConfigValue::List(items) => items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| return find_missing(item, &format!("{path_prefix}[{i}]")))
            .collect(),
        ConfigValue::Record(fields) if fields.is_empty() => vec![path_or_root(path_prefix)],
        ConfigValue::Record(fields) => fields
            .iter()
            .flat_map(|(name, field)| return find_missing(field, &join_field(path_prefix, name)))
            .collect(),
        ConfigValue::AnyOf(alternatives) => {
            if alternatives.iter().any(|(_, alt)| return alt.is_complete()) {
                Vec::new()
            } else {
                let first = alternatives.first().map(|(name, _)| return join_field(path_prefix, name));
                vec![first.unwrap_or_else(|| return path_or_root(path_prefix))]
            }
        },
    };
}

/// Whether a report path concerns the repository axis of a filter.
pub fn is_repository_path(path: &str) -> bool {
    return path.ends_with(".repository_patterns");
}

/// `prefix.field`, or just `field` at the root.
fn join_field(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        return field.to_string();
    }
    return format!("{prefix}.{field}");
}

/// The report for project `index` in the configured list.
pub fn missing_for_project(project: &ProjectConfig, index: usize) -> Vec<String> {
    return find_missing(&ConfigValue::from_project(project), &format!("projects[{index}]"));
}

/// The prefix itself, or the root marker when there is none.
fn path_or_root(prefix: &str) -> String {
    if prefix.is_empty() {
        return ROOT_MARKER.to_string();
    }
    return prefix.to_string();
}
