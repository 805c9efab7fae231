//! Finds the configured tracker project a document reports to.

use crate::completeness;
use crate::types::{DocumentIdentifier, MatchResult, Pattern, ProjectConfig, ProjectFilter};

/// Whether any of the project's filters accepts the document.
fn accepts(project: &ProjectConfig, repository: &str, file_path: &str, sole_project: bool) -> bool {
    return match project.filters.as_deref() {
        Some(filters) if !filters.is_empty() => filters
            .iter()
            .any(|filter| return filter_accepts(filter, repository, file_path)),
        Some(_) | None => sole_project,
    };
}

/// Unanchored search of every pattern against `haystack`.
fn any_match(patterns: &[Pattern], haystack: &str) -> bool {
    return patterns.iter().any(|p| return p.is_match(haystack));
}

/// An axis constrains matching only when it lists at least one pattern.
fn constraint(patterns: Option<&[Pattern]>) -> Option<&[Pattern]> {
    return patterns.filter(|list| return !list.is_empty());
}

/// Both constrained axes must match; a filter constraining nothing never matches.
fn filter_accepts(filter: &ProjectFilter, repository: &str, file_path: &str) -> bool {
    let repository_patterns = constraint(filter.repository_patterns.as_deref());
    let file_patterns = constraint(filter.file_patterns.as_deref());

    if repository_patterns.is_none() && file_patterns.is_none() {
        return false;
    }

    let file_ok = file_patterns.is_none_or(|patterns| return any_match(patterns, file_path));
    let repository_ok = repository_patterns.is_none_or(|patterns| return any_match(patterns, repository));
    return file_ok && repository_ok;
}

/// Return the first project whose filters accept the document, with its
/// completeness report.
///
/// Matching needs both halves of the identifier; `None` is returned when
/// either is unknown, when `projects` is empty, or when nothing accepts.
/// A project without filters is accepted only when it is the sole project.
pub fn match_project<'a>(
    id: &DocumentIdentifier,
    projects: &'a [ProjectConfig],
) -> Option<MatchResult<'a>> {
    let (Some(repository), Some(file_path)) = (id.repository.as_deref(), id.file_path.as_deref()) else {
        return None;
    };
    let sole_project = projects.len() == 1;

    for (index, project) in projects.iter().enumerate() {
        let missing_configs = completeness::missing_for_project(project, index);
        if accepts(project, repository, file_path, sole_project) {
            log::debug!(
                "{repository}#{file_path} matched projects[{index}] ({} missing settings)",
                missing_configs.len()
            );
            return Some(MatchResult {
                missing_configs,
                project: Some(project),
            });
        }
    }

    log::debug!("{repository}#{file_path} matched none of {} projects", projects.len());
    return None;
}
