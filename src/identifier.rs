//! Repository and file extraction from document URIs.
//!
//! URIs look like `git://github.com/owner/name?rev#path/to/file.ts`. Both
//! halves are optional: untracked buffers, unknown hosts, and extensionless
//! fragments all yield `None` rather than an error.

use crate::types::DocumentIdentifier;

/// Code hosts recognized when no `code_hosts` setting is given.
pub const DEFAULT_CODE_HOSTS: [&str; 3] = ["github.com", "gitlab.com", "bitbucket.org"];

/// Derive the repository and file path of a document from its URI.
/// The repository is only reported for URIs on one of `code_hosts`.
pub fn extract(uri: &str, code_hosts: &[String]) -> DocumentIdentifier {
    let uri = uri.trim();
    return DocumentIdentifier {
        file_path: extract_file_path(uri),
        repository: extract_repository(uri, code_hosts),
    };
}

/// Everything after `#` (up to any `?`) when its last segment has an extension.
fn extract_file_path(uri: &str) -> Option<String> {
    let (_, fragment) = uri.split_once('#')?;
    let path = fragment.split('?').next().unwrap_or_default();
    let file_name = path.rsplit_once('/').map_or(path, |(_, name)| return name);
    if !has_file_extension(file_name) {
        return None;
    }
    return Some(path.to_string());
}

/// `owner/name` from the first two path segments after a recognized host.
fn extract_repository(uri: &str, code_hosts: &[String]) -> Option<String> {
    let (scheme, rest) = uri.split_once("://")?;
    if !is_uri_scheme(scheme) {
        return None;
    }

    let before_query = rest.split(['?', '#']).next().unwrap_or_default();
    let mut segments = before_query.split('/');
    let authority = segments.next().unwrap_or_default();
    let host = strip_userinfo_and_port(authority);
    if !code_hosts.iter().any(|known| return known.eq_ignore_ascii_case(host)) {
        return None;
    }

    let owner = segments.next().filter(|s| return !s.is_empty())?;
    let name = segments.next().filter(|s| return !s.is_empty())?;
    return Some(format!("{owner}/{name}"));
}

/// A non-empty stem followed by `.` and an alphanumeric extension.
fn has_file_extension(file_name: &str) -> bool {
    let Some((stem, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    return !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| return c.is_ascii_alphanumeric());
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-`, or `.`.
fn is_uri_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    return first.is_ascii_alphabetic()
        && chars.all(|c| return c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
}

/// Reduce `user@host:port` to `host`.
fn strip_userinfo_and_port(authority: &str) -> &str {
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| return h);
    return host.split_once(':').map_or(host, |(h, _)| return h);
}
