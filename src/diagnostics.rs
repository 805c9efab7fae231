//! Markdown rendering of errors for the terminal.

use crate::config::CONFIG_FILE;
use crate::error::Error;

/// ANSI bold.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigInvalid { path, reason } => render_config_invalid(path, reason),
        Error::DocumentNotFound { path } => render_document_not_found(path),
        Error::TomlDe(e) => render_invalid_toml(&e.to_string()),
        Error::WatchFailed { reason } => render_watch_failed(reason),
        _ => render_generic(e),
    };
}

/// Variants without a fix section.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON Serialization

{e}
"),
        Error::LookupFailed { query, reason } => format!("\
# Error: Issue Lookup Failed

Could not count issues for `{query}`: {reason}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    };
}

/// A setting with an unusable value.
fn render_config_invalid(path: &std::path::Path, reason: &str) -> String {
    return format!("\
# Error: Invalid Settings

`{}`: {reason}

## Fix

Correct the value in `{}`, or remove the key to use the default.
", path.display(), path.display());
}

/// `--file` pointing nowhere.
fn render_document_not_found(path: &std::path::Path) -> String {
    return format!("\
# Error: Document Not Found

`{}` does not exist.

## Fix

Pass an existing file with `--file`, or pipe the document on stdin:

    logref annotate <URI> < path/to/file
", path.display());
}

/// Settings file that is not valid TOML or holds a bad pattern.
fn render_invalid_toml(reason: &str) -> String {
    return format!("\
# Error: Invalid Settings

`{CONFIG_FILE}` could not be read:

{reason}

## Fix

Patterns are regular expressions. Use TOML literal strings so backslashes
survive unescaped:

    line_patterns = ['''throw new Error\\(['\"]([^'\"]+)['\"]\\)''']
");
}

/// Watcher setup failure.
fn render_watch_failed(reason: &str) -> String {
    return format!("\
# Error: Watch Failed

{reason}

## Fix

Check that the document and its directory exist and are readable.
");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn document_not_found_suggests_stdin() {
        let md = render_error(&Error::DocumentNotFound { path: PathBuf::from("web/app.tsx") });
        assert!(md.starts_with("# Error: Document Not Found"));
        assert!(md.contains("`web/app.tsx`"));
        assert!(md.contains("## Fix"));
    }

    #[test]
    fn malformed_settings_show_pattern_hint() {
        let toml_err = toml::from_str::<toml::Value>("organization = ").unwrap_err();
        let md = render_error(&Error::TomlDe(toml_err));
        assert!(md.contains(".logref.toml"));
        assert!(md.contains("'''throw new Error"));
    }

    #[test]
    fn lookup_failure_names_query() {
        let md = render_error(&Error::LookupFailed {
            query: "boom".to_string(),
            reason: "timeout".to_string(),
        });
        assert!(md.contains("`boom`"));
        assert!(md.contains("timeout"));
    }
}
