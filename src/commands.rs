//! Core CLI commands for logref: annotate, match, check.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use crate::completeness::{self, ConfigValue, ROOT_MARKER};
use crate::config::Config;
use crate::error;
use crate::pipeline;
use crate::types::{Annotation, DocumentIdentifier};

/// Machine-readable form of `logref match`.
#[derive(Serialize)]
struct MatchOutput<'a> {
    /// Repository and file derived from the URI.
    identifier: &'a DocumentIdentifier,
    /// Whether some project accepted the document.
    matched: bool,
    /// Absent or empty settings of the matched project.
    missing_configs: &'a [String],
    /// Name of the matched project, if it has one.
    name: Option<&'a str>,
    /// Id of the matched project, if it has one.
    project_id: Option<&'a str>,
}

/// Scan a document and print one annotation per error statement.
///
/// # Errors
///
/// Returns errors from config loading, reading the document, or JSON output.
pub fn annotate(uri: &str, file: Option<&Path>, json: bool) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;
    let text = read_document(file)?;

    let report = pipeline::annotate_document(&config, uri, &text, None);
    log::debug!(
        "{}: {} error statements, project matched: {}",
        report.identifier.repository.as_deref().unwrap_or("-"),
        report.queries.len(),
        report.match_result.as_ref().is_some_and(|m| return m.project.is_some())
    );
    return print_annotations(&report.annotations, json);
}

/// Print the completeness report of every configured project.
/// Exits 1 when anything is missing, 0 otherwise.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn check() -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;

    let mut missing = completeness::find_missing(&organization_value(&config), "organization");
    // An empty list reports `projects` itself: nothing can ever match.
    match config.projects.as_deref() {
        None => missing.push(ROOT_MARKER.to_string()),
        Some(projects) => {
            let value = ConfigValue::from_projects(Some(projects));
            missing.extend(completeness::find_missing(&value, "projects"));
        },
    }

    for path in &missing {
        println!("MISSING  {path}");
    }

    if missing.is_empty() {
        let total = config.projects.as_deref().map_or(0, <[_]>::len);
        println!("All {total} projects fully configured");
        return Ok(ExitCode::SUCCESS);
    } else {
        println!();
        println!("{} settings missing", missing.len());
        eprintln!("hint: fill them in {}", crate::config::CONFIG_FILE);
        return Ok(ExitCode::from(1));
    }
}

/// Show which project a document matches and what its settings lack.
///
/// # Errors
///
/// Returns errors from config loading or JSON output.
pub fn match_uri(uri: &str, json: bool) -> Result<(), error::Error> {
    let root = PathBuf::from(".");
    let config = Config::load(&root)?;

    let identifier = crate::identifier::extract(uri, &config.code_hosts);
    let match_result = pipeline::match_document(&config, &identifier);
    let project = match_result.as_ref().and_then(|m| return m.project);

    let output = MatchOutput {
        identifier: &identifier,
        matched: project.is_some(),
        missing_configs: match_result
            .as_ref()
            .map(|m| return m.missing_configs.as_slice())
            .unwrap_or_default(),
        name: project.and_then(|p| return p.name.as_deref()),
        project_id: project.and_then(|p| return p.project_id.as_deref()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("repository  {}", identifier.repository.as_deref().unwrap_or("-"));
    println!("file        {}", identifier.file_path.as_deref().unwrap_or("-"));
    if output.matched {
        let id = output.project_id.unwrap_or("-");
        match output.name {
            Some(name) => println!("project     {id} ({name})"),
            None => println!("project     {id}"),
        }
    } else {
        println!("project     no project matched");
    }
    for path in output.missing_configs {
        println!("missing     {path}");
    }
    return Ok(());
}

/// Print annotations as text lines or a JSON array.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn print_annotations(annotations: &[Annotation], json: bool) -> Result<(), error::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(annotations)?);
        return Ok(());
    }

    if annotations.is_empty() {
        eprintln!("No error statements found.");
        return Ok(());
    }

    for annotation in annotations {
        let line = annotation.line_number.saturating_add(1);
        let content = annotation.content_text.trim();
        if annotation.link_url.is_empty() {
            println!("L{line}  {content}");
        } else {
            println!("L{line}  {content}  {}", annotation.link_url);
        }
    }
    return Ok(());
}

/// Document text from a file, or stdin when no file is given.
///
/// # Errors
///
/// Returns `Error::DocumentNotFound` for a missing file, `Error::Io` otherwise.
pub fn read_document(file: Option<&Path>) -> Result<String, error::Error> {
    let Some(path) = file else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    };
    return match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(error::Error::DocumentNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(error::Error::Io(e)),
        Ok(text) => Ok(text),
    };
}

/// The organization setting as a completeness value.
fn organization_value(config: &Config) -> ConfigValue<'_> {
    return config.organization.as_deref().map_or(ConfigValue::Absent, ConfigValue::Scalar);
}
