/// Crate-level error types for logref diagnostics.
use std::path::PathBuf;

/// Errors raised by the outer shell around the annotation core.
///
/// Config loading, document reading, output and the watcher fail with these;
/// matching, scanning and annotation never do.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file parsed as TOML but describes an unusable setting.
    #[error("config invalid: {}: {reason}", path.display())]
    ConfigInvalid {
        /// Config file that was rejected.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// The document to annotate does not exist on disk.
    #[error("document not found: {}", path.display())]
    DocumentNotFound {
        /// Path that was given for the document text.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem or stdin.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of command output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// An issue-count lookup against the tracker failed.
    #[error("issue lookup failed for `{query}`: {reason}")]
    LookupFailed {
        /// Search query that was sent.
        query: String,
        /// Description of the failure.
        reason: String,
    },

    /// TOML deserialization failed, including invalid regex patterns.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
