//! Deep links into the tracker's issue search.
//!
//! Wire format: `https://<host>/organizations/<org>/issues/`, optionally
//! followed by `?project=<id>&query=is%3Aunresolved+"<text>"&statsPeriod=<period>`.

use std::fmt::Write as _;

/// Tracker host used when none is configured.
pub const DEFAULT_HOST: &str = "sentry.io";

/// Lookback window used when none is configured.
pub const DEFAULT_STATS_PERIOD: &str = "14d";

/// Fixed prefix of the search query: only unresolved issues.
const UNRESOLVED_QUERY_PREFIX: &str = "is%3Aunresolved+";

/// Like [`percent_encode`] but spaces become `+`, as the search endpoint expects.
fn form_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte == b' ' {
            out.push('+');
        } else {
            push_encoded_byte(&mut out, byte);
        }
    }
    return out;
}

/// The org-level issues page.
pub fn organization_issues_url(host: &str, organization: &str) -> String {
    return format!("https://{host}/organizations/{}/issues/", percent_encode(organization));
}

/// Percent-encode everything outside the unreserved set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        push_encoded_byte(&mut out, byte);
    }
    return out;
}

/// Issues page scoped to a project and a quoted search for `error_text`.
pub fn project_issues_url(
    host: &str,
    organization: &str,
    project_id: &str,
    error_text: &str,
    stats_period: &str,
) -> String {
    let mut url = organization_issues_url(host, organization);
    let _ = write!(
        url,
        "?project={}&query={UNRESOLVED_QUERY_PREFIX}\"{}\"&statsPeriod={}",
        percent_encode(project_id),
        form_encode(error_text),
        percent_encode(stats_period),
    );
    return url;
}

/// Append one byte, escaped unless it is unreserved.
fn push_encoded_byte(out: &mut String, byte: u8) {
    let is_unreserved = byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~');
    if is_unreserved {
        out.push(char::from(byte));
    } else {
        let _ = write!(out, "%{byte:02X}");
    }
}
