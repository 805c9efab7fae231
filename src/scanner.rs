use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{ErrorQuery, Pattern};

/// Error-raising idioms recognized when a project lists no line patterns.
/// One or two capture groups each; no two of them match the same statement.
const BUILTIN_PATTERN_SOURCES: [&str; 5] = [
    // throw new Error('...'), throw new TypeError("...")
    r#"(?i)throw new \w*Error\(\s*['"`]([^'"`]+)['"`]"#,
    // console.error('...')
    r#"(?i)console\.(error|warn|info|debug|log)\(\s*['"`]([^'"`]+)['"`]"#,
    // errors.New("..."), fmt.Errorf("...")
    r#"(?i)\b(errors\.New|fmt\.Errorf)\(\s*"([^"]+)""#,
    // log.Printf("..."), logger.error('...')
    r#"(?i)\blog(?:ger)?\.(\w+)\(\s*['"]([^'"]+)['"]"#,
    // raise ValueError('...')
    r#"(?i)\braise \w*(?:Error|Exception)\(\s*['"]([^'"]+)['"]"#,
];

/// Compiled built-in patterns.
static BUILTIN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    return BUILTIN_PATTERN_SOURCES
        .iter()
        .filter_map(|source| return Regex::new(source).ok())
        .collect();
});

/// The built-in fallback patterns, in scan order.
pub fn builtin_patterns() -> &'static [Regex] {
    return &BUILTIN_PATTERNS;
}

/// Collect the queries found on a single line.
fn extract_queries_from_line(
    line: &str,
    line_number: usize,
    patterns: &[&Regex],
    queries: &mut Vec<ErrorQuery>,
) {
    for pattern in patterns {
        for cap in pattern.captures_iter(line) {
            let Some(text) = select_message_group(&cap) else {
                continue;
            };
            queries.push(ErrorQuery {
                line_number,
                text: text.to_string(),
            });
        }
    }
}

/// Find every match of every pattern on every line.
///
/// Each (line, pattern) pair gets its own `captures_iter`, so no search
/// position leaks between lines or patterns. Results are ordered by line,
/// then pattern, then position within the line.
pub fn scan(text: &str, patterns: &[&Regex]) -> Vec<ErrorQuery> {
    let mut queries = Vec::new();
    for (line_number, line) in text.split('\n').enumerate() {
        extract_queries_from_line(line, line_number, patterns, &mut queries);
    }
    log::debug!("scanned {} patterns, found {} error statements", patterns.len(), queries.len());
    return queries;
}

/// Scan text for error-logging statements using a project's line patterns,
/// or the built-in set when the project lists none.
pub fn scan_with_patterns(text: &str, patterns: Option<&[Pattern]>) -> Vec<ErrorQuery> {
    let configured: Vec<&Regex> = patterns.unwrap_or_default().iter().map(Pattern::regex).collect();
    if configured.is_empty() {
        return scan(text, &builtin_patterns().iter().collect::<Vec<_>>());
    }
    return scan(text, &configured);
}

/// Pick the capture holding the error message.
///
/// One group: that group. Two groups: the second, the first being the verb
/// as in `console.(error|warn)('msg')`. More than two: the last group.
/// `None` when the pattern has no groups or the chosen group did not participate.
fn select_message_group<'h>(cap: &Captures<'h>) -> Option<&'h str> {
    let group = cap.len().checked_sub(1).filter(|&last| return last > 0)?;
    return cap.get(group).map(|m| return m.as_str());
}
