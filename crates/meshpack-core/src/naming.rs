//! Chart name normalisation
//!
//! Helm chart names are lowercase alphanumerics and dashes, must start and
//! end with an alphanumeric character, and are limited to 53 characters.

use regex::Regex;
use std::sync::LazyLock;

/// Longest name Helm accepts for a release or chart
pub const MAX_CHART_NAME_LEN: usize = 53;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").expect("valid regex"));

static CHART_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex")
});

/// Normalise a free-form name into a chart name
///
/// Returns an empty string when nothing usable is left (e.g. `"!!!"`).
#[must_use]
pub fn sanitize_chart_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let replaced = INVALID_CHARS.replace_all(&lowered, "-");
    let mut sanitized = replaced.trim_matches('-').to_string();

    if sanitized.len() > MAX_CHART_NAME_LEN {
        // Only ASCII survives the replacement, so byte truncation is safe
        sanitized.truncate(MAX_CHART_NAME_LEN);
        sanitized = sanitized.trim_end_matches('-').to_string();
    }

    sanitized
}

/// Check a name against Helm's chart naming rules
#[must_use]
pub fn is_valid_chart_name(name: &str) -> bool {
    name.len() <= MAX_CHART_NAME_LEN && CHART_NAME.is_match(name)
}
