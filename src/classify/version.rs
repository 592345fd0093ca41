//! Semantic version parsing and ordering
//!
//! Both registries and the build descriptor use loosely formatted
//! versions, so parsing pads missing minor/patch components and accepts a
//! leading `v` before handing the string to `semver`.

use semver::Version;

/// Parse a version string leniently
///
/// Returns `None` for anything that is not a semantic version once padded.
pub fn parse_version(raw: &str) -> Option<Version> {
    let s = raw.trim();
    let s = s.strip_prefix('v').unwrap_or(s);

    if let Ok(version) = Version::parse(s) {
        return Some(version);
    }

    // Pad "1" and "1.2" (optionally followed by pre-release/build) to three components
    let core_end = s.find(['-', '+']).unwrap_or(s.len());
    let (core, rest) = s.split_at(core_end);
    let components = core.split('.').count();
    if core.is_empty() || components >= 3 {
        return None;
    }

    let padded = format!("{}{}{}", core, ".0".repeat(3 - components), rest);
    Version::parse(&padded).ok()
}

/// Returns true if `current` has lower precedence than `latest`
///
/// Build metadata takes no part in the comparison. An unparseable current version is older than any valid latest version.
/// When the latest version itself is unparseable the strings are compared
/// for equality only.
pub fn is_older(current: &str, latest: &str) -> bool {
    match (parse_version(current), parse_version(latest)) {
        (Some(current), Some(latest)) => current.cmp_precedence(&latest).is_lt(),
        (None, Some(_)) => true,
        (_, None) => current.trim() != latest.trim(),
    }
}

/// Select the highest semantic version among the given tokens
///
/// Tokens that fail to parse are skipped. Among versions of equal
/// precedence (differing only in build metadata) the first one listed wins.
pub fn max_version<'a, I>(tokens: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .filter_map(parse_version)
        .reduce(|best, v| {
            if v.cmp_precedence(&best).is_gt() {
                v
            } else {
                best
            }
        })
}
