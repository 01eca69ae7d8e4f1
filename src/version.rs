//! Version fallback candidates for picking a version-specific track.
//!
//! Track definitions exist only for some product versions, so a lookup walks
//! from the most specific form of a version to the coarsest one:
//!
//! 5.0.0-SNAPSHOT  =>  ["5.0.0-SNAPSHOT", "5.0.0", "5.0", "5"]

use crate::error::InvalidSyntax;
use regex::Regex;
use std::sync::LazyLock;

/// `major.minor.patch` with an optional free-form `-suffix`.
pub const VERSION_PATTERN: &str = r"^(\d+)\.(\d+)\.(\d+)(?:-(.+))?$";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VERSION_PATTERN).expect("version pattern is a valid regex"));

/// Ordered fallback candidates for `version`, most specific first.
pub fn versions(version: &str) -> Result<Vec<String>, InvalidSyntax> {
    let caps = VERSION_RE.captures(version).ok_or_else(|| InvalidSyntax {
        version: version.to_string(),
        pattern: VERSION_PATTERN,
    })?;

    // Groups 1..=3 are non-optional in the pattern, so a match always has them.
    let major = &caps[1];
    let minor = &caps[2];
    let patch = &caps[3];

    let mut out: Vec<String> = Vec::with_capacity(4);
    if caps.get(4).is_some() {
        out.push(version.to_string());
    }
    for candidate in [
        format!("{major}.{minor}.{patch}"),
        format!("{major}.{minor}"),
        major.to_string(),
    ] {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn release_versions_fall_back_to_minor_and_major() {
        assert_eq!(vec!["5.0.3", "5.0", "5"], versions("5.0.3").unwrap());
        assert_eq!(vec!["10.3.63", "10.3", "10"], versions("10.3.63").unwrap());
    }

    #[test]
    fn suffixed_versions_try_the_full_string_first() {
        assert_eq!(
            vec!["5.0.0-SNAPSHOT", "5.0.0", "5.0", "5"],
            versions("5.0.0-SNAPSHOT").unwrap()
        );
        assert_eq!(
            vec!["6.2.1-alpha-1", "6.2.1", "6.2", "6"],
            versions("6.2.1-alpha-1").unwrap()
        );
    }

    #[test]
    fn candidates_shrink_and_never_repeat() {
        for input in ["0.0.0", "1.2.3-rc1", "7.10.2"] {
            let out = versions(input).unwrap();
            let mut seen = out.clone();
            seen.dedup();
            assert_eq!(out, seen);
            assert!(out.windows(2).all(|w| w[0].len() > w[1].len()));
            assert_eq!(Some(&input.split('.').next().unwrap().to_string()), out.last());
        }
    }

    #[test]
    fn rejects_malformed_versions() {
        let err = versions("5.0.0a-SNAPSHOT").unwrap_err();
        assert_eq!(
            r"version string '5.0.0a-SNAPSHOT' does not conform to pattern '^(\d+)\.(\d+)\.(\d+)(?:-(.+))?$'",
            err.to_string()
        );

        for bad in ["", "5", "5.0", "5.0.0-", "v5.0.0", "5.0.0.1"] {
            assert!(versions(bad).is_err(), "accepted {bad:?}");
        }
    }
}
