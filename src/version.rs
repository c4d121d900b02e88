use crate::exec;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Dot-separated numeric version. Shorter forms compare as if zero-padded,
/// so `6.2` and `6.2.0` are equal. A `-suffix` pre-release tag is stripped
/// before parsing.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u32>,
}

impl Version {
    /// The `0.0.0` sentinel used when no version can be detected at all.
    pub fn sentinel() -> Self {
        Self {
            parts: vec![0, 0, 0],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.parts.iter().all(|p| *p == 0)
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);
        let s = s.split('-').next()?;
        if s.is_empty() {
            return None;
        }
        let parts = s
            .split('.')
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()?;
        Some(Self { parts })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .parts
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{rendered}")
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Pull a version out of a report line like `Hiddify Telegram Bot v6.2.0`.
pub fn parse_report(report: &str) -> Option<Version> {
    report.split_whitespace().rev().find_map(Version::parse)
}

/// Find a `__version__ = "..."` assignment in a python source body.
pub fn scan_version_assignment(text: &str) -> Option<Version> {
    for line in text.lines() {
        let Some(rest) = line.trim().strip_prefix("__version__") else {
            continue;
        };
        let Some(rest) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let candidate = rest.trim().trim_matches(|c| c == '"' || c == '\'');
        if let Some(version) = Version::parse(candidate) {
            return Some(version);
        }
    }
    None
}

/// Version detection ladder for a checkout: ask the version script, fall
/// back to reading it, and finally the sentinel. Detection failure is
/// advisory, never fatal.
pub async fn detect(python: &str, checkout: &Path) -> Version {
    match exec::run_capture(python, &["version.py", "--version"], Some(checkout)).await {
        Ok(out) => {
            if let Some(version) = parse_report(&out) {
                return version;
            }
            warn!(output = out.trim(), "Version report was unparsable");
        }
        Err(e) => warn!(error = %e, "Version script failed"),
    }

    match std::fs::read_to_string(checkout.join("version.py")) {
        Ok(text) => {
            if let Some(version) = scan_version_assignment(&text) {
                return version;
            }
            warn!("No __version__ assignment found in version.py");
        }
        Err(e) => warn!(error = %e, "Could not read version.py"),
    }

    warn!("Version detection failed on both paths, using 0.0.0");
    Version::sentinel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_prefixed() {
        assert_eq!(Version::parse("6.2.0").unwrap().to_string(), "6.2.0");
        assert_eq!(Version::parse("v6.2.0").unwrap().to_string(), "6.2.0");
        assert!(Version::parse("six.two").is_none());
        assert!(Version::parse("").is_none());
    }

    #[test]
    fn prerelease_suffix_is_stripped() {
        assert_eq!(
            Version::parse("6.3.0-beta").unwrap(),
            Version::parse("6.3.0").unwrap()
        );
    }

    #[test]
    fn ordering_is_numeric_with_zero_padding() {
        let v = |s| Version::parse(s).unwrap();
        assert!(v("6.2") < v("6.10"));
        assert!(v("6.2.0") == v("6.2"));
        assert!(v("5.9.5") < v("6.1.0"));
        assert!(v("6.2.1") > v("6.2"));
    }

    #[test]
    fn report_line_yields_the_version() {
        assert_eq!(
            parse_report("Hiddify Telegram Bot v6.2.0").unwrap().to_string(),
            "6.2.0"
        );
        assert!(parse_report("no version here").is_none());
    }

    #[test]
    fn assignment_scan_finds_the_version() {
        let body = r#"
import argparse

# Define the version number
__version__ = "6.2.0"
"#;
        assert_eq!(scan_version_assignment(body).unwrap().to_string(), "6.2.0");
        assert!(scan_version_assignment("x = 1\n").is_none());
    }

    #[test]
    fn sentinel_is_all_zeros() {
        assert!(Version::sentinel().is_sentinel());
        assert!(!Version::parse("0.0.1").unwrap().is_sentinel());
    }
}
