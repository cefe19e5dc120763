use smol_str::{format_smolstr, SmolStr};
use std::str::FromStr;

/// Represents a Go version pre-release stage.
/// Note: The order of variants is important for the derived `Ord`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum PreRelease {
    Beta(u32),
    Rc(u32),
    /// Represents a final release (no pre-release tag).
    /// This must be the last variant for correct ordering (Beta < Rc < None).
    None,
}

/// Represents a parsed Go version, as extracted from a file name (`1.18.1`, `1.18beta1`).
/// Derives comparison traits to order by major, minor, patch, and then pre-release status.
#[derive(PartialOrd, Ord, Debug, PartialEq, Eq, Clone)]
pub struct GoVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre_release: PreRelease,
}

impl GoVersion {
    /// `major.minor`, the release series a version belongs to.
    pub fn series(&self) -> SmolStr {
        format_smolstr!("{}.{}", self.major, self.minor)
    }

    pub fn is_stable(&self) -> bool {
        self.pre_release == PreRelease::None
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseGoVersionError(String);

impl std::fmt::Display for ParseGoVersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse Go version: {}", self.0)
    }
}

impl std::error::Error for ParseGoVersionError {}

fn parse_number(part: &str, what: &str, s: &str) -> Result<u32, ParseGoVersionError> {
    if part.is_empty() {
        return Err(ParseGoVersionError(format!(
            "{} version part is empty in '{}'",
            what, s
        )));
    }
    part.parse::<u32>().map_err(|e| {
        ParseGoVersionError(format!(
            "Invalid {} version '{}' in '{}': {}",
            what.to_lowercase(),
            part,
            s,
            e
        ))
    })
}

fn split_pre_release<'a>(
    s: &'a str,
    tag: &str,
    make: fn(u32) -> PreRelease,
) -> Result<Option<(&'a str, PreRelease)>, ParseGoVersionError> {
    let Some(index) = s.find(tag) else {
        return Ok(None);
    };
    let num_str = &s[index + tag.len()..];
    if num_str.is_empty() {
        return Err(ParseGoVersionError(format!(
            "Missing number after '{}' in '{}'",
            tag, s
        )));
    }
    let num = num_str.parse::<u32>().map_err(|e| {
        ParseGoVersionError(format!(
            "Invalid {} number '{}' in '{}': {}",
            tag, num_str, s, e
        ))
    })?;
    Ok(Some((&s[..index], make(num))))
}

impl FromStr for GoVersion {
    type Err = ParseGoVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseGoVersionError("empty version".to_owned()));
        }

        let (main_part, pre_release) = match split_pre_release(s, "beta", PreRelease::Beta)? {
            Some(split) => split,
            None => split_pre_release(s, "rc", PreRelease::Rc)?.unwrap_or((s, PreRelease::None)),
        };

        let mut parts = main_part.split('.');
        // `split` always yields at least one item.
        let major = parse_number(parts.next().unwrap_or_default(), "Major", s)?;
        let minor = match parts.next() {
            Some(part) => parse_number(part, "Minor", s)?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(part) => parse_number(part, "Patch", s)?,
            None => 0,
        };

        if parts.next().is_some() {
            return Err(ParseGoVersionError(format!(
                "Too many version parts (expected max 3) in '{}'",
                s
            )));
        }

        Ok(GoVersion {
            major,
            minor,
            patch,
            pre_release,
        })
    }
}
