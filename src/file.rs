use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::platform;

/// Every Go distribution file name starts with this prefix.
pub const NAME_PREFIX: &str = "go";
/// Names the Go 1.4 bootstrap toolchain snapshots (`go1.4-bootstrap-20170518.tar.gz`),
/// which are source tarballs.
const BOOTSTRAP_MARKER: &str = "-bootstrap-";
const CHECKSUM_SUFFIX: &str = ".sha256";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kind {
    Installer,
    Archive,
    Source,
    Unknown,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Installer => "Installer",
            Kind::Archive => "Archive",
            Kind::Source => "Source",
            Kind::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Kind> {
        [Kind::Installer, Kind::Archive, Kind::Source, Kind::Unknown]
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Extension {
    suffix: &'static str,
    package: bool,
    kind: Kind,
}

/// Terminal extension chains, checked in order.
/// Sidecars come first since they end a name whose base is itself a package,
/// and `.src.tar.gz` must win over `.tar.gz`.
const EXTENSIONS: &[Extension] = &[
    Extension {
        suffix: CHECKSUM_SUFFIX,
        package: false,
        kind: Kind::Unknown,
    },
    Extension {
        suffix: ".asc",
        package: false,
        kind: Kind::Unknown,
    },
    Extension {
        suffix: ".sig",
        package: false,
        kind: Kind::Unknown,
    },
    Extension {
        suffix: ".src.tar.gz",
        package: true,
        kind: Kind::Source,
    },
    Extension {
        suffix: ".tar.gz",
        package: true,
        kind: Kind::Archive,
    },
    Extension {
        suffix: ".zip",
        package: true,
        kind: Kind::Archive,
    },
    Extension {
        suffix: ".pkg",
        package: true,
        kind: Kind::Installer,
    },
    Extension {
        suffix: ".msi",
        package: true,
        kind: Kind::Installer,
    },
];

fn match_extension(name: &str) -> Option<&'static Extension> {
    EXTENSIONS.iter().find(|e| name.ends_with(e.suffix))
}

/// Length of the version token at the start of `segment`:
/// digits, optionally followed by `beta` or `rc` and more digits.
fn version_token_len(segment: &str) -> usize {
    let digits = |s: &str| s.bytes().take_while(u8::is_ascii_digit).count();

    let number = digits(segment);
    if number == 0 {
        return 0;
    }
    let rest = &segment[number..];
    for tag in ["beta", "rc"] {
        if let Some(after) = rest.strip_prefix(tag) {
            let n = digits(after);
            if n > 0 {
                return number + tag.len() + n;
            }
        }
    }
    number
}

/// One file of a mirror listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileEntry {
    pub name: SmolStr,
    pub url: SmolStr,
    /// Size as displayed by the mirror, e.g. `107.2 MB`.
    pub size: SmolStr,
}

/// Everything that can be told about a [`FileEntry`] from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification<'a> {
    pub version: &'a str,
    pub kind: Kind,
    pub os: &'static str,
    pub arch: &'a str,
    pub is_package: bool,
    pub is_checksum: bool,
}

impl FileEntry {
    pub fn new(
        name: impl Into<SmolStr>,
        url: impl Into<SmolStr>,
        size: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            size: size.into(),
        }
    }

    /// The version embedded in the name (`1.18.1`, `1.18beta1`), or `""` if there is none.
    pub fn version(&self) -> &str {
        let Some(rest) = self.name.strip_prefix(NAME_PREFIX) else {
            return "";
        };

        let mut end = 0;
        let mut offset = 0;
        for segment in rest.split('.') {
            let len = version_token_len(segment);
            if len == 0 {
                break;
            }
            end = offset + len;
            if len < segment.len() {
                break;
            }
            offset += segment.len() + 1;
        }
        &rest[..end]
    }

    pub fn is_checksum_file(&self) -> bool {
        self.name.ends_with(CHECKSUM_SUFFIX)
    }

    /// Whether the file is an installable package rather than a checksum or signature sidecar.
    pub fn is_package_file(&self) -> bool {
        match_extension(&self.name).map_or(true, |e| e.package)
    }

    pub fn kind(&self) -> Kind {
        match match_extension(&self.name) {
            Some(e) if e.package => match e.kind {
                Kind::Archive if self.name.contains(BOOTSTRAP_MARKER) => Kind::Source,
                kind => kind,
            },
            _ => Kind::Unknown,
        }
    }

    /// The `os` and `arch` tokens of the `<os>-<arch>` segment following the version.
    fn platform_tokens(&self) -> Option<(&str, &str)> {
        let version = self.version();
        if version.is_empty() {
            return None;
        }
        let rest = self.name.as_str()[NAME_PREFIX.len() + version.len()..].strip_prefix('.')?;
        let segment = rest.split('.').next()?;
        let (os, rest) = segment.split_once('-')?;
        // Older darwin names carry a trailing `-osx10.x` after the arch.
        let arch = rest.split('-').next().unwrap_or(rest);
        Some((os, arch))
    }

    pub fn os(&self) -> &'static str {
        self.platform_tokens()
            .and_then(|(os, _)| platform::os_label(os))
            .unwrap_or_default()
    }

    pub fn arch(&self) -> &str {
        match self.platform_tokens() {
            Some((_, arch)) => platform::cpu_label(arch),
            None => "",
        }
    }

    /// For a checksum or signature file, the name of the package it accompanies.
    pub fn sidecar_of(&self) -> Option<&str> {
        let e = match_extension(&self.name).filter(|e| !e.package)?;
        Some(&self.name.as_str()[..self.name.len() - e.suffix.len()])
    }

    /// The displayed size in bytes. Units are binary multiples, as the mirrors print them.
    pub fn size_bytes(&self) -> Option<u64> {
        parse_size(&self.size)
    }

    pub fn classify(&self) -> Classification<'_> {
        Classification {
            version: self.version(),
            kind: self.kind(),
            os: self.os(),
            arch: self.arch(),
            is_package: self.is_package_file(),
            is_checksum: self.is_checksum_file(),
        }
    }
}

pub fn parse_size(size: &str) -> Option<u64> {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    // Autoindex listings print a bare byte count.
    let (number, unit) = size
        .trim()
        .split_once(char::is_whitespace)
        .unwrap_or((size.trim(), "B"));
    let number = number.parse::<f64>().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    let exp = UNITS
        .iter()
        .position(|u| u.eq_ignore_ascii_case(unit.trim()))?;
    Some((number * 1024f64.powi(exp as i32)).round() as u64)
}
