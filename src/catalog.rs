use fxhash::FxHashMap;
use serde::Serialize;
use smol_str::{format_smolstr, SmolStr};

use crate::file::{FileEntry, Kind};
use crate::platform;
use crate::version::GoVersion;
use crate::UrlMirror;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub file_name: SmolStr,
    pub url: SmolStr,
    pub kind: Kind,
    /// Empty for platform independent packages (source tarballs).
    pub os: SmolStr,
    pub arch: SmolStr,
    pub size: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_url: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<SmolStr>,
}

impl Package {
    pub fn is_platform_independent(&self) -> bool {
        self.os.is_empty()
    }

    /// The package with its download and sidecar URLs rewritten through `mirror`.
    pub fn with_mirror(&self, mirror: &UrlMirror) -> Package {
        Package {
            url: mirror.apply(&self.url),
            checksum_url: self.checksum_url.as_deref().map(|u| mirror.apply(u)),
            signature_url: self.signature_url.as_deref().map(|u| mirror.apply(u)),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Release {
    pub version: SmolStr,
    #[serde(skip)]
    pub parsed: GoVersion,
    pub packages: Vec<Package>,
}

impl Release {
    pub fn packages<'a>(
        &'a self,
        filter: &'a PackageFilter<'a>,
    ) -> impl Iterator<Item = &'a Package> + 'a {
        self.packages.iter().filter(move |p| filter.verify(p))
    }
}

/// Version filter for selecting releases.
#[derive(Debug, Default)]
pub struct VersionFilter {
    pub stable_only: bool,
    /// `major.minor`, e.g. `1.18`.
    pub series: Option<SmolStr>,
    pub exact_version: Option<SmolStr>,
}

impl VersionFilter {
    pub fn verify(&self, release: &Release) -> bool {
        if self.stable_only && !release.parsed.is_stable() {
            return false;
        }
        if let Some(series) = &self.series {
            if release.parsed.series() != *series {
                return false;
            }
        }
        if let Some(version) = &self.exact_version {
            if release.version != *version {
                return false;
            }
        }
        true
    }
}

/// Package filter over display labels. Platform independent packages match any OS and arch.
#[derive(Debug, Default)]
pub struct PackageFilter<'a> {
    pub os: Option<&'a str>,
    pub arch: Option<&'a str>,
    pub kind: Option<Kind>,
}

impl PackageFilter<'_> {
    pub fn verify(&self, package: &Package) -> bool {
        if let Some(kind) = self.kind {
            if package.kind != kind {
                return false;
            }
        }
        if package.is_platform_independent() {
            return true;
        }
        self.os.map_or(true, |os| package.os == os)
            && self.arch.map_or(true, |arch| package.arch == arch)
    }
}

#[derive(Debug, Serialize)]
pub struct DownInfo {
    pub tag: SmolStr,
    pub url: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_url: Option<SmolStr>,
    pub size: SmolStr,
}

impl DownInfo {
    pub fn with_mirror(self, mirror: &UrlMirror) -> DownInfo {
        DownInfo {
            url: mirror.apply(&self.url),
            checksum_url: self.checksum_url.as_deref().map(|u| mirror.apply(u)),
            ..self
        }
    }
}

#[derive(Default)]
struct Sidecars {
    checksum_url: Option<SmolStr>,
    signature_url: Option<SmolStr>,
}

/// The releases found in a mirror listing, newest first.
#[derive(Debug, Default)]
pub struct Catalog {
    releases: Vec<Release>,
}

impl Catalog {
    pub fn build(entries: impl IntoIterator<Item = FileEntry>) -> Self {
        let mut sidecars: FxHashMap<SmolStr, Sidecars> = FxHashMap::default();
        let mut package_entries = Vec::new();
        for entry in entries {
            match entry.sidecar_of() {
                Some(base) => {
                    let slot = sidecars.entry(base.into()).or_default();
                    if entry.is_checksum_file() {
                        slot.checksum_url = Some(entry.url.clone());
                    } else {
                        slot.signature_url = Some(entry.url.clone());
                    }
                }
                None => package_entries.push(entry),
            }
        }

        let mut releases: FxHashMap<SmolStr, Release> = FxHashMap::default();
        for entry in package_entries {
            let version = SmolStr::from(entry.version());
            if version.is_empty() {
                log::debug!("Skipping {}: no version in file name", entry.name);
                continue;
            }
            let kind = entry.kind();
            if kind == Kind::Unknown {
                log::debug!("Skipping {}: unknown file kind", entry.name);
                continue;
            }
            let parsed = match version.parse::<GoVersion>() {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.name, e);
                    continue;
                }
            };

            let Sidecars {
                checksum_url,
                signature_url,
            } = sidecars.remove(entry.name.as_str()).unwrap_or_default();
            let package = Package {
                kind,
                os: entry.os().into(),
                arch: entry.arch().into(),
                size_bytes: entry.size_bytes(),
                checksum_url,
                signature_url,
                file_name: entry.name,
                url: entry.url,
                size: entry.size,
            };

            releases
                .entry(version.clone())
                .or_insert_with(|| Release {
                    version,
                    parsed,
                    packages: Vec::new(),
                })
                .packages
                .push(package);
        }

        for base in sidecars.keys() {
            log::debug!("No package found for sidecars of {}", base);
        }

        let mut releases: Vec<Release> = releases.into_values().collect();
        for release in &mut releases {
            release
                .packages
                .sort_by(|a, b| a.file_name.cmp(&b.file_name));
        }
        releases.sort_by(|a, b| {
            b.parsed
                .cmp(&a.parsed)
                .then_with(|| b.version.cmp(&a.version))
        });
        Catalog { releases }
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn find(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.version == version)
    }

    pub fn filter<'a>(
        &'a self,
        filter: &'a VersionFilter,
    ) -> impl Iterator<Item = &'a Release> + 'a {
        self.releases.iter().filter(move |r| filter.verify(r))
    }

    /// The archive of the newest release matching `version_filter` built for `os` and `arch`.
    pub fn select_download(
        &self,
        version_filter: &VersionFilter,
        os: &str,
        arch: &str,
    ) -> anyhow::Result<DownInfo> {
        let package_filter = PackageFilter {
            os: Some(os),
            arch: Some(arch),
            kind: Some(Kind::Archive),
        };
        let found = self.filter(version_filter).find_map(|release| {
            release
                .packages(&package_filter)
                .find(|p| !p.is_platform_independent())
                .map(|p| (release, p))
        });

        match found {
            Some((release, package)) => {
                let os_token = platform::os_token(os).unwrap_or(os);
                Ok(DownInfo {
                    tag: format_smolstr!(
                        "{}-{}_{}",
                        platform::cpu_token(arch),
                        os_token,
                        release.version
                    ),
                    url: package.url.clone(),
                    checksum_url: package.checksum_url.clone(),
                    size: package.size.clone(),
                })
            }
            None => Err(anyhow::anyhow!(
                "No archive found for {} {} matching the version filter",
                os,
                arch
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{cpu, os};

    const BASE_URL: &str = "https://mirrors.aliyun.com/golang/";

    fn catalog(names: &[(&str, &str)]) -> Catalog {
        Catalog::build(
            names
                .iter()
                .map(|(name, size)| FileEntry::new(*name, format!("{BASE_URL}{name}"), *size)),
        )
    }

    fn sample() -> Catalog {
        catalog(&[
            ("go1.18beta2.freebsd-386.tar.gz", "107.2 MB"),
            ("go1.18.1.linux-amd64.tar.gz", "135.0 MB"),
            ("go1.18.1.linux-amd64.tar.gz.sha256", "64.0 B"),
            ("go1.18.1.linux-amd64.tar.gz.asc", "833.0 B"),
            ("go1.18.1.src.tar.gz", "21.8 MB"),
            ("go1.18.1.windows-amd64.msi", "120.1 MB"),
            ("go1.18.windows-arm64.zip", "118.0 MB"),
            ("go1.18rc1.linux-amd64.tar.gz", "134.8 MB"),
            ("go1.10.1.linux-amd64.tar.gz", "114.3 MB"),
            ("go1.10.1.linux-amd64.deb", "114.3 MB"),
            ("go1.4-bootstrap-20170518.tar.gz", "10.5 MB"),
            ("go1.4-bootstrap-20170518.tar.gz.sha256", "64.0 B"),
            ("go1.9.2.linux-amd64.tar.gz.sha256", "64.0 B"),
            ("README.html", "2.0 KB"),
            ("go1.2.3.4.linux-amd64.tar.gz", "1.0 MB"),
        ])
    }

    #[test]
    fn test_releases_newest_first() {
        let catalog = sample();
        let versions: Vec<&str> = catalog
            .releases()
            .iter()
            .map(|r| r.version.as_str())
            .collect();
        assert_eq!(
            versions,
            vec!["1.18.1", "1.18", "1.18rc1", "1.18beta2", "1.10.1", "1.4"]
        );
    }

    #[test]
    fn test_sidecars_attach_to_their_package() {
        let catalog = sample();
        let release = catalog.find("1.18.1").unwrap();
        let archive = release
            .packages
            .iter()
            .find(|p| p.file_name == "go1.18.1.linux-amd64.tar.gz")
            .unwrap();
        assert_eq!(
            archive.checksum_url.as_deref(),
            Some("https://mirrors.aliyun.com/golang/go1.18.1.linux-amd64.tar.gz.sha256")
        );
        assert_eq!(
            archive.signature_url.as_deref(),
            Some("https://mirrors.aliyun.com/golang/go1.18.1.linux-amd64.tar.gz.asc")
        );
        assert_eq!(archive.size_bytes, Some(141_557_760));
        assert!(release.packages.iter().all(|p| p.kind != Kind::Unknown));

        let bootstrap = &catalog.find("1.4").unwrap().packages[0];
        assert_eq!(bootstrap.kind, Kind::Source);
        assert!(bootstrap.checksum_url.is_some());
    }

    #[test]
    fn test_unclassifiable_entries_are_excluded() {
        let catalog = sample();
        assert!(catalog.find("1.9.2").is_none());
        assert_eq!(catalog.find("1.10.1").unwrap().packages.len(), 1);
        assert!(catalog
            .releases()
            .iter()
            .flat_map(|r| &r.packages)
            .all(|p| p.file_name != "README.html"));
    }

    #[test]
    fn test_package_filter() {
        let catalog = sample();
        let release = catalog.find("1.18.1").unwrap();
        let filter = PackageFilter {
            os: Some(os::LINUX),
            arch: Some(cpu::X64),
            kind: None,
        };
        let names: Vec<&str> = release
            .packages(&filter)
            .map(|p| p.file_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["go1.18.1.linux-amd64.tar.gz", "go1.18.1.src.tar.gz"]
        );

        let installers = PackageFilter {
            kind: Some(Kind::Installer),
            ..Default::default()
        };
        assert_eq!(release.packages(&installers).count(), 1);
    }

    #[test]
    fn test_version_filter() {
        let catalog = sample();
        let stable = VersionFilter {
            stable_only: true,
            ..Default::default()
        };
        let versions: Vec<&str> = catalog.filter(&stable).map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.18.1", "1.18", "1.10.1", "1.4"]);

        let series = VersionFilter {
            series: Some("1.18".into()),
            ..Default::default()
        };
        assert_eq!(catalog.filter(&series).count(), 4);
    }

    #[test]
    fn test_select_download() {
        let catalog = sample();
        let latest_118 = VersionFilter {
            series: Some("1.18".into()),
            ..Default::default()
        };
        let info = catalog
            .select_download(&latest_118, os::LINUX, cpu::X64)
            .unwrap();
        assert_eq!(info.tag, "amd64-linux_1.18.1");
        assert_eq!(
            info.url,
            "https://mirrors.aliyun.com/golang/go1.18.1.linux-amd64.tar.gz"
        );
        assert!(info.checksum_url.is_some());

        let info = catalog
            .select_download(&latest_118, os::WIN, cpu::ARM64)
            .unwrap();
        assert_eq!(info.tag, "arm64-windows_1.18");

        // the source tarball is no archive for the platform
        assert!(catalog
            .select_download(&VersionFilter::default(), os::MAC, cpu::ARM64)
            .is_err());

        let exact = VersionFilter {
            exact_version: Some("1.18rc1".into()),
            ..Default::default()
        };
        let info = catalog.select_download(&exact, os::LINUX, cpu::X64).unwrap();
        assert_eq!(info.tag, "amd64-linux_1.18rc1");
        assert_eq!(info.checksum_url, None);
    }

    #[test]
    fn test_with_mirror_rewrites_every_url() {
        let catalog = sample();
        let mirror = UrlMirror::new([(
            BASE_URL.to_owned(),
            "https://golang.google.cn/dl/".to_owned(),
        )]);
        let archive = catalog
            .find("1.18.1")
            .unwrap()
            .packages
            .iter()
            .find(|p| p.file_name == "go1.18.1.linux-amd64.tar.gz")
            .unwrap()
            .with_mirror(&mirror);
        assert_eq!(
            archive.url,
            "https://golang.google.cn/dl/go1.18.1.linux-amd64.tar.gz"
        );
        assert_eq!(
            archive.checksum_url.as_deref(),
            Some("https://golang.google.cn/dl/go1.18.1.linux-amd64.tar.gz.sha256")
        );
        assert_eq!(
            archive.signature_url.as_deref(),
            Some("https://golang.google.cn/dl/go1.18.1.linux-amd64.tar.gz.asc")
        );
        assert_eq!(archive.size, "135.0 MB");

        let info = catalog
            .select_download(&VersionFilter::default(), os::LINUX, cpu::X64)
            .unwrap()
            .with_mirror(&mirror);
        assert_eq!(
            info.url,
            "https://golang.google.cn/dl/go1.18.1.linux-amd64.tar.gz"
        );
        assert_eq!(
            info.checksum_url.as_deref(),
            Some("https://golang.google.cn/dl/go1.18.1.linux-amd64.tar.gz.sha256")
        );
    }

    #[test]
    fn test_select_download_of_osx_suffixed_archive() {
        let catalog = catalog(&[
            ("go1.4.2.darwin-amd64-osx10.8.tar.gz", "58.4 MB"),
            ("go1.4.2.darwin-amd64-osx10.8.pkg", "58.5 MB"),
            ("go1.4.2.darwin-386-osx10.6.tar.gz", "51.2 MB"),
        ]);
        let info = catalog
            .select_download(&VersionFilter::default(), os::MAC, cpu::X64)
            .unwrap();
        assert_eq!(info.tag, "amd64-darwin_1.4.2");
        assert_eq!(
            info.url,
            "https://mirrors.aliyun.com/golang/go1.4.2.darwin-amd64-osx10.8.tar.gz"
        );
    }
}
