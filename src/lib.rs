use serde::Deserialize;
use smol_str::SmolStr;
use std::path::PathBuf;

pub mod catalog;
pub mod file;
pub mod listing;
pub mod platform;
pub mod version;

/// The mirror whose listing layout and URLs are assumed when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://mirrors.aliyun.com/golang/";

#[derive(Debug, Clone, Deserialize)]
pub struct UrlMirrorEntry {
    from: String,
    to: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlMirror {
    #[serde(default)]
    mirror: Vec<UrlMirrorEntry>,
}

impl UrlMirror {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        UrlMirror {
            mirror: entries
                .into_iter()
                .map(|(from, to)| UrlMirrorEntry { from, to })
                .collect(),
        }
    }

    /// Rewrites `url` with the first entry whose `from` is a prefix of it.
    pub fn apply(&self, url: &str) -> SmolStr {
        for entry in &self.mirror {
            if let Some(rest) = url.strip_prefix(&entry.from) {
                let mut result = String::new();
                result.push_str(entry.to.as_str());
                result.push_str(rest);
                log::debug!("Applying mirror {} => {}", url, result);
                return result.into();
            }
        }

        url.into()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub mirror: UrlMirror,
    /// Base URL the relative links of a listing are resolved against.
    pub base_url: Option<SmolStr>,
    /// Saved listing used when none is given on the command line.
    pub listing: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_mirror_rewrites_first_matching_prefix() {
        let mirror = UrlMirror::new([
            (
                "https://mirrors.aliyun.com/golang/".to_owned(),
                "https://golang.google.cn/dl/".to_owned(),
            ),
            (
                "https://mirrors.aliyun.com/".to_owned(),
                "https://example.com/".to_owned(),
            ),
        ]);
        assert_eq!(
            mirror.apply("https://mirrors.aliyun.com/golang/go1.18.linux-amd64.tar.gz"),
            "https://golang.google.cn/dl/go1.18.linux-amd64.tar.gz"
        );
        assert_eq!(
            mirror.apply("https://go.dev/dl/go1.18.linux-amd64.tar.gz"),
            "https://go.dev/dl/go1.18.linux-amd64.tar.gz"
        );
    }

    #[test]
    fn test_config_from_yaml() {
        let config: Config = serde_yaml_ng::from_str(
            "base_url: https://golang.google.cn/dl/\n\
             listing: /tmp/listing.html\n\
             mirror:\n  - from: https://golang.google.cn/dl/\n    to: https://mirrors.ustc.edu.cn/golang/\n",
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://golang.google.cn/dl/"));
        assert_eq!(config.listing, Some(PathBuf::from("/tmp/listing.html")));
        assert_eq!(
            config.mirror.apply("https://golang.google.cn/dl/go1.20.src.tar.gz"),
            "https://mirrors.ustc.edu.cn/golang/go1.20.src.tar.gz"
        );

        let empty: Config = serde_yaml_ng::from_str("{}").unwrap();
        assert!(empty.base_url.is_none());
        assert_eq!(empty.mirror.apply("https://go.dev/"), "https://go.dev/");
    }
}
