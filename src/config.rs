//! Configuration management for hostblock.

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Blocklist category, one per toggle on the control surface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ads,
    Malware,
    Tracking,
    Malicious,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Ads,
        Category::Malware,
        Category::Tracking,
        Category::Malicious,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Ads => "ads",
            Category::Malware => "malware",
            Category::Tracking => "tracking",
            Category::Malicious => "malicious",
        };
        f.write_str(name)
    }
}

/// Which categories an update should pull in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySelection {
    pub ads: bool,
    pub malware: bool,
    pub tracking: bool,
    pub malicious: bool,
}

impl CategorySelection {
    pub fn new(ads: bool, malware: bool, tracking: bool, malicious: bool) -> Self {
        Self {
            ads,
            malware,
            tracking,
            malicious,
        }
    }

    pub fn all() -> Self {
        Self::new(true, true, true, true)
    }

    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Ads => self.ads,
            Category::Malware => self.malware,
            Category::Tracking => self.tracking,
            Category::Malicious => self.malicious,
        }
    }

    pub fn is_empty(&self) -> bool {
        !Category::ALL.iter().any(|c| self.contains(*c))
    }
}

/// A blocklist URL and the category it was configured under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistSource {
    pub category: Category,
    pub url: String,
}

/// Main configuration structure. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ad_block_lists: Vec<String>,
    pub malware_block_lists: Vec<String>,
    pub tracking_block_lists: Vec<String>,
    pub malicious_block_lists: Vec<String>,

    /// Hosts file to manage instead of the platform default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts_path: Option<PathBuf>,

    /// Directory for the rolling backup, run state and lock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate();
        Ok(config)
    }

    /// Check every list URL and warn about the ones that cannot be fetched.
    ///
    /// Bad URLs do not reject the config: they fail individually at fetch time
    /// and are skipped like any other download failure. Returns the rejected
    /// URLs.
    pub fn validate(&self) -> Vec<BlocklistSource> {
        let mut invalid = Vec::new();
        for category in Category::ALL {
            for url in self.urls(category) {
                match Url::parse(url) {
                    Ok(parsed) if parsed.scheme() == "https" => {}
                    Ok(parsed) if parsed.scheme() == "http" => {
                        warn!("{} list is fetched over plain HTTP: {}", category, url);
                    }
                    _ => {
                        warn!(
                            "{} list URL is not http:// or https:// and will be skipped: {}",
                            category, url
                        );
                        invalid.push(BlocklistSource {
                            category,
                            url: url.clone(),
                        });
                    }
                }
            }
        }
        invalid
    }

    /// Save configuration to a JSON file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        let parent_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.write_all(b"\n")?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// URLs configured for one category
    pub fn urls(&self, category: Category) -> &[String] {
        match category {
            Category::Ads => &self.ad_block_lists,
            Category::Malware => &self.malware_block_lists,
            Category::Tracking => &self.tracking_block_lists,
            Category::Malicious => &self.malicious_block_lists,
        }
    }

    /// Resolve a selection into the ordered list of sources to fetch.
    ///
    /// A URL listed under several selected categories is fetched once,
    /// attributed to the first of them.
    pub fn resolve(&self, selection: &CategorySelection) -> Vec<BlocklistSource> {
        let mut sources: Vec<BlocklistSource> = Vec::new();
        for category in Category::ALL {
            if !selection.contains(category) {
                continue;
            }
            for url in self.urls(category) {
                if !sources.iter().any(|s| &s.url == url) {
                    sources.push(BlocklistSource {
                        category,
                        url: url.clone(),
                    });
                }
            }
        }
        sources
    }

    /// Example configuration with well-known public lists, written by `init`
    pub fn starter() -> Self {
        Self {
            ad_block_lists: vec![
                "https://raw.githubusercontent.com/StevenBlack/hosts/master/hosts".to_string(),
                "https://pgl.yoyo.org/adservers/serverlist.php?hostformat=hosts&showintro=0&mimetype=plaintext".to_string(),
            ],
            malware_block_lists: vec![
                "https://urlhaus.abuse.ch/downloads/hostfile/".to_string(),
            ],
            tracking_block_lists: vec![
                "https://raw.githubusercontent.com/StevenBlack/hosts/master/alternates/fakenews/hosts".to_string(),
            ],
            malicious_block_lists: vec![
                "https://raw.githubusercontent.com/StevenBlack/hosts/master/alternates/gambling/hosts".to_string(),
            ],
            hosts_path: None,
            state_dir: None,
        }
    }
}
