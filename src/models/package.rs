use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Archive types this repository serves, matching the database CHECK constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArchiveType {
    Zip,
    Tar,
    Tgz,
}

impl ArchiveType {
    pub fn content_type(&self) -> &'static str {
        match self {
            ArchiveType::Zip => "application/zip",
            ArchiveType::Tar => "application/x-tar",
            ArchiveType::Tgz => "application/gzip",
        }
    }
}

impl std::fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveType::Zip => write!(f, "zip"),
            ArchiveType::Tar => write!(f, "tar"),
            ArchiveType::Tgz => write!(f, "tgz"),
        }
    }
}

impl std::str::FromStr for ArchiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zip" => Ok(ArchiveType::Zip),
            "tar" => Ok(ArchiveType::Tar),
            "tgz" => Ok(ArchiveType::Tgz),
            _ => Err(format!("Unsupported archive type: {}", s)),
        }
    }
}

/// One published distribution record from the package index
#[derive(Debug, Clone)]
pub struct PackageDist {
    pub repo: String,
    pub namespace: String,
    pub package: String,
    pub version: String,
    pub reference: String,
    pub dist_type: ArchiveType,
    pub size_bytes: Option<i64>,
    pub published_at: DateTime<Utc>,
}

impl PackageDist {
    /// Absolute download URL for this distribution under the public base URL
    pub fn dist_url(&self, base_url: &str) -> String {
        format!(
            "{}/repo/{}/dist/{}/{}/{}/{}.{}",
            base_url.trim_end_matches('/'),
            self.repo,
            self.namespace,
            self.package,
            self.version,
            self.reference,
            self.dist_type
        )
    }
}

/// Per-version entry in the package metadata document
#[derive(Debug, Serialize)]
pub struct VersionDist {
    pub reference: String,
    #[serde(rename = "type")]
    pub dist_type: ArchiveType,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
    pub published_at: DateTime<Utc>,
}

impl VersionDist {
    pub fn from_dist(dist: &PackageDist, base_url: &str) -> Self {
        Self {
            reference: dist.reference.clone(),
            dist_type: dist.dist_type,
            url: dist.dist_url(base_url),
            size_bytes: dist.size_bytes,
            published_at: dist.published_at,
        }
    }
}
