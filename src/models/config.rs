use std::env;
use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub dist_root: String,
    /// Base URL used when building download links in metadata documents
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "packbay.db".to_string(),
            dist_root: "/var/lib/packbay/dists".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration, letting PACKBAY_* environment variables override defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = env::var("PACKBAY_ADDR") {
            config.bind_addr = addr.parse()?;
        }
        if let Ok(path) = env::var("PACKBAY_DB") {
            config.db_path = path;
        }
        if let Ok(root) = env::var("PACKBAY_DIST_ROOT") {
            config.dist_root = root;
        }
        if let Ok(url) = env::var("PACKBAY_BASE_URL") {
            config.public_base_url = url;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.db_path, "packbay.db");
        assert_eq!(config.dist_root, "/var/lib/packbay/dists");
        assert_eq!(config.public_base_url, "http://localhost:8080");
    }
}
