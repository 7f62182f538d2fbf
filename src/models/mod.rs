pub mod config;
pub mod package;

pub use config::ServerConfig;
pub use package::{ArchiveType, PackageDist, VersionDist};
