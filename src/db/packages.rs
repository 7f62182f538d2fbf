use crate::models::{ArchiveType, PackageDist};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Read-only queries over the package index.
///
/// Rows are written by the publishing pipeline out-of-band; this service
/// never inserts or updates them.
pub struct PackageIndex {
    pool: SqlitePool,
}

impl PackageIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every published distribution of a package, oldest first
    pub async fn list_versions(
        &self,
        repo: &str,
        namespace: &str,
        package: &str,
    ) -> Result<Vec<PackageDist>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PackageDistRow>(
            "SELECT repo, namespace, package, version, reference, dist_type, size_bytes, published_at
             FROM package_dists
             WHERE repo = ? AND namespace = ? AND package = ?
             ORDER BY published_at ASC, id ASC",
        )
        .bind(repo)
        .bind(namespace)
        .bind(package)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_dist()).collect())
    }

    /// Look up one distribution by its full identity
    pub async fn find_dist(
        &self,
        repo: &str,
        namespace: &str,
        package: &str,
        version: &str,
        reference: &str,
        dist_type: ArchiveType,
    ) -> Result<Option<PackageDist>, sqlx::Error> {
        let row = sqlx::query_as::<_, PackageDistRow>(
            "SELECT repo, namespace, package, version, reference, dist_type, size_bytes, published_at
             FROM package_dists
             WHERE repo = ? AND namespace = ? AND package = ? AND version = ? AND reference = ? AND dist_type = ?",
        )
        .bind(repo)
        .bind(namespace)
        .bind(package)
        .bind(version)
        .bind(reference)
        .bind(dist_type.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_dist()))
    }
}

/// Raw database row for package distributions
#[derive(sqlx::FromRow)]
struct PackageDistRow {
    repo: String,
    namespace: String,
    package: String,
    version: String,
    reference: String,
    dist_type: String,
    size_bytes: Option<i64>,
    published_at: String,
}

impl PackageDistRow {
    fn into_dist(self) -> PackageDist {
        PackageDist {
            repo: self.repo,
            namespace: self.namespace,
            package: self.package,
            version: self.version,
            reference: self.reference,
            dist_type: self.dist_type.parse().unwrap_or(ArchiveType::Zip),
            size_bytes: self.size_bytes,
            published_at: parse_datetime(&self.published_at),
        }
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();

        sqlx::query(
            r#"
            CREATE TABLE package_dists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                repo TEXT NOT NULL,
                namespace TEXT NOT NULL,
                package TEXT NOT NULL,
                version TEXT NOT NULL,
                reference TEXT NOT NULL,
                dist_type TEXT NOT NULL CHECK (dist_type IN ('zip', 'tar', 'tgz')),
                size_bytes INTEGER,
                published_at TEXT NOT NULL,
                UNIQUE(repo, namespace, package, version, reference, dist_type)
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    async fn publish(
        pool: &SqlitePool,
        repo: &str,
        namespace: &str,
        package: &str,
        version: &str,
        reference: &str,
        dist_type: &str,
        published_at: &str,
    ) {
        sqlx::query(
            "INSERT INTO package_dists (repo, namespace, package, version, reference, dist_type, size_bytes, published_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(repo)
        .bind(namespace)
        .bind(package)
        .bind(version)
        .bind(reference)
        .bind(dist_type)
        .bind(1024i64)
        .bind(published_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_versions_ordered_by_publish_time() {
        let pool = create_test_pool().await;
        let index = PackageIndex::new(pool.clone());

        publish(&pool, "main", "acme", "widget", "1.1.0", "def456", "zip", "2026-02-01T00:00:00+00:00").await;
        publish(&pool, "main", "acme", "widget", "1.0.0", "abc123", "zip", "2026-01-01T00:00:00+00:00").await;

        let dists = index.list_versions("main", "acme", "widget").await.unwrap();
        assert_eq!(dists.len(), 2);
        assert_eq!(dists[0].version, "1.0.0");
        assert_eq!(dists[1].version, "1.1.0");
        assert_eq!(dists[0].dist_type, ArchiveType::Zip);
    }

    #[tokio::test]
    async fn test_list_versions_scoped_to_repo() {
        let pool = create_test_pool().await;
        let index = PackageIndex::new(pool.clone());

        publish(&pool, "main", "acme", "widget", "1.0.0", "abc123", "zip", "2026-01-01T00:00:00+00:00").await;
        publish(&pool, "staging", "acme", "widget", "2.0.0", "fff999", "zip", "2026-01-02T00:00:00+00:00").await;

        let dists = index.list_versions("main", "acme", "widget").await.unwrap();
        assert_eq!(dists.len(), 1);
        assert_eq!(dists[0].version, "1.0.0");
    }

    #[tokio::test]
    async fn test_list_versions_empty_for_unknown_package() {
        let pool = create_test_pool().await;
        let index = PackageIndex::new(pool);

        let dists = index.list_versions("main", "acme", "missing").await.unwrap();
        assert!(dists.is_empty());
    }

    #[tokio::test]
    async fn test_find_dist() {
        let pool = create_test_pool().await;
        let index = PackageIndex::new(pool.clone());

        publish(&pool, "main", "acme", "widget", "1.0.0", "abc123", "zip", "2026-01-01T00:00:00+00:00").await;

        let dist = index
            .find_dist("main", "acme", "widget", "1.0.0", "abc123", ArchiveType::Zip)
            .await
            .unwrap()
            .expect("dist should be indexed");
        assert_eq!(dist.reference, "abc123");
        assert_eq!(dist.size_bytes, Some(1024));

        // Same identity but a different archive type is a different dist
        let miss = index
            .find_dist("main", "acme", "widget", "1.0.0", "abc123", ArchiveType::Tar)
            .await
            .unwrap();
        assert!(miss.is_none());
    }
}
