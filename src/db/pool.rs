use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct DbPool(SqlitePool);

impl DbPool {
    pub async fn new(db_path: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(&format!("sqlite:{}", db_path)).await?;
        Ok(Self(pool))
    }

    pub fn inner(&self) -> &SqlitePool {
        &self.0
    }
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    info!("Running database migrations");

    sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS package_dists (
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
    "#).execute(pool.inner()).await?;

    sqlx::query(r#"
        CREATE INDEX IF NOT EXISTS idx_package_dists_package
        ON package_dists (repo, namespace, package)
    "#).execute(pool.inner()).await?;

    info!("Database migrations completed");
    Ok(())
}
