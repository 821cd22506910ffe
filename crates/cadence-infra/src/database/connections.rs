use std::time::Duration;

#[cfg(feature = "postgres")]
use std::sync::Arc;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

#[cfg(feature = "postgres")]
use cadence_core::ports::Repositories;

/// Name of the optional secondary database that receives analytics rows.
pub const ANALYTICS_DB: &str = "analytics";

/// Configuration for the main database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub main_url: String,
    pub main_max_connections: u32,
    pub main_min_connections: u32,
    pub connect_timeout: Duration,
    pub secondary_databases: Vec<SecondaryDbConfig>,
}

/// Configuration for a secondary database.
#[derive(Debug, Clone)]
pub struct SecondaryDbConfig {
    pub name: String,
    pub url: String,
    pub max_connections: u32,
}

/// A named connection to a secondary database.
#[cfg(feature = "postgres")]
pub struct NamedConnection {
    pub name: String,
    pub conn: Arc<DbConn>,
}

#[cfg(not(feature = "postgres"))]
pub struct NamedConnection {
    pub name: String,
}

/// Main connection plus named secondary connections.
///
/// Workflow tables live on `main`. Analytics rows go to the `analytics`
/// secondary database when one is configured, and to `main` otherwise.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: Arc<DbConn>,
    pub secondary: Vec<NamedConnection>,
}

#[cfg(not(feature = "postgres"))]
pub struct DatabaseConnections {
    pub secondary: Vec<NamedConnection>,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Initialize all database connections from configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connections...");

        let main_opts = ConnectOptions::new(&config.main_url)
            .max_connections(config.main_max_connections)
            .min_connections(config.main_min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let main = Database::connect(main_opts).await?;
        tracing::info!(pool = config.main_max_connections, "Main database connected");

        let mut secondary = Vec::new();
        for db_config in &config.secondary_databases {
            let opts = ConnectOptions::new(&db_config.url)
                .max_connections(db_config.max_connections)
                .min_connections(1)
                .connect_timeout(config.connect_timeout)
                .idle_timeout(Duration::from_secs(300))
                .sqlx_logging(false)
                .to_owned();

            let conn = Database::connect(opts).await?;
            tracing::info!(
                name = %db_config.name,
                pool = db_config.max_connections,
                "Secondary database connected"
            );

            secondary.push(NamedConnection {
                name: db_config.name.clone(),
                conn: Arc::new(conn),
            });
        }

        Ok(Self {
            main: Arc::new(main),
            secondary,
        })
    }

    /// Get a secondary database connection by name.
    pub fn get(&self, name: &str) -> Option<&Arc<DbConn>> {
        self.secondary
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.conn)
    }

    pub fn secondary_names(&self) -> Vec<&str> {
        self.secondary.iter().map(|c| c.name.as_str()).collect()
    }

    /// Postgres-backed repository bundle over these connections.
    pub fn repositories(&self) -> Repositories {
        use super::postgres_repo::*;

        let analytics_db = Arc::clone(self.get(ANALYTICS_DB).unwrap_or(&self.main));

        Repositories {
            tenants: Arc::new(PostgresTenantRepository::new(Arc::clone(&self.main))),
            users: Arc::new(PostgresUserRepository::new(Arc::clone(&self.main))),
            brands: Arc::new(PostgresBrandRepository::new(Arc::clone(&self.main))),
            posts: Arc::new(PostgresPostRepository::new(Arc::clone(&self.main))),
            schedules: Arc::new(PostgresScheduleRepository::new(Arc::clone(&self.main))),
            analytics: Arc::new(PostgresAnalyticsRepository::new(analytics_db)),
            approvals: Arc::new(PostgresApprovalLogRepository::new(Arc::clone(&self.main))),
        }
    }

    /// Round-trip `SELECT 1` on the main connection.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.main.ping().await
    }
}
