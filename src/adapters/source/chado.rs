//! Organism enumeration from a Chado database

use super::{dedupe, OrganismSource};
use crate::config::DatabaseConfig;
use crate::domain::{ChadoGffError, OrganismId, OrganismList, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

const ALL_ORGANISMS: &str = "\
SELECT o.common_name
FROM organism o
ORDER BY o.common_name, o.organism_id
LIMIT $1 OFFSET $2";

const PUBLIC_ORGANISMS: &str = "\
SELECT o.common_name
FROM organism o
WHERE EXISTS (
    SELECT 1
    FROM organismprop op
    JOIN cvterm t ON t.cvterm_id = op.type_id
    WHERE op.organism_id = o.organism_id
      AND t.name = 'genedb_public'
      AND op.value = 'yes'
)
ORDER BY o.common_name, o.organism_id
LIMIT $1 OFFSET $2";

/// Pages through the `organism` table `page_size` rows at a time
pub struct ChadoOrganismSource {
    pool: Pool,
    target: String,
    page_size: usize,
    public_only: bool,
}

impl ChadoOrganismSource {
    /// Builds the connection pool; no connection is opened until the first query
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Database`] if the pool cannot be built.
    pub fn new(config: &DatabaseConfig, page_size: usize) -> Result<Self> {
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.host)
            .port(config.port)
            .dbname(&config.dbname)
            .user(&config.user)
            .application_name("chado-gff")
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(password) = &config.password {
            let password: &str = password.expose_secret().as_ref();
            pg_config.password(password);
        }

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let pool = Pool::builder(manager)
            .max_size(1)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .build()
            .map_err(|e| ChadoGffError::Database(format!("Failed to create connection pool: {e}")))?;

        Ok(Self {
            pool,
            target: config.writedb_target(),
            page_size: page_size.max(1),
            public_only: config.public_only,
        })
    }

    fn query(&self) -> &'static str {
        if self.public_only {
            PUBLIC_ORGANISMS
        } else {
            ALL_ORGANISMS
        }
    }
}

#[async_trait]
impl OrganismSource for ChadoOrganismSource {
    fn describe(&self) -> String {
        format!("chado database {}", self.target)
    }

    async fn organisms(&self) -> Result<OrganismList> {
        let client = self.pool.get().await.map_err(|e| {
            ChadoGffError::Database(format!("Failed to get connection from pool: {e}"))
        })?;
        let statement = client
            .prepare(self.query())
            .await
            .map_err(|e| ChadoGffError::Database(format!("Failed to prepare organism query: {e}")))?;

        let limit = self.page_size as i64;
        let mut offset: i64 = 0;
        let mut ids = Vec::new();

        loop {
            let rows = client
                .query(&statement, &[&limit, &offset])
                .await
                .map_err(|e| ChadoGffError::Database(format!("Organism query failed: {e}")))?;
            let fetched = rows.len();

            for row in rows {
                let name: Option<String> = row
                    .try_get(0)
                    .map_err(|e| ChadoGffError::Database(format!("Unexpected organism row: {e}")))?;
                match name.map(OrganismId::new) {
                    Some(Ok(id)) => ids.push(id),
                    Some(Err(e)) => tracing::warn!(error = %e, "Skipping organism with unusable name"),
                    None => tracing::warn!("Skipping organism without common_name"),
                }
            }

            tracing::debug!(offset, fetched, "Fetched organism page");
            if fetched < self.page_size {
                break;
            }
            offset += limit;
        }

        let list = dedupe(ids);
        tracing::info!(
            database = %self.target,
            public_only = self.public_only,
            organisms = list.len(),
            "Enumerated organisms"
        );
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_only: bool) -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "pathogens".to_string(),
            user: "genedb_ro".to_string(),
            password: None,
            public_only,
            connect_timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_query_selection() {
        let all = ChadoOrganismSource::new(&config(false), 10).unwrap();
        assert!(!all.query().contains("genedb_public"));

        let public = ChadoOrganismSource::new(&config(true), 10).unwrap();
        assert!(public.query().contains("genedb_public"));
        assert!(public.query().contains("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_queries_page_in_a_total_order() {
        for query in [ALL_ORGANISMS, PUBLIC_ORGANISMS] {
            assert!(query.contains("ORDER BY o.common_name, o.organism_id\nLIMIT"));
        }
    }

    #[tokio::test]
    async fn test_describe_names_database() {
        let source = ChadoOrganismSource::new(&config(false), 0).unwrap();

        assert_eq!(source.describe(), "chado database localhost:5432/pathogens?genedb_ro");
        assert_eq!(source.page_size, 1);
    }
}
