use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as ClientError};
use gcloud_spanner::mutation::{insert, insert_or_update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use super::CoffeeRepository;
use crate::config::SpannerConfig;
use crate::models::{Coffee, NewCoffee};

const TABLE: &str = "coffees";
const NAME_INDEX: &str = "coffees_by_name";
const COLUMNS: [&str; 3] = ["id", "name", "price"];
const ID_COUNTER_TABLE: &str = "coffee_id_counter";
const ID_COUNTER_COLUMNS: [&str; 2] = ["name", "last_id"];

const CREATE_TABLE_DDL: &str = r#"
CREATE TABLE coffees (
    id INT64 NOT NULL,
    name STRING(MAX) NOT NULL,
    price FLOAT64 NOT NULL,
) PRIMARY KEY (id)
"#;

const CREATE_NAME_INDEX_DDL: &str = "CREATE INDEX coffees_by_name ON coffees (name)";

// One row per counter, keyed by the table it numbers
const CREATE_ID_COUNTER_DDL: &str = r#"
CREATE TABLE coffee_id_counter (
    name STRING(64) NOT NULL,
    last_id INT64 NOT NULL,
) PRIMARY KEY (name)
"#;

/// Schema objects this repository needs: (kind, name, DDL)
const SCHEMA: [(&str, &str, &str); 3] = [
    ("TABLE", TABLE, CREATE_TABLE_DDL),
    ("INDEX", NAME_INDEX, CREATE_NAME_INDEX_DDL),
    ("TABLE", ID_COUNTER_TABLE, CREATE_ID_COUNTER_DDL),
];

/// Coffee repository backed by Cloud Spanner
///
/// Ids come from the `coffee_id_counter` row, read and advanced inside the
/// inserting read-write transaction. Spanner serialises conflicting
/// read-write transactions, so ids are unique, ascend in commit order and are
/// never handed out again after a delete.
#[derive(Clone)]
pub struct SpannerCoffeeRepository {
    inner: Arc<Client>,
}

impl SpannerCoffeeRepository {
    /// Connect to the configured database, provisioning it first if needed.
    ///
    /// The gcloud-spanner library picks up the `SPANNER_EMULATOR_HOST`
    /// environment variable on its own and talks to the emulator when set.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match config.emulator_host.as_deref() {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    async fn query_coffees(&self, statement: Statement) -> Result<Vec<Coffee>> {
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query coffees from Spanner")?;

        let mut coffees = Vec::new();
        while let Some(row) = result_set.next().await? {
            coffees.push(coffee_from_row(&row)?);
        }
        Ok(coffees)
    }

    /// Run one DML statement with integer parameters in a read-write
    /// transaction and return the affected row count.
    async fn execute_dml(&self, sql: &'static str, params: Vec<(&'static str, i64)>) -> Result<i64> {
        let result: Result<(_, i64), ClientError> = self
            .inner
            .read_write_transaction(move |tx| {
                let mut statement = Statement::new(sql);
                for (name, value) in &params {
                    statement.add_param(name, value);
                }
                Box::pin(async move { Ok(tx.update(statement).await?) })
            })
            .await;

        let (_, row_count) = result.context("Failed to execute DML against Spanner")?;
        Ok(row_count)
    }
}

fn coffee_from_row(row: &Row) -> Result<Coffee> {
    Ok(Coffee {
        id: row.column_by_name("id")?,
        name: row.column_by_name("name")?,
        price: row.column_by_name("price")?,
    })
}

#[async_trait]
impl CoffeeRepository for SpannerCoffeeRepository {
    async fn create(&self, coffee: NewCoffee) -> Result<Coffee> {
        let mut created = self.create_all(vec![coffee]).await?;
        created.pop().context("Insert transaction returned no coffee")
    }

    async fn create_all(&self, coffees: Vec<NewCoffee>) -> Result<Vec<Coffee>> {
        if coffees.is_empty() {
            return Ok(Vec::new());
        }

        let result: Result<(_, Vec<Coffee>), ClientError> = self
            .inner
            .read_write_transaction(move |tx| {
                let coffees = coffees.clone();
                Box::pin(async move {
                    let counter: Option<i64> = {
                        let mut statement = Statement::new(
                            "SELECT last_id FROM coffee_id_counter WHERE name = @name",
                        );
                        statement.add_param("name", &TABLE.to_string());
                        let mut result_set = tx.query(statement).await?;
                        match result_set.next().await? {
                            Some(row) => Some(row.column_by_name("last_id")?),
                            None => None,
                        }
                    };

                    // No counter row yet: seed it from rows written before it existed
                    let last_id: i64 = match counter {
                        Some(last_id) => last_id,
                        None => {
                            let mut result_set = tx
                                .query(Statement::new(
                                    "SELECT COALESCE(MAX(id), 0) AS max_id FROM coffees",
                                ))
                                .await?;
                            match result_set.next().await? {
                                Some(row) => row.column_by_name("max_id")?,
                                None => 0,
                            }
                        }
                    };

                    let created: Vec<Coffee> = coffees
                        .into_iter()
                        .zip(last_id + 1..)
                        .map(|(coffee, id)| coffee.with_id(id))
                        .collect();
                    let new_last_id = last_id + created.len() as i64;

                    let mut mutations: Vec<_> = created
                        .iter()
                        .map(|c| insert(TABLE, &COLUMNS, &[&c.id, &c.name, &c.price]))
                        .collect();
                    mutations.push(insert_or_update(
                        ID_COUNTER_TABLE,
                        &ID_COUNTER_COLUMNS,
                        &[&TABLE.to_string(), &new_last_id],
                    ));
                    tx.buffer_write(mutations);

                    Ok(created)
                })
            })
            .await;

        let (_, created) = result.context("Failed to insert coffees into Spanner")?;
        tracing::debug!("Inserted {} coffees", created.len());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Coffee>> {
        let mut statement = Statement::new("SELECT id, name, price FROM coffees WHERE id = @id");
        statement.add_param("id", &id);

        let coffee = self.query_coffees(statement).await?.into_iter().next();
        if coffee.is_none() {
            tracing::debug!("Coffee not found with id: {}", id);
        }
        Ok(coffee)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Coffee>> {
        let mut statement = Statement::new(
            "SELECT id, name, price FROM coffees WHERE name = @name ORDER BY id ASC",
        );
        statement.add_param("name", &name.to_string());

        self.query_coffees(statement).await
    }

    async fn find_all(&self) -> Result<Vec<Coffee>> {
        let coffees = self
            .query_coffees(Statement::new(
                "SELECT id, name, price FROM coffees ORDER BY id ASC",
            ))
            .await?;
        tracing::debug!("Listed {} coffees", coffees.len());
        Ok(coffees)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .execute_dml("DELETE FROM coffees WHERE id = @id", vec![("id", id)])
            .await?;
        tracing::debug!("Deleted {} coffee rows with id: {}", removed, id);
        Ok(removed > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let removed = self
            .execute_dml("DELETE FROM coffees WHERE true", Vec::new())
            .await?;
        tracing::debug!("Deleted {} coffees", removed);
        Ok(removed.max(0) as u64)
    }

    /// Executes `SELECT 1` to verify the session pool can reach Spanner.
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Create the Spanner instance, database, table and index if they are missing
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;
    ensure_database_exists(&admin_client, config, &instance_path, &database_path).await?;
    ensure_schema_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

async fn ensure_database_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", config.database),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// Whether `stmt` creates the object `kind name`, matching the name exactly
fn defines(stmt: &str, kind: &str, name: &str) -> bool {
    let Some(rest) = stmt.trim_start().strip_prefix(&format!("CREATE {} ", kind)) else {
        return false;
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('`').unwrap_or(rest);

    match rest.strip_prefix(name) {
        Some(after) => after
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '(' || c == '`'),
        None => false,
    }
}

/// DDL statements still needed, given the statements already applied
fn missing_schema_statements(existing: &[String]) -> Vec<String> {
    SCHEMA
        .iter()
        .filter(|(kind, name, _)| !existing.iter().any(|stmt| defines(stmt, kind, name)))
        .map(|(_, _, ddl)| ddl.trim().to_string())
        .collect()
}

async fn ensure_schema_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let statements = missing_schema_statements(&ddl_response.into_inner().statements);
    if statements.is_empty() {
        tracing::info!("Schema for '{}' already exists", TABLE);
        return Ok(());
    }

    tracing::info!("Applying {} schema statement(s) to {}", statements.len(), database_path);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements,
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start schema creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create schema")?;

    tracing::info!("Schema for '{}' created successfully", TABLE);
    Ok(())
}
