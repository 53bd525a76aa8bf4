//! The MySQL collaborator: schema introspection, migration planning, and
//! transactional deployment with revision bookkeeping.
//!
//! Deployed target schemas are recorded in a `schemalex_revision` table;
//! a deploy diffs the newest recorded revision against the requested
//! schema, using the live `SHOW CREATE TABLE` output only to recover
//! names for unnamed-index drops.
//!
//! This is the only blocking, cancellable component: every operation
//! takes a [`CancellationToken`] and each awaited database call races it,
//! so an interrupt lands between statements and between per-table
//! introspection queries. Mutations run inside transactions, so a
//! cancelled operation persists nothing.

use std::future::Future;
use std::io::Write;

use chrono::Utc;
use mysql_diff_rs::diff::{self, DiffConfig, DiffError};
use mysql_diff_rs::model::Ident;
use mysql_diff_rs::parser::Parser;
use sqlx::mysql::{MySqlConnectOptions, MySqlDatabaseError, MySqlPoolOptions};
use sqlx::{Connection, MySql, MySqlPool, Row, Transaction};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;

/// Errors from planning and deploying.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Any database-side failure.
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    /// The planner rejected the schemas.
    #[error("failed to plan the migration")]
    Plan(#[from] DiffError),
    /// A migration statement failed to execute.
    #[error("failed to execute {statement:?}")]
    Execute {
        /// The offending statement.
        statement: String,
        /// The database error.
        #[source]
        source: sqlx::Error,
    },
    /// The recorded revision changed between planning and deploying.
    #[error("detected an unexpected schema change; plan again")]
    RevisionDrift,
    /// The caller's cancellation token fired.
    #[error("the operation was cancelled")]
    Cancelled,
}

/// Race a database call against the cancellation token. The token wins
/// ties so a cancelled caller never starts more work.
async fn guard<T>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, DeployError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DeployError::Cancelled),
        result = operation => Ok(result?),
    }
}

/// A planned migration: the recorded revision it starts from, the target
/// schema text, and the statements that bridge the two.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The previously deployed schema.
    pub from: String,
    /// The schema being deployed.
    pub to: String,
    /// Migration statements, in execution order, without trailing `;`.
    pub stmts: Vec<String>,
}

impl Plan {
    /// Write the plan as SQL text, one statement per `;\n`.
    ///
    /// # Errors
    ///
    /// Forwards I/O errors from the sink.
    pub fn preview<W: Write>(&self, dst: &mut W) -> std::io::Result<()> {
        for stmt in &self.stmts {
            writeln!(dst, "{stmt};")?;
        }
        Ok(())
    }
}

/// A connection pool to the target database.
pub struct Db {
    pool: MySqlPool,
}

impl Db {
    /// Connect using the resolved configuration. Sessions run with
    /// `utf8mb4` and a strict `sql_mode`.
    ///
    /// # Errors
    ///
    /// Forwards connection errors; [`DeployError::Cancelled`] when the
    /// token fires first.
    pub async fn connect(config: &Config, cancel: &CancellationToken) -> Result<Self, DeployError> {
        let mut options = MySqlConnectOptions::new().charset("utf8mb4");
        if let Some(socket) = &config.socket {
            options = options.socket(socket);
        } else {
            options = options
                .host(config.host.as_deref().unwrap_or("localhost"))
                .port(config.port);
        }
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        if let Some(database) = &config.database {
            options = options.database(database);
        }

        let pool = guard(
            cancel,
            MySqlPoolOptions::new()
                .after_connect(|conn, _meta| {
                    Box::pin(async move {
                        sqlx::query(
                            "SET sql_mode = 'TRADITIONAL,NO_AUTO_VALUE_ON_ZERO,ONLY_FULL_GROUP_BY'",
                        )
                        .execute(&mut *conn)
                        .await
                        .map(|_| ())
                    })
                })
                .connect_with(options),
        )
        .await?;
        Ok(Self { pool })
    }

    /// Build the pool from an existing connection pool (tests).
    #[must_use]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Plan the migration from the recorded revision to `schema`.
    ///
    /// # Errors
    ///
    /// See [`DeployError`]. A token that fires during the
    /// schema-introspection call surfaces here as
    /// [`DeployError::Cancelled`].
    pub async fn plan(&self, schema: &str, cancel: &CancellationToken) -> Result<Plan, DeployError> {
        let mut tx = guard(cancel, self.pool.begin()).await?;
        let latest = guard(cancel, latest_revision(&mut tx)).await?;
        guard(cancel, tx.commit()).await?;

        // the current schema is advisory; failing to read it only loses
        // unnamed-index name recovery, but cancellation still propagates
        let current = match self.load_schema(cancel).await {
            Ok(schema) if !schema.is_empty() => Some(schema),
            Ok(_) => None,
            Err(DeployError::Cancelled) => return Err(DeployError::Cancelled),
            Err(_) => None,
        };

        let from = Parser::new(&latest.sql_text)
            .parse()
            .map_err(|e| DeployError::Plan(DiffError::ParseFrom(e)))?;
        let to = Parser::new(schema)
            .parse()
            .map_err(|e| DeployError::Plan(DiffError::ParseTo(e)))?;

        let config = DiffConfig {
            transaction: false,
            current_schema: current,
            indent: "  ".to_string(),
        };
        let stmts = diff::diff(&from, &to, &config)?;

        Ok(Plan {
            from: latest.sql_text,
            to: schema.to_string(),
            stmts,
        })
    }

    /// Apply a plan inside a transaction and record the new revision.
    ///
    /// # Errors
    ///
    /// See [`DeployError`]; the transaction rolls back on any failure,
    /// cancellation included.
    pub async fn deploy(&self, plan: &Plan, cancel: &CancellationToken) -> Result<(), DeployError> {
        info!("starting to deploy");
        let mut conn = guard(cancel, self.pool.acquire()).await?;
        let mut tx = guard(cancel, conn.begin()).await?;

        match run_migration(&mut tx, plan, cancel).await {
            Ok(()) => {
                tx.commit().await?;
                info!("done");
                Ok(())
            }
            Err(e) => {
                drop(tx);
                // the session variable outlives the rolled-back transaction
                let _ = sqlx::query("SET FOREIGN_KEY_CHECKS = 1")
                    .execute(&mut *conn)
                    .await;
                Err(e)
            }
        }
    }

    /// Render the running database's schema as an importable script.
    ///
    /// # Errors
    ///
    /// Forwards database errors; the token is checked between per-table
    /// queries.
    pub async fn load_schema(&self, cancel: &CancellationToken) -> Result<String, DeployError> {
        let mut tx = guard(cancel, self.pool.begin()).await?;

        let tables: Vec<String> =
            guard(cancel, sqlx::query_scalar("SHOW TABLES").fetch_all(&mut *tx)).await?;
        if tables.is_empty() {
            return Ok(String::new());
        }

        let mut statements = vec!["SET FOREIGN_KEY_CHECKS = 0;".to_string(), String::new()];
        for table in &tables {
            info!(table = %table, "importing table");
            let name = Ident::new(table.as_str()).quoted();
            statements.push(format!("DROP TABLE IF EXISTS {name};"));
            statements.push(String::new());

            let row = guard(
                cancel,
                sqlx::query(&format!("SHOW CREATE TABLE {name}")).fetch_one(&mut *tx),
            )
            .await?;
            let mut sql_text: String = row.try_get(1)?;
            if !sql_text.ends_with(';') {
                sql_text.push(';');
            }
            statements.push(sql_text);
            statements.push(String::new());
        }
        statements.push("SET FOREIGN_KEY_CHECKS = 1;".to_string());

        tx.commit().await?;
        Ok(statements.join("\n"))
    }

    /// Record `sql_text` as the deployed revision without executing it.
    ///
    /// # Errors
    ///
    /// Forwards database errors; [`DeployError::Cancelled`] when the
    /// token fires first.
    pub async fn import(&self, sql_text: &str, cancel: &CancellationToken) -> Result<(), DeployError> {
        info!("starting to import");
        let mut tx = guard(cancel, self.pool.begin()).await?;
        info!("updating the schema information");
        guard(cancel, insert_revision(&mut tx, sql_text)).await?;
        tx.commit().await?;
        info!("done");
        Ok(())
    }
}

async fn run_migration(
    tx: &mut Transaction<'_, MySql>,
    plan: &Plan,
    cancel: &CancellationToken,
) -> Result<(), DeployError> {
    let latest = guard(cancel, latest_revision(tx)).await?;
    if latest.sql_text != plan.from {
        return Err(DeployError::RevisionDrift);
    }

    // foreign-key checks stay off while tables shuffle around
    guard(
        cancel,
        sqlx::query("SET FOREIGN_KEY_CHECKS = 0").execute(&mut **tx),
    )
    .await?;

    for stmt in &plan.stmts {
        info!(statement = %stmt, "executing");
        guard(cancel, sqlx::query(stmt).execute(&mut **tx))
            .await
            .map_err(|e| match e {
                DeployError::Db(source) => DeployError::Execute {
                    statement: stmt.clone(),
                    source,
                },
                other => other,
            })?;
    }

    info!("updating the schema information");
    guard(cancel, insert_revision(tx, &plan.to)).await?;

    sqlx::query("SET FOREIGN_KEY_CHECKS = 1")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// The most recently deployed revision.
#[derive(Debug, Clone, Default)]
struct Revision {
    sql_text: String,
}

/// Read the newest revision. A missing bookkeeping table (MySQL error
/// 1146) or an empty one means nothing was deployed yet.
async fn latest_revision(tx: &mut Transaction<'_, MySql>) -> Result<Revision, sqlx::Error> {
    let row = sqlx::query(
        "SELECT `sql_text` FROM `schemalex_revision` ORDER BY `id` DESC LIMIT 1",
    )
    .fetch_optional(&mut **tx)
    .await;

    match row {
        Ok(Some(row)) => Ok(Revision {
            sql_text: row.try_get(0)?,
        }),
        Ok(None) => Ok(Revision::default()),
        Err(e) if is_no_such_table(&e) => Ok(Revision::default()),
        Err(e) => Err(e),
    }
}

async fn insert_revision(
    tx: &mut Transaction<'_, MySql>,
    sql_text: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS `schemalex_revision` ( \
         `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, \
         `sql_text` TEXT NOT NULL, \
         `upgraded_at` DATETIME(6) NOT NULL, \
         PRIMARY KEY (`id`) \
         ) ENGINE=InnoDB DEFAULT CHARACTER SET utf8mb4",
    )
    .execute(&mut **tx)
    .await?;

    sqlx::query("INSERT INTO `schemalex_revision` (`sql_text`, `upgraded_at`) VALUES (?, ?)")
        .bind(sql_text)
        .bind(Utc::now().naive_utc())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// https://dev.mysql.com/doc/mysql-errors/8.0/en/server-error-reference.html#error_er_no_such_table
fn is_no_such_table(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.try_downcast_ref::<MySqlDatabaseError>())
        .is_some_and(|db| db.number() == 1146)
}
