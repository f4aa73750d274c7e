//! SQL Server backend over tiberius

use async_trait::async_trait;
use tiberius::{Client, Config, ToSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use super::types::{declared_type, into_table};
use crate::error::{Error, Result};
use crate::query::{CommandKind, Query, RETURN_VALUE_PARAMETER};
use crate::table::DataTable;
use crate::traits::{Database, ExecuteResult, RowExt};

type SqlClient = Client<Compat<TcpStream>>;

/// A SQL Server database addressed by an ADO.NET style connection string.
///
/// No connection is held between calls: every operation opens a fresh TDS
/// connection and closes it again, whether the statement succeeded or not.
///
/// # Example
///
/// ```ignore
/// use dbforge::{Database, Query, SqlServerDatabase};
///
/// let db = SqlServerDatabase::new("server=tcp:localhost,1433;user=sa;password=...;TrustServerCertificate=true");
/// let games: Vec<Game> = Query::procedure("[dbo].[Game_SelectAll]")
///     .fetch_all(&db)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqlServerDatabase {
    connection_string: String,
}

impl SqlServerDatabase {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn validate(&self, query: &Query) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(Error::Argument(
                "connection string must not be empty".to_string(),
            ));
        }
        query.validate()
    }

    async fn connect(&self) -> Result<SqlClient> {
        let config = Config::from_ado_string(&self.connection_string)?;
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        let client = Client::connect(config, tcp.compat_write()).await?;
        Ok(client)
    }

    /// Open a connection, run `f`, and close the connection on every path.
    async fn with_client<T, F>(&self, query: &Query, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(
            &'c mut SqlClient,
            &'c Command,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<T>> + Send + 'c>>,
    {
        self.validate(query)?;
        let command = Command::render(query);
        debug!(sql = %command.sql, params = command.params.len(), "executing");

        let mut client = self.connect().await?;
        let result = f(&mut client, &command).await;
        if let Err(e) = client.close().await {
            debug!("error closing connection: {}", e);
        }
        result
    }
}

/// Query text and positional parameters as sent over the wire.
struct Command {
    sql: String,
    params: Vec<crate::value::Value>,
    kind: CommandKind,
}

impl Command {
    fn render(query: &Query) -> Self {
        let inputs: Vec<_> = query.params().inputs().collect();
        let params = inputs.iter().map(|p| p.value.clone()).collect();

        let sql = match query.kind() {
            CommandKind::StoredProcedure => {
                let args = inputs
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{} = @P{}", p.name, i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "DECLARE {rv} INT; EXEC {rv} = {proc}{sep}{args}; SELECT {rv} AS [RETURN_VALUE], @@ROWCOUNT AS [ROWS_AFFECTED];",
                    rv = RETURN_VALUE_PARAMETER,
                    proc = query.sql(),
                    sep = if args.is_empty() { "" } else { " " },
                    args = args,
                )
            }
            CommandKind::Text => {
                // Named parameters become locals initialised from the positional ones
                let mut prelude = String::new();
                for (i, p) in inputs.iter().enumerate() {
                    let positional = format!("@P{}", i + 1);
                    if !p.name.eq_ignore_ascii_case(&positional) {
                        prelude.push_str(&format!(
                            "DECLARE {} {} = {}; ",
                            p.name,
                            declared_type(&p.value),
                            positional
                        ));
                    }
                }
                format!("{}{}", prelude, query.sql())
            }
        };

        Self {
            sql,
            params,
            kind: query.kind(),
        }
    }

    fn bindings(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|v| v as &dyn ToSql).collect()
    }
}

/// Read the trailing status result set of a stored procedure call.
fn procedure_status(status: Option<&DataTable>) -> Result<ExecuteResult> {
    let row = status
        .and_then(|t| t.row(0))
        .ok_or_else(|| Error::Query("stored procedure returned no status row".to_string()))?;
    let rows_affected: Option<i32> = row.get("ROWS_AFFECTED")?;
    Ok(ExecuteResult {
        rows_affected: rows_affected.unwrap_or(0).max(0) as u64,
        return_value: row.get("RETURN_VALUE")?,
    })
}

#[async_trait]
impl Database for SqlServerDatabase {
    async fn execute(&self, query: &Query) -> Result<ExecuteResult> {
        self.with_client(query, |client, command| {
            Box::pin(async move {
                match command.kind {
                    CommandKind::Text => {
                        let result = client.execute(command.sql.as_str(), &command.bindings()).await?;
                        Ok(ExecuteResult {
                            rows_affected: result.total(),
                            return_value: None,
                        })
                    }
                    CommandKind::StoredProcedure => {
                        let stream = client.query(command.sql.as_str(), &command.bindings()).await?;
                        let sets = stream.into_results().await?;
                        let status = sets.into_iter().last().map(into_table).transpose()?;
                        procedure_status(status.as_ref())
                    }
                }
            })
        })
        .await
    }

    async fn fetch_table(&self, query: &Query) -> Result<DataTable> {
        self.with_client(query, |client, command| {
            Box::pin(async move {
                let stream = client.query(command.sql.as_str(), &command.bindings()).await?;
                let mut sets = stream.into_results().await?;
                if command.kind == CommandKind::StoredProcedure {
                    // the last set is the status row appended by the call wrapper
                    sets.pop();
                }
                match sets.into_iter().next() {
                    Some(rows) => into_table(rows),
                    None => Ok(DataTable::default()),
                }
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_procedure_text() {
        let query = Query::procedure("[dbo].[Game_Update]")
            .param("Id", 1i32)
            .param("@Name", "Doom");
        let command = Command::render(&query);
        assert_eq!(
            command.sql,
            "DECLARE @RETURN_VALUE INT; EXEC @RETURN_VALUE = [dbo].[Game_Update] @Id = @P1, @Name = @P2; SELECT @RETURN_VALUE AS [RETURN_VALUE], @@ROWCOUNT AS [ROWS_AFFECTED];"
        );
        assert_eq!(command.params, vec![Value::I32(1), Value::String("Doom".into())]);
    }

    #[test]
    fn test_procedure_without_arguments() {
        let command = Command::render(&Query::procedure("[dbo].[Game_SelectAll]"));
        assert!(command
            .sql
            .contains("EXEC @RETURN_VALUE = [dbo].[Game_SelectAll];"));
        assert!(command.params.is_empty());
    }

    #[test]
    fn test_text_named_parameters_declared() {
        let query = Query::new("SELECT * FROM Game WHERE Id = @Id").param("Id", 5i64);
        let command = Command::render(&query);
        assert_eq!(
            command.sql,
            "DECLARE @Id BIGINT = @P1; SELECT * FROM Game WHERE Id = @Id"
        );
    }

    #[test]
    fn test_text_positional_untouched() {
        let query = Query::new("SELECT @P1").bind(5i32);
        assert_eq!(Command::render(&query).sql, "SELECT @P1");
    }

    #[test]
    fn test_procedure_status() {
        let table = DataTable::new(
            vec!["RETURN_VALUE".into(), "ROWS_AFFECTED".into()],
            vec![vec![Value::I32(-1), Value::I32(3)]],
        );
        let result = procedure_status(Some(&table)).unwrap();
        assert_eq!(result.rows_affected, 3);
        assert_eq!(result.return_value, Some(-1));
        assert!(procedure_status(None).is_err());
    }

    #[tokio::test]
    async fn test_empty_connection_string_fails_before_io() {
        let db = SqlServerDatabase::new("");
        let err = db.execute(&Query::new("SELECT 1")).await.unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[tokio::test]
    async fn test_empty_sql_fails_before_io() {
        let db = SqlServerDatabase::new("server=tcp:127.0.0.1,1;user=sa;password=x");
        let err = db.fetch_table(&Query::new("")).await.unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }
}
