//! Multi-dialect SQL generation.
//!
//! Queries are described through the option structs of [`quarry_core`] and
//! compiled by a [`QueryInterface`] into SQL text plus the values to bind.
//! Nothing is executed, the statements are handed to whatever driver talks to
//! the database.
//!
//! ```
//! use quarry::{Dialect, RowCount, SelectOptions, TableRef, query_interface};
//!
//! let query = query_interface(Dialect::Sqlite);
//! let statement = query
//!     .select_query(
//!         &TableRef::new("users"),
//!         &SelectOptions {
//!             offset: Some(RowCount::Count(5)),
//!             ..Default::default()
//!         },
//!         None,
//!     )
//!     .unwrap();
//! assert_eq!(statement.sql, r#"SELECT * FROM "users" LIMIT -1 OFFSET 5"#);
//! ```

pub use quarry_core::writer::SqlWriter;
pub use quarry_core::*;
pub use quarry_db2::{DB2, Db2SqlWriter, IBMI};
pub use quarry_hana::{HANA, HanaSqlWriter};
pub use quarry_mssql::{MSSQL, MsSqlSqlWriter};
pub use quarry_mysql::{MARIADB, MYSQL, MySqlSqlWriter};
pub use quarry_oracle::{ORACLE, OracleSqlWriter};
pub use quarry_postgres::{COCKROACHDB, POSTGRES, PostgresSqlWriter};
pub use quarry_snowflake::{SNOWFLAKE, SnowflakeSqlWriter};
pub use quarry_sqlite::{SQLITE, SqliteSqlWriter};

static MYSQL_WRITER: MySqlSqlWriter = MySqlSqlWriter::new();
static MARIADB_WRITER: MySqlSqlWriter = MySqlSqlWriter::mariadb();
static POSTGRES_WRITER: PostgresSqlWriter = PostgresSqlWriter::new();
static COCKROACHDB_WRITER: PostgresSqlWriter = PostgresSqlWriter::cockroach();
static SQLITE_WRITER: SqliteSqlWriter = SqliteSqlWriter::new();
static MSSQL_WRITER: MsSqlSqlWriter = MsSqlSqlWriter::new();
static ORACLE_WRITER: OracleSqlWriter = OracleSqlWriter::new();
static DB2_WRITER: Db2SqlWriter = Db2SqlWriter::new();
static IBMI_WRITER: Db2SqlWriter = Db2SqlWriter::ibmi();
static SNOWFLAKE_WRITER: SnowflakeSqlWriter = SnowflakeSqlWriter::new();
static HANA_WRITER: HanaSqlWriter = HanaSqlWriter::new();

/// Writer producing the SQL of `dialect`.
pub fn writer(dialect: Dialect) -> &'static dyn SqlWriter {
    match dialect {
        Dialect::MySql => &MYSQL_WRITER,
        Dialect::MariaDb => &MARIADB_WRITER,
        Dialect::Postgres => &POSTGRES_WRITER,
        Dialect::CockroachDb => &COCKROACHDB_WRITER,
        Dialect::Sqlite => &SQLITE_WRITER,
        Dialect::MsSql => &MSSQL_WRITER,
        Dialect::Oracle => &ORACLE_WRITER,
        Dialect::Db2 => &DB2_WRITER,
        Dialect::IbmI => &IBMI_WRITER,
        Dialect::Snowflake => &SNOWFLAKE_WRITER,
        Dialect::Hana => &HANA_WRITER,
    }
}

pub fn query_interface(dialect: Dialect) -> QueryInterface {
    QueryInterface::new(writer(dialect))
}

/// [`query_interface`] for a dialect given by name, `"postgres"`, `"mssql"`, …
pub fn query_interface_for(name: &str) -> Result<QueryInterface> {
    let dialect = name
        .parse::<Dialect>()
        .with_context(|| format!("While selecting the dialect `{name}`"))?;
    log::debug!("Selected the {dialect} dialect");
    Ok(query_interface(dialect))
}
