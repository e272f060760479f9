use crate::{
    AddColumnOptions, BindParams, BulkDeleteOptions, ColumnDef, CompiledStatement, Constraint,
    ConstraintChecking, CreateDatabaseOptions, CreateSchemaOptions, CreateTableOptions,
    Descriptor, Dialect, DropDatabaseOptions, DropSchemaOptions, DropTableOptions, Expr,
    IndexOptions, InsertOptions, IsolationLevel, ListSchemasOptions, ListTablesOptions,
    ModelMeta, Query, RawQueryOptions, RemoveColumnOptions, RemoveConstraintOptions,
    RemoveIndexOptions, Replacements, Result, Row, SelectOptions, SqlError,
    StartTransactionOptions, TableRef, TruncateTableOptions, UpdateOptions, UpsertOptions, Value,
    truncate_long,
    writer::{Context, Fragment, SqlWriter},
};
use std::fmt;

/// Statement level inputs shared by every compilation.
#[derive(Default, Clone, Copy)]
struct Inputs<'a> {
    model: Option<&'a ModelMeta>,
    replacements: Option<&'a Replacements>,
    bind: Option<&'a BindParams>,
    bind_values: bool,
}

impl<'a> Inputs<'a> {
    fn model(model: Option<&'a ModelMeta>) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }
}

/// Entry point producing [`CompiledStatement`]s for one dialect.
///
/// Every method validates its inputs, writes the statement through the
/// dialect [`SqlWriter`] and returns the SQL together with the values the
/// driver must bind. Nothing is executed here.
#[derive(Clone, Copy)]
pub struct QueryInterface {
    writer: &'static dyn SqlWriter,
}

impl fmt::Debug for QueryInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryInterface")
            .field("dialect", &self.dialect())
            .finish()
    }
}

impl QueryInterface {
    pub const fn new(writer: &'static dyn SqlWriter) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &'static dyn SqlWriter {
        self.writer
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        self.writer.descriptor()
    }

    pub fn dialect(&self) -> Dialect {
        self.writer.dialect()
    }

    fn compile_with<F>(&self, operation: &str, inputs: Inputs, write: F) -> Result<CompiledStatement>
    where
        F: FnOnce(&dyn SqlWriter, &mut Context, &mut String) -> Result<()>,
    {
        let dialect = self.dialect();
        match self.try_compile(inputs, write) {
            Ok(statement) => {
                log::debug!("[{dialect}] {operation}: {}", truncate_long!(statement.sql));
                Ok(statement)
            }
            Err(error) => {
                let error = error.context(format!("While compiling {operation} for {dialect}"));
                log::error!("{:#}", error);
                Err(error)
            }
        }
    }

    fn try_compile<F>(&self, inputs: Inputs, write: F) -> Result<CompiledStatement>
    where
        F: FnOnce(&dyn SqlWriter, &mut Context, &mut String) -> Result<()>,
    {
        if matches!(inputs.replacements, Some(Replacements::Named(..)))
            && matches!(inputs.bind, Some(BindParams::Positional(..)))
        {
            return Err(SqlError::AmbiguousReplacement(
                "named replacements cannot be combined with positional bind parameters".into(),
            )
            .into());
        }
        let mut context = Context::new(Fragment::None, self.descriptor().bind)
            .with_model(inputs.model)
            .with_replacements(inputs.replacements)
            .with_bind_params(inputs.bind)
            .with_bind_values(inputs.bind_values);
        let mut sql = String::with_capacity(128);
        write(self.writer, &mut context, &mut sql)?;
        let bind = context.finish()?;
        Ok(CompiledStatement { sql, bind })
    }

    /// `name` quoted as a single identifier.
    pub fn quote_identifier(&self, name: &str) -> Result<String> {
        self.compile_with("quote identifier", Inputs::default(), |w, c, out| {
            w.write_identifier_quoted(c, out, name)
        })
        .map(|v| v.sql)
    }

    /// Every dot separated part of `path` quoted.
    pub fn quote_identifiers(&self, path: &str) -> Result<String> {
        self.compile_with("quote identifiers", Inputs::default(), |w, c, out| {
            w.write_identifiers(c, out, path)
        })
        .map(|v| v.sql)
    }

    /// Schema qualified table name, with its alias when present.
    pub fn quote_table(&self, table: &TableRef) -> Result<String> {
        self.compile_with("quote table", Inputs::default(), |w, c, out| {
            let mut c = c.switch_fragment(Fragment::SqlSelectFrom);
            w.write_table_ref(&mut c, out, table)
        })
        .map(|v| v.sql)
    }

    /// SQL literal of `value`, safe to embed in a statement.
    pub fn escape(&self, value: &Value) -> Result<String> {
        self.compile_with("escape", Inputs::default(), |w, c, out| {
            w.write_value(c, out, value)
        })
        .map(|v| v.sql)
    }

    pub fn select_query(
        &self,
        table: &TableRef,
        options: &SelectOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            ..Inputs::model(model)
        };
        self.compile_with("select", inputs, |w, c, out| {
            w.write_select(c, out, table, options)
        })
    }

    pub fn insert_query(
        &self,
        table: &TableRef,
        row: Row,
        options: &InsertOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        self.bulk_insert_query(table, &[row], options, model)
    }

    pub fn bulk_insert_query(
        &self,
        table: &TableRef,
        rows: &[Row],
        options: &InsertOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            bind_values: options.bind_values,
            ..Inputs::model(model)
        };
        self.compile_with("insert", inputs, |w, c, out| {
            w.write_insert(c, out, table, rows, options)
        })
    }

    pub fn update_query(
        &self,
        table: &TableRef,
        values: &Row,
        condition: Option<&Expr>,
        options: &UpdateOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            bind_values: options.bind_values,
            ..Inputs::model(model)
        };
        self.compile_with("update", inputs, |w, c, out| {
            w.write_update(c, out, table, values, condition, options)
        })
    }

    /// `SET "x" = "x" + n` for every increment, plus plain assignments from `extra`.
    pub fn increment_query(
        &self,
        table: &TableRef,
        increments: &Row,
        extra: &Row,
        condition: Option<&Expr>,
        options: &UpdateOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            bind_values: options.bind_values,
            ..Inputs::model(model)
        };
        self.compile_with("increment", inputs, |w, c, out| {
            w.write_increment(c, out, table, increments, extra, condition, options)
        })
    }

    pub fn upsert_query(
        &self,
        table: &TableRef,
        values: &Row,
        options: &UpsertOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            bind_values: options.bind_values,
            ..Inputs::model(model)
        };
        self.compile_with("upsert", inputs, |w, c, out| {
            w.write_upsert(c, out, table, values, options)
        })
    }

    pub fn bulk_delete_query(
        &self,
        table: &TableRef,
        condition: Option<&Expr>,
        options: &BulkDeleteOptions,
        model: Option<&ModelMeta>,
    ) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            ..Inputs::model(model)
        };
        self.compile_with("bulk delete", inputs, |w, c, out| {
            w.write_delete(c, out, table, condition, options)
        })
    }

    pub fn create_table_query(
        &self,
        table: &TableRef,
        columns: &[ColumnDef],
        options: &CreateTableOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("create table", Inputs::default(), |w, c, out| {
            w.write_create_table(c, out, table, columns, options)
        })
    }

    pub fn drop_table_query(
        &self,
        table: &TableRef,
        options: &DropTableOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("drop table", Inputs::default(), |w, c, out| {
            w.write_drop_table(c, out, table, options)
        })
    }

    pub fn rename_table_query(&self, from: &TableRef, to: &TableRef) -> Result<CompiledStatement> {
        self.compile_with("rename table", Inputs::default(), |w, c, out| {
            w.write_rename_table(c, out, from, to)
        })
    }

    pub fn truncate_table_query(
        &self,
        table: &TableRef,
        options: &TruncateTableOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("truncate table", Inputs::default(), |w, c, out| {
            w.write_truncate_table(c, out, table, options)
        })
    }

    pub fn add_column_query(
        &self,
        table: &TableRef,
        column: &ColumnDef,
        options: &AddColumnOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("add column", Inputs::default(), |w, c, out| {
            w.write_add_column(c, out, table, column, options)
        })
    }

    pub fn change_column_query(
        &self,
        table: &TableRef,
        column: &ColumnDef,
    ) -> Result<CompiledStatement> {
        self.compile_with("change column", Inputs::default(), |w, c, out| {
            w.write_change_column(c, out, table, column)
        })
    }

    pub fn remove_column_query(
        &self,
        table: &TableRef,
        column: &str,
        options: &RemoveColumnOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("remove column", Inputs::default(), |w, c, out| {
            w.write_remove_column(c, out, table, column, options)
        })
    }

    pub fn rename_column_query(
        &self,
        table: &TableRef,
        from: &str,
        to: &str,
    ) -> Result<CompiledStatement> {
        self.compile_with("rename column", Inputs::default(), |w, c, out| {
            w.write_rename_column(c, out, table, from, to)
        })
    }

    pub fn add_index_query(
        &self,
        table: &TableRef,
        options: &IndexOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("add index", Inputs::default(), |w, c, out| {
            w.write_create_index(c, out, table, options)
        })
    }

    pub fn remove_index_query(
        &self,
        table: &TableRef,
        name: &str,
        options: &RemoveIndexOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("remove index", Inputs::default(), |w, c, out| {
            w.write_remove_index(c, out, table, name, options)
        })
    }

    pub fn add_constraint_query(
        &self,
        table: &TableRef,
        constraint: &Constraint,
    ) -> Result<CompiledStatement> {
        self.compile_with("add constraint", Inputs::default(), |w, c, out| {
            w.write_add_constraint(c, out, table, constraint)
        })
    }

    pub fn remove_constraint_query(
        &self,
        table: &TableRef,
        name: &str,
        options: &RemoveConstraintOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("remove constraint", Inputs::default(), |w, c, out| {
            w.write_remove_constraint(c, out, table, name, options)
        })
    }

    pub fn set_constraint_checking_query(
        &self,
        checking: &ConstraintChecking,
    ) -> Result<CompiledStatement> {
        self.compile_with("set constraint checking", Inputs::default(), |w, c, out| {
            w.write_set_constraint_checking(c, out, checking)
        })
    }

    pub fn create_schema_query(
        &self,
        name: &str,
        options: &CreateSchemaOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("create schema", Inputs::default(), |w, c, out| {
            w.write_create_schema(c, out, name, options)
        })
    }

    pub fn drop_schema_query(
        &self,
        name: &str,
        options: &DropSchemaOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("drop schema", Inputs::default(), |w, c, out| {
            w.write_drop_schema(c, out, name, options)
        })
    }

    pub fn list_schemas_query(&self, options: &ListSchemasOptions) -> Result<CompiledStatement> {
        self.compile_with("list schemas", Inputs::default(), |w, c, out| {
            w.write_list_schemas(c, out, options)
        })
    }

    pub fn list_tables_query(&self, options: &ListTablesOptions) -> Result<CompiledStatement> {
        self.compile_with("list tables", Inputs::default(), |w, c, out| {
            w.write_list_tables(c, out, options)
        })
    }

    pub fn describe_table_query(&self, table: &TableRef) -> Result<CompiledStatement> {
        self.compile_with("describe table", Inputs::default(), |w, c, out| {
            w.write_describe_table(c, out, table)
        })
    }

    pub fn table_exists_query(&self, table: &TableRef) -> Result<CompiledStatement> {
        self.compile_with("table exists", Inputs::default(), |w, c, out| {
            w.write_table_exists(c, out, table)
        })
    }

    pub fn version_query(&self) -> Result<CompiledStatement> {
        self.compile_with("version", Inputs::default(), |w, c, out| {
            w.write_version(c, out)
        })
    }

    pub fn create_database_query(
        &self,
        name: &str,
        options: &CreateDatabaseOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("create database", Inputs::default(), |w, c, out| {
            w.write_create_database(c, out, name, options)
        })
    }

    pub fn drop_database_query(
        &self,
        name: &str,
        options: &DropDatabaseOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("drop database", Inputs::default(), |w, c, out| {
            w.write_drop_database(c, out, name, options)
        })
    }

    pub fn list_databases_query(&self) -> Result<CompiledStatement> {
        self.compile_with("list databases", Inputs::default(), |w, c, out| {
            w.write_list_databases(c, out)
        })
    }

    pub fn start_transaction_query(
        &self,
        options: &StartTransactionOptions,
    ) -> Result<CompiledStatement> {
        self.compile_with("start transaction", Inputs::default(), |w, c, out| {
            w.write_start_transaction(c, out, options)
        })
    }

    pub fn commit_transaction_query(&self) -> Result<CompiledStatement> {
        self.compile_with("commit transaction", Inputs::default(), |w, c, out| {
            w.write_commit_transaction(c, out)
        })
    }

    pub fn rollback_transaction_query(&self) -> Result<CompiledStatement> {
        self.compile_with("rollback transaction", Inputs::default(), |w, c, out| {
            w.write_rollback_transaction(c, out)
        })
    }

    pub fn create_savepoint_query(&self, name: &str) -> Result<CompiledStatement> {
        self.compile_with("create savepoint", Inputs::default(), |w, c, out| {
            w.write_create_savepoint(c, out, name)
        })
    }

    pub fn rollback_savepoint_query(&self, name: &str) -> Result<CompiledStatement> {
        self.compile_with("rollback savepoint", Inputs::default(), |w, c, out| {
            w.write_rollback_savepoint(c, out, name)
        })
    }

    pub fn set_isolation_level_query(&self, level: IsolationLevel) -> Result<CompiledStatement> {
        self.compile_with("set isolation level", Inputs::default(), |w, c, out| {
            w.write_set_isolation_level(c, out, level)
        })
    }

    pub fn foreign_key_checks_query(&self, enabled: bool) -> Result<CompiledStatement> {
        self.compile_with("foreign key checks", Inputs::default(), |w, c, out| {
            w.write_foreign_key_checks(c, out, enabled)
        })
    }

    /// Standalone raw SQL with `:name` or `?` replacements and `$name` bind parameters.
    pub fn raw_query(&self, sql: &str, options: &RawQueryOptions) -> Result<CompiledStatement> {
        let inputs = Inputs {
            replacements: options.replacements.as_ref(),
            bind: options.bind.as_ref(),
            ..Default::default()
        };
        self.compile_with("raw query", inputs, |w, c, out| w.write_raw_query(c, out, sql))
    }

    /// Compiles a [`Query`] value, dispatching on its kind.
    pub fn compile(&self, query: &Query, model: Option<&ModelMeta>) -> Result<CompiledStatement> {
        match query {
            Query::Select { table, options } => self.select_query(table, options, model),
            Query::Insert {
                table,
                rows,
                options,
            } => self.bulk_insert_query(table, rows, options, model),
            Query::Update {
                table,
                values,
                condition,
                options,
            } => self.update_query(table, values, condition.as_ref(), options, model),
            Query::Increment {
                table,
                increments,
                extra,
                condition,
                options,
            } => self.increment_query(
                table,
                increments,
                extra,
                condition.as_ref(),
                options,
                model,
            ),
            Query::Upsert {
                table,
                values,
                options,
            } => self.upsert_query(table, values, options, model),
            Query::BulkDelete {
                table,
                condition,
                options,
            } => self.bulk_delete_query(table, condition.as_ref(), options, model),
            Query::CreateTable {
                table,
                columns,
                options,
            } => self.create_table_query(table, columns, options),
            Query::DropTable { table, options } => self.drop_table_query(table, options),
            Query::TruncateTable { table, options } => self.truncate_table_query(table, options),
            Query::RenameTable { from, to } => self.rename_table_query(from, to),
            Query::AddColumn {
                table,
                column,
                options,
            } => self.add_column_query(table, column, options),
            Query::ChangeColumn { table, column } => self.change_column_query(table, column),
            Query::RemoveColumn {
                table,
                column,
                options,
            } => self.remove_column_query(table, column, options),
            Query::RenameColumn { table, from, to } => self.rename_column_query(table, from, to),
            Query::CreateIndex { table, options } => self.add_index_query(table, options),
            Query::RemoveIndex {
                table,
                name,
                options,
            } => self.remove_index_query(table, name, options),
            Query::AddConstraint { table, constraint } => {
                self.add_constraint_query(table, constraint)
            }
            Query::RemoveConstraint {
                table,
                name,
                options,
            } => self.remove_constraint_query(table, name, options),
            Query::Raw { sql, options } => self.raw_query(sql, options),
        }
    }
}
