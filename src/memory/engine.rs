use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SqlSessionError;
use crate::types::SqlValue;

/// One in-memory table: ordered column names plus row storage.
#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<SqlValue>>,
}

/// A named collection of tables. Shared across every handle opened with
/// the same database name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Database {
    pub(crate) tables: HashMap<String, Table>,
}

/// The statement shapes the memory engine understands.
#[derive(Debug, Clone)]
pub(crate) enum Command {
    CreateTable { table: String, columns: Vec<String> },
    DropTable { table: String },
    Insert { table: String, values: Vec<ValueExpr> },
    SelectAll { table: String },
    SelectCount { table: String },
    Delete { table: String },
}

/// One item of an INSERT value list.
#[derive(Debug, Clone)]
pub(crate) enum ValueExpr {
    /// A `:name`, `?`, `?N`, `$N`, or `@name` marker, filled from the
    /// bound parameters in list order.
    Placeholder,
    Literal(SqlValue),
}

lazy_static! {
    static ref CREATE_RE: Regex =
        Regex::new(r"(?is)^\s*CREATE\s+TABLE\s+(\w+)\s*\((.*)\)\s*;?\s*$").unwrap();
    static ref DROP_RE: Regex = Regex::new(r"(?is)^\s*DROP\s+TABLE\s+(\w+)\s*;?\s*$").unwrap();
    static ref INSERT_RE: Regex = Regex::new(
        r"(?is)^\s*INSERT\s+INTO\s+(\w+)\s*(?:\([^)]*\)\s*)?VALUES\s*\((.*)\)\s*;?\s*$"
    )
    .unwrap();
    static ref SELECT_ALL_RE: Regex =
        Regex::new(r"(?is)^\s*SELECT\s+\*\s+FROM\s+(\w+)\s*;?\s*$").unwrap();
    static ref SELECT_COUNT_RE: Regex =
        Regex::new(r"(?is)^\s*SELECT\s+COUNT\s*\(\s*\*\s*\)\s+FROM\s+(\w+)\s*;?\s*$").unwrap();
    static ref DELETE_RE: Regex = Regex::new(r"(?is)^\s*DELETE\s+FROM\s+(\w+)\s*;?\s*$").unwrap();
}

/// Parse one statement of the engine's SQL subset.
pub(crate) fn parse(sql: &str) -> Result<Command, SqlSessionError> {
    if let Some(caps) = CREATE_RE.captures(sql) {
        let columns = caps[2]
            .split(',')
            .filter_map(|col| col.split_whitespace().next())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if columns.is_empty() {
            return Err(SqlSessionError::SqlSyntax(format!(
                "CREATE TABLE {} has no columns",
                &caps[1]
            )));
        }
        return Ok(Command::CreateTable {
            table: caps[1].to_lowercase(),
            columns,
        });
    }
    if let Some(caps) = DROP_RE.captures(sql) {
        return Ok(Command::DropTable {
            table: caps[1].to_lowercase(),
        });
    }
    if let Some(caps) = INSERT_RE.captures(sql) {
        return Ok(Command::Insert {
            table: caps[1].to_lowercase(),
            values: parse_value_list(&caps[2])?,
        });
    }
    if let Some(caps) = SELECT_COUNT_RE.captures(sql) {
        return Ok(Command::SelectCount {
            table: caps[1].to_lowercase(),
        });
    }
    if let Some(caps) = SELECT_ALL_RE.captures(sql) {
        return Ok(Command::SelectAll {
            table: caps[1].to_lowercase(),
        });
    }
    if let Some(caps) = DELETE_RE.captures(sql) {
        return Ok(Command::Delete {
            table: caps[1].to_lowercase(),
        });
    }
    Err(SqlSessionError::SqlSyntax(format!(
        "unrecognized statement: {}",
        sql.trim()
    )))
}

/// Split an INSERT value list on commas outside string literals and
/// parse each item as a placeholder or literal.
fn parse_value_list(list: &str) -> Result<Vec<ValueExpr>, SqlSessionError> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut chars = list.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                // doubled quote inside a string is an escaped quote
                if in_string && chars.peek() == Some(&'\'') {
                    current.push('\'');
                    current.push('\'');
                    chars.next();
                    continue;
                }
                in_string = !in_string;
                current.push(c);
            }
            ',' if !in_string => {
                items.push(parse_value_item(current.trim())?);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if in_string {
        return Err(SqlSessionError::SqlSyntax(
            "unterminated string literal".to_string(),
        ));
    }
    if !current.trim().is_empty() {
        items.push(parse_value_item(current.trim())?);
    }
    if items.is_empty() {
        return Err(SqlSessionError::SqlSyntax(
            "empty VALUES list".to_string(),
        ));
    }
    Ok(items)
}

fn parse_value_item(item: &str) -> Result<ValueExpr, SqlSessionError> {
    let first = item
        .chars()
        .next()
        .ok_or_else(|| SqlSessionError::SqlSyntax("empty value in VALUES list".to_string()))?;

    match first {
        ':' | '?' | '$' | '@' => Ok(ValueExpr::Placeholder),
        '\'' => {
            let body = item
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .ok_or_else(|| {
                    SqlSessionError::SqlSyntax(format!("malformed string literal: {item}"))
                })?;
            Ok(ValueExpr::Literal(SqlValue::Text(body.replace("''", "'"))))
        }
        _ if item.eq_ignore_ascii_case("NULL") => Ok(ValueExpr::Literal(SqlValue::Null)),
        _ if item.eq_ignore_ascii_case("TRUE") => Ok(ValueExpr::Literal(SqlValue::Bool(true))),
        _ if item.eq_ignore_ascii_case("FALSE") => Ok(ValueExpr::Literal(SqlValue::Bool(false))),
        _ => {
            if let Ok(i) = item.parse::<i64>() {
                Ok(ValueExpr::Literal(SqlValue::Int(i)))
            } else if let Ok(f) = item.parse::<f64>() {
                Ok(ValueExpr::Literal(SqlValue::Float(f)))
            } else {
                Err(SqlSessionError::SqlSyntax(format!(
                    "unrecognized value: {item}"
                )))
            }
        }
    }
}
