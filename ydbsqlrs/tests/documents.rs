//! End-to-end tests: saved query documents, configuration files and macro
//! expansion of compiled SQL.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use serde_json::json;
use ydbsql::config::YdbSqlConfig;
use ydbsql::macros::{expand, TimeRange};
use ydbsql::models::{Query, QueryFormat};
use ydbsql::{SqlBuilder, YdbSqlError};

fn builder_document() -> serde_json::Value {
    json!({
        "refId": "A",
        "queryType": "builder",
        "queryFormat": "logs",
        "rawSql": "SELECT stale",
        "builderOptions": {
            "table": "app_logs",
            "fields": ["ts", "msg", "severity"],
            "loglineFields": ["msg"],
            "logLevelField": "severity",
            "logTimeField": { "name": "ts", "cast": "Timestamp" },
            "filters": [
                { "id": "a", "column": "ts", "expr": "insideDashboard" },
                {
                    "id": "b",
                    "logicalOp": "and",
                    "column": "host",
                    "expr": "in",
                    "params": "web-1, web-2",
                    "paramsType": "text"
                }
            ],
            "orderBy": [{ "id": "c", "column": "ts", "sortDirection": "DESC" }],
            "limit": 50
        }
    })
}

const EXPECTED_LOGS_SQL: &str = "SELECT \"msg=\"||CAST(`msg` AS String) AS `logLine`, \nCAST(`ts` AS Timestamp), \n`msg`, \nString::AsciiToLower(`severity`) AS `level` \nFROM `app_logs` \nWHERE \n`ts` BETWEEN $__fromTimestamp AND $__toTimestamp \nAND `host` IN (\"web-1\", \"web-2\")\n ORDER BY `ts` DESC \nLIMIT 50";

#[test]
fn builder_document_compiles_fresh_sql() -> Result<()> {
    let query = Query::from_json(&builder_document().to_string())?;
    assert_eq!(query.query_format(), QueryFormat::Logs);
    assert_eq!(query.sql(&SqlBuilder::new()), EXPECTED_LOGS_SQL);
    Ok(())
}

#[test]
fn refresh_replaces_stale_raw_sql() -> Result<()> {
    let mut query = Query::from_json(&builder_document().to_string())?;
    let Query::Builder(inner) = &mut query else {
        panic!("expected builder query");
    };
    assert_eq!(inner.raw_sql, "SELECT stale");
    inner.refresh_raw_sql(&SqlBuilder::new());
    assert_eq!(inner.raw_sql, EXPECTED_LOGS_SQL);
    Ok(())
}

#[test]
fn sql_document_is_passed_through() -> Result<()> {
    let query = Query::from_json(
        &json!({ "queryType": "sql", "rawSql": "SELECT 1", "queryFormat": "timeseries" })
            .to_string(),
    )?;
    assert_eq!(query.sql(&SqlBuilder::new()), "SELECT 1");
    assert_eq!(query.query_format().visualization_type(), 0);
    Ok(())
}

#[test]
fn malformed_document_is_a_json_error() {
    let err = Query::from_json("{\"queryType\": \"builder\", \"builderOptions\": [").unwrap_err();
    assert!(matches!(err, YdbSqlError::Json(_)));
}

#[test]
fn compiled_sql_expands_time_macros() -> Result<()> {
    let query = Query::from_json(&builder_document().to_string())?;
    let range = TimeRange::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
    );
    let sql = expand(&query.sql(&SqlBuilder::new()), &range)?;
    assert!(sql.contains(
        "`ts` BETWEEN CAST(1704067200000000 AS TIMESTAMP) AND CAST(1704153600000000 AS TIMESTAMP)"
    ));
    assert!(!sql.contains("$__"));
    Ok(())
}

#[test]
fn hand_written_sql_expands_time_filter() -> Result<()> {
    let query = Query::from_json(
        &json!({ "queryType": "sql", "rawSql": "SELECT * FROM t WHERE $__timeFilter(`ts`)" })
            .to_string(),
    )?;
    let range = TimeRange::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
    );
    assert_eq!(
        expand(&query.sql(&SqlBuilder::new()), &range)?,
        "SELECT * FROM t WHERE `ts` >= CAST(1704067200000000 AS TIMESTAMP) AND `ts` <=  CAST(1704153600000000 AS TIMESTAMP)"
    );
    Ok(())
}

#[test]
fn config_file_drives_defaults_and_variables() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ydbsql.toml");
    std::fs::write(
        &path,
        r#"
[builder]
default_format = "logs"
default_limit = 500

[variables]
known = ["$cluster"]
"#,
    )?;

    let config = YdbSqlConfig::from_file(&path)?;
    let Query::Builder(mut query) = Query::default_builder(&config.builder) else {
        panic!("expected builder query");
    };
    assert_eq!(query.query_format, QueryFormat::Logs);

    query.builder_options.table = Some("t".to_string());
    query.builder_options.filters = serde_json::from_value(json!([
        { "column": "cluster", "expr": "equals", "params": ["$cluster"], "paramsType": "text" }
    ]))?;
    query.refresh_raw_sql(&SqlBuilder::from_config(&config));
    assert_eq!(
        query.raw_sql,
        "SELECT \nFROM `t` \nWHERE \n`cluster` = $cluster \nLIMIT 500"
    );
    Ok(())
}

#[test]
fn missing_config_file_is_a_config_error() {
    let err = YdbSqlConfig::from_file("/nonexistent/ydbsql.toml").unwrap_err();
    assert!(matches!(err, YdbSqlError::Config(_)));
}
