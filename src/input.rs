use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::RegroupError;
use crate::types::Record;

/// Parse records from either a JSON array of objects or JSON Lines.
///
/// Input whose first non-whitespace character is `[` is read as one array;
/// anything else is read line by line, skipping blank lines.
pub fn parse_records(text: &str) -> Result<Vec<Record>, RegroupError> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(vec![]);
    }

    if trimmed.starts_with('[') {
        let items: Vec<Value> =
            serde_json::from_str(trimmed).map_err(|e| RegroupError::InputParseError {
                detail: e.to_string(),
            })?;
        return items
            .into_iter()
            .enumerate()
            .map(|(index, item)| into_record(index, item))
            .collect();
    }

    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item: Value =
            serde_json::from_str(line).map_err(|e| RegroupError::InputParseError {
                detail: format!("line {}: {}", line_no + 1, e),
            })?;
        let index = records.len();
        records.push(into_record(index, item)?);
    }
    Ok(records)
}

fn into_record(index: usize, item: Value) -> Result<Record, RegroupError> {
    match item {
        Value::Object(map) => Ok(map),
        _ => Err(RegroupError::NotARecord { index }),
    }
}

/// Read records from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_records(path: Option<&Path>) -> Result<Vec<Record>, RegroupError> {
    let text = match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).map_err(|source| RegroupError::InputReadError {
                path: p.to_path_buf(),
                source,
            })?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| RegroupError::InputReadError {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };

    let records = parse_records(&text)?;
    tracing::debug!(records = records.len(), "read input");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn json_array() {
        let recs = parse_records(r#"[{"make":"ford","year":2012},{"make":"kia"}]"#).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["year"], 2012);
        assert_eq!(recs[1]["make"], "kia");
    }

    #[test]
    fn json_array_with_leading_whitespace() {
        let recs = parse_records("\n   [ {\"a\": 1} ]\n").unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn json_lines_skip_blank() {
        let recs = parse_records("{\"a\":1}\n\n  \n{\"a\":2}\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1]["a"], 2);
    }

    #[test]
    fn empty_input() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("  \n ").unwrap().is_empty());
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn field_order_preserved() {
        let recs = parse_records(r#"[{"z":1,"a":2,"m":3}]"#).unwrap();
        let fields: Vec<&str> = recs[0].keys().map(String::as_str).collect();
        assert_eq!(fields, ["z", "a", "m"]);
    }

    #[test]
    fn array_element_not_object() {
        let err = parse_records(r#"[{"a":1}, 5]"#).unwrap_err();
        assert!(matches!(err, RegroupError::NotARecord { index: 1 }));
    }

    #[test]
    fn jsonl_line_not_object() {
        let err = parse_records("{\"a\":1}\n\n\"text\"\n").unwrap_err();
        assert!(matches!(err, RegroupError::NotARecord { index: 1 }));
    }

    #[test]
    fn malformed_array() {
        let err = parse_records("[{\"a\":1},").unwrap_err();
        assert!(matches!(err, RegroupError::InputParseError { .. }));
    }

    #[test]
    fn malformed_jsonl_names_line() {
        let err = parse_records("{\"a\":1}\n{oops}\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "got: {msg}");
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        fs::write(&path, r#"[{"make":"ford"}]"#).unwrap();
        let recs = read_records(Some(&path)).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = read_records(Some(&path)).unwrap_err();
        match err {
            RegroupError::InputReadError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
