//! Input record readers
//!
//! Two line formats are understood:
//! - untagged: one JSON document per line, type given for the whole input
//! - tagged: `<type>\t<json>` per line

use super::classifier::RecordType;
use super::error::{ImportError, ImportResult};
use std::io::{self, BufRead};
use tracing::warn;

/// One keyed input record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub record_type: RecordType,
    pub line: String,
}

impl RawRecord {
    pub fn new(record_type: RecordType, line: impl Into<String>) -> Self {
        Self {
            record_type,
            line: line.into(),
        }
    }
}

/// Split a `<type>\t<json>` line
pub fn parse_tagged_line(line: &str) -> ImportResult<RawRecord> {
    let (tag, json) = line
        .split_once('\t')
        .ok_or_else(|| ImportError::MalformedRecord("missing record type tag".to_string()))?;
    Ok(RawRecord::new(tag.parse()?, json))
}

/// Records read from one input, plus lines rejected before classification
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub records: Vec<RawRecord>,
    /// (1-based line number, reason)
    pub rejected: Vec<(usize, ImportError)>,
}

/// Read every non-blank line. With `record_type` set every line is taken as
/// that type; otherwise lines must be tagged.
pub fn read_records(reader: impl BufRead, record_type: Option<RecordType>) -> io::Result<SourceBatch> {
    let mut batch = SourceBatch::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match record_type {
            Some(record_type) => batch.records.push(RawRecord::new(record_type, line)),
            None => match parse_tagged_line(&line) {
                Ok(record) => batch.records.push(record),
                Err(err) => {
                    warn!("Rejected input line {}: {}", index + 1, err);
                    batch.rejected.push((index + 1, err));
                }
            },
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_tagged_line() {
        let record = parse_tagged_line("movie\t{\"id\":1}").unwrap();
        assert_eq!(record.record_type, RecordType::Movie);
        assert_eq!(record.line, "{\"id\":1}");
        assert!(parse_tagged_line("{\"id\":1}").is_err());
        assert!(parse_tagged_line("tv\t{}").is_err());
    }

    #[test]
    fn test_read_untagged() {
        let input = Cursor::new("{\"id\":1}\n\n   \n{\"id\":2}\n");
        let batch = read_records(input, Some(RecordType::Person)).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert!(batch.records.iter().all(|r| r.record_type == RecordType::Person));
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_read_tagged_rejects_bad_lines() {
        let input = Cursor::new("company\t{\"id\":9}\nnot tagged\nperson\t{\"id\":7}\n");
        let batch = read_records(input, None).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].0, 2);
    }
}
