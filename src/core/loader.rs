use crate::domain::model::{CsvRow, REQUIRED_COLUMNS};
use crate::utils::error::{ImportError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Single-pass reader over a bug report CSV.
///
/// The header is validated when the reader is created; rows are parsed
/// lazily as the iterator is driven.
pub struct BugReportReader<R: Read = File> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    line: usize,
}

impl BugReportReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImportError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ImportError::Io(e),
        })?;
        tracing::debug!("Opened CSV {}", path.display());
        Self::from_reader(file)
    }
}

impl<R: Read> BugReportReader<R> {
    pub fn from_reader(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let headers = reader.headers()?.clone();
        validate_headers(&headers)?;

        Ok(Self {
            reader,
            headers,
            line: 0,
        })
    }

    fn to_row(&self, record: &StringRecord) -> CsvRow {
        let fields: HashMap<String, String> = self
            .headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        CsvRow::new(self.line, fields)
    }
}

impl<R: Read> Iterator for BugReportReader<R> {
    type Item = Result<CsvRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {
                self.line += 1;
                Some(Ok(self.to_row(&record)))
            }
            Ok(false) => None,
            Err(e) => Some(Err(ImportError::Csv(e))),
        }
    }
}

/// Header must be non-empty, free of repeated names and hold the required columns.
fn validate_headers(headers: &StringRecord) -> Result<()> {
    let columns: Vec<&str> = headers.iter().filter(|c| !c.is_empty()).collect();
    if columns.is_empty() {
        return Err(ImportError::Parse {
            message: "missing header row".to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut repeated: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| !seen.insert(*c))
        .collect();
    if !repeated.is_empty() {
        repeated.sort_unstable();
        repeated.dedup();
        return Err(ImportError::Parse {
            message: format!("columns repeated in header: {}", repeated.join(", ")),
        });
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !seen.contains(required))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::Parse {
            message: format!("expected columns are missing: {}", missing.join(", ")),
        });
    }

    Ok(())
}
