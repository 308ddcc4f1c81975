//! Conversion between records and delimited text.
//!
//! Every collection file is a comma-separated table whose first line is a fixed
//! header. A [`RecordCodec`] describes one schema: the header columns, how many
//! leading fields a line must carry, and how to turn a record into fields and
//! back. Quoting follows CSV rules, so names or notes containing commas, quotes
//! or line breaks survive a save/load cycle unchanged.
//!
//! Decoding never panics. A malformed line produces a [`CodecError`] which the
//! store logs and skips.

use crate::libs::error::CodecError;
use crate::libs::formatter;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::str::FromStr;

pub const DELIMITER: u8 = b',';

/// Text schema of one record type.
pub trait RecordCodec: Sized {
    /// Column names written as the first line of the backing file.
    const HEADER: &'static [&'static str];

    /// Fields a line must have to be decodable. Columns past this index are
    /// optional and decode to their defaults when missing.
    const MIN_FIELDS: usize;

    fn encode(&self) -> Result<Vec<String>, CodecError>;

    fn decode(fields: &Fields<'_>) -> Result<Self, CodecError>;
}

/// Read access to the fields of one line with typed accessors that report
/// the offending column on failure.
pub struct Fields<'a> {
    record: &'a StringRecord,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'a StringRecord) -> Self {
        Self { record }
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Raw text of a column, empty when the column is absent.
    pub fn text(&self, index: usize) -> &'a str {
        self.record.get(index).unwrap_or("")
    }

    pub fn string(&self, index: usize) -> String {
        self.text(index).to_string()
    }

    pub fn parse<T>(&self, index: usize, field: &'static str) -> Result<T, CodecError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        let raw = self.text(index);
        raw.trim().parse::<T>().map_err(|e| CodecError::invalid(field, raw, e))
    }

    /// Parses a column that may be missing, returning `default` in that case.
    pub fn parse_or<T>(&self, index: usize, field: &'static str, default: T) -> Result<T, CodecError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        if self.text(index).trim().is_empty() {
            Ok(default)
        } else {
            self.parse(index, field)
        }
    }

    pub fn boolean(&self, index: usize, field: &'static str) -> Result<bool, CodecError> {
        let raw = self.text(index);
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CodecError::invalid(field, raw, "expected true or false")),
        }
    }

    pub fn boolean_or(&self, index: usize, field: &'static str, default: bool) -> Result<bool, CodecError> {
        if self.text(index).trim().is_empty() {
            Ok(default)
        } else {
            self.boolean(index, field)
        }
    }

    pub fn timestamp(&self, index: usize, field: &'static str) -> Result<NaiveDateTime, CodecError> {
        let raw = self.text(index);
        formatter::parse_timestamp(raw).ok_or_else(|| CodecError::invalid(field, raw, "expected an ISO-8601 timestamp"))
    }

    /// Empty or missing columns decode to `None`.
    pub fn optional_timestamp(&self, index: usize, field: &'static str) -> Result<Option<NaiveDateTime>, CodecError> {
        if self.text(index).trim().is_empty() {
            Ok(None)
        } else {
            self.timestamp(index, field).map(Some)
        }
    }

    pub fn date(&self, index: usize, field: &'static str) -> Result<NaiveDate, CodecError> {
        let raw = self.text(index);
        formatter::parse_date(raw).ok_or_else(|| CodecError::invalid(field, raw, "expected a YYYY-MM-DD date"))
    }
}

/// Checks the field count and decodes a parsed CSV record.
pub fn decode_record<T: RecordCodec>(record: &StringRecord) -> Result<T, CodecError> {
    if record.len() < T::MIN_FIELDS {
        return Err(CodecError::MissingFields {
            expected: T::MIN_FIELDS,
            found: record.len(),
        });
    }
    T::decode(&Fields::new(record))
}

/// Decodes a single line of text.
pub fn decode_line<T: RecordCodec>(line: &str) -> Result<T, CodecError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(DELIMITER)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(CodecError::MissingFields {
            expected: T::MIN_FIELDS,
            found: 0,
        });
    }
    decode_record(&record)
}

/// Encodes a record as one line, without the trailing newline.
pub fn encode_line<T: RecordCodec>(record: &T) -> Result<String, CodecError> {
    write_line(&record.encode()?)
}

pub fn header_line<T: RecordCodec>() -> String {
    T::HEADER.join(",")
}

fn write_line(fields: &[String]) -> Result<String, CodecError> {
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    let line = String::from_utf8_lossy(&bytes);
    Ok(line.strip_suffix('\n').unwrap_or(&line).to_string())
}
