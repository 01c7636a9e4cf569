use super::{CoverageVector, RecordError};

/// Parse one delimited trace record into a coverage vector.
///
/// The record must hold exactly `width` feature fields followed by one
/// trailing field. The trailing field is not inspected. Every feature must be
/// a finite, non-negative number.
pub fn parse_record(text: &str, delimiter: char, width: usize) -> Result<CoverageVector, RecordError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RecordError::Empty);
    }

    let fields: Vec<&str> = trimmed.split(delimiter).collect();
    if fields.len() != width + 1 {
        return Err(RecordError::FieldCount {
            expected: width + 1,
            found: fields.len(),
        });
    }

    let mut entries = Vec::new();
    for (index, field) in fields[..width].iter().enumerate() {
        let field = field.trim();
        let value: f32 = field.parse().map_err(|_| RecordError::InvalidValue {
            index,
            value: field.to_string(),
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(RecordError::InvalidValue {
                index,
                value: field.to_string(),
            });
        }

        if value != 0.0 {
            entries.push((index as u32, value));
        }
    }

    Ok(CoverageVector::from_sorted(width, entries))
}

/// Parse raw trace bytes (must be UTF-8)
pub fn parse_record_bytes(bytes: &[u8], delimiter: char, width: usize) -> Result<CoverageVector, RecordError> {
    let text = std::str::from_utf8(bytes).map_err(|_| RecordError::NotUtf8)?;
    parse_record(text, delimiter, width)
}
