//! View models and CSV exports.
//!
//! Everything the HTTP layer returns is assembled here. Missing values stay
//! `None` until a view is rendered; only then do they become "Unknown".

mod detail;
mod listing;

pub use detail::*;
pub use listing::*;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use url::form_urlencoded;

use crate::errors::AppError;

/// Renders monetary amounts as a symbol plus the integer part grouped in
/// thousands, e.g. `€ 1.234.567`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    thousand_separator: String,
}

impl CurrencyFormat {
    pub fn new(symbol: &str, thousand_separator: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            thousand_separator: thousand_separator.to_string(),
        }
    }

    /// Fractions are truncated, not rounded.
    pub fn format(&self, value: Decimal) -> String {
        let truncated = value.trunc();
        let sign = if truncated.is_sign_negative() && !truncated.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = truncated.abs().normalize().to_string();

        let mut groups: Vec<&str> = Vec::new();
        let mut end = digits.len();
        while end > 3 {
            groups.push(&digits[end - 3..end]);
            end -= 3;
        }
        groups.push(&digits[..end]);
        groups.reverse();

        format!(
            "{}{}{}",
            self.symbol,
            sign,
            groups.join(&self.thousand_separator)
        )
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("€ ", ".")
    }
}

/// `YYYY-MM-DD` to `DD-MM-YYYY`. Empty input is `None`; anything that is
/// not a plain date is passed through.
pub fn format_date(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date.format("%d-%m-%Y").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

/// Re-encode request parameters with `key` set to `value`.
///
/// The first occurrence of `key` is replaced in place and later ones are
/// dropped; an absent key is appended.
pub fn query_with(params: &[(String, String)], key: &str, value: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut replaced = false;
    for (k, v) in params {
        if k == key {
            if !replaced {
                serializer.append_pair(key, value);
                replaced = true;
            }
        } else {
            serializer.append_pair(k, v);
        }
    }
    if !replaced {
        serializer.append_pair(key, value);
    }
    format!("?{}", serializer.finish())
}

/// Re-encode request parameters unchanged.
pub fn query_string(params: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(params.iter());
    format!("?{}", serializer.finish())
}

/// Write rows to CSV. Rows may have different lengths; an empty row
/// becomes an empty line.
pub fn write_csv_rows<I, R, S>(rows: I) -> Result<Vec<u8>, AppError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut builder = csv::WriterBuilder::new();
    builder.flexible(true).terminator(csv::Terminator::CRLF);
    let mut writer = builder.from_writer(Vec::new());
    let buffer_error = |e: std::io::Error| AppError::Internal(format!("CSV buffer error: {}", e));

    for row in rows {
        let fields: Vec<S> = row.into_iter().collect();
        if fields.is_empty() {
            // The writer quotes an empty record; emit a bare line instead.
            writer.flush().map_err(buffer_error)?;
            let mut buffer = writer
                .into_inner()
                .map_err(|e| buffer_error(e.into_error()))?;
            buffer.extend_from_slice(b"\r\n");
            writer = builder.from_writer(buffer);
            continue;
        }
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| buffer_error(e.into_error()))
}
