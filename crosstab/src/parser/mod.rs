//! CSV reading and writing with encoding and delimiter auto-detection.
//!
//! Produces the plain table form the reshaper consumes: a list of rows,
//! header first. No crosstab-specific logic here.

use crate::error::{CsvError, CsvResult};

/// Delimiters tried by [`detect_delimiter`], in order of preference.
const SEPARATORS: [char; 4] = [',', ';', '\t', '|'];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Rows, header row first
    pub rows: Vec<Vec<String>>,
    /// Detected encoding
    pub encoding: String,
    /// Detected or forced delimiter
    pub delimiter: char,
}

impl ParseResult {
    /// The header row, or an empty slice when there are no rows.
    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rows after the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the given encoding.
///
/// Unknown encodings fall back to lossy UTF-8. A leading BOM is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .map_err(|e| CsvError::Encoding(e.to_string()))?,
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        "iso-8859-15" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when none of the candidates appear.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &SEPARATORS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text into rows with an explicit delimiter.
///
/// The header is returned as row 0. Quoting follows the usual CSV rules,
/// cells are trimmed and blank lines are skipped. A line of bare delimiters
/// (`,,`) is a row of empty cells, not a blank line. Rows may differ in length.
///
/// # Example
/// ```
/// use crosstab::parse_table;
///
/// let rows = parse_table("Name,1990 Red\nAlex,12", ',').unwrap();
/// assert_eq!(rows[0], vec!["Name", "1990 Red"]);
/// assert_eq!(rows[1], vec!["Alex", "12"]);
/// ```
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Vec<Vec<String>>> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(CsvError::InvalidDelimiter(delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    Ok(rows)
}

/// Parse CSV bytes, detecting the encoding and (unless given) the delimiter.
///
/// Valid UTF-8 is always read as UTF-8; chardet is only asked about input
/// that is not.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = if std::str::from_utf8(bytes).is_ok() {
        "utf-8".to_string()
    } else {
        detect_encoding(bytes)
    };
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let rows = parse_table(&content, delimiter)?;

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
    })
}

/// Encode rows as comma-separated UTF-8 CSV.
pub fn encode_table(rows: &[Vec<String>]) -> CsvResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    writer.into_inner().map_err(|e| CsvError::Io(e.into_error()))
}
