// ==========================================
// Link Marketplace - File Parser
// ==========================================
// Decodes an uploaded file (held in memory) into headers + rows.
// Supports: CSV (standard / legacy dialect), Excel (.xlsx/.xls/.xlsm), ODS
// ==========================================

use crate::domain::site::ParsedSheet;
use crate::domain::types::CsvDialect;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::site_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Builds a ParsedSheet from a header record and data records.
///
/// Trims everything, strips a BOM from the first header, skips fully
/// blank rows and keeps the first value when a header repeats.
fn build_sheet<I>(raw_headers: Vec<String>, records: I) -> ImportResult<ParsedSheet>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let headers: Vec<String> = raw_headers
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = if idx == 0 { h.trim_start_matches(UTF8_BOM).to_string() } else { h };
            h.trim().to_string()
        })
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::EmptyDataset);
    }

    let mut rows = Vec::new();
    for record in records {
        let mut row_map: HashMap<String, String> = HashMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row_map
                    .entry(header.clone())
                    .or_insert_with(|| value.trim().to_string());
            }
        }

        // skip fully blank rows
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row_map);
    }

    if rows.is_empty() {
        return Err(ImportError::EmptyDataset);
    }

    Ok(ParsedSheet { headers, rows })
}

// ==========================================
// CSV Parser (quote-aware)
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // rows may differ in length
            .from_reader(bytes);

        let mut records = reader.records();
        let header_record = match records.next() {
            Some(record) => record?,
            None => return Err(ImportError::EmptyDataset),
        };
        let headers: Vec<String> = header_record.iter().map(|h| h.to_string()).collect();

        let mut data = Vec::new();
        for result in records {
            let record = result?;
            data.push(record.iter().map(|v| v.to_string()).collect::<Vec<_>>());
        }

        build_sheet(headers, data)
    }
}

// ==========================================
// Legacy CSV Parser (newline / comma split)
// ==========================================
// Not escaping-aware: a comma inside quotes splits the cell.
pub struct LegacyCsvParser;

impl LegacyCsvParser {
    fn split_line(line: &str) -> Vec<String> {
        line.split(',')
            .map(|cell| cell.trim().trim_matches('"').to_string())
            .collect()
    }
}

impl FileParser for LegacyCsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ImportError::CsvParseError(e.to_string()))?;

        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.len() < 2 {
            return Err(ImportError::EmptyDataset);
        }

        let headers = Self::split_line(lines[0]);
        let data = lines[1..].iter().map(|line| Self::split_line(line));
        build_sheet(headers, data)
    }
}

// ==========================================
// Spreadsheet Parser (first sheet, row 1 = headers)
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet_names.first() {
            Some(name) => name.clone(),
            None => return Err(ImportError::EmptyDataset),
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => return Err(ImportError::EmptyDataset),
        };
        let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();

        let data: Vec<Vec<String>> = rows
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        build_sheet(headers, data)
    }
}

// ==========================================
// Universal parser (picks by file extension)
// ==========================================
pub struct UniversalFileParser {
    dialect: CsvDialect,
}

impl UniversalFileParser {
    pub fn new(dialect: CsvDialect) -> Self {
        Self { dialect }
    }

    /// Parses an upload.
    ///
    /// # Arguments
    /// - file_name: original file name, only its extension is used
    /// - bytes: file content
    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => match self.dialect {
                CsvDialect::Standard => CsvParser.parse_bytes(bytes),
                CsvDialect::Legacy => LegacyCsvParser.parse_bytes(bytes),
            },
            "xlsx" | "xls" | "xlsm" | "ods" => ExcelParser.parse_bytes(bytes),
            _ => Err(ImportError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(CsvDialect::Standard)
    }
}
