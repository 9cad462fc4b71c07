//! Stop list parsing
//!
//! Uploads are spreadsheets (xlsx, xls, ods) or CSV sheets. Either way the
//! first row is a header and only the first column is read. Blank cells are
//! skipped, everything else is kept verbatim (trimmed) in sheet order. No
//! attempt is made to check that a cell is a real address.

use std::io::{Cursor, Read};
use std::path::Path;

use calamine::Reader;

use crate::core::error::{Error, Result};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Layout of an uploaded stops sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Excel or OpenDocument workbook, read from its first worksheet
    Workbook,
    Csv,
}

impl SheetFormat {
    /// Pick the format from the file's leading bytes, then its extension
    pub fn detect(file_name: Option<&str>, bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            return SheetFormat::Workbook;
        }
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => SheetFormat::Workbook,
            _ => SheetFormat::Csv,
        }
    }
}

/// Stops from an uploaded file of either supported format
pub fn parse_stops_upload(file_name: Option<&str>, bytes: &[u8]) -> Result<Vec<String>> {
    match SheetFormat::detect(file_name, bytes) {
        SheetFormat::Workbook => parse_workbook_stops(bytes),
        SheetFormat::Csv => parse_stops(bytes),
    }
}

/// First-column values of the first worksheet, header row excluded
pub fn parse_workbook_stops(bytes: &[u8]) -> Result<Vec<String>> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or_else(|| {
        Error::ValidationError("Could not read stops file: workbook has no worksheet".to_string())
    })??;

    // The range starts at the first used cell, so column A may lie outside it
    if range.start().map(|(_, col)| col) != Some(0) {
        return Ok(Vec::new());
    }

    Ok(range
        .rows()
        .skip(1)
        .filter_map(|row| row.first())
        .map(|cell| cell.to_string().trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect())
}

/// First-column values of a CSV upload, header row excluded
pub fn parse_stops<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stops = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(cell) = record.get(0) {
            if !cell.is_empty() {
                stops.push(cell.to_string());
            }
        }
    }
    Ok(stops)
}

/// One stop per non-blank line of pasted text
pub fn parse_stop_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
