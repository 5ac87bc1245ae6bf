//! CSV and Excel files.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Datelike;
use highs::WeekWindow;
use polars::prelude::{CsvWriter, SerWriter};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tracing::info;

use crate::error::Result;
use crate::table::{ReportTable, Values, frame_error};

/// File name prefix for the Nifty 100 scan.
pub const DEFAULT_FILE_PREFIX: &str = "nifty100_52w_highs";

/// CSV extension.
pub const CSV_EXTENSION: &str = "csv";

/// Excel extension.
pub const EXCEL_EXTENSION: &str = "xlsx";

/// `{dir}/{prefix}_{start}_to_{end}.{extension}`.
#[must_use]
pub fn report_path(dir: &Path, prefix: &str, window: &WeekWindow, extension: &str) -> PathBuf {
    dir.join(format!("{prefix}_{}_to_{}.{extension}", window.start, window.end))
}

/// Writes `table` as CSV with a header row, creating parent directories.
///
/// Floats are written with two decimals and dates as `YYYY-MM-DD`.
pub fn write_csv(table: &ReportTable, path: &Path) -> Result<()> {
    create_parent(path)?;
    let mut frame = table.to_frame()?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_float_precision(Some(2))
        .finish(&mut frame)
        .map_err(frame_error)?;
    info!(path = %path.display(), rows = table.len(), "Results saved to {}", path.display());
    Ok(())
}

/// Writes `table` to a single-sheet workbook, creating parent directories.
pub fn write_excel(table: &ReportTable, path: &Path, sheet: &str) -> Result<()> {
    create_parent(path)?;

    let header = Format::new().set_bold();
    let number = Format::new().set_num_format("0.00");
    let date = Format::new().set_num_format("yyyy-mm-dd");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (col, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        worksheet.write_string_with_format(0, col, column.name, &header)?;

        match &column.values {
            Values::Text(v) => {
                for (row, value) in (1u32..).zip(v) {
                    worksheet.write_string(row, col, value)?;
                }
            }
            Values::Int(v) => {
                for (row, value) in (1u32..).zip(v) {
                    worksheet.write_number(row, col, *value as f64)?;
                }
            }
            Values::Number(v) => {
                for (row, value) in (1u32..).zip(v) {
                    worksheet.write_number_with_format(row, col, *value, &number)?;
                }
            }
            Values::Date(v) => {
                for (row, value) in (1u32..).zip(v) {
                    let cell = ExcelDateTime::from_ymd(
                        u16::try_from(value.year()).unwrap_or_default(),
                        u8::try_from(value.month()).unwrap_or_default(),
                        u8::try_from(value.day()).unwrap_or_default(),
                    )?;
                    worksheet.write_datetime_with_format(row, col, &cell, &date)?;
                }
            }
        }
    }
    worksheet.autofit();

    workbook.save(path)?;
    info!(path = %path.display(), rows = table.len(), "Results saved to {}", path.display());
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
