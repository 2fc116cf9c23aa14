// ==========================================
// 挤压机生产日报分析 - Excel 报表导出
// ==========================================
// 职责: ReportTable → .xlsx（单工作表 Flagged_Dies，表头加粗）
//       以及导出文件回读（校验用）
// ==========================================

use crate::report::error::{ExportError, ExportResult};
use crate::report::exporter::ReportExporter;
use crate::report::report_builder::{ReportTable, ReportValue, REPORT_SHEET_NAME};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

pub struct ExcelExporter;

impl ReportExporter for ExcelExporter {
    fn export(&self, table: &ReportTable, output_path: &Path) -> ExportResult<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(REPORT_SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        for (col, name) in table.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, name, &header_format)?;
        }

        for (r, row) in table.rows.iter().enumerate() {
            let excel_row = (r + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                match value {
                    ReportValue::Empty => {}
                    ReportValue::Number(n) => {
                        sheet.write_number(excel_row, col as u16, *n)?;
                    }
                    ReportValue::Text(s) => {
                        sheet.write_string(excel_row, col as u16, s)?;
                    }
                }
            }
        }
        sheet.autofit();

        workbook.save(output_path)?;
        info!(
            path = %output_path.display(),
            rows = table.row_count(),
            "Excel 报表已写出"
        );
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}

/// 回读导出的报表
///
/// # 返回
/// - 首行为列名，其余为数据行（补齐到列数）
pub fn read_report_table(path: &Path) -> ExportResult<ReportTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range(REPORT_SHEET_NAME)
        .map_err(|e| ExportError::Read(format!("{}: {}", REPORT_SHEET_NAME, e)))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let rows = rows
        .map(|row| {
            let mut cells: Vec<ReportValue> = row.iter().map(convert_cell).collect();
            cells.resize(columns.len(), ReportValue::Empty);
            cells
        })
        .collect();

    Ok(ReportTable { columns, rows })
}

fn convert_cell(cell: &Data) -> ReportValue {
    match cell {
        Data::Empty => ReportValue::Empty,
        Data::String(s) => ReportValue::text(s),
        Data::Float(f) => ReportValue::Number(*f),
        Data::Int(i) => ReportValue::Number(*i as f64),
        other => ReportValue::text(&other.to_string()),
    }
}
