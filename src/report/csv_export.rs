// ==========================================
// 挤压机生产日报分析 - CSV 报表导出
// ==========================================

use crate::report::error::ExportResult;
use crate::report::exporter::ReportExporter;
use crate::report::report_builder::ReportTable;
use csv::Writer;
use std::path::Path;
use tracing::info;

pub struct CsvExporter;

impl ReportExporter for CsvExporter {
    fn export(&self, table: &ReportTable, output_path: &Path) -> ExportResult<()> {
        let mut writer = Writer::from_path(output_path)?;
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;

        info!(
            path = %output_path.display(),
            rows = table.row_count(),
            "CSV 报表已写出"
        );
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
