// ==========================================
// 挤压机生产日报分析 - 报表层
// ==========================================
// 职责: 标记报表组装与导出（Excel / CSV）
// ==========================================

pub mod csv_export;
pub mod error;
pub mod excel;
pub mod exporter;
pub mod report_builder;

pub use csv_export::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use excel::{read_report_table, ExcelExporter};
pub use exporter::{OutputFormat, ReportExporter};
pub use report_builder::{
    default_report_file_name, FlaggedReport, ReportRow, ReportTable, ReportValue, REPORT_COLUMNS,
    REPORT_SHEET_NAME,
};
