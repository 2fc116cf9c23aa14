// ==========================================
// 挤压机生产日报分析 - 报表导出接口
// ==========================================

use crate::report::csv_export::CsvExporter;
use crate::report::error::{ExportError, ExportResult};
use crate::report::excel::ExcelExporter;
use crate::report::report_builder::ReportTable;
use std::path::Path;
use std::str::FromStr;

// ==========================================
// ReportExporter Trait
// ==========================================
// 实现者: ExcelExporter, CsvExporter
pub trait ReportExporter: Send + Sync {
    /// 写出报表到文件
    fn export(&self, table: &ReportTable, output_path: &Path) -> ExportResult<()>;

    /// 默认文件扩展名
    fn extension(&self) -> &'static str;
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn exporter(&self) -> Box<dyn ReportExporter> {
        match self {
            OutputFormat::Xlsx => Box::new(ExcelExporter),
            OutputFormat::Csv => Box::new(CsvExporter),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}
