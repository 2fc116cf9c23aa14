// ==========================================
// 挤压机生产日报分析 - 报表导出错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Excel 写出失败: {0}")]
    Excel(String),

    #[error("CSV 写出失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("报表读取失败: {0}")]
    Read(String),

    #[error("输出格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Excel(err.to_string())
    }
}

impl From<calamine::Error> for ExportError {
    fn from(err: calamine::Error) -> Self {
        ExportError::Read(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
