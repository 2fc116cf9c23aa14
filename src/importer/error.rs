// ==========================================
// 挤压机生产日报分析 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 此处均为结构性错误（整次分析中止）
//       数据质量问题不走错误通道，见 domain::production::DqWarning
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== 结构错误 =====
    #[error("未找到工作表 '{expected}'（忽略大小写/空格），现有工作表: [{available}]")]
    SheetNotFound { expected: String, available: String },

    #[error("工作表 '{sheet}' 缺少必需列头: {missing}")]
    ColumnNotFound { sheet: String, missing: String },
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
