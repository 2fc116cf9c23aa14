// ==========================================
// 挤压机生产日报分析 - 核心库
// ==========================================
// 职责: 读取挤压机生产日报，按挤压机阈值标记低效模具，
//       输出带原因说明的标记报表
// 技术栈: calamine + rust_xlsxwriter + tracing
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 工作簿读取与解码
pub mod importer;

// 引擎层 - 识别、映射、判定
pub mod engine;

// 报表层 - 组装与导出
pub mod report;

// 配置层 - 阈值与工作表名
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{AnalyzerConfig, ConfigManager};
pub use domain::{
    DqKind, DqSummary, DqWarning, FlagResult, MappingTable, Metric, Press, ProductionRecord,
    SheetHeader,
};
pub use engine::{AnalysisOutcome, AnalysisSummary, PressSheetAnalyzer};
pub use importer::{ImportError, ImportResult};
pub use report::{ExportError, FlaggedReport, OutputFormat, ReportTable};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "挤压机生产日报分析";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
