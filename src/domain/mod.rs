// ==========================================
// 挤压机生产日报分析 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件读取逻辑，不含判定逻辑
// ==========================================

pub mod mapping;
pub mod production;
pub mod types;

// 重导出核心类型
pub use mapping::{MappingEntry, MappingTable};
pub use production::{
    DqKind, DqSummary, DqWarning, FlagResult, ProductionRecord, RuleCoverage, SheetHeader,
    NOT_AVAILABLE, UNCLASSIFIED_FAMILY, UNKNOWN_DEPARTMENT,
};
pub use types::{Metric, Press};
