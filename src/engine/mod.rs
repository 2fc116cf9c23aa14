// ==========================================
// 挤压机生产日报分析 - 引擎层
// ==========================================
// 职责: 模具族识别、部门映射、阈值判定、分析编排
// 红线: 所有标记必须输出 reason
// ==========================================

pub mod analyzer;
pub mod department;
pub mod die_family;
pub mod rule_engine;

// 重导出核心引擎
pub use analyzer::{AnalysisOutcome, AnalysisSummary, PressSheetAnalyzer};
pub use department::{DepartmentMapper, DepartmentMatch};
pub use die_family::{DieFamilyClassifier, FamilyPattern, DIE_FAMILY_RULES};
pub use rule_engine::{reason_for, RuleEngine};
