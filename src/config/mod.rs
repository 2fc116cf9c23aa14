// ==========================================
// 挤压机生产日报分析 - 配置层
// ==========================================
// 职责: 阈值、部门编号、工作表名配置
// 存储: JSON 文件（可选），缺省使用内置默认值
// ==========================================

pub mod config_manager;
pub mod threshold_config;

// 重导出核心配置类型
pub use config_manager::{
    default_config_path, AnalyzerConfig, ConfigError, ConfigManager, ConfigResult, ConfigSource,
};
pub use threshold_config::{FamilyOverride, MetricThresholds, ThresholdTable};
