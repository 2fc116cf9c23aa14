// ==========================================
// 挤压机生产日报分析 - 领域类型定义
// ==========================================
// 职责: 挤压机编号、监控指标
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 挤压机编号 (Press)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Press {
    P1,
    P2,
}

impl Press {
    /// 从原始文本识别挤压机
    ///
    /// # 规则
    /// - TRIM + UPPER 后包含 "P1" / "P2"（兼容 "P1 A"、"p2" 等写法）
    /// - 同时包含两者或均不包含 → None
    pub fn parse(raw: &str) -> Option<Press> {
        let upper = raw.trim().to_uppercase();
        match (upper.contains("P1"), upper.contains("P2")) {
            (true, false) => Some(Press::P1),
            (false, true) => Some(Press::P2),
            _ => None,
        }
    }
}

impl fmt::Display for Press {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Press::P1 => write!(f, "P1"),
            Press::P2 => write!(f, "P2"),
        }
    }
}

// ==========================================
// 监控指标 (Metric)
// ==========================================
// 顺序即标记原因的拼接顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    ProductionRate, // 产量/小时
    Recovery,       // 成材率 %
    Speed,          // 挤压速度 mm
}

impl Metric {
    /// 固定评估顺序
    pub const ALL: [Metric; 3] = [Metric::ProductionRate, Metric::Recovery, Metric::Speed];

    /// 对应的源列名
    pub fn column_label(&self) -> &'static str {
        match self {
            Metric::ProductionRate => "PROD/HOUR",
            Metric::Recovery => "RECOVERY %",
            Metric::Speed => "Speed(mm)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::ProductionRate => write!(f, "PRODUCTION_RATE"),
            Metric::Recovery => write!(f, "RECOVERY"),
            Metric::Speed => write!(f, "SPEED"),
        }
    }
}
