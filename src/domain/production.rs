// ==========================================
// 挤压机生产日报分析 - 生产记录实体
// ==========================================
// 生命周期: 每次分析（一个文件）创建一次，报表生成后丢弃
// ==========================================

use crate::domain::types::{Metric, Press};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 表头字段缺失时的展示值
pub const NOT_AVAILABLE: &str = "N/A";

/// 模具族无法识别时的兜底值
pub const UNCLASSIFIED_FAMILY: &str = "Unclassified";

/// 部门无法映射时的兜底值
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

// ==========================================
// SheetHeader - 工作表表头
// ==========================================
// 解析后不可变，以 Arc 共享给同表所有记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetHeader {
    pub sheet_name: String,  // 生产日报工作表名
    pub date: String,        // 日期（YYYY-MM-DD 或原文）
    pub press: String,       // 挤压机（原文）
    pub operator: String,    // 操作工
    pub supervisor: String,  // 班长
}

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
#[derive(Debug, Clone)]
pub struct ProductionRecord {
    pub row_number: usize,           // 工作表行号（从 1 开始）
    pub header: Arc<SheetHeader>,    // 所属表头（共享）

    // 模具
    pub die_number: Option<String>,  // DIE NO.
    pub die_name: String,            // DIE NAME（原文）
    pub die_family: String,          // 派生：模具族

    // 挤压机
    pub press_label: String,         // 原文（行内列优先，否则取表头）
    pub press: Option<Press>,        // 识别结果

    // 指标（None = 缺失或非数值，无法评估）
    pub prod_per_hour: Option<f64>,
    pub recovery_pct: Option<f64>,
    pub speed_mm: Option<f64>,

    // 备注与部门
    pub remark: String,
    pub department: String,          // 派生：责任部门
}

impl ProductionRecord {
    /// 按指标读取数值
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::ProductionRate => self.prod_per_hour,
            Metric::Recovery => self.recovery_pct,
            Metric::Speed => self.speed_mm,
        }
    }
}

// ==========================================
// RuleCoverage - 规则覆盖情况
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCoverage {
    Evaluated,    // 已按阈值评估
    Insufficient, // 挤压机无可用阈值，未评估
}

// ==========================================
// FlagResult - 标记结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagResult {
    pub flagged: bool,
    pub reasons: Vec<String>,          // 固定顺序：产量 → 成材率 → 速度
    pub coverage: RuleCoverage,
    pub skipped_metrics: Vec<Metric>,  // 缺失/非数值而跳过的指标
}

impl FlagResult {
    /// 未评估结果（规则覆盖不足）
    pub fn not_covered() -> Self {
        Self {
            flagged: false,
            reasons: Vec::new(),
            coverage: RuleCoverage::Insufficient,
            skipped_metrics: Vec::new(),
        }
    }

    /// 合并原因文本（" and " 连接）
    pub fn reason_text(&self) -> String {
        self.reasons.join(" and ")
    }
}

// ==========================================
// DqKind - 数据质量问题类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqKind {
    InsufficientRuleCoverage, // 挤压机无法识别/无阈值
    NonNumericMetric,         // 指标非数值
    OutOfRange,               // 成材率超出 0-100
    UnmappedRemark,           // 备注无部门映射
    UnclassifiedDie,          // 模具名无法归族
}

// ==========================================
// DqWarning - 数据质量警告（不阻断）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqWarning {
    pub row_number: usize,
    pub kind: DqKind,
    pub field: String,
    pub message: String,
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_warnings: usize,
    pub by_kind: BTreeMap<DqKind, usize>,
}

impl DqSummary {
    pub fn from_warnings(warnings: &[DqWarning]) -> Self {
        let mut by_kind = BTreeMap::new();
        for w in warnings {
            *by_kind.entry(w.kind).or_insert(0) += 1;
        }
        Self {
            total_warnings: warnings.len(),
            by_kind,
        }
    }

    pub fn count(&self, kind: DqKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}
