// ==========================================
// 挤压机生产日报分析 - 标记规则引擎
// ==========================================
// 职责: ProductionRecord → FlagResult
// 红线: 严格小于才标记，等于阈值不标记；
//       原因顺序固定（产量 → 成材率 → 速度）；
//       挤压机无阈值 → 不评估、不标记
// ==========================================

use crate::config::threshold_config::{MetricThresholds, ThresholdTable};
use crate::domain::production::{FlagResult, ProductionRecord, RuleCoverage};
use crate::domain::types::Metric;
use crate::importer::sheet_grid::format_number;
use tracing::debug;

/// 标记原因文本
pub fn reason_for(metric: Metric, threshold: f64) -> String {
    let t = format_number(threshold);
    match metric {
        Metric::ProductionRate => format!("Production rate below {} Prod/hour", t),
        Metric::Recovery => format!("Recovery below {}%", t),
        Metric::Speed => format!("Speed less than {} mm", t),
    }
}

// ==========================================
// RuleEngine - 标记规则引擎
// ==========================================
pub struct RuleEngine<'a> {
    thresholds: &'a ThresholdTable,
}

impl<'a> RuleEngine<'a> {
    pub fn new(thresholds: &'a ThresholdTable) -> Self {
        Self { thresholds }
    }

    /// 查询记录适用的阈值（挤压机无法识别或未配置 → None）
    pub fn thresholds_for(&self, record: &ProductionRecord) -> Option<&'a MetricThresholds> {
        record
            .press
            .and_then(|press| self.thresholds.resolve(press, &record.die_family))
    }

    /// 评估单条记录
    pub fn evaluate(&self, record: &ProductionRecord) -> FlagResult {
        let thresholds = match self.thresholds_for(record) {
            Some(t) => t,
            None => {
                debug!(
                    row = record.row_number,
                    press = %record.press_label,
                    "挤压机无可用阈值，跳过评估"
                );
                return FlagResult::not_covered();
            }
        };

        let mut reasons = Vec::new();
        let mut skipped_metrics = Vec::new();
        for metric in Metric::ALL {
            let min = thresholds.min_for(metric);
            match record.metric(metric) {
                Some(value) if value < min => reasons.push(reason_for(metric, min)),
                Some(_) => {}
                None => skipped_metrics.push(metric),
            }
        }

        FlagResult {
            flagged: !reasons.is_empty(),
            reasons,
            coverage: RuleCoverage::Evaluated,
            skipped_metrics,
        }
    }
}
