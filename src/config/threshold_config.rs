// ==========================================
// 挤压机生产日报分析 - 阈值配置
// ==========================================
// 职责: 挤压机 → {产量下限, 成材率下限, 速度下限}
//       可选: (挤压机, 模具族) 级覆写
// 红线: 只读查询，不含判定逻辑（判定在 engine::rule_engine）
// ==========================================

use crate::domain::types::{Metric, Press};
use crate::importer::data_cleaner::normalize_text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// MetricThresholds - 单组阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub prod_hour_min: f64,    // 产量/小时 下限
    pub recovery_pct_min: f64, // 成材率 % 下限
    pub speed_min: f64,        // 速度 mm 下限
}

impl MetricThresholds {
    pub fn new(prod_hour_min: f64, recovery_pct_min: f64, speed_min: f64) -> Self {
        Self {
            prod_hour_min,
            recovery_pct_min,
            speed_min,
        }
    }

    /// 按指标读取下限
    pub fn min_for(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ProductionRate => self.prod_hour_min,
            Metric::Recovery => self.recovery_pct_min,
            Metric::Speed => self.speed_min,
        }
    }

    fn is_valid(&self) -> bool {
        Metric::ALL
            .iter()
            .all(|m| self.min_for(*m).is_finite() && self.min_for(*m) >= 0.0)
    }
}

// ==========================================
// FamilyOverride - 模具族级覆写
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyOverride {
    pub press: Press,
    pub family: String,
    #[serde(flatten)]
    pub thresholds: MetricThresholds,
}

// ==========================================
// ThresholdTable - 阈值表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub presses: BTreeMap<Press, MetricThresholds>,
    #[serde(default)]
    pub family_overrides: Vec<FamilyOverride>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let mut presses = BTreeMap::new();
        presses.insert(Press::P1, MetricThresholds::new(220.0, 80.0, 400.0));
        presses.insert(Press::P2, MetricThresholds::new(300.0, 80.0, 400.0));
        Self {
            presses,
            family_overrides: Vec::new(),
        }
    }
}

impl ThresholdTable {
    /// 查询适用阈值
    ///
    /// # 规则
    /// 1. 存在 (press, family) 覆写 → 覆写值（同键多条取第一条）
    /// 2. 否则 → 挤压机默认值
    /// 3. 挤压机未配置 → None（规则覆盖不足）
    pub fn resolve(&self, press: Press, family: &str) -> Option<&MetricThresholds> {
        let family_key = normalize_text(family);
        self.family_overrides
            .iter()
            .find(|o| o.press == press && normalize_text(&o.family) == family_key)
            .map(|o| &o.thresholds)
            .or_else(|| self.presses.get(&press))
    }

    /// 校验：所有阈值为有限非负数
    ///
    /// # 返回
    /// - Ok(()): 校验通过
    /// - Err(String): 第一处非法配置描述
    pub fn validate(&self) -> Result<(), String> {
        for (press, t) in &self.presses {
            if !t.is_valid() {
                return Err(format!("挤压机 {} 阈值非法: {:?}", press, t));
            }
        }
        for o in &self.family_overrides {
            if o.family.trim().is_empty() {
                return Err(format!("挤压机 {} 覆写缺少模具族", o.press));
            }
            if !o.thresholds.is_valid() {
                return Err(format!(
                    "挤压机 {} 模具族 '{}' 覆写阈值非法: {:?}",
                    o.press, o.family, o.thresholds
                ));
            }
        }
        Ok(())
    }
}
