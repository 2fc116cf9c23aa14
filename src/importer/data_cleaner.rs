// ==========================================
// 挤压机生产日报分析 - 数据清洗器
// ==========================================
// 职责: 文本标准化（TRIM / UPPER / 空白折叠）
//       数值与日期单元格清洗
// 红线: 所有比较边界（工作表名/列头/映射关键字/模具名）
//       统一使用 normalize_text 派生的规则
// ==========================================

use crate::importer::sheet_grid::CellValue;
use chrono::{Duration, NaiveDate};

/// 文本标准化：TRIM + 转大写 + 连续空白折叠为单个空格
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// 紧凑形式：在 normalize_text 基础上去掉全部空格
///
/// 用于工作表名与列头比较（"Speed (mm)" == "SPEED(MM)"）
pub fn compact_text(value: &str) -> String {
    normalize_text(value).replace(' ', "")
}

// ==========================================
// MetricValue - 指标单元格清洗结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Missing,         // 空单元格
    Value(f64),      // 有效数值
    Invalid(String), // 非数值（保留原文用于 DQ 报告）
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// 清洗指标单元格
///
/// # 规则
/// - 数值单元格直接使用
/// - 文本单元格去掉千分位逗号与末尾 '%' 后解析
/// - 解析失败 / 非有限数 → Invalid
pub fn clean_metric(cell: &CellValue) -> MetricValue {
    match cell {
        CellValue::Number(n) if n.is_finite() => MetricValue::Value(*n),
        CellValue::Number(n) => MetricValue::Invalid(n.to_string()),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return MetricValue::Missing;
            }
            let cleaned = trimmed.trim_end_matches('%').replace(',', "");
            match cleaned.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => MetricValue::Value(v),
                _ => MetricValue::Invalid(trimmed.to_string()),
            }
        }
        CellValue::Empty => MetricValue::Missing,
        other => MetricValue::Invalid(other.to_string()),
    }
}

/// 数值型编号判定（DIE NO. 列）
pub fn is_numeric_cell(cell: &CellValue) -> bool {
    matches!(clean_metric(cell), MetricValue::Value(_))
}

/// Excel 序列日期 → NaiveDate（1900 日期系统）
///
/// 仅接受合理区间（1954..2119），避免把普通数字误判为日期
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(20_000.0..80_000.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// 表头日期清洗为展示文本
///
/// # 规则
/// - 日期单元格 → YYYY-MM-DD
/// - 序列号数值 → YYYY-MM-DD
/// - 文本 "2025-03-12 00:00:00" → 只保留日期部分
/// - 空值 → None
pub fn clean_header_date(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        CellValue::Number(n) => Some(
            excel_serial_to_date(*n)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => other
            .as_text()
            .map(|s| s.split_whitespace().next().unwrap_or_default().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  r.t   75x12 \t mm "), "R.T 75X12 MM");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_compact_text_ignores_spaces() {
        assert_eq!(compact_text("Press Prod  Sheet"), "PRESSPRODSHEET");
        assert_eq!(compact_text("Speed (mm)"), compact_text("Speed(mm)"));
        assert_eq!(compact_text("RECOVERY %"), "RECOVERY%");
    }

    #[test]
    fn test_clean_metric_variants() {
        assert_eq!(clean_metric(&CellValue::Number(85.0)), MetricValue::Value(85.0));
        assert_eq!(
            clean_metric(&CellValue::Text(" 1,250 ".to_string())),
            MetricValue::Value(1250.0)
        );
        assert_eq!(
            clean_metric(&CellValue::Text("82.5%".to_string())),
            MetricValue::Value(82.5)
        );
        assert_eq!(clean_metric(&CellValue::Empty), MetricValue::Missing);
        assert_eq!(
            clean_metric(&CellValue::Text("  ".to_string())),
            MetricValue::Missing
        );
        assert_eq!(
            clean_metric(&CellValue::Text("N/A".to_string())),
            MetricValue::Invalid("N/A".to_string())
        );
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(
            excel_serial_to_date(45728.0),
            NaiveDate::from_ymd_opt(2025, 3, 12)
        );
        assert_eq!(excel_serial_to_date(220.0), None);
    }

    #[test]
    fn test_clean_header_date() {
        assert_eq!(
            clean_header_date(&CellValue::Text("2025-03-12 00:00:00".to_string())),
            Some("2025-03-12".to_string())
        );
        assert_eq!(
            clean_header_date(&CellValue::Number(45728.0)),
            Some("2025-03-12".to_string())
        );
        assert_eq!(clean_header_date(&CellValue::Empty), None);
    }
}
