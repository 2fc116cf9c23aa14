// ==========================================
// 挤压机生产日报分析 - 字段映射器实现
// ==========================================
// 职责: 正文原始行 → ProductionRecord + 类型转换
// 红线: 不做模具族/部门派生（由 engine 层完成），
//       派生字段先填兜底值
// ==========================================

use crate::domain::production::{
    DqKind, DqWarning, ProductionRecord, SheetHeader, UNCLASSIFIED_FAMILY, UNKNOWN_DEPARTMENT,
};
use crate::domain::types::{Metric, Press};
use crate::importer::data_cleaner::{clean_metric, MetricValue};
use crate::importer::header_decoder::{columns, RawRow};
use crate::importer::sheet_grid::{format_number, CellValue};
use std::sync::Arc;

/// 单行映射结果
#[derive(Debug, Clone)]
pub struct MappedRow {
    pub record: ProductionRecord,
    pub warnings: Vec<DqWarning>,
}

// ==========================================
// FieldMapper Trait
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// 原始行 → 生产记录
    ///
    /// # 参数
    /// - row: 表头解码后的正文行
    /// - header: 所属工作表表头（共享）
    ///
    /// # 返回
    /// 记录 + 本行数据质量警告（不阻断）
    fn map_to_record(&self, row: &RawRow, header: &Arc<SheetHeader>) -> MappedRow;
}

pub struct PressRowMapper;

impl FieldMapper for PressRowMapper {
    fn map_to_record(&self, row: &RawRow, header: &Arc<SheetHeader>) -> MappedRow {
        let mut warnings = Vec::new();

        // 行内 PRESS 列优先，否则继承表头
        let press_label = row
            .get_text(columns::PRESS)
            .unwrap_or_else(|| header.press.clone());
        let press = Press::parse(&press_label);

        let prod_per_hour = self.parse_metric(row, Metric::ProductionRate, &mut warnings);
        let recovery_pct = self.parse_metric(row, Metric::Recovery, &mut warnings);
        let speed_mm = self.parse_metric(row, Metric::Speed, &mut warnings);

        if let Some(recovery) = recovery_pct.filter(|v| !(0.0..=100.0).contains(v)) {
            warnings.push(DqWarning {
                row_number: row.row_number,
                kind: DqKind::OutOfRange,
                field: Metric::Recovery.column_label().to_string(),
                message: format!("成材率超出 0-100: {}", format_number(recovery)),
            });
        }

        let record = ProductionRecord {
            row_number: row.row_number,
            header: Arc::clone(header),
            die_number: row.get(columns::DIE_NO).and_then(die_number_text),
            die_name: row.get_text(columns::DIE_NAME).unwrap_or_default(),
            die_family: UNCLASSIFIED_FAMILY.to_string(),
            press_label,
            press,
            prod_per_hour,
            recovery_pct,
            speed_mm,
            remark: row.get_text(columns::REMARKS).unwrap_or_default(),
            department: UNKNOWN_DEPARTMENT.to_string(),
        };

        MappedRow { record, warnings }
    }
}

impl PressRowMapper {
    /// 解析指标列；非数值记录 DQ 警告并视为缺失
    fn parse_metric(
        &self,
        row: &RawRow,
        metric: Metric,
        warnings: &mut Vec<DqWarning>,
    ) -> Option<f64> {
        let aliases = match metric {
            Metric::ProductionRate => columns::PROD_HOUR,
            Metric::Recovery => columns::RECOVERY,
            Metric::Speed => columns::SPEED,
        };
        match row.get(aliases).map(clean_metric) {
            Some(MetricValue::Value(v)) => Some(v),
            Some(MetricValue::Invalid(raw)) => {
                warnings.push(DqWarning {
                    row_number: row.row_number,
                    kind: DqKind::NonNumericMetric,
                    field: metric.column_label().to_string(),
                    message: format!("非数值: '{}'", raw),
                });
                None
            }
            Some(MetricValue::Missing) | None => None,
        }
    }
}

/// DIE NO. 展示文本（整数不带 ".0"）
fn die_number_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Number(n) => Some(format_number(*n)),
        other => other.as_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn header() -> Arc<SheetHeader> {
        Arc::new(SheetHeader {
            sheet_name: "PRESS PROD SHEET".to_string(),
            date: "2025-03-12".to_string(),
            press: "P1".to_string(),
            operator: "Ravi".to_string(),
            supervisor: "Anil".to_string(),
        })
    }

    fn raw_row(cells: &[(&str, CellValue)]) -> RawRow {
        RawRow {
            row_number: 8,
            cells: cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_map_complete_row() {
        let row = raw_row(&[
            ("DIE NO.", CellValue::Number(12.0)),
            ("DIE NAME", CellValue::Text(" R.T 75x12x1.7 mm ".to_string())),
            ("PROD/HOUR", CellValue::Number(200.0)),
            ("RECOVERY %", CellValue::Text("85%".to_string())),
            ("Speed (mm)", CellValue::Number(500.0)),
            ("REMARKS", CellValue::Text("die broken".to_string())),
        ]);

        let mapped = PressRowMapper.map_to_record(&row, &header());
        let record = mapped.record;

        assert!(mapped.warnings.is_empty());
        assert_eq!(record.row_number, 8);
        assert_eq!(record.die_number.as_deref(), Some("12"));
        assert_eq!(record.die_name, "R.T 75x12x1.7 mm");
        assert_eq!(record.press, Some(Press::P1));
        assert_eq!(record.prod_per_hour, Some(200.0));
        assert_eq!(record.recovery_pct, Some(85.0));
        assert_eq!(record.speed_mm, Some(500.0));
        assert_eq!(record.remark, "die broken");
        assert_eq!(record.die_family, UNCLASSIFIED_FAMILY);
        assert_eq!(record.department, UNKNOWN_DEPARTMENT);
        assert_eq!(record.header.operator, "Ravi");
    }

    #[test]
    fn test_row_press_column_overrides_header() {
        let row = raw_row(&[
            ("DIE NAME", CellValue::Text("S.T".to_string())),
            ("PRESS", CellValue::Text("p2".to_string())),
            ("PROD/HOUR", CellValue::Number(1.0)),
        ]);
        let record = PressRowMapper.map_to_record(&row, &header()).record;
        assert_eq!(record.press_label, "p2");
        assert_eq!(record.press, Some(Press::P2));
    }

    #[test]
    fn test_non_numeric_and_out_of_range_warnings() {
        let row = raw_row(&[
            ("DIE NAME", CellValue::Text("S.T".to_string())),
            ("PROD/HOUR", CellValue::Text("breakdown".to_string())),
            ("RECOVERY %", CellValue::Number(120.0)),
        ]);

        let mapped = PressRowMapper.map_to_record(&row, &header());
        assert_eq!(mapped.record.prod_per_hour, None);
        assert_eq!(mapped.record.recovery_pct, Some(120.0));
        assert_eq!(mapped.record.speed_mm, None);

        let kinds: Vec<DqKind> = mapped.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![DqKind::NonNumericMetric, DqKind::OutOfRange]);
        assert_eq!(mapped.warnings[0].field, "PROD/HOUR");
        assert_eq!(mapped.warnings[0].row_number, 8);
    }
}
