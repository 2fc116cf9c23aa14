// ==========================================
// 挤压机生产日报分析 - 标记报表组装
// ==========================================
// 职责: (ProductionRecord, FlagResult) 序列 → 仅含被标记记录的报表
// 红线: 稳定过滤，保持原始行顺序；列顺序固定
// ==========================================

use crate::domain::production::{FlagResult, ProductionRecord};
use crate::importer::sheet_grid::format_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 报表列（导出顺序）
pub const REPORT_COLUMNS: [&str; 13] = [
    "Date",
    "Press",
    "Operator",
    "Supervisor",
    "Die No.",
    "Die Name",
    "Die Family",
    "Prod/Hour",
    "Recovery %",
    "Speed(mm)",
    "Remarks",
    "Department",
    "Reason",
];

/// 报表工作表名
pub const REPORT_SHEET_NAME: &str = "Flagged_Dies";

// ==========================================
// ReportValue - 报表单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Empty,
    Number(f64),
    Text(String),
}

impl ReportValue {
    /// 文本单元格（空白文本视为空）
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            ReportValue::Empty
        } else {
            ReportValue::Text(trimmed.to_string())
        }
    }

    pub fn number(value: Option<f64>) -> Self {
        value.map_or(ReportValue::Empty, ReportValue::Number)
    }
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Empty => Ok(()),
            ReportValue::Number(n) => write!(f, "{}", format_number(*n)),
            ReportValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ==========================================
// ReportRow - 报表行（命名字段）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub row_number: usize,
    pub date: String,
    pub press: String,
    pub operator: String,
    pub supervisor: String,
    pub die_number: Option<String>,
    pub die_name: String,
    pub die_family: String,
    pub prod_per_hour: Option<f64>,
    pub recovery_pct: Option<f64>,
    pub speed_mm: Option<f64>,
    pub remark: String,
    pub department: String,
    pub reason: String,
}

impl ReportRow {
    pub fn from_record(record: &ProductionRecord, result: &FlagResult) -> Self {
        Self {
            row_number: record.row_number,
            date: record.header.date.clone(),
            press: record.press_label.clone(),
            operator: record.header.operator.clone(),
            supervisor: record.header.supervisor.clone(),
            die_number: record.die_number.clone(),
            die_name: record.die_name.clone(),
            die_family: record.die_family.clone(),
            prod_per_hour: record.prod_per_hour,
            recovery_pct: record.recovery_pct,
            speed_mm: record.speed_mm,
            remark: record.remark.clone(),
            department: record.department.clone(),
            reason: result.reason_text(),
        }
    }

    /// 按 REPORT_COLUMNS 顺序输出单元格
    pub fn cells(&self) -> Vec<ReportValue> {
        vec![
            ReportValue::text(&self.date),
            ReportValue::text(&self.press),
            ReportValue::text(&self.operator),
            ReportValue::text(&self.supervisor),
            ReportValue::text(self.die_number.as_deref().unwrap_or_default()),
            ReportValue::text(&self.die_name),
            ReportValue::text(&self.die_family),
            ReportValue::number(self.prod_per_hour),
            ReportValue::number(self.recovery_pct),
            ReportValue::number(self.speed_mm),
            ReportValue::text(&self.remark),
            ReportValue::text(&self.department),
            ReportValue::text(&self.reason),
        ]
    }
}

// ==========================================
// ReportTable - 列序单元格表（导出用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportValue>>,
}

impl ReportTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ==========================================
// FlaggedReport - 标记报表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlaggedReport {
    rows: Vec<ReportRow>,
}

impl FlaggedReport {
    /// 组装报表（仅被标记记录，保持原始顺序）
    pub fn build<'a, I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = (&'a ProductionRecord, &'a FlagResult)>,
    {
        let rows = evaluations
            .into_iter()
            .filter(|(_, result)| result.flagged)
            .map(|(record, result)| ReportRow::from_record(record, result))
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_table(&self) -> ReportTable {
        ReportTable {
            columns: REPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self.rows.iter().map(ReportRow::cells).collect(),
        }
    }
}

/// 默认输出文件名：flagged_dies_report_{date}.{ext}，日期中的 '/' 替换为 '-'
pub fn default_report_file_name(date: &str, extension: &str) -> String {
    format!(
        "flagged_dies_report_{}.{}",
        date.trim().replace('/', "-"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::production::{RuleCoverage, SheetHeader};
    use crate::domain::types::Press;
    use std::sync::Arc;

    fn record(row_number: usize, remark: &str) -> ProductionRecord {
        ProductionRecord {
            row_number,
            header: Arc::new(SheetHeader {
                sheet_name: "PRESS PROD SHEET".to_string(),
                date: "2025-03-12".to_string(),
                press: "P1".to_string(),
                operator: "Ravi".to_string(),
                supervisor: "N/A".to_string(),
            }),
            die_number: Some("7".to_string()),
            die_name: "R.T 75x12".to_string(),
            die_family: "Rectangular Tube".to_string(),
            press_label: "P1".to_string(),
            press: Some(Press::P1),
            prod_per_hour: Some(200.0),
            recovery_pct: None,
            speed_mm: Some(500.0),
            remark: remark.to_string(),
            department: "Unknown".to_string(),
        }
    }

    fn result(flagged: bool) -> FlagResult {
        FlagResult {
            flagged,
            reasons: if flagged {
                vec!["Production rate below 220 Prod/hour".to_string()]
            } else {
                Vec::new()
            },
            coverage: RuleCoverage::Evaluated,
            skipped_metrics: Vec::new(),
        }
    }

    #[test]
    fn test_build_keeps_only_flagged_in_order() {
        let records = [record(5, "a"), record(6, "b"), record(7, "c")];
        let results = [result(true), result(false), result(true)];

        let report = FlaggedReport::build(records.iter().zip(results.iter()));

        assert_eq!(report.len(), 2);
        assert_eq!(report.rows()[0].row_number, 5);
        assert_eq!(report.rows()[1].row_number, 7);
        assert_eq!(report.rows()[0].reason, "Production rate below 220 Prod/hour");
    }

    #[test]
    fn test_table_cells_follow_column_order() {
        let records = [record(5, "")];
        let results = [result(true)];
        let table = FlaggedReport::build(records.iter().zip(results.iter())).to_table();

        assert_eq!(table.columns.len(), REPORT_COLUMNS.len());
        assert_eq!(table.columns[4], "Die No.");
        let row = &table.rows[0];
        assert_eq!(row.len(), REPORT_COLUMNS.len());
        assert_eq!(row[0], ReportValue::Text("2025-03-12".to_string()));
        assert_eq!(row[3], ReportValue::Text("N/A".to_string()));
        assert_eq!(row[7], ReportValue::Number(200.0));
        assert_eq!(row[8], ReportValue::Empty);
        assert_eq!(row[10], ReportValue::Empty);
    }

    #[test]
    fn test_default_report_file_name() {
        assert_eq!(
            default_report_file_name("12/03/2025", "xlsx"),
            "flagged_dies_report_12-03-2025.xlsx"
        );
        assert_eq!(
            default_report_file_name("2025-03-12", "csv"),
            "flagged_dies_report_2025-03-12.csv"
        );
    }
}
