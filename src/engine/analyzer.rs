// ==========================================
// 挤压机生产日报分析 - 分析主流程
// ==========================================
// 职责: 一次分析（一个文件）的完整编排
// 流程: 读取工作簿 → 定位工作表 → 表头解码 → 加载映射表
//       → 字段映射 → 模具族/部门派生 → 规则评估 → 报表组装
// 红线: 结构性错误在产生任何记录前中止；
//       数据质量问题只记录警告，不中止
// ==========================================

use crate::config::AnalyzerConfig;
use crate::domain::production::{
    DqKind, DqSummary, DqWarning, FlagResult, ProductionRecord, RuleCoverage, SheetHeader,
    UNCLASSIFIED_FAMILY,
};
use crate::engine::department::{DepartmentMapper, DepartmentMatch};
use crate::engine::die_family::DieFamilyClassifier;
use crate::engine::rule_engine::RuleEngine;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{FieldMapper, PressRowMapper};
use crate::importer::file_parser::{ExcelParser, FileParser, WorkbookData};
use crate::importer::header_decoder::{decode_production_sheet, locate_sheet};
use crate::importer::mapping_loader::load_mapping_table;
use crate::report::report_builder::FlaggedReport;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

// ==========================================
// AnalysisOutcome - 单次分析结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub run_id: String,
    pub header: Arc<SheetHeader>,
    pub evaluations: Vec<(ProductionRecord, FlagResult)>,
    pub report: FlaggedReport,
    pub dq_warnings: Vec<DqWarning>,
    pub dq_summary: DqSummary,
    pub mapping_entries: usize,
    pub dropped_rows: usize,
}

/// 运行摘要（CLI --json 输出）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub run_id: String,
    pub header: SheetHeader,
    pub total_records: usize,
    pub flagged_records: usize,
    pub dropped_rows: usize,
    pub mapping_entries: usize,
    pub dq_summary: DqSummary,
}

impl AnalysisOutcome {
    pub fn flagged_count(&self) -> usize {
        self.report.len()
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            run_id: self.run_id.clone(),
            header: (*self.header).clone(),
            total_records: self.evaluations.len(),
            flagged_records: self.flagged_count(),
            dropped_rows: self.dropped_rows,
            mapping_entries: self.mapping_entries,
            dq_summary: self.dq_summary.clone(),
        }
    }
}

// ==========================================
// PressSheetAnalyzer - 分析器
// ==========================================
pub struct PressSheetAnalyzer {
    config: AnalyzerConfig,
    parser: Box<dyn FileParser>,
    mapper: Box<dyn FieldMapper>,
    classifier: DieFamilyClassifier,
}

impl PressSheetAnalyzer {
    /// 使用默认组件（Excel 解析 + 标准行映射）
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_components(config, Box::new(ExcelParser), Box::new(PressRowMapper))
    }

    pub fn with_components(
        config: AnalyzerConfig,
        parser: Box<dyn FileParser>,
        mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            config,
            parser,
            mapper,
            classifier: DieFamilyClassifier::new(),
        }
    }

    /// 分析文件（主入口）
    ///
    /// # 返回
    /// - Ok(AnalysisOutcome): 分析结果（可能无任何标记）
    /// - Err(ImportError): 文件/工作表/列头等结构性错误
    pub fn analyze_file(&self, file_path: &Path) -> ImportResult<AnalysisOutcome> {
        info!(file_path = %file_path.display(), "开始分析生产日报");
        let workbook = self.parser.parse_workbook(file_path)?;
        self.analyze_workbook(&workbook)
    }

    /// 分析内存工作簿
    #[instrument(skip(self, workbook), fields(run_id))]
    pub fn analyze_workbook(&self, workbook: &WorkbookData) -> ImportResult<AnalysisOutcome> {
        let run_id = Uuid::new_v4().to_string();
        Span::current().record("run_id", run_id.as_str());

        // 步骤 1: 定位工作表（两张均为必需）
        debug!("步骤 1: 定位工作表");
        let production_sheet = locate_sheet(workbook, &self.config.production_sheet_names)?;
        let mapping_sheet = locate_sheet(workbook, &self.config.mapping_sheet_names)?;
        info!(
            production_sheet = production_sheet.name(),
            mapping_sheet = mapping_sheet.name(),
            "工作表定位完成"
        );

        // 步骤 2: 表头解码
        debug!("步骤 2: 表头解码");
        let decoded = decode_production_sheet(production_sheet)?;
        let header = Arc::new(decoded.header);
        info!(
            date = %header.date,
            press = %header.press,
            operator = %header.operator,
            supervisor = %header.supervisor,
            "表头解析完成"
        );

        // 步骤 3: 映射表
        debug!("步骤 3: 加载映射表");
        let mapping = load_mapping_table(mapping_sheet, &self.config.department_codes);
        let departments = DepartmentMapper::new(&mapping);
        let rules = RuleEngine::new(&self.config.thresholds);

        // 步骤 4: 逐行映射、派生、评估
        debug!(rows = decoded.rows.len(), "步骤 4: 记录映射与规则评估");
        let mut dq_warnings = Vec::new();
        let mut evaluations = Vec::with_capacity(decoded.rows.len());
        for row in &decoded.rows {
            let mapped = self.mapper.map_to_record(row, &header);
            let mut record = mapped.record;
            let mut warnings = mapped.warnings;

            record.die_family = self.classifier.classify(&record.die_name).to_string();
            if record.die_family == UNCLASSIFIED_FAMILY {
                warnings.push(DqWarning {
                    row_number: record.row_number,
                    kind: DqKind::UnclassifiedDie,
                    field: "DIE NAME".to_string(),
                    message: format!("模具名无法归族: '{}'", record.die_name),
                });
            }

            let (department, matched) = departments.lookup(&record.remark);
            record.department = department.to_string();
            if matched == DepartmentMatch::None && !record.remark.is_empty() {
                warnings.push(DqWarning {
                    row_number: record.row_number,
                    kind: DqKind::UnmappedRemark,
                    field: "REMARKS".to_string(),
                    message: format!("备注无部门映射: '{}'", record.remark),
                });
            }

            let result = rules.evaluate(&record);
            if result.coverage == RuleCoverage::Insufficient {
                warnings.push(DqWarning {
                    row_number: record.row_number,
                    kind: DqKind::InsufficientRuleCoverage,
                    field: "PRESS".to_string(),
                    message: format!("挤压机 '{}' 无可用阈值，未评估", record.press_label),
                });
            }

            for w in &warnings {
                debug!(row = w.row_number, kind = ?w.kind, field = %w.field, "{}", w.message);
            }
            dq_warnings.extend(warnings);
            evaluations.push((record, result));
        }

        // 步骤 5: 报表组装
        debug!("步骤 5: 报表组装");
        let report = FlaggedReport::build(evaluations.iter().map(|(rec, res)| (rec, res)));

        let dq_summary = DqSummary::from_warnings(&dq_warnings);
        if dq_summary.total_warnings > 0 {
            warn!(
                total = dq_summary.total_warnings,
                by_kind = ?dq_summary.by_kind,
                "存在数据质量警告"
            );
        }

        info!(
            run_id = %run_id,
            records = evaluations.len(),
            flagged = report.len(),
            dq_warnings = dq_summary.total_warnings,
            "分析完成"
        );

        Ok(AnalysisOutcome {
            run_id,
            header,
            evaluations,
            report,
            dq_warnings,
            dq_summary,
            mapping_entries: mapping.len(),
            dropped_rows: decoded.dropped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use crate::importer::sheet_grid::{CellValue, SheetGrid};

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn workbook(press: &str) -> WorkbookData {
        let production = SheetGrid::new(
            "PRESS PROD SHEET",
            vec![
                vec![t("Date"), t("2025-03-12"), t("Press"), t(press)],
                vec![t("DIE NAME"), t("PROD/HOUR"), t("RECOVERY %"), t("Speed(mm)"), t("REMARKS")],
                vec![t("R.T 75x12"), n(200.0), n(85.0), n(500.0), t("die broken")],
                vec![t("Mystery"), n(250.0), n(90.0), n(450.0), t("unheard of")],
            ],
        );
        let mapping = SheetGrid::new(
            "Mapping",
            vec![
                vec![t("Remarks"), t("Department")],
                vec![t("die broken"), n(1.0)],
            ],
        );
        WorkbookData::new(vec![production, mapping])
    }

    #[test]
    fn test_analyze_workbook_flags_and_derives() {
        let analyzer = PressSheetAnalyzer::new(AnalyzerConfig::default());
        let outcome = analyzer.analyze_workbook(&workbook("P1")).unwrap();

        assert_eq!(outcome.evaluations.len(), 2);
        assert_eq!(outcome.flagged_count(), 1);
        assert!(!outcome.run_id.is_empty());

        let row = &outcome.report.rows()[0];
        assert_eq!(row.die_family, "Rectangular Tube");
        assert_eq!(row.department, "Tool Room");
        assert_eq!(row.reason, "Production rate below 220 Prod/hour");

        assert_eq!(outcome.dq_summary.count(DqKind::UnclassifiedDie), 1);
        assert_eq!(outcome.dq_summary.count(DqKind::UnmappedRemark), 1);
        assert_eq!(outcome.evaluations[1].0.department, "Unknown");
    }

    #[test]
    fn test_blank_die_name_row_never_reaches_report() {
        let mut data = workbook("P1");
        data.sheets[0] = SheetGrid::new(
            "PRESS PROD SHEET",
            vec![
                vec![t("DIE NAME"), t("PROD/HOUR"), t("RECOVERY %"), t("Speed(mm)")],
                vec![t(""), n(10.0), n(10.0), n(10.0)],
                vec![t("R.T 75x12"), n(200.0), n(85.0), n(500.0)],
            ],
        );

        let outcome = PressSheetAnalyzer::new(AnalyzerConfig::default())
            .analyze_workbook(&data)
            .unwrap();

        assert_eq!(outcome.evaluations.len(), 1);
        assert_eq!(outcome.dropped_rows, 1);
        assert_eq!(outcome.report.len(), 1);
        assert_eq!(outcome.report.rows()[0].die_name, "R.T 75x12");
    }

    #[test]
    fn test_unrecognized_press_records_coverage_warnings() {
        let analyzer = PressSheetAnalyzer::new(AnalyzerConfig::default());
        let outcome = analyzer.analyze_workbook(&workbook("P9")).unwrap();

        assert_eq!(outcome.flagged_count(), 0);
        assert_eq!(outcome.dq_summary.count(DqKind::InsufficientRuleCoverage), 2);
        let summary = outcome.summary();
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.header.press, "P9");
    }

    #[test]
    fn test_missing_mapping_sheet_aborts() {
        let mut data = workbook("P1");
        data.sheets.pop();
        let analyzer = PressSheetAnalyzer::new(AnalyzerConfig::default());
        let err = analyzer.analyze_workbook(&data).unwrap_err();
        assert!(matches!(err, ImportError::SheetNotFound { .. }));
    }
}
