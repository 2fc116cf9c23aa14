// ==========================================
// 分析主流程端到端测试
// ==========================================
// 测试目标: 合成工作簿 → 解析 → 标记 → 报表
// ==========================================


use press_prod_analyzer::config::{AnalyzerConfig, FamilyOverride, MetricThresholds};
use press_prod_analyzer::domain::{DqKind, Press, NOT_AVAILABLE};
use press_prod_analyzer::engine::PressSheetAnalyzer;
use press_prod_analyzer::importer::ImportError;
use press_prod_analyzer::logging;
use tempfile::TempDir;
use test_helpers::{
    standard_mapping_sheet, standard_production_sheet, write_standard_workbook, write_workbook,
    Cell, SheetFixture,
};

#[test]
fn test_three_row_scenario_flags_expected_dies() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let path = write_standard_workbook(&dir);

    let analyzer = PressSheetAnalyzer::new(AnalyzerConfig::default());
    let outcome = analyzer.analyze_file(&path).unwrap();

    // 表头
    assert_eq!(outcome.header.date, "2025-03-12");
    assert_eq!(outcome.header.press, "P1");
    assert_eq!(outcome.header.operator, "Ravi");
    assert_eq!(outcome.header.supervisor, "Anil");

    // 三条记录，TOTAL 页脚行被丢弃
    assert_eq!(outcome.evaluations.len(), 3);
    assert_eq!(outcome.dropped_rows, 1);
    assert_eq!(outcome.mapping_entries, 2);

    let rows = outcome.report.rows();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].die_number.as_deref(), Some("101"));
    assert_eq!(rows[0].press, "P1");
    assert_eq!(rows[0].die_family, "Rectangular Tube");
    assert_eq!(rows[0].department, "Tool Room");
    assert_eq!(rows[0].reason, "Production rate below 220 Prod/hour");

    assert_eq!(rows[1].press, "P2");
    assert_eq!(rows[1].die_family, "Square Tube");
    assert_eq!(rows[1].department, "Maintainance");
    assert_eq!(rows[1].reason, "Recovery below 80% and Speed less than 400 mm");
    assert_eq!(rows[1].operator, "Ravi");

    // 第三条未被标记，但仍完成派生
    let (third, result) = &outcome.evaluations[2];
    assert!(!result.flagged);
    assert_eq!(third.press, Some(Press::P1));
    assert_eq!(third.die_family, "Handle");
    assert_eq!(third.department, "Unknown");
    assert_eq!(outcome.dq_summary.total_warnings, 0);
}

#[test]
fn test_missing_production_sheet_names_available_sheets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_prod.xlsx");
    write_workbook(
        &path,
        &[
            SheetFixture::new("Summary", vec![vec![Cell::Text("x")]]),
            standard_mapping_sheet(),
        ],
    );

    let err = PressSheetAnalyzer::new(AnalyzerConfig::default())
        .analyze_file(&path)
        .unwrap_err();

    match err {
        ImportError::SheetNotFound { expected, available } => {
            assert!(expected.contains("PRESS PROD SHEET"));
            assert_eq!(available, "Summary, Mapping");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_speed_column_is_reported() {
    use Cell::*;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_speed.xlsx");
    write_workbook(
        &path,
        &[
            SheetFixture::new(
                "Press Prod Sheet",
                vec![
                    vec![Text("DIE NAME"), Text("PROD/HOUR"), Text("RECOVERY %")],
                    vec![Text("R.T"), Num(1.0), Num(2.0)],
                ],
            ),
            SheetFixture::new("Sheet1", vec![vec![Text("Remarks")]]),
        ],
    );

    let err = PressSheetAnalyzer::new(AnalyzerConfig::default())
        .analyze_file(&path)
        .unwrap_err();
    match err {
        ImportError::ColumnNotFound { missing, .. } => assert_eq!(missing, "Speed(mm)"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_date_cell_label_below_and_sheet1_mapping() {
    use Cell::*;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("date_cell.xlsx");
    write_workbook(
        &path,
        &[
            SheetFixture::new(
                "press prod",
                vec![
                    vec![Text("DATE"), Text("PRESS"), Text("OPERATOR")],
                    vec![Date(45728.0), Text("p2"), Blank],
                    vec![
                        Text("DIE NAME"),
                        Text("PROD/HOUR"),
                        Text("RECOVERY %"),
                        Text("Speed (mm)"),
                        Text("REMARK"),
                    ],
                    vec![Text("Curtain Wall 50"), Text("n/a"), Num(75.0), Num(420.0), Text("oil leak")],
                ],
            ),
            SheetFixture::new(
                "Sheet1",
                vec![vec![Text("Remarks"), Text("Dept")], vec![Text("oil leak"), Text("Maintenance Crew")]],
            ),
        ],
    );

    let outcome = PressSheetAnalyzer::new(AnalyzerConfig::default())
        .analyze_file(&path)
        .unwrap();

    assert_eq!(outcome.header.date, "2025-03-12");
    assert_eq!(outcome.header.press, "p2");
    assert_eq!(outcome.header.operator, NOT_AVAILABLE);
    assert_eq!(outcome.header.supervisor, NOT_AVAILABLE);

    let rows = outcome.report.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].die_family, "Curtain Wall");
    assert_eq!(rows[0].department, "Maintenance Crew");
    assert_eq!(rows[0].prod_per_hour, None);
    assert_eq!(rows[0].reason, "Recovery below 80%");
    assert_eq!(outcome.dq_summary.count(DqKind::NonNumericMetric), 1);
}

#[test]
fn test_family_override_changes_thresholds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("override.xlsx");
    write_workbook(&path, &[standard_production_sheet(), standard_mapping_sheet()]);

    let mut config = AnalyzerConfig::default();
    config.thresholds.family_overrides.push(FamilyOverride {
        press: Press::P1,
        family: "Handle".to_string(),
        thresholds: MetricThresholds::new(260.0, 80.0, 4.7),
    });

    let outcome = PressSheetAnalyzer::new(config).analyze_file(&path).unwrap();
    let rows = outcome.report.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].die_family, "Handle");
    assert_eq!(rows[2].reason, "Production rate below 260 Prod/hour");
}

#[test]
fn test_unconfigured_press_is_never_flagged() {
    let dir = TempDir::new().unwrap();
    let path = write_standard_workbook(&dir);

    let mut config = AnalyzerConfig::default();
    config.thresholds.presses.remove(&Press::P2);

    let outcome = PressSheetAnalyzer::new(config).analyze_file(&path).unwrap();
    assert_eq!(outcome.report.len(), 1);
    assert_eq!(outcome.report.rows()[0].press, "P1");
    assert_eq!(outcome.dq_summary.count(DqKind::InsufficientRuleCoverage), 1);
}
