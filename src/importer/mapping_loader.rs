// ==========================================
// 挤压机生产日报分析 - 映射表加载器
// ==========================================
// 职责: 映射工作表 → MappingTable
// 格式: "Remarks" 表头行之后为数据；A 列备注关键字，B 列部门
//       B 列为数值时按部门编号表翻译，为文本时直接作为部门名
// ==========================================

use crate::domain::mapping::MappingTable;
use crate::importer::data_cleaner::compact_text;
use crate::importer::sheet_grid::{CellValue, SheetGrid};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const REMARKS_HEADER: [&str; 2] = ["REMARKS", "REMARK"];

/// 定位 "Remarks" 表头单元格
///
/// # 返回
/// - Some((row, col)): 数据从 row + 1 开始，关键字在 col 列，部门在 col + 1 列
/// - None: 无表头，A/B 列视为数据
fn find_remarks_header(grid: &SheetGrid) -> Option<(usize, usize)> {
    (0..grid.row_count()).find_map(|r| {
        grid.row(r).iter().position(|cell| {
            cell.as_text()
                .map(|t| REMARKS_HEADER.contains(&compact_text(&t).as_str()))
                .unwrap_or(false)
        })
        .map(|c| (r, c))
    })
}

/// 无 Remarks 表头时的数据起始行
///
/// 第一条非空行的部门单元格为非编号文本（如 "Keyword | Department"）时视为列头行，跳过
fn headerless_start_row(grid: &SheetGrid) -> usize {
    let first = match (0..grid.row_count()).find(|&r| !grid.is_blank_row(r)) {
        Some(r) => r,
        None => return 0,
    };
    match grid.cell(first, 1) {
        CellValue::Text(s) if s.trim().parse::<i64>().is_err() => {
            debug!(row = first + 1, label = %s.trim(), "首行部门列为文本，按列头行跳过");
            first + 1
        }
        _ => first,
    }
}

/// 部门单元格 → 部门名称
fn resolve_department(cell: &CellValue, department_codes: &BTreeMap<i64, String>) -> Option<String> {
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 => {
            let code = *n as i64;
            let name = department_codes.get(&code).cloned();
            if name.is_none() {
                warn!(code, "未知部门编号，忽略该映射");
            }
            name
        }
        CellValue::Text(s) => {
            let trimmed = s.trim();
            // 文本形式的编号（"2"）同样按编号表翻译
            match trimmed.parse::<i64>() {
                Ok(code) => resolve_department(&CellValue::Number(code as f64), department_codes),
                Err(_) => (!trimmed.is_empty()).then(|| trimmed.to_string()),
            }
        }
        CellValue::Empty => None,
        other => {
            warn!(value = %other, "部门单元格无法识别，忽略该映射");
            None
        }
    }
}

/// 从映射工作表构建映射表
///
/// # 规则
/// - 关键字为空跳过
/// - 重复关键字保留第一条
/// - 未知部门编号跳过（warn 日志）
pub fn load_mapping_table(
    grid: &SheetGrid,
    department_codes: &BTreeMap<i64, String>,
) -> MappingTable {
    let (start_row, key_col) = match find_remarks_header(grid) {
        Some((r, c)) => (r + 1, c),
        None => {
            debug!(sheet = grid.name(), "映射工作表无 Remarks 表头，A/B 列作为数据");
            (headerless_start_row(grid), 0)
        }
    };

    let mut table = MappingTable::new();
    let mut duplicates = 0;
    for r in start_row..grid.row_count() {
        let keyword = match grid.cell(r, key_col).as_text() {
            Some(k) => k,
            None => continue,
        };
        let department = match resolve_department(grid.cell(r, key_col + 1), department_codes) {
            Some(d) => d,
            None => continue,
        };
        if !table.insert(&keyword, &department) {
            duplicates += 1;
        }
    }

    info!(
        sheet = grid.name(),
        entries = table.len(),
        duplicates,
        "映射表加载完成"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_load_with_header_codes_and_names() {
        let grid = SheetGrid::new(
            "Mapping",
            vec![
                vec![t("Remark → Department lookup")],
                vec![t("Remarks"), t("Department")],
                vec![t("die broken"), CellValue::Number(1.0)],
                vec![t("power cut"), t("Maintainance")],
                vec![t("Die Broken"), CellValue::Number(4.0)],
                vec![CellValue::Empty, CellValue::Number(2.0)],
                vec![t("billet short"), CellValue::Number(9.0)],
                vec![t("speed low"), t("2")],
            ],
        );

        let table = load_mapping_table(&grid, &AnalyzerConfig::default().department_codes);
        let pairs: Vec<(&str, &str)> = table
            .entries()
            .iter()
            .map(|e| (e.keyword.as_str(), e.department.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("DIE BROKEN", "Tool Room"),
                ("POWER CUT", "Maintainance"),
                ("SPEED LOW", "Production Department"),
            ]
        );
    }

    #[test]
    fn test_load_without_header_uses_whole_sheet() {
        let grid = SheetGrid::new(
            "Sheet1",
            vec![vec![t("oil leak"), CellValue::Number(5.0)]],
        );
        let table = load_mapping_table(&grid, &AnalyzerConfig::default().department_codes);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].department, "Maintainance");
    }

    #[test]
    fn test_headerless_sheet_skips_text_label_row() {
        let grid = SheetGrid::new(
            "Sheet1",
            vec![
                vec![t("Keyword"), t("Department")],
                vec![t("oil leak"), CellValue::Number(5.0)],
                vec![t("die broken"), t("Tool Room")],
            ],
        );
        let table = load_mapping_table(&grid, &AnalyzerConfig::default().department_codes);
        let keywords: Vec<&str> = table.entries().iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["OIL LEAK", "DIE BROKEN"]);
    }
}
