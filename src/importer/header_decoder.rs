// ==========================================
// 挤压机生产日报分析 - 表头解码器
// ==========================================
// 职责: 定位生产日报/映射工作表（忽略大小写/空格）
//       提取标量表头（Date / Press / Operator / Supervisor）
//       识别列头行（单行或两行表头），输出正文原始行
// 红线: 只处理已广播的扁平网格，不感知合并单元格
// ==========================================

use crate::domain::production::{SheetHeader, NOT_AVAILABLE};
use crate::importer::data_cleaner::{clean_header_date, compact_text, is_numeric_cell};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::WorkbookData;
use crate::importer::sheet_grid::{CellValue, SheetGrid};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

// ==========================================
// 列名别名（按优先级）
// ==========================================
pub mod columns {
    pub const DIE_NO: &[&str] = &["DIE NO.", "DIE NO", "DIE NUMBER"];
    pub const DIE_NAME: &[&str] = &["DIE NAME", "PROFILE NAME"];
    pub const PROD_HOUR: &[&str] = &["PROD/HOUR", "PROD/HR"];
    pub const RECOVERY: &[&str] = &["RECOVERY %", "RECOVERY"];
    pub const SPEED: &[&str] = &["Speed(mm)", "SPEED"];
    pub const REMARKS: &[&str] = &["REMARKS", "REMARK"];
    pub const PRESS: &[&str] = &["PRESS", "PRESS NO."];

    /// 列头行判定所需列
    pub const REQUIRED: [&[&str]; 4] = [DIE_NAME, PROD_HOUR, RECOVERY, SPEED];

    /// 标记相关列（全部为空的行视为填充行）
    pub const FLAG_RELEVANT: [&[&str]; 3] = [PROD_HOUR, RECOVERY, SPEED];
}

/// 列名是否命中别名（紧凑形式比较）
pub fn matches_column(name: &str, aliases: &[&str]) -> bool {
    let key = compact_text(name);
    aliases.iter().any(|a| compact_text(a) == key)
}

// ==========================================
// 标量表头字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HeaderField {
    Date,
    Press,
    Operator,
    Supervisor,
}

const HEADER_LABELS: [(HeaderField, &[&str]); 4] = [
    (HeaderField::Date, &["DATE"]),
    (HeaderField::Press, &["PRESS", "PRESS NO", "PRESS NO."]),
    (HeaderField::Operator, &["OPERATOR", "OPERATOR NAME"]),
    (HeaderField::Supervisor, &["SUPERVISOR", "SUPERVISOR NAME"]),
];

/// 旧版固定布局：第 5 行，B/C/D/L 列
const LEGACY_HEADER_ROW: usize = 4;
const LEGACY_HEADER_COLUMNS: [(HeaderField, usize); 4] = [
    (HeaderField::Date, 1),
    (HeaderField::Press, 2),
    (HeaderField::Operator, 3),
    (HeaderField::Supervisor, 11),
];

// ==========================================
// RawRow - 正文原始行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,                 // 工作表行号（从 1 开始）
    pub cells: HashMap<String, CellValue>, // 列名 → 原始值
}

impl RawRow {
    /// 按别名读取单元格（别名顺序优先）
    pub fn get(&self, aliases: &[&str]) -> Option<&CellValue> {
        aliases.iter().find_map(|alias| {
            let key = compact_text(alias);
            self.cells
                .iter()
                .find(|(name, _)| compact_text(name) == key)
                .map(|(_, v)| v)
        })
    }

    /// 按别名读取文本（空值返回 None）
    pub fn get_text(&self, aliases: &[&str]) -> Option<String> {
        self.get(aliases).and_then(CellValue::as_text)
    }

    fn is_padding(&self) -> bool {
        columns::FLAG_RELEVANT
            .iter()
            .all(|aliases| self.get(aliases).map_or(true, CellValue::is_empty))
    }
}

// ==========================================
// DecodedSheet - 解码结果
// ==========================================
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub header: SheetHeader,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
    pub dropped_rows: usize, // 填充行 + 页脚/小计行 + 无模具名行
}

// ==========================================
// ColumnLayout - 列头位置
// ==========================================
#[derive(Debug, Clone, PartialEq)]
struct ColumnLayout {
    header_row: usize,
    header_rows: usize,
    names: Vec<String>,
}

/// 按名称定位工作表
///
/// # 参数
/// - workbook: 工作簿
/// - candidates: 可接受名称（按优先级）
///
/// # 返回
/// - Ok(&SheetGrid): 第一个命中的工作表
/// - Err(SheetNotFound): 无任何命中
pub fn locate_sheet<'a>(
    workbook: &'a WorkbookData,
    candidates: &[String],
) -> ImportResult<&'a SheetGrid> {
    candidates
        .iter()
        .find_map(|candidate| {
            let key = compact_text(candidate);
            workbook
                .sheets
                .iter()
                .find(|sheet| compact_text(sheet.name()) == key)
        })
        .ok_or_else(|| ImportError::SheetNotFound {
            expected: candidates.join(" / "),
            available: workbook.sheet_names().join(", "),
        })
}

/// 解码生产日报工作表
///
/// # 流程
/// 1. 识别列头行
/// 2. 在列头之上提取标量表头
/// 3. 读取正文，丢弃空行/填充行/页脚行/无模具名行
pub fn decode_production_sheet(grid: &SheetGrid) -> ImportResult<DecodedSheet> {
    let layout = detect_column_layout(grid)?;
    debug!(
        sheet = grid.name(),
        header_row = layout.header_row + 1,
        header_rows = layout.header_rows,
        "列头行识别完成"
    );

    let header = extract_sheet_header(grid, layout.header_row);
    debug!(?header, "表头字段提取完成");

    let has_die_no = layout
        .names
        .iter()
        .any(|n| matches_column(n, columns::DIE_NO));

    let mut rows = Vec::new();
    let mut dropped_rows = 0;
    for r in (layout.header_row + layout.header_rows)..grid.row_count() {
        if grid.is_blank_row(r) {
            continue;
        }

        let row = build_raw_row(grid, r, &layout.names);
        if row.is_padding() {
            dropped_rows += 1;
            continue;
        }
        if has_die_no && !row.get(columns::DIE_NO).map_or(false, is_numeric_cell) {
            dropped_rows += 1;
            continue;
        }
        if row.get_text(columns::DIE_NAME).is_none() {
            debug!(row = row.row_number, "模具名为空，丢弃");
            dropped_rows += 1;
            continue;
        }
        rows.push(row);
    }

    info!(
        sheet = grid.name(),
        rows = rows.len(),
        dropped = dropped_rows,
        "正文解码完成"
    );

    Ok(DecodedSheet {
        header,
        columns: layout.names,
        rows,
        dropped_rows,
    })
}

/// 构造正文行（同名列取第一列）
fn build_raw_row(grid: &SheetGrid, r: usize, names: &[String]) -> RawRow {
    let mut seen = HashSet::new();
    let mut cells = HashMap::new();
    for (c, name) in names.iter().enumerate() {
        if seen.insert(compact_text(name)) {
            cells.insert(name.clone(), grid.cell(r, c).clone());
        }
    }
    RawRow {
        row_number: r + 1,
        cells,
    }
}

/// 识别列头行
///
/// # 规则
/// - 单行包含全部必需列 → 单行表头
/// - 该行命中至少一个必需列，且与下一行合并（下行优先）后包含全部必需列 → 两行表头
/// - 都不满足 → ColumnNotFound（列出最佳候选行缺失的列）
fn detect_column_layout(grid: &SheetGrid) -> ImportResult<ColumnLayout> {
    let mut best: Option<(usize, Vec<String>)> = None;

    for r in 0..grid.row_count() {
        let single = header_names(grid, r, None);
        let hits = required_hits(&single);
        if hits == columns::REQUIRED.len() {
            return Ok(ColumnLayout {
                header_row: r,
                header_rows: 1,
                names: single,
            });
        }

        if hits > 0 && r + 1 < grid.row_count() {
            let combined = header_names(grid, r, Some(r + 1));
            let combined_hits = required_hits(&combined);
            if combined_hits == columns::REQUIRED.len() {
                return Ok(ColumnLayout {
                    header_row: r,
                    header_rows: 2,
                    names: combined,
                });
            }
            if best.as_ref().map_or(true, |(h, _)| combined_hits > *h) {
                best = Some((combined_hits, combined));
            }
        }

        if best.as_ref().map_or(true, |(h, _)| hits > *h) {
            best = Some((hits, single));
        }
    }

    let best_names = best.map(|(_, names)| names).unwrap_or_default();
    let missing = columns::REQUIRED
        .iter()
        .filter(|aliases| !best_names.iter().any(|n| matches_column(n, aliases)))
        .map(|aliases| aliases[0])
        .collect::<Vec<_>>()
        .join(", ");

    Err(ImportError::ColumnNotFound {
        sheet: grid.name().to_string(),
        missing,
    })
}

/// 列名：下行优先，其次上行，均空时为 col_{i}
fn header_names(grid: &SheetGrid, upper: usize, lower: Option<usize>) -> Vec<String> {
    (0..grid.width())
        .map(|c| {
            lower
                .and_then(|l| grid.cell(l, c).as_text())
                .or_else(|| grid.cell(upper, c).as_text())
                .unwrap_or_else(|| format!("col_{}", c))
        })
        .collect()
}

fn required_hits(names: &[String]) -> usize {
    columns::REQUIRED
        .iter()
        .filter(|aliases| names.iter().any(|n| matches_column(n, aliases)))
        .count()
}

/// 标签单元格识别
///
/// # 返回
/// - Some((field, inline)): 命中标签；inline 为 "Date: 2025-03-12" 形式的冒号后取值
fn match_label(cell: &CellValue) -> Option<(HeaderField, Option<String>)> {
    let text = match cell {
        CellValue::Text(s) => s.trim(),
        _ => return None,
    };
    let (label, inline) = match text.split_once(':') {
        Some((label, rest)) => {
            let rest = rest.trim();
            (label, (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (text, None),
    };
    HEADER_LABELS
        .iter()
        .find(|(_, aliases)| matches_column(label, aliases))
        .map(|(field, _)| (*field, inline))
}

/// 提取标量表头
///
/// # 取值优先级
/// 1. 标签单元格冒号后的内联值
/// 2. 右侧第一个非空、非标签单元格（跳过合并广播出的同名标签）
/// 3. 下方第一个非空、非标签单元格（不越过列头行）
/// 4. 旧版固定布局（第 5 行 B/C/D/L）
fn extract_sheet_header(grid: &SheetGrid, header_row: usize) -> SheetHeader {
    let mut found: HashMap<HeaderField, CellValue> = HashMap::new();

    for r in 0..header_row {
        for c in 0..grid.row(r).len() {
            let (field, inline) = match match_label(grid.cell(r, c)) {
                Some(hit) => hit,
                None => continue,
            };
            if found.contains_key(&field) {
                continue;
            }
            let value = inline
                .map(CellValue::Text)
                .or_else(|| value_right_of(grid, r, c))
                .or_else(|| value_below(grid, r, c, header_row));
            if let Some(value) = value {
                found.insert(field, value);
            }
        }
    }

    if LEGACY_HEADER_ROW < header_row {
        for (field, col) in LEGACY_HEADER_COLUMNS {
            let cell = grid.cell(LEGACY_HEADER_ROW, col);
            if !found.contains_key(&field) && !cell.is_empty() && match_label(cell).is_none() {
                debug!(?field, "使用旧版固定布局取值");
                found.insert(field, cell.clone());
            }
        }
    }

    let text_of = |field: HeaderField| {
        found
            .get(&field)
            .and_then(|cell| match field {
                HeaderField::Date => clean_header_date(cell),
                _ => cell.as_text(),
            })
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    SheetHeader {
        sheet_name: grid.name().to_string(),
        date: text_of(HeaderField::Date),
        press: text_of(HeaderField::Press),
        operator: text_of(HeaderField::Operator),
        supervisor: text_of(HeaderField::Supervisor),
    }
}

fn value_right_of(grid: &SheetGrid, r: usize, c: usize) -> Option<CellValue> {
    let label = grid.cell(r, c);
    (c + 1..grid.row(r).len())
        .map(|cc| grid.cell(r, cc))
        .skip_while(|cell| *cell == label)
        .find(|cell| !cell.is_empty())
        .filter(|cell| match_label(cell).is_none())
        .cloned()
}

fn value_below(grid: &SheetGrid, r: usize, c: usize, header_row: usize) -> Option<CellValue> {
    let label = grid.cell(r, c);
    (r + 1..header_row)
        .map(|rr| grid.cell(rr, c))
        .skip_while(|cell| *cell == label)
        .find(|cell| !cell.is_empty())
        .filter(|cell| match_label(cell).is_none())
        .cloned()
}
