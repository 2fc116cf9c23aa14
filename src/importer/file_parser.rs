// ==========================================
// 挤压机生产日报分析 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls)
// 输出: 按工作表的单元格网格（已应用合并区域广播）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_grid::{CellValue, MergedRegion, SheetGrid};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

// ==========================================
// WorkbookData - 内存中的工作簿
// ==========================================
#[derive(Debug, Clone)]
pub struct WorkbookData {
    pub sheets: Vec<SheetGrid>,
}

impl WorkbookData {
    pub fn new(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    /// 工作表名列表（保持工作簿顺序）
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为内存工作簿
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(WorkbookData): 全部工作表
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<WorkbookData>;
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<WorkbookData> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        // 合并区域（仅 xlsx 提供）
        let mut merged = load_merged_regions(&mut workbook, &sheet_names)?;

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in &sheet_names {
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| ImportError::ExcelParseError(format!("{}: {}", name, e)))?;
            let regions = merged.remove(name).unwrap_or_default();
            debug!(
                sheet = %name,
                rows = range.height(),
                merged_regions = regions.len(),
                "工作表读取完成"
            );
            sheets.push(
                SheetGrid::new(name.clone(), range_to_rows(&range)).with_merged_regions(&regions),
            );
        }

        Ok(WorkbookData::new(sheets))
    }
}

/// 读取全部工作表的合并区域
fn load_merged_regions(
    workbook: &mut Sheets<std::io::BufReader<std::fs::File>>,
    sheet_names: &[String],
) -> ImportResult<HashMap<String, Vec<MergedRegion>>> {
    let mut merged = HashMap::new();
    if let Sheets::Xlsx(xlsx) = workbook {
        xlsx.load_merged_regions()?;
        for name in sheet_names {
            let regions = xlsx
                .merged_regions_by_sheet(name)
                .into_iter()
                .map(|(_, _, dims)| {
                    MergedRegion::new(
                        (dims.start.0 as usize, dims.start.1 as usize),
                        (dims.end.0 as usize, dims.end.1 as usize),
                    )
                })
                .collect::<Vec<_>>();
            merged.insert(name.clone(), regions);
        }
    } else {
        debug!("非 xlsx 文件，跳过合并区域读取");
    }
    Ok(merged)
}

/// calamine Range → 绝对坐标行列表
///
/// Range 可能不从 (0, 0) 开始，前导空行/空列补 Empty
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (start_row, start_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };

    let mut rows = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(data_row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| CellValue::Date(d.date()))
            .unwrap_or_else(|| CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
