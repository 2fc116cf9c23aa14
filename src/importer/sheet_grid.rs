// ==========================================
// 挤压机生产日报分析 - 工作表网格
// ==========================================
// 职责: 承载单个工作表的单元格（绝对行列坐标）
// 红线: 合并单元格广播只在此处处理
//       下游组件只看到扁平、已填充的行
// ==========================================

use chrono::NaiveDate;
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// 空值判定（空白文本也视为空）
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 文本形式（已 TRIM），空值返回 None
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// 数值展示：整数不带 ".0"
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ==========================================
// MergedRegion - 合并区域（闭区间，绝对坐标）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedRegion {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl MergedRegion {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self { start, end }
    }
}

// ==========================================
// SheetGrid - 工作表网格
// ==========================================
#[derive(Debug, Clone)]
pub struct SheetGrid {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// 应用合并区域：锚点值广播到区域内所有单元格
    ///
    /// # 说明
    /// - 锚点为左上角单元格
    /// - 锚点为空的区域不做处理
    /// - 区域超出当前网格时自动扩展
    pub fn with_merged_regions(mut self, regions: &[MergedRegion]) -> Self {
        for region in regions {
            let anchor = self.cell(region.start.0, region.start.1).clone();
            if anchor.is_empty() {
                continue;
            }
            for row in region.start.0..=region.end.0 {
                for col in region.start.1..=region.end.1 {
                    self.set_cell(row, col, anchor.clone());
                }
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 最大列宽
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// 读取单元格（越界返回 Empty）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// 整行为空
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.row(row).iter().all(CellValue::is_empty)
    }

    fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }
}
