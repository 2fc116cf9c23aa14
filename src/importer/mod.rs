// ==========================================
// 挤压机生产日报分析 - 导入层
// ==========================================
// 职责: 工作簿读取 → 工作表定位 → 表头解码 → 字段映射
// 支持: Excel (.xlsx/.xls)
// ==========================================

pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod header_decoder;
pub mod mapping_loader;
pub mod sheet_grid;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, MappedRow, PressRowMapper};
pub use file_parser::{ExcelParser, FileParser, WorkbookData};
pub use header_decoder::{decode_production_sheet, locate_sheet, DecodedSheet, RawRow};
pub use mapping_loader::load_mapping_table;
pub use sheet_grid::{CellValue, MergedRegion, SheetGrid};
