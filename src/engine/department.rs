// ==========================================
// 挤压机生产日报分析 - 责任部门映射
// ==========================================
// 职责: 备注原文 + 映射表 → 责任部门
// 规则: 精确匹配优先；否则取备注中包含的最长关键字
//       （等长时按映射表顺序）；无命中 → "Unknown"
// ==========================================

use crate::domain::mapping::MappingTable;
use crate::domain::production::UNKNOWN_DEPARTMENT;
use crate::importer::data_cleaner::normalize_text;

/// 映射命中方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentMatch {
    Exact,
    Substring,
    None,
}

pub struct DepartmentMapper<'a> {
    table: &'a MappingTable,
}

impl<'a> DepartmentMapper<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self { table }
    }

    /// 查询部门（不会失败）
    pub fn map(&self, remark: &str) -> &'a str {
        self.lookup(remark).0
    }

    /// 查询部门及命中方式
    pub fn lookup(&self, remark: &str) -> (&'a str, DepartmentMatch) {
        let key = normalize_text(remark);
        if key.is_empty() {
            return (UNKNOWN_DEPARTMENT, DepartmentMatch::None);
        }

        let entries = self.table.entries();
        if let Some(entry) = entries.iter().find(|e| e.keyword == key) {
            return (entry.department.as_str(), DepartmentMatch::Exact);
        }

        // max_by_key 在等长时取最后一个，反向遍历以保留映射表顺序
        entries
            .iter()
            .rev()
            .filter(|e| key.contains(e.keyword.as_str()))
            .max_by_key(|e| e.keyword.len())
            .map(|e| (e.department.as_str(), DepartmentMatch::Substring))
            .unwrap_or((UNKNOWN_DEPARTMENT, DepartmentMatch::None))
    }
}
