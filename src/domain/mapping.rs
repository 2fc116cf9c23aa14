// ==========================================
// 挤压机生产日报分析 - 备注 → 部门映射表
// ==========================================
// 生命周期: 每次分析从映射工作表构建一次，构建后只读
// ==========================================

use crate::importer::data_cleaner::normalize_text;
use serde::{Deserialize, Serialize};

// ==========================================
// MappingEntry - 单条映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub keyword: String,    // 已标准化的备注关键字
    pub department: String, // 部门名称
}

// ==========================================
// MappingTable - 映射表（保持映射工作表顺序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加映射
    ///
    /// # 返回
    /// - true: 已添加
    /// - false: 关键字为空或已存在（保留第一条）
    pub fn insert(&mut self, keyword: &str, department: &str) -> bool {
        let keyword = normalize_text(keyword);
        if keyword.is_empty() || self.entries.iter().any(|e| e.keyword == keyword) {
            return false;
        }
        self.entries.push(MappingEntry {
            keyword,
            department: department.trim().to_string(),
        });
        true
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = MappingTable::new();
        for (keyword, department) in iter {
            table.insert(keyword, department);
        }
        table
    }
}
