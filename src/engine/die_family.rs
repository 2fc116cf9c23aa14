// ==========================================
// 挤压机生产日报分析 - 模具族识别引擎
// ==========================================
// 职责: 模具名原文 → 标准模具族
// 红线: 规则按声明顺序匹配，第一条命中即返回；
//       包含关系的编码必须长的在前（MINI DUMAL 在 DUMAL 之前）
// ==========================================

use crate::domain::production::UNCLASSIFIED_FAMILY;
use crate::importer::data_cleaner::normalize_text;

// ==========================================
// FamilyPattern - 匹配模式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyPattern {
    /// 子串，两侧为非字母数字字符或字符串边界
    Token(&'static str),
    /// 缩写编码，仅要求左侧为非字母数字字符或字符串起点
    /// （"R.T75x12"、"AL R.T 75" 均命中）
    Abbrev(&'static str),
}

impl FamilyPattern {
    /// 在已标准化的模具名上匹配
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            FamilyPattern::Token(token) => contains_token(normalized, token),
            FamilyPattern::Abbrev(abbrev) => contains_abbrev(normalized, abbrev),
        }
    }
}

fn is_boundary(c: Option<char>) -> bool {
    c.map_or(true, |c| !c.is_alphanumeric())
}

fn contains_token(text: &str, token: &str) -> bool {
    text.match_indices(token).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        is_boundary(before) && is_boundary(after)
    })
}

fn contains_abbrev(text: &str, abbrev: &str) -> bool {
    text.match_indices(abbrev)
        .any(|(start, _)| is_boundary(text[..start].chars().next_back()))
}

const DUMAL: &str = "Dumal / Dumal 2 Track / Dumal 3 Track / Dumal 4 Track";
const ANGLE: &str = "Equal Angle / Unequal Angle";
const MM_52_42: &str = "52 MM / 42 MM";

/// 模具族规则表（声明顺序即优先级）
pub const DIE_FAMILY_RULES: &[(FamilyPattern, &str)] = &[
    // 含其他编码的长编码
    (FamilyPattern::Token("40 MM OUTER CLIP MULLION"), "40 MM Outer Clip Mullion"),
    (FamilyPattern::Token("MINI DUMAL"), "Mini Dumal"),
    (FamilyPattern::Token("DUMAL SHUTTER"), "Dumal Shutter"),
    (FamilyPattern::Token("DUMAL 2 TRACK"), DUMAL),
    (FamilyPattern::Token("DUMAL 3 TRACK"), DUMAL),
    (FamilyPattern::Token("DUMAL 4 TRACK"), DUMAL),
    (FamilyPattern::Token("DUMAL"), DUMAL),
    // 窗型
    (FamilyPattern::Token("GLASS MEETING"), "Glass Meeting"),
    (FamilyPattern::Token("BEARING BOTTOM"), "Bearing Bottom"),
    (FamilyPattern::Token("FOUR TRACK TOP"), "Four Track Top"),
    (FamilyPattern::Token("FOUR TRACK BOTTOM"), "Four Track Bottom"),
    (FamilyPattern::Token("CURTAIN WALL"), "Curtain Wall"),
    (FamilyPattern::Token("THREE TRACK TOP"), "Three Track Top"),
    (FamilyPattern::Token("THREE TRACK BOTTOM"), "Three Track Bottom"),
    (FamilyPattern::Token("TWO TRACK TOP"), "Two Track Top"),
    (FamilyPattern::Token("TWO TRACK BOTTOM"), "Two Track Bottom"),
    (FamilyPattern::Token("SINGLE TRACK TOP"), "Single Track Top"),
    (FamilyPattern::Token("SINGLE TRACK BOTTOM"), "Single Track Bottom"),
    (FamilyPattern::Token("HANDLE"), "Handle"),
    (FamilyPattern::Token("INTERLOCK"), "Interlock"),
    (FamilyPattern::Token("TOP BOTTOM"), "Top Bottom"),
    // 型材
    (FamilyPattern::Token("UNEQUAL ANGLE"), ANGLE),
    (FamilyPattern::Token("EQUAL ANGLE"), ANGLE),
    (FamilyPattern::Token("RECTANGULAR TUBE"), "Rectangular Tube"),
    (FamilyPattern::Abbrev("R.T"), "Rectangular Tube"),
    (FamilyPattern::Token("SQUARE TUBE"), "Square Tube"),
    (FamilyPattern::Abbrev("S.T"), "Square Tube"),
    (FamilyPattern::Token("ROUND TUBE"), "Round Pipe"),
    (FamilyPattern::Token("ROUND PIPE"), "Round Pipe"),
    // 40 mm 系列
    (FamilyPattern::Token("40 MM CLIP"), "40 mm Clip"),
    (FamilyPattern::Token("40 MM OUTER"), "40 mm Outer"),
    (FamilyPattern::Token("40 MM FRAME"), "40 mm Frame"),
    // 尺寸编码最泛，放最后
    (FamilyPattern::Token("52 MM"), MM_52_42),
    (FamilyPattern::Token("42 MM"), MM_52_42),
];

// ==========================================
// DieFamilyClassifier - 模具族识别
// ==========================================
pub struct DieFamilyClassifier {
    rules: &'static [(FamilyPattern, &'static str)],
}

impl Default for DieFamilyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DieFamilyClassifier {
    pub fn new() -> Self {
        Self {
            rules: DIE_FAMILY_RULES,
        }
    }

    /// 识别模具族
    ///
    /// # 返回
    /// - 第一条命中规则的模具族；无命中（含空名）→ "Unclassified"
    pub fn classify(&self, die_name: &str) -> &'static str {
        let normalized = normalize_text(die_name);
        if normalized.is_empty() {
            return UNCLASSIFIED_FAMILY;
        }
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(&normalized))
            .map(|(_, family)| *family)
            .unwrap_or(UNCLASSIFIED_FAMILY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_abbreviations_and_names() {
        let classifier = DieFamilyClassifier::new();
        assert_eq!(classifier.classify("R.T 75x12x1.7 mm"), "Rectangular Tube");
        assert_eq!(classifier.classify("s.t 40x40"), "Square Tube");
        assert_eq!(classifier.classify("Round Tube 25 mm"), "Round Pipe");
        assert_eq!(classifier.classify("  handle   2in "), "Handle");
        assert_eq!(classifier.classify("Unequal Angle 40x20"), ANGLE);
    }

    #[test]
    fn test_most_specific_code_wins() {
        let classifier = DieFamilyClassifier::new();
        assert_eq!(classifier.classify("Mini Dumal 3in"), "Mini Dumal");
        assert_eq!(classifier.classify("DUMAL SHUTTER 60"), "Dumal Shutter");
        assert_eq!(classifier.classify("Dumal 3 Track"), DUMAL);
        assert_eq!(classifier.classify("dumal"), DUMAL);
        assert_eq!(
            classifier.classify("40 mm Outer Clip Mullion"),
            "40 MM Outer Clip Mullion"
        );
        assert_eq!(classifier.classify("40 mm Outer"), "40 mm Outer");
        assert_eq!(classifier.classify("Four Track Top 42 mm"), "Four Track Top");
    }

    #[test]
    fn test_abbreviation_matches_mid_name() {
        let classifier = DieFamilyClassifier::new();
        assert_eq!(classifier.classify("AL R.T 75x12"), "Rectangular Tube");
        assert_eq!(classifier.classify("R.T75x12"), "Rectangular Tube");
        assert_eq!(classifier.classify("6063 (S.T) 25x25"), "Square Tube");
    }

    #[test]
    fn test_token_requires_boundaries() {
        // 缩写左侧须为边界，"GLASS.T" 不应命中
        assert!(!FamilyPattern::Abbrev("S.T").matches("GLASS.T 10"));
        assert!(FamilyPattern::Token("HANDLE").matches("D-HANDLE/2"));
        // 整词匹配：复数形式不归入 Handle
        assert!(!FamilyPattern::Token("HANDLE").matches("HANDLES"));
        assert_eq!(DieFamilyClassifier::new().classify("Handles 2in"), UNCLASSIFIED_FAMILY);
        assert!(!FamilyPattern::Token("52 MM").matches("152 MM"));
    }

    #[test]
    fn test_unclassified_and_deterministic() {
        let classifier = DieFamilyClassifier::new();
        assert_eq!(classifier.classify(""), UNCLASSIFIED_FAMILY);
        assert_eq!(classifier.classify("Custom Profile X"), UNCLASSIFIED_FAMILY);
        let first = classifier.classify("Two Track Bottom");
        for _ in 0..3 {
            assert_eq!(classifier.classify("Two Track Bottom"), first);
        }
    }
}
