// ==========================================
// 平衡市场容量中标导入 - 列别名表
// ==========================================
// 职责: 规范字段 → 有序候选源列名（含德语名/历史名）
// 规则: 按顺序探测，批次中第一个存在的列名胜出；同一行内不跨别名合并
// 扩展: 新别名只需追加到表中，不改逻辑
// ==========================================

use std::fmt;

/// 需要从源列解析的规范字段（source_file 来自批次标记，不在此列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    DeliveryDate,
    Product,
    Direction,
    AwardedCapacityMw,
}

impl CanonicalField {
    pub fn column_name(&self) -> &'static str {
        match self {
            CanonicalField::DeliveryDate => "delivery_date",
            CanonicalField::Product => "product",
            CanonicalField::Direction => "direction",
            CanonicalField::AwardedCapacityMw => "awarded_capacity_mw",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// 默认别名表（候选名均为标准化后的表头形式）
pub const DEFAULT_ALIASES: [(CanonicalField, &[&str]); 4] = [
    (CanonicalField::DeliveryDate, &["delivery_date", "liefertag"]),
    (CanonicalField::Product, &["product", "produkt"]),
    (CanonicalField::Direction, &["direction", "richtung"]),
    (
        CanonicalField::AwardedCapacityMw,
        &[
            "awarded_capacity_mw",
            "zuschlagsmenge_mw",
            "zuschlagskapazität_mw",
            "zuschlagskapazität_positiv_mw",
            "zuschlagskapazität_negativ_mw",
        ],
    ),
];

/// 一次解析结果: 命中的列下标与列名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ALIASES
                .iter()
                .map(|(field, names)| (*field, names.iter().map(|n| n.to_string()).collect()))
                .collect(),
        }
    }
}

impl AliasTable {
    /// 追加别名（追加在已有候选之后，优先级最低）
    pub fn with_alias(mut self, field: CanonicalField, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, names)) => names.push(alias),
            None => self.entries.push((field, vec![alias])),
        }
        self
    }

    /// 某字段的有序候选列名
    pub fn candidates(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, names)| names.as_slice())
            .unwrap_or(&[])
    }

    /// 在批次列集合中解析字段
    pub fn resolve(&self, field: CanonicalField, columns: &[String]) -> Option<ResolvedColumn> {
        self.candidates(field).iter().find_map(|candidate| {
            columns
                .iter()
                .position(|c| c == candidate)
                .map(|index| ResolvedColumn {
                    index,
                    name: candidate.clone(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_resolve_canonical_name_first() {
        let table = AliasTable::default();
        let cols = columns(&["liefertag", "delivery_date"]);
        let resolved = table.resolve(CanonicalField::DeliveryDate, &cols).unwrap();
        assert_eq!(resolved.name, "delivery_date");
        assert_eq!(resolved.index, 1);
    }

    #[test]
    fn test_resolve_legacy_alias() {
        let table = AliasTable::default();
        let cols = columns(&["produkt", "zuschlagskapazität_negativ_mw", "zuschlagsmenge_mw"]);
        assert_eq!(
            table.resolve(CanonicalField::Product, &cols).unwrap().name,
            "produkt"
        );
        // 候选顺序优先于列顺序
        assert_eq!(
            table
                .resolve(CanonicalField::AwardedCapacityMw, &cols)
                .unwrap()
                .name,
            "zuschlagsmenge_mw"
        );
    }

    #[test]
    fn test_resolve_missing() {
        let table = AliasTable::default();
        let cols = columns(&["foo"]);
        assert!(table.resolve(CanonicalField::Direction, &cols).is_none());
    }

    #[test]
    fn test_with_alias_appends_lowest_priority() {
        let table = AliasTable::default().with_alias(CanonicalField::Direction, "dir");
        assert_eq!(table.candidates(CanonicalField::Direction).last().unwrap(), "dir");
        let cols = columns(&["dir"]);
        assert!(table.resolve(CanonicalField::Direction, &cols).is_some());
    }
}
