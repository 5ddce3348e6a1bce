//! 検索・フィルタ・ソートのパイプライン
//!
//! (レコード, 検索語, フィルタ, ソート) から表示用ビューを導出する純粋関数群。
//! 段の順序は 検索 → フィルタ → ソート で固定。

use crate::types::{VehicleField, VehicleRecord};
use std::cmp::Ordering;

/// フィルタの軸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Status,
    Project,
    Company,
    VehicleType,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Status,
        FilterDimension::Project,
        FilterDimension::Company,
        FilterDimension::VehicleType,
    ];

    /// 比較対象のフィールド
    pub fn field(&self) -> VehicleField {
        match self {
            FilterDimension::Status => VehicleField::Status,
            FilterDimension::Project => VehicleField::Project,
            FilterDimension::Company => VehicleField::Company,
            FilterDimension::VehicleType => VehicleField::VehicleName,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::Status => "Status",
            FilterDimension::Project => "Project",
            FilterDimension::Company => "Company",
            FilterDimension::VehicleType => "Vehicle Type",
        }
    }
}

/// フィルタ状態。空文字は「制約なし」
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub status: Option<String>,
    pub project: Option<String>,
    pub company: Option<String>,
    pub vehicle_type: Option<String>,
}

impl FilterState {
    pub fn get(&self, dimension: FilterDimension) -> Option<&str> {
        let value = match dimension {
            FilterDimension::Status => &self.status,
            FilterDimension::Project => &self.project,
            FilterDimension::Company => &self.company,
            FilterDimension::VehicleType => &self.vehicle_type,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, dimension: FilterDimension, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match dimension {
            FilterDimension::Status => self.status = value,
            FilterDimension::Project => self.project = value,
            FilterDimension::Company => self.company = value,
            FilterDimension::VehicleType => self.vehicle_type = value,
        }
    }

    /// 有効な制約 (軸, 値)
    pub fn active(&self) -> Vec<(FilterDimension, &str)> {
        FilterDimension::ALL
            .iter()
            .filter_map(|d| self.get(*d).map(|v| (*d, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// ソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown direction: {}. Use asc or desc", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// ソート状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: VehicleField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(field: VehicleField) -> Self {
        Self { field, direction: SortDirection::Ascending }
    }

    pub fn descending(field: VehicleField) -> Self {
        Self { field, direction: SortDirection::Descending }
    }
}

/// 列ヘッダクリック時の次のソート状態
///
/// 同じ列が昇順なら降順、それ以外はその列の昇順。
pub fn next_sort(current: Option<SortState>, field: VehicleField) -> SortState {
    match current {
        Some(s) if s.field == field && s.direction == SortDirection::Ascending => {
            SortState::descending(field)
        }
        _ => SortState::ascending(field),
    }
}

/// パイプラインの入力（レコード以外）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub filters: FilterState,
    pub sort: Option<SortState>,
}

/// 導出ビュー
#[derive(Debug, Clone)]
pub struct DerivedView<'a> {
    records: Vec<&'a VehicleRecord>,
    total: usize,
}

impl<'a> DerivedView<'a> {
    pub fn records(&self) -> &[&'a VehicleRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&'a VehicleRecord> {
        self.records.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// フィルタ前の件数
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} vehicles", self.len(), self.total)
    }

    pub fn into_records(self) -> Vec<&'a VehicleRecord> {
        self.records
    }
}

/// パイプラインを適用してビューを返す
///
/// # Arguments
/// * `records` - フィルタ前の全レコード
/// * `query` - 検索語・フィルタ・ソート
///
/// # Returns
/// 導出ビュー（同じ入力なら常に同じ順序・内容）
pub fn apply<'a>(records: &'a [VehicleRecord], query: &Query) -> DerivedView<'a> {
    let view = derive_indices(records, query)
        .into_iter()
        .map(|i| &records[i])
        .collect();
    DerivedView { records: view, total: records.len() }
}

/// パイプラインを適用し、元スライス上の位置で返す
pub fn derive_indices(records: &[VehicleRecord], query: &Query) -> Vec<usize> {
    let needle = query.search.to_lowercase();
    let active = query.filters.active();

    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_search(r, &needle))
        .filter(|(_, r)| active.iter().all(|(d, v)| matches_filter(r, *d, v)))
        .map(|(i, _)| i)
        .collect();

    if let Some(sort) = query.sort {
        // sort_by は安定ソート
        indices.sort_by(|&a, &b| compare_records(&records[a], &records[b], sort));
    }

    indices
}

/// 検索: いずれかの値（空白除去・小文字化）が検索語を含む
///
/// 検索語側の空白は除去しない。空の検索語は全件一致。
pub fn matches_search(record: &VehicleRecord, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    record.values().any(|value| {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        compact.to_lowercase().contains(needle_lower)
    })
}

/// フィルタ: 対象フィールドが大文字小文字を無視して一致。欠落は不一致
pub fn matches_filter(record: &VehicleRecord, dimension: FilterDimension, value: &str) -> bool {
    record
        .get(dimension.field())
        .map(|v| v.to_lowercase() == value.to_lowercase())
        .unwrap_or(false)
}

/// ソート比較
///
/// 値同士は大文字小文字を区別するバイト順。フィールド欠落のレコードは
/// 方向に関係なく末尾に寄せる。
pub fn compare_records(a: &VehicleRecord, b: &VehicleRecord, sort: SortState) -> Ordering {
    match (a.get(sort.field), b.get(sort.field)) {
        (Some(x), Some(y)) => match sort.direction {
            SortDirection::Ascending => x.cmp(y),
            SortDirection::Descending => y.cmp(x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// フィルタ前レコードから軸ごとの選択肢を集める（初出順・重複なし）
pub fn filter_options(records: &[VehicleRecord], dimension: FilterDimension) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for value in records.iter().filter_map(|r| r.get(dimension.field())) {
        if !options.iter().any(|o| o == value) {
            options.push(value.to_string());
        }
    }
    options
}
