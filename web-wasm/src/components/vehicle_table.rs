//! 車両テーブルコンポーネント
//!
//! 列ヘッダのクリックでソート、先頭列のチェックボックスで行選択

use leptos::prelude::*;
use vehicle_dashboard_common::{Dashboard, DerivedView, SelectionSet, SortDirection, SortState, VehicleField};

/// 値がないセルの表示
const EMPTY_CELL: &str = "-";

/// ヘッダに付けるソート矢印
fn sort_indicator(sort: Option<SortState>, field: VehicleField) -> &'static str {
    match sort {
        Some(s) if s.field == field => match s.direction {
            SortDirection::Ascending => " ▲",
            SortDirection::Descending => " ▼",
        },
        _ => "",
    }
}

/// 描画用の行（位置・選択状態・セル）
#[derive(Debug, Clone, PartialEq)]
struct RowModel {
    position: usize,
    selected: bool,
    cells: Vec<String>,
}

fn row_models(view: &DerivedView<'_>, selection: &SelectionSet) -> Vec<RowModel> {
    view.records()
        .iter()
        .enumerate()
        .map(|(position, record)| RowModel {
            position,
            selected: selection.is_selected(position),
            cells: VehicleField::ALL
                .iter()
                .map(|f| record.get(*f).unwrap_or(EMPTY_CELL).to_string())
                .collect(),
        })
        .collect()
}

#[component]
pub fn VehicleTable(dashboard: RwSignal<Dashboard>) -> impl IntoView {
    let rows = move || dashboard.with(|d| row_models(&d.view(), d.selection()));
    let all_selected = move || dashboard.with(|d| d.selection().is_all_selected());
    let summary = move || dashboard.with(|d| d.view().summary());

    let header = move |field: VehicleField| {
        view! {
            <th class="sortable" on:click=move |_| dashboard.update(|d| d.sort_by(field))>
                {field.label()}
                {move || sort_indicator(dashboard.with(|d| d.query().sort), field)}
            </th>
        }
    };

    view! {
        <div class="table-container">
            <p class="summary">{summary}</p>
            <table class="vehicle-table">
                <thead>
                    <tr>
                        <th>
                            <input
                                type="checkbox"
                                prop:checked=all_selected
                                on:change=move |_| dashboard.update(|d| d.toggle_all())
                            />
                        </th>
                        {VehicleField::ALL.into_iter().map(header).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = rows();
                        if rows.is_empty() {
                            let colspan = (VehicleField::ALL.len() + 1).to_string();
                            return view! {
                                <tr><td class="empty" colspan=colspan>"No vehicles found"</td></tr>
                            }
                            .into_any();
                        }
                        rows.into_iter()
                            .map(|row| {
                                let position = row.position;
                                view! {
                                    <tr class:selected=row.selected>
                                        <td>
                                            <input
                                                type="checkbox"
                                                prop:checked=row.selected
                                                on:change=move |_| dashboard.update(|d| d.toggle_row(position))
                                            />
                                        </td>
                                        {row.cells.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                                    </tr>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehicle_dashboard_common::{query, Query, VehicleRecord};

    #[test]
    fn test_sort_indicator() {
        let sort = Some(SortState::ascending(VehicleField::Imei));
        assert_eq!(sort_indicator(sort, VehicleField::Imei), " ▲");
        assert_eq!(sort_indicator(sort, VehicleField::Status), "");
        assert_eq!(
            sort_indicator(Some(SortState::descending(VehicleField::Status)), VehicleField::Status),
            " ▼"
        );
        assert_eq!(sort_indicator(None, VehicleField::Status), "");
    }

    #[test]
    fn test_row_models_mark_selection_and_missing() {
        let records = vec![
            VehicleRecord::from_pairs([("Vehicle no", "A1"), ("Imei", "111")]),
            VehicleRecord::from_pairs([("Vehicle no", "A2")]),
        ];
        let view = query::apply(&records, &Query::default());
        let mut selection = SelectionSet::new(view.len());
        selection.toggle(1);

        let rows = row_models(&view, &selection);
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].selected);
        assert!(rows[1].selected);
        assert_eq!(rows[0].cells[1], "111");
        assert_eq!(rows[1].cells[1], EMPTY_CELL);
        assert_eq!(rows[1].cells.len(), VehicleField::ALL.len());
    }
}
