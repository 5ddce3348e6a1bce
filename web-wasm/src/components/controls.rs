//! 検索・プラットフォーム・絞り込み・操作ボタン

use crate::api::vehicles::load_scope;
use crate::export::excel_wasm::export_selected;
use leptos::prelude::*;
use vehicle_dashboard_common::{Dashboard, FilterDimension};

#[component]
pub fn Controls(dashboard: RwSignal<Dashboard>, last_error: RwSignal<Option<String>>) -> impl IntoView {
    let (show_filters, set_show_filters) = signal(false);

    let platform_options = move || dashboard.with(|d| d.platforms().options());
    let current_scope = move || dashboard.with(|d| d.scope().id().to_string());

    let on_platform_change = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        let resolved = dashboard.with_untracked(|d| d.platforms().resolve(&value));
        match resolved {
            Ok(scope) => load_scope(dashboard, last_error, scope),
            Err(e) => last_error.set(Some(e.to_string())),
        }
    };

    let filter_select = move |dimension: FilterDimension| {
        let options = move || dashboard.with(|d| d.filter_options(dimension));
        let current = move || {
            dashboard.with(|d| d.query().filters.get(dimension).unwrap_or_default().to_string())
        };

        view! {
            <div class="form-group">
                <label>{dimension.label()}</label>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    dashboard.update(|d| d.set_filter(dimension, Some(value)));
                }>
                    <option value="" selected=move || current().is_empty()>"All"</option>
                    {move || {
                        let selected = current();
                        options()
                            .into_iter()
                            .map(|option| {
                                let is_selected = option == selected;
                                let value = option.clone();
                                view! { <option value=value selected=is_selected>{option}</option> }
                            })
                            .collect_view()
                    }}
                </select>
            </div>
        }
    };

    view! {
        <div class="controls">
            <div class="controls-row">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search vehicles..."
                    prop:value=move || dashboard.with(|d| d.query().search.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        dashboard.update(|d| d.set_search(&value));
                    }
                />

                <select class="platform-select" on:change=on_platform_change>
                    {move || {
                        let current = current_scope();
                        platform_options()
                            .into_iter()
                            .map(|(scope, label)| {
                                let id = scope.id().to_string();
                                let is_selected = id == current;
                                view! { <option value=id selected=is_selected>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>

                <button class="btn btn-secondary" on:click=move |_| set_show_filters.update(|v| *v = !*v)>
                    {move || if show_filters.get() { "Hide Filters" } else { "Show Filters" }}
                </button>

                <button
                    class="btn btn-primary"
                    on:click=move |_| dashboard.with_untracked(export_selected)
                >
                    "Export"
                </button>

                <button class="btn btn-secondary" on:click=move |_| dashboard.update(|d| d.reset_filters())>
                    "Reset"
                </button>
            </div>

            <Show when=move || show_filters.get()>
                <div class="filters-grid">
                    {FilterDimension::ALL.into_iter().map(filter_select).collect_view()}
                </div>
            </Show>
        </div>
    }
}
