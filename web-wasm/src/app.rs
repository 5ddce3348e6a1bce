//! メインアプリケーションコンポーネント

use crate::api::vehicles::load_scope;
use crate::components::{
    controls::Controls,
    header::Header,
    loading_indicator::LoadingIndicator,
    vehicle_table::VehicleTable,
};
use leptos::prelude::*;
use vehicle_dashboard_common::{Dashboard, PlatformScope, PlatformTable};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let dashboard = RwSignal::new(Dashboard::new(PlatformTable::default()));
    let last_error = RwSignal::new(None::<String>);

    let is_loading = move || dashboard.with(|d| d.is_loading());
    let scope_label = Signal::derive(move || dashboard.with(|d| d.platforms().label(d.scope())));

    // 初回は全プラットフォームを取得
    load_scope(dashboard, last_error, PlatformScope::All);

    view! {
        <div class="container">
            <Header />

            <Controls dashboard=dashboard last_error=last_error />

            <Show when=move || last_error.with(Option::is_some)>
                <p class="error-message">{move || last_error.get().unwrap_or_default()}</p>
            </Show>

            <Show
                when=is_loading
                fallback=move || view! { <VehicleTable dashboard=dashboard /> }
            >
                <LoadingIndicator label=scope_label />
            </Show>
        </div>
    }
}
