//! ローディング表示コンポーネント

use leptos::prelude::*;

#[component]
pub fn LoadingIndicator(label: Signal<String>) -> impl IntoView {
    view! {
        <div class="loading-container">
            <div class="spinner" />
            <p class="loading-text">{move || format!("Loading vehicles... ({})", label.get())}</p>
        </div>
    }
}
