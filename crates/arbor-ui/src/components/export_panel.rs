//! Outline export panel

use arbor_core::traverse_export;
use leptos::prelude::*;

use crate::components::board::BoardContext;

/// Collapsible view of the board as an indented question/answer outline.
#[component]
pub fn ExportPanel() -> impl IntoView {
    let ctx = expect_context::<BoardContext>();
    let (open, set_open) = signal(false);

    view! {
        <div class="export-panel">
            <button class="btn" on:click=move |_| set_open.update(|open| *open = !*open)>
                {move || if open.get() { "Hide Export" } else { "Export" }}
            </button>
            <Show when=move || open.get()>
                <pre class="export-text">{move || ctx.model.with(traverse_export)}</pre>
            </Show>
        </div>
    }
}
