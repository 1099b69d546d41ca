//! Board toolbar and zoom indicator

use arbor_core::BlockKind;
use arbor_core::render::zoom_label;
use leptos::prelude::*;

use crate::components::board::BoardContext;

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = expect_context::<BoardContext>();

    view! {
        <div class="toolbar">
            <button class="btn" on:click=move |_| ctx.add_block(BlockKind::Branch)>
                "Add Branch"
            </button>
            <button class="btn" on:click=move |_| ctx.add_block(BlockKind::Leaf)>
                "Add Leaf"
            </button>
            <button
                class="btn"
                title="Center view and reset zoom"
                on:click=move |_| ctx.with_stage(|stage| stage.center())
            >
                "Center View"
            </button>
        </div>
    }
}

#[component]
pub fn ZoomIndicator() -> impl IntoView {
    let ctx = expect_context::<BoardContext>();

    view! { <div class="zoom-indicator">{move || zoom_label(ctx.view.get().scale)}</div> }
}
