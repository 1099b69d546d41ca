//! Root application component

use arbor_core::store::ProjectScope;
use arbor_core::{AppConfig, Board, ViewSnapshot};
use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use tracing::error;

use crate::components::{BoardContext, CanvasBoard, ExportPanel, Stage, Toolbar, ZoomIndicator};
use crate::state::init_store;

/// Builds the board session from `config`, provides the [`BoardContext`] and
/// starts loading the project's ideas.
#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let view_state = RwSignal::new(ViewSnapshot::default());
    let child_spacing = config.viewport.child_spacing;

    let stage = match Stage::new(config.viewport, view_state) {
        Ok(stage) => stage,
        Err(err) => {
            error!(error = %err, "Canvas unavailable");
            return view! {
                <p class="arbor-error">{format!("Canvas unavailable: {err}")}</p>
            }
            .into_any();
        }
    };

    let scope = ProjectScope::new(config.owner_id, config.project_id);
    let session = Board::new(init_store(&config.store), scope);
    let ctx = BoardContext::new(stage, session, view_state, child_spacing);
    provide_context(ctx);
    ctx.load();

    view! {
        <div class="arbor-app">
            <Toolbar />
            <CanvasBoard />
            <ZoomIndicator />
            <ExportPanel />
        </div>
    }
    .into_any()
}
