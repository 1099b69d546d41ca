//! Board context and canvas component
//!
//! [`BoardContext`] is provided by the app root and carries everything the
//! board's components share: the block tree signal, the view snapshot signal,
//! the imperative [`Stage`] and the store-backed [`Board`] session. The last
//! two are not `Send` and live in local storage.

use std::rc::Rc;

use arbor_core::store::IdeaPatch;
use arbor_core::{Board, BlockId, BlockKind, CanvasModel, Direction, NewBlock, ViewSnapshot};
use leptos::prelude::*;
use tracing::{error, warn};
use wasm_bindgen_futures::spawn_local;

use crate::components::block_card::BlockCard;
use crate::components::controls::{PointerEventData, extract_wheel_data};
use crate::components::stage::Stage;

#[derive(Clone, Copy)]
pub struct BoardContext {
    pub model: RwSignal<CanvasModel>,
    pub view: RwSignal<ViewSnapshot>,
    stage: StoredValue<Rc<Stage>, LocalStorage>,
    session: StoredValue<Board, LocalStorage>,
    child_spacing: f64,
}

impl BoardContext {
    #[must_use]
    pub fn new(
        stage: Rc<Stage>,
        session: Board,
        view: RwSignal<ViewSnapshot>,
        child_spacing: f64,
    ) -> Self {
        Self {
            model: RwSignal::new(CanvasModel::new()),
            view,
            stage: StoredValue::new_local(stage),
            session: StoredValue::new_local(session),
            child_spacing,
        }
    }

    pub fn with_stage<R>(&self, f: impl FnOnce(&Stage) -> R) -> R {
        self.stage.with_value(|stage| f(stage.as_ref()))
    }

    /// Replaces the model with the project's stored ideas, keeping blocks
    /// created while the load was in flight.
    pub fn load(&self) {
        let session = self.session.get_value();
        let model = self.model;
        spawn_local(async move {
            let loaded = session.load().await;
            model.update(|current| *current = loaded.merge_missing(current));
        });
    }

    /// Creates a top-level block at the center of the view.
    pub fn add_block(&self, kind: BlockKind) {
        let position = self.with_stage(Stage::add_item_position);
        self.create(NewBlock::root(kind, position));
    }

    /// Creates a child of `parent`, placed toward `direction`.
    pub fn expand(&self, parent: &BlockId, direction: Direction, kind: BlockKind) {
        let request = self.model.with_untracked(|model| {
            NewBlock::child_of(model, parent, direction, kind, self.child_spacing)
        });
        match request {
            Ok(request) => self.create(request),
            Err(error) => warn!(block_id = %parent, %error, "Expand ignored"),
        }
    }

    fn create(&self, request: NewBlock) {
        let session = self.session.get_value();
        let model = self.model;
        spawn_local(async move {
            let Some(created) = session.create_block(request).await else {
                return;
            };
            model.update(|current| match created.apply(current) {
                Ok(next) => *current = next,
                Err(error) => error!(block_id = %created.block.id, %error, "Created block not added"),
            });
        });
    }

    /// Applies an edit locally. Returns whether the block was found.
    pub fn edit(&self, id: &BlockId, patch: &IdeaPatch) -> bool {
        let next = self
            .model
            .with_untracked(|model| Board::apply_edit(model, id, patch));
        match next {
            Ok(next) => {
                self.model.set(next);
                true
            }
            Err(error) => {
                warn!(block_id = %id, %error, "Edit ignored");
                false
            }
        }
    }

    /// Sends an edit that was already applied to the store.
    pub fn persist(&self, id: BlockId, patch: IdeaPatch) {
        let session = self.session.get_value();
        spawn_local(async move {
            session.persist_edit(id, patch).await;
        });
    }
}

/// The pannable, zoomable canvas with its block overlays.
#[component]
pub fn CanvasBoard() -> impl IntoView {
    let ctx = expect_context::<BoardContext>();
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    Effect::new(move |_| {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        if let Err(error) = ctx.with_stage(|stage| stage.attach(canvas)) {
            error!(%error, "Canvas setup failed");
        }
    });

    let on_wheel = move |ev: leptos::ev::WheelEvent| {
        ev.prevent_default();
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let data = extract_wheel_data(&ev, &canvas);
        ctx.with_stage(|stage| stage.wheel(data));
    };
    let on_pointer_down = move |ev: leptos::ev::PointerEvent| {
        let data = PointerEventData::from_event(&ev);
        ctx.with_stage(|stage| stage.pointer_down(data));
    };
    let on_pointer_move = move |ev: leptos::ev::PointerEvent| {
        let data = PointerEventData::from_event(&ev);
        ctx.with_stage(|stage| stage.pointer_move(data));
    };
    let on_pointer_up = move |ev: leptos::ev::PointerEvent| {
        ctx.with_stage(|stage| stage.pointer_up(ev.pointer_id()));
    };
    let on_pointer_cancel = move |ev: leptos::ev::PointerEvent| {
        ctx.with_stage(|stage| stage.pointer_cancel(ev.pointer_id()));
    };

    view! {
        <div class="board">
            <canvas
                class="board-canvas"
                node_ref=canvas_ref
                style:opacity=move || if ctx.view.get().at_edge { "0.95" } else { "1" }
                on:wheel=on_wheel
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointercancel=on_pointer_cancel
            >
                "Your browser does not support canvas."
            </canvas>
            <div class="block-layer">
                <For
                    each=move || ctx.model.with(CanvasModel::items)
                    key=|item| item.id.clone()
                    children=move |item| view! { <BlockCard item=item /> }
                />
            </div>
        </div>
    }
}
