//! Editable block overlay
//!
//! Cards sit in a DOM layer above the canvas. Each one is anchored at its
//! block's world position and follows the view through the snapshot signal.
//! Typing updates the tree immediately; the store sees the edit when the field
//! is committed.

use arbor_core::render::OverlayPlacement;
use arbor_core::store::IdeaPatch;
use arbor_core::{BlockKind, Direction, Item};
use leptos::prelude::*;

use crate::components::board::BoardContext;

const EXPANSIONS: [(Direction, &str, &str); 4] = [
    (Direction::Up, "expand-up", "\u{2191}"),
    (Direction::Down, "expand-down", "\u{2193}"),
    (Direction::Left, "expand-left", "\u{2190}"),
    (Direction::Right, "expand-right", "\u{2192}"),
];

/// Patch for the current field values. Empty content is stored as none.
#[must_use]
pub fn edit_patch(label: String, content: String) -> IdeaPatch {
    IdeaPatch {
        label,
        content: (!content.trim().is_empty()).then_some(content),
    }
}

#[component]
pub fn BlockCard(item: Item) -> impl IntoView {
    let ctx = expect_context::<BoardContext>();
    let kind = item.kind;
    let id = StoredValue::new(item.id.clone());
    let label = RwSignal::new(item.label.clone());
    let content = RwSignal::new(item.content.clone().unwrap_or_default());

    let anchor = item;
    let style = move || OverlayPlacement::for_item(&ctx.view.get().transform(), &anchor).style();

    let patch = move || edit_patch(label.get_untracked(), content.get_untracked());
    let apply = move || {
        id.with_value(|id| ctx.edit(id, &patch()));
    };
    let commit = move || {
        ctx.persist(id.get_value(), patch());
    };

    let expand_buttons = EXPANSIONS
        .into_iter()
        .map(|(direction, class, glyph)| {
            let on_click = move |_| {
                id.with_value(|id| ctx.expand(id, direction, BlockKind::Leaf));
            };
            view! {
                <button class=format!("expand {class}") title=format!("Add question {direction:?}") on:click=on_click>
                    {glyph}
                </button>
            }
        })
        .collect_view();

    view! {
        <div
            class=format!("block-card {}", kind.to_string().to_lowercase())
            style=style
            aria-label=format!("{kind} block")
        >
            <input
                type="text"
                class="block-label"
                aria-label=format!("{kind} title")
                prop:value=move || label.get()
                on:input=move |ev| {
                    label.set(event_target_value(&ev));
                    apply();
                }
                on:change=move |_| commit()
            />
            <textarea
                class="block-content"
                rows="1"
                aria-label=format!("{kind} content")
                placeholder=kind.content_label()
                prop:value=move || content.get()
                on:input=move |ev| {
                    content.set(event_target_value(&ev));
                    apply();
                }
                on:change=move |_| commit()
            ></textarea>
            {(kind == BlockKind::Branch).then(|| view! { <div class="expanders">{expand_buttons}</div> })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_patch_drops_blank_content() {
        assert_eq!(
            edit_patch("Why?".to_string(), "  ".to_string()),
            IdeaPatch {
                label: "Why?".to_string(),
                content: None,
            }
        );
        assert_eq!(
            edit_patch("Why?".to_string(), "Because".to_string()).content.as_deref(),
            Some("Because")
        );
    }
}
