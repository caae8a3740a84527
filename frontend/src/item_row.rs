use shared::Item;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::state::Draft;

#[derive(Properties, PartialEq)]
pub struct ItemRowProps {
    pub item: Item,
    /// `Some` while this row is in edit mode.
    pub draft: Option<Draft>,
    pub saving: bool,
    pub on_edit: Callback<Item>,
    pub on_draft: Callback<Draft>,
    pub on_save: Callback<String>,
    pub on_cancel: Callback<()>,
    pub on_delete: Callback<String>,
}

#[function_component(ItemRow)]
pub fn item_row(props: &ItemRowProps) -> Html {
    let item = &props.item;
    let updated = item.updated_at.format("%Y-%m-%d %H:%M UTC").to_string();

    let body = match &props.draft {
        Some(draft) => {
            let on_name = {
                let draft = draft.clone();
                let on_draft = props.on_draft.clone();
                Callback::from(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_draft.emit(Draft {
                        name: input.value(),
                        ..draft.clone()
                    });
                })
            };
            let on_description = {
                let draft = draft.clone();
                let on_draft = props.on_draft.clone();
                Callback::from(move |e: InputEvent| {
                    let input: HtmlTextAreaElement = e.target_unchecked_into();
                    on_draft.emit(Draft {
                        description: input.value(),
                        ..draft.clone()
                    });
                })
            };
            html! {
                <div class="edit-fields">
                    <input type="text" value={draft.name.clone()} oninput={on_name} />
                    <textarea rows="2" value={draft.description.clone()} oninput={on_description} />
                </div>
            }
        }
        None => html! {
            <>
                <div class="item-title">{ &item.name }</div>
                if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                    <p class="muted">{ description }</p>
                }
            </>
        },
    };

    let actions = if props.draft.is_some() {
        let on_save = {
            let id = item.id.clone();
            let on_save = props.on_save.clone();
            Callback::from(move |_: MouseEvent| on_save.emit(id.clone()))
        };
        let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());
        html! {
            <>
                <button type="button" class="cta small" onclick={on_save} disabled={props.saving}>
                    { "Save" }
                </button>
                <button type="button" class="ghost small" onclick={on_cancel}>{ "Cancel" }</button>
            </>
        }
    } else {
        let on_edit = {
            let item = item.clone();
            let on_edit = props.on_edit.clone();
            Callback::from(move |_: MouseEvent| on_edit.emit(item.clone()))
        };
        let on_delete = {
            let id = item.id.clone();
            let on_delete = props.on_delete.clone();
            Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
        };
        html! {
            <>
                <button type="button" class="ghost small" onclick={on_edit}>{ "Edit" }</button>
                <button type="button" class="danger small" onclick={on_delete} disabled={props.saving}>
                    { "Delete" }
                </button>
            </>
        }
    };

    html! {
        <li class="item">
            <div class="item-main">
                { body }
                <div class="meta">
                    <span class="dot" />
                    { format!("Updated {}", updated) }
                </div>
            </div>
            <div class="item-actions">{ actions }</div>
        </li>
    }
}
