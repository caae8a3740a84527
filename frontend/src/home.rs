use shared::{filter_items, Item};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::api;
use crate::item_row::ItemRow;
use crate::state::{Action, Draft, Editing, Inventory};

#[function_component(Home)]
pub fn home() -> Html {
    let inventory = use_reducer(Inventory::default);
    let health = use_state(|| None::<String>);
    let form = use_state(Draft::default);
    let filter = use_state(String::new);
    let editing = use_state(|| None::<Editing>);

    let refresh = {
        let dispatcher = inventory.dispatcher();
        Callback::from(move |_: ()| {
            let dispatcher = dispatcher.clone();
            dispatcher.dispatch(Action::Loading);
            spawn_local(async move {
                match api::list_items().await {
                    Ok(items) => dispatcher.dispatch(Action::Loaded(items)),
                    Err(e) => {
                        web_sys::console::error_1(&format!("list items failed: {}", e).into());
                        dispatcher.dispatch(Action::LoadFailed(
                            e.message_or("Unable to load items. Check your API base URL."),
                        ));
                    }
                }
            });
        })
    };

    // Initial load and backend health check
    {
        let refresh = refresh.clone();
        let health = health.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            spawn_local(async move {
                match api::check_health().await {
                    Ok(data) => health.set(Some(data.status)),
                    Err(e) => health.set(Some(format!("Error: {}", e))),
                }
            });
        });
    }

    let on_create = {
        let dispatcher = inventory.dispatcher();
        let form = form.clone();
        let refresh = refresh.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = (*form).clone();
            if !draft.has_name() {
                dispatcher.dispatch(Action::Failed("Name is required.".to_string()));
                return;
            }
            dispatcher.dispatch(Action::Saving);

            let dispatcher = dispatcher.clone();
            let form = form.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match api::create_item(&draft.to_payload()).await {
                    Ok(_) => {
                        dispatcher.dispatch(Action::Saved);
                        form.set(Draft::default());
                        refresh.emit(());
                    }
                    Err(e) => dispatcher.dispatch(Action::Failed(
                        e.message_or("Unable to create item. Check your API base URL."),
                    )),
                }
            });
        })
    };

    let on_form_name = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            form.set(Draft {
                name: input.value(),
                ..(*form).clone()
            });
        })
    };

    let on_form_description = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            form.set(Draft {
                description: input.value(),
                ..(*form).clone()
            });
        })
    };

    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter.set(input.value());
        })
    };

    let on_edit = {
        let editing = editing.clone();
        Callback::from(move |item: Item| {
            editing.set(Some(Editing {
                draft: Draft::from(&item),
                id: item.id,
            }));
        })
    };

    let on_draft = {
        let editing = editing.clone();
        Callback::from(move |draft: Draft| {
            if let Some(current) = (*editing).clone() {
                editing.set(Some(Editing { draft, ..current }));
            }
        })
    };

    let on_cancel = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    let on_save = {
        let dispatcher = inventory.dispatcher();
        let editing = editing.clone();
        Callback::from(move |id: String| {
            let Some(current) = (*editing).clone().filter(|e| e.id == id) else {
                return;
            };
            if !current.draft.has_name() {
                dispatcher.dispatch(Action::Failed("Name is required.".to_string()));
                return;
            }
            dispatcher.dispatch(Action::Saving);

            let dispatcher = dispatcher.clone();
            let editing = editing.clone();
            spawn_local(async move {
                match api::update_item(&id, &current.draft.to_payload()).await {
                    Ok(updated) => {
                        dispatcher.dispatch(Action::Updated(updated));
                        editing.set(None);
                    }
                    Err(e) => dispatcher.dispatch(Action::Failed(
                        e.message_or("Unable to update item. Check your API base URL."),
                    )),
                }
            });
        })
    };

    let on_delete = {
        let dispatcher = inventory.dispatcher();
        Callback::from(move |id: String| {
            dispatcher.dispatch(Action::Saving);
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                match api::delete_item(&id).await {
                    Ok(()) => dispatcher.dispatch(Action::Removed(id)),
                    Err(e) => dispatcher.dispatch(Action::Failed(
                        e.message_or("Unable to delete item. Check your API base URL."),
                    )),
                }
            });
        })
    };

    let visible = filter_items(&inventory.items, &filter);
    let api_base = api::api_base();
    let subtitle = if api_base.is_empty() {
        "Talking to the API on this origin".to_string()
    } else {
        format!("Connected to {}", api_base)
    };
    let on_refresh = refresh.reform(|_: MouseEvent| ());

    let list = if inventory.loading {
        html! { <div class="empty">{ "Loading items..." }</div> }
    } else if visible.is_empty() {
        html! {
            <div class="empty">
                <p>{ "No items yet." }</p>
                <p class="muted">{ "Create your first record to see it appear here." }</p>
            </div>
        }
    } else {
        html! {
            <ul class="item-list">
                { for visible.iter().map(|item| {
                    let draft = (*editing)
                        .as_ref()
                        .filter(|e| e.id == item.id)
                        .map(|e| e.draft.clone());
                    html! {
                        <ItemRow
                            key={item.id.clone()}
                            item={(*item).clone()}
                            {draft}
                            saving={inventory.saving}
                            on_edit={on_edit.clone()}
                            on_draft={on_draft.clone()}
                            on_save={on_save.clone()}
                            on_cancel={on_cancel.clone()}
                            on_delete={on_delete.clone()}
                        />
                    }
                }) }
            </ul>
        }
    };

    html! {
        <div class="page">
            <header class="hero">
                <div>
                    <p class="eyebrow">{ "CRUD" }</p>
                    <h1>{ "Items" }</h1>
                    <p class="subtitle">{ subtitle }</p>
                    <div class="hero-actions">
                        <button class="cta" onclick={on_refresh.clone()} disabled={inventory.loading}>
                            { "Refresh items" }
                        </button>
                        <div class="meta">
                            <span class="dot" />
                            { format!("{} items tracked", visible.len()) }
                        </div>
                    </div>
                </div>
                <div class="hero-card">
                    <div><span>{ "API base" }</span>
                        <strong>{ if api_base.is_empty() { "Same origin" } else { api_base } }</strong>
                    </div>
                    <div><span>{ "Backend" }</span>
                        <strong>{ (*health).clone().unwrap_or_else(|| "Checking...".to_string()) }</strong>
                    </div>
                    <div><span>{ "Status" }</span>
                        <strong>{ if inventory.loading { "Loading..." } else { "Live" } }</strong>
                    </div>
                </div>
            </header>

            <section class="panel-grid">
                <div class="panel">
                    <div class="panel-header">
                        <div>
                            <p class="eyebrow">{ "Create" }</p>
                            <h2>{ "Add a new item" }</h2>
                        </div>
                        <span class="helper">{ "POST /items" }</span>
                    </div>
                    <form class="form" onsubmit={on_create}>
                        <label>
                            { "Name" }
                            <input
                                type="text"
                                placeholder="e.g. Launch checklist"
                                value={form.name.clone()}
                                oninput={on_form_name}
                                required=true
                            />
                        </label>
                        <label>
                            { "Description" }
                            <textarea
                                rows="3"
                                placeholder="Why this item matters..."
                                value={form.description.clone()}
                                oninput={on_form_description}
                            />
                        </label>
                        <button type="submit" class="cta" disabled={inventory.saving}>
                            { if inventory.saving { "Saving..." } else { "Create item" } }
                        </button>
                    </form>
                </div>

                <div class="panel">
                    <div class="panel-header">
                        <div>
                            <p class="eyebrow">{ "Inventory" }</p>
                            <h2>{ "Items dashboard" }</h2>
                        </div>
                        <div class="filters">
                            <input
                                type="search"
                                placeholder="Filter items..."
                                value={(*filter).clone()}
                                oninput={on_filter}
                            />
                            <button class="ghost" onclick={on_refresh} disabled={inventory.loading}>
                                { "↻" }
                            </button>
                        </div>
                    </div>
                    if let Some(error) = inventory.error.clone() {
                        <div class="alert">{ error }</div>
                    }
                    { list }
                </div>
            </section>
        </div>
    }
}
