use shared::{Item, ItemPayload};
use std::rc::Rc;
use yew::prelude::*;

/// List, busy flags and the error banner, updated only through [`Action`]s
/// so async completions never work from a stale snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub items: Vec<Item>,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            saving: false,
            error: None,
        }
    }
}

pub enum Action {
    Loading,
    Loaded(Vec<Item>),
    LoadFailed(String),
    Saving,
    Saved,
    Updated(Item),
    Removed(String),
    Failed(String),
}

impl Reducible for Inventory {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            Action::Loading => {
                next.loading = true;
                next.error = None;
            }
            Action::Loaded(items) => {
                next.loading = false;
                next.items = items;
            }
            Action::LoadFailed(message) => {
                next.loading = false;
                next.error = Some(message);
            }
            Action::Saving => {
                next.saving = true;
                next.error = None;
            }
            Action::Saved => next.saving = false,
            Action::Updated(item) => {
                next.saving = false;
                if let Some(slot) = next.items.iter_mut().find(|i| i.id == item.id) {
                    *slot = item;
                }
            }
            Action::Removed(id) => {
                next.saving = false;
                next.items.retain(|i| i.id != id);
            }
            Action::Failed(message) => {
                next.saving = false;
                next.error = Some(message);
            }
        }
        Rc::new(next)
    }
}

/// Text of the create form or of an item being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub description: String,
}

impl Draft {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Trimmed payload; a blank description is left out.
    pub fn to_payload(&self) -> ItemPayload {
        let description = self.description.trim();
        ItemPayload {
            name: Some(self.name.trim().to_string()),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

impl From<&Item> for Draft {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

/// Item id plus its in-progress edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Editing {
    pub id: String,
    pub draft: Draft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Item;

    fn item(id: &str, name: &str) -> Item {
        let now = "2024-05-01T10:00:00Z".parse().unwrap();
        Item {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn reduce(state: Inventory, action: Action) -> Inventory {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn starts_loading() {
        let state = Inventory::default();
        assert!(state.loading);
        assert!(!state.saving);
    }

    #[test]
    fn updated_replaces_only_that_item() {
        let state = reduce(
            Inventory::default(),
            Action::Loaded(vec![item("a", "Apple"), item("b", "Banana")]),
        );
        let state = reduce(state, Action::Saving);
        assert!(state.saving);

        let state = reduce(state, Action::Updated(item("b", "Blueberry")));
        assert!(!state.saving);
        let names: Vec<&str> = state.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Blueberry"]);
    }

    #[test]
    fn removed_drops_item() {
        let state = reduce(
            Inventory::default(),
            Action::Loaded(vec![item("a", "Apple"), item("b", "Banana")]),
        );
        let state = reduce(state, Action::Removed("a".to_string()));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, "b");
    }

    #[test]
    fn next_action_clears_error() {
        let state = reduce(Inventory::default(), Action::LoadFailed("down".to_string()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("down"));

        let state = reduce(state, Action::Saving);
        assert_eq!(state.error, None);

        let state = reduce(state, Action::Failed("nope".to_string()));
        assert!(!state.saving);
        assert_eq!(state.error.as_deref(), Some("nope"));
    }

    #[test]
    fn draft_payload_trims_and_drops_blank_description() {
        let draft = Draft {
            name: "  Lamp ".to_string(),
            description: "   ".to_string(),
        };
        assert!(draft.has_name());
        let payload = draft.to_payload();
        assert_eq!(payload.name.as_deref(), Some("Lamp"));
        assert_eq!(payload.description, None);

        assert!(!Draft::default().has_name());
    }
}
