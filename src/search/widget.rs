//! Selection control and the search panel built on it.
//!
//! [SelectionList] is the capability the panel needs from a multi-select control: a label,
//! the selectable items, per-item rendering with a selected indicator, a clear action and
//! change notification. [MultiSelect] is the provided implementation; front ends render the
//! [SearchView] it produces however they like.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::search::aggregate::SeedIndex;
use crate::search::cache::CachedViews;
use crate::search::catalog::SelectionItem;
use crate::search::results::{result_lines, ResultLine};

pub const DEFAULT_LABEL: &str = "Search for an effect";
pub const DEFAULT_PLACEHOLDER: &str = "Select an effect";

/// Newly selected items, delivered after every accepted change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueChange {
    pub items: Vec<SelectionItem>,
}

pub type ValueChangeListener = Box<dyn FnMut(&ValueChange) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Positioning {
    /// Dropdown matches the trigger's width.
    pub same_width: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub label: String,
    pub value: String,
    /// Whether the selected indicator is shown.
    pub selected: bool,
}

pub trait SelectionList {
    fn label(&self) -> &str;
    fn placeholder(&self) -> &str;
    fn items(&self) -> &[SelectionItem];
    fn selected(&self) -> &[SelectionItem];
    fn is_multiple(&self) -> bool;
    fn positioning(&self) -> Positioning;
    fn is_disabled(&self) -> bool;
    fn set_disabled(&mut self, disabled: bool);

    /// Replace the selectable items. Selected values that no longer exist are dropped.
    fn set_items(&mut self, items: Vec<SelectionItem>) -> Option<ValueChange>;

    /// Select exactly `values`, in the given order. Unknown values are ignored.
    /// Returns the change when the selection actually moved.
    fn set_value(&mut self, values: &[&str]) -> Option<ValueChange>;

    fn toggle(&mut self, value: &str) -> Option<ValueChange>;

    fn clear(&mut self) -> Option<ValueChange> {
        self.set_value(&[])
    }

    fn render_item(&self, item: &SelectionItem) -> ItemView {
        ItemView {
            label: item.label.clone(),
            value: item.value.clone(),
            selected: self.selected().iter().any(|s| s.value == item.value),
        }
    }

    fn on_value_change(&mut self, listener: ValueChangeListener);
}

pub struct MultiSelect {
    label: String,
    placeholder: String,
    items: Vec<SelectionItem>,
    selected: Vec<SelectionItem>,
    multiple: bool,
    positioning: Positioning,
    disabled: bool,
    listeners: Vec<ValueChangeListener>,
}

impl fmt::Debug for MultiSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSelect")
            .field("label", &self.label)
            .field("items", &self.items.len())
            .field("selected", &self.selected)
            .field("multiple", &self.multiple)
            .field("disabled", &self.disabled)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MultiSelect {
    pub fn new(items: Vec<SelectionItem>) -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            items,
            selected: Vec::new(),
            multiple: true,
            positioning: Positioning { same_width: true },
            disabled: false,
            listeners: Vec::new(),
        }
    }

    pub fn single(items: Vec<SelectionItem>) -> Self {
        Self {
            multiple: false,
            ..Self::new(items)
        }
    }

    fn commit(&mut self, next: Vec<SelectionItem>) -> Option<ValueChange> {
        if next == self.selected {
            return None;
        }
        self.selected = next;
        let change = ValueChange {
            items: self.selected.clone(),
        };
        for listener in &mut self.listeners {
            listener(&change);
        }
        Some(change)
    }

    fn find(&self, value: &str) -> Option<&SelectionItem> {
        self.items.iter().find(|item| item.value == value)
    }
}

impl SelectionList for MultiSelect {
    fn label(&self) -> &str {
        &self.label
    }

    fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    fn selected(&self) -> &[SelectionItem] {
        &self.selected
    }

    fn is_multiple(&self) -> bool {
        self.multiple
    }

    fn positioning(&self) -> Positioning {
        self.positioning
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn set_items(&mut self, items: Vec<SelectionItem>) -> Option<ValueChange> {
        self.items = items;
        let kept: Vec<SelectionItem> = self
            .selected
            .iter()
            .filter_map(|s| self.find(&s.value).cloned())
            .collect();
        self.commit(kept)
    }

    fn set_value(&mut self, values: &[&str]) -> Option<ValueChange> {
        if self.disabled {
            return None;
        }
        let mut next: Vec<SelectionItem> = Vec::with_capacity(values.len());
        for value in values {
            if next.iter().any(|s| s.value == *value) {
                continue;
            }
            if let Some(item) = self.find(value) {
                next.push(item.clone());
            }
        }
        if !self.multiple && next.len() > 1 {
            next = next.split_off(next.len() - 1);
        }
        self.commit(next)
    }

    fn toggle(&mut self, value: &str) -> Option<ValueChange> {
        if self.disabled {
            return None;
        }
        let mut next = self.selected.clone();
        if let Some(position) = next.iter().position(|s| s.value == value) {
            next.remove(position);
        } else if let Some(item) = self.find(value) {
            if !self.multiple {
                next.clear();
            }
            next.push(item.clone());
        }
        self.commit(next)
    }

    fn on_value_change(&mut self, listener: ValueChangeListener) {
        self.listeners.push(listener);
    }
}

/// Whether the result panel is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Empty,
    Active(Vec<SelectionItem>),
}

impl SelectionState {
    fn from_items(items: Vec<SelectionItem>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Active(items)
        }
    }

    pub fn items(&self) -> &[SelectionItem] {
        match self {
            Self::Empty => &[],
            Self::Active(items) => items,
        }
    }
}

/// Everything a front end needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub label: String,
    pub placeholder: String,
    pub disabled: bool,
    pub multiple: bool,
    pub positioning: Positioning,
    pub items: Vec<ItemView>,
    pub selected_count: usize,
    /// `None` while nothing is selected: no result panel.
    pub results: Option<Vec<ResultLine>>,
}

#[derive(Debug)]
pub struct SearchPanel<L = MultiSelect> {
    control: L,
    index: Arc<SeedIndex>,
    state: SelectionState,
    loading: bool,
}

impl SearchPanel<MultiSelect> {
    pub fn new(items: Vec<SelectionItem>, index: Arc<SeedIndex>) -> Self {
        Self::with_control(MultiSelect::new(items), index)
    }

    pub fn from_views(views: &CachedViews) -> Self {
        Self::new(views.items.as_ref().clone(), Arc::clone(&views.index))
    }
}

impl<L: SelectionList> SearchPanel<L> {
    pub fn with_control(control: L, index: Arc<SeedIndex>) -> Self {
        let state = SelectionState::from_items(control.selected().to_vec());
        Self {
            loading: control.is_disabled(),
            control,
            index,
            state,
        }
    }

    pub fn control(&self) -> &L {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut L {
        &mut self.control
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Loading disables the selector; the current selection is kept.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.control.set_disabled(loading);
    }

    /// Swap in views rebuilt for a changed catalog.
    pub fn replace_views(&mut self, items: Vec<SelectionItem>, index: Arc<SeedIndex>) {
        self.index = index;
        if let Some(change) = self.control.set_items(items) {
            self.apply(change);
        }
    }

    pub fn select(&mut self, values: &[&str]) -> &SelectionState {
        if let Some(change) = self.control.set_value(values) {
            self.apply(change);
        }
        &self.state
    }

    pub fn toggle(&mut self, value: &str) -> &SelectionState {
        if let Some(change) = self.control.toggle(value) {
            self.apply(change);
        }
        &self.state
    }

    pub fn clear(&mut self) -> &SelectionState {
        if let Some(change) = self.control.clear() {
            self.apply(change);
        }
        &self.state
    }

    fn apply(&mut self, change: ValueChange) {
        self.state = SelectionState::from_items(change.items);
    }

    pub fn results(&self) -> Option<Vec<ResultLine>> {
        match &self.state {
            SelectionState::Empty => None,
            SelectionState::Active(items) => Some(result_lines(items, &self.index)),
        }
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            label: self.control.label().to_string(),
            placeholder: self.control.placeholder().to_string(),
            disabled: self.control.is_disabled(),
            multiple: self.control.is_multiple(),
            positioning: self.control.positioning(),
            items: self
                .control
                .items()
                .iter()
                .map(|item| self.control.render_item(item))
                .collect(),
            selected_count: self.state.items().len(),
            results: self.results(),
        }
    }
}
