//! Catalog view: the selectable projection of the raw effect collection.

use serde::{Deserialize, Serialize};

use crate::data::effect::Effect;
use crate::search::collate::locale_cmp;

/// Which entry of the raw collection is the sentinel. The sentinel stands for "no effect";
/// rolls may still land on it, but it is never offered for selection and never indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentinelRule {
    /// The last entry of the collection.
    #[default]
    Trailing,
    /// The entry with this id, wherever it sits.
    Id(String),
    /// No sentinel; every entry is selectable.
    #[serde(rename = "none")]
    Disabled,
}

impl SentinelRule {
    /// Whether `effect`, found at `position` in a collection of `len` entries, is the sentinel.
    pub fn is_sentinel(&self, position: usize, len: usize, effect: &Effect) -> bool {
        match self {
            Self::Trailing => position + 1 == len,
            Self::Id(id) => effect.id == *id,
            Self::Disabled => false,
        }
    }

    /// Entries of `effects` that are not the sentinel, in collection order.
    pub fn visible<'a>(&'a self, effects: &'a [Effect]) -> impl Iterator<Item = &'a Effect> + 'a {
        let len = effects.len();
        effects
            .iter()
            .enumerate()
            .filter(move |(position, effect)| !self.is_sentinel(*position, len, effect))
            .map(|(_, effect)| effect)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionItem {
    pub label: String,
    pub value: String,
}

impl SelectionItem {
    pub fn from_effect(effect: &Effect) -> Self {
        Self {
            label: effect.name.clone(),
            value: effect.id.clone(),
        }
    }
}

/// Selectable items sorted by display name, with the sentinel left out.
pub fn catalog_view(effects: &[Effect], rule: &SentinelRule) -> Vec<SelectionItem> {
    let mut visible: Vec<&Effect> = rule.visible(effects).collect();
    visible.sort_by(|a, b| locale_cmp(&a.name, &b.name));
    visible.into_iter().map(SelectionItem::from_effect).collect()
}
