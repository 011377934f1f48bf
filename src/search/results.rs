//! Result view: the roll results for the current selection, in display order.

use std::fmt::Write as _;

use serde::Serialize;

use crate::search::aggregate::{RollResult, SeedIndex};
use crate::search::catalog::SelectionItem;
use crate::search::collate::locale_cmp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Regular,
    Thin,
}

impl FontWeight {
    /// Powers on a multiple of five are shown at regular weight.
    pub fn for_power(power: u32) -> Self {
        if power % 5 == 0 {
            Self::Regular
        } else {
            Self::Thin
        }
    }
}

/// One rendered row of the result panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLine {
    pub power: u32,
    pub cast: u32,
    pub effect: String,
    pub times: u32,
    pub weight: FontWeight,
    pub text: String,
}

impl ResultLine {
    pub fn new(result: &RollResult, selected_count: usize) -> Self {
        Self {
            power: result.power,
            cast: result.cast,
            effect: result.effect.clone(),
            times: result.times,
            weight: FontWeight::for_power(result.power),
            text: line_text(result, selected_count),
        }
    }
}

/// `Power: P, Cast: C`, then ` for EFFECT` when anything is selected, then ` (xN)` for repeats.
pub fn line_text(result: &RollResult, selected_count: usize) -> String {
    let mut text = format!("Power: {}, Cast: {}", result.power, result.cast);
    if selected_count > 0 {
        let _ = write!(text, " for {}", result.effect);
    }
    if result.times > 1 {
        let _ = write!(text, " (x{})", result.times);
    }
    text
}

/// Results of every selected effect, sorted by power, then cast, then effect name.
/// The sort is stable, so equal keys keep selection order.
pub fn result_view(selection: &[SelectionItem], index: &SeedIndex) -> Vec<RollResult> {
    let mut results: Vec<RollResult> = selection
        .iter()
        .flat_map(|item| index.bucket(&item.value).iter().cloned())
        .collect();
    results.sort_by(|a, b| {
        a.power
            .cmp(&b.power)
            .then(a.cast.cmp(&b.cast))
            .then_with(|| locale_cmp(&a.effect, &b.effect))
    });
    results
}

pub fn result_lines(selection: &[SelectionItem], index: &SeedIndex) -> Vec<ResultLine> {
    result_view(selection, index)
        .iter()
        .map(|result| ResultLine::new(result, selection.len()))
        .collect()
}
