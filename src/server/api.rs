use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SeedError;
use crate::export::results_csv_string;
use crate::render;
use crate::search::{ResultLine, SelectionItem};
use crate::server::state::AppState;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Seed index is still loading")]
    Loading,
    #[error(transparent)]
    Export(#[from] SeedError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsRequest {
    #[serde(default)]
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsResponse {
    pub selected: usize,
    pub count: usize,
    pub results: Vec<ResultLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectsResponse<'a> {
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<&'a str>,
    pub items: Vec<SelectionItem>,
}

pub fn health_payload(state: &AppState) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "seedfinder",
        "version": env!("CARGO_PKG_VERSION"),
        "loading": state.is_loading(),
        "cache": state.cache_stats(),
    }))?)
}

pub fn effects_payload(state: &AppState) -> Result<String, ApiError> {
    let items = state
        .views()
        .map(|views| views.items.as_ref().clone())
        .unwrap_or_default();
    let response = EffectsResponse {
        loading: state.is_loading(),
        data_version: state.catalog().data_version.as_deref(),
        items,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn results_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: ResultsRequest = serde_json::from_str(body)?;
    let lines = selected_lines(state, &request.selected)?;
    let response = ResultsResponse {
        selected: request.selected.len(),
        count: lines.len(),
        results: lines,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn index_payload(state: &AppState) -> Result<String, ApiError> {
    let views = state.views().ok_or(ApiError::Loading)?;
    Ok(serde_json::to_string_pretty(&views.index.summary())?)
}

pub fn results_csv_payload(state: &AppState, path: &str) -> Result<String, ApiError> {
    let selected = query_values(path, "effects");
    let lines = selected_lines(state, &selected)?;
    Ok(results_csv_string(&lines)?)
}

/// Widget fragment for `/search?effects=...`.
pub fn search_fragment(state: &AppState, path: &str) -> String {
    let selected = query_values(path, "effects");
    let selected: Vec<&str> = selected.iter().map(String::as_str).collect();
    render::html(&state.panel(&selected).view())
}

fn selected_lines(state: &AppState, selected: &[String]) -> Result<Vec<ResultLine>, ApiError> {
    if state.is_loading() {
        return Err(ApiError::Loading);
    }
    let selected: Vec<&str> = selected.iter().map(String::as_str).collect();
    Ok(state.panel(&selected).results().unwrap_or_default())
}

/// Values of `key` in the query string. Accepts repeated keys (`effects=a&effects=b`) and
/// comma lists (`effects=a,b`).
pub fn query_values(path: &str, key: &str) -> Vec<String> {
    let query = path.split_once('?').map(|(_, q)| q).unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| percent_decode(k) == key)
        .flat_map(|(_, v)| {
            percent_decode(v)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        decoded.push(byte);
                        i += 2;
                    }
                    None => decoded.push(b'%'),
                }
            }
            other => decoded.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
