//! The effect search widget: catalog view, seed aggregation, result view and the
//! selection control that ties them together.

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod collate;
pub mod results;
pub mod widget;

pub use aggregate::{
    build_seed_index, build_seed_index_parallel, IndexSummary, RollResult, SeedIndex, CAST_RANGE,
    POWER_RANGE,
};
pub use cache::{CacheStats, CachedViews, SeedCache};
pub use catalog::{catalog_view, SelectionItem, SentinelRule};
pub use collate::locale_cmp;
pub use results::{result_lines, result_view, FontWeight, ResultLine};
pub use widget::{
    ItemView, MultiSelect, Positioning, SearchPanel, SearchView, SelectionList, SelectionState,
    ValueChange,
};
