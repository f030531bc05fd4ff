//! Autocomplete field for ratatui
//!
//! [`AutocompleteField`] pairs a single-line text entry with a suggestion list
//! shown or hidden from data the application supplies. The field does no
//! fetching or filtering: the application owns the text and the suggestions,
//! passes both in as props each frame, and reacts to the actions built from
//! the callbacks in [`AutocompleteConfig`].
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use tui_autocomplete::{AutocompleteConfig, AutocompleteField, AutocompleteProps, Component};
//!
//! let mut config = AutocompleteConfig::new(|city: &String, _| city.clone());
//! config.on_change_text = Some(Action::Query);
//! config.on_select = Some(Action::Pick);
//!
//! let mut field = AutocompleteField::new(config, Rc::new(Vec::new()));
//!
//! // In your render function:
//! field.render(frame, area, AutocompleteProps {
//!     data: Rc::clone(&state.matches),
//!     value: &state.query,
//! });
//! for action in field.drain_actions() {
//!     dispatch(action);
//! }
//! ```

mod autocomplete;
mod config;
mod data;
mod style;
mod suggestion_list;
mod text_input;

pub use autocomplete::{
    AutocompleteField, AutocompleteProps, Child, ChildHandle, FieldLayout, RenderPass,
};
pub use config::{
    AutocompleteBuilder, AutocompleteConfig, AutocompleteSettings, ConfigError, FieldKeymap,
    FieldKeys, KeyExtractor, ListOptions, PersistTaps, RenderItem, RenderSeparator,
    TextInputFactory, DEFAULT_END_REACHED_THRESHOLD,
};
pub use data::{ListModel, RenderState, SuggestionData};
pub use style::{
    base_styles, platform_styles, Edges, Placement, Platform, RegionStyles, StyleLayer, StyleResolver,
};
pub use suggestion_list::{
    default_highlight_style, ItemContext, ListProps, ListRender, SuggestionList,
};
pub use text_input::{
    EndEditing, EndEditingReason, TextEntry, TextEntryEvent, TextEntryProps, TextInput,
    TextInputOptions,
};

pub use tui_autocomplete_core::{
    assert_emitted, assert_not_emitted, count_emitted, find_emitted, format_key_for_display,
    process_raw_event, spawn_event_poller, testing, Component, EventKind, HandleMap, KeyBinding,
    KeySet, RawEvent, RenderHarness,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AutocompleteConfig, AutocompleteField, AutocompleteProps, AutocompleteSettings,
        Component, EndEditing, EventKind, PersistTaps, Platform, StyleLayer,
    };
}
