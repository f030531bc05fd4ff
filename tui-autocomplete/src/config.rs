//! Field configuration: callbacks, render closures, settings and the builder

use std::rc::Rc;

use ratatui::{style::Style, text::Line};
use serde::{Deserialize, Serialize};
use tui_autocomplete_core::KeySet;

use crate::suggestion_list::ItemContext;
use crate::style::{RegionStyles, StyleLayer};
use crate::text_input::{EndEditing, TextEntry, TextEntryProps, TextInput, TextInputOptions};

/// Stable identity of an item, given the item and its index
pub type KeyExtractor<T> = Rc<dyn Fn(&T, usize) -> String>;

/// Draws one suggestion row
pub type RenderItem<T> = Rc<dyn Fn(&T, ItemContext) -> Line<'static>>;

/// Draws the row between item `index` and the next one
pub type RenderSeparator = Rc<dyn Fn(usize) -> Line<'static>>;

/// Builds the text entry when the field mounts
pub type TextInputFactory = Rc<dyn Fn(&TextEntryProps<'_>) -> Box<dyn TextEntry>>;

pub const DEFAULT_END_REACHED_THRESHOLD: f32 = 2.0;

/// Errors raised while building a field configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("a key extractor is required")]
    MissingKeyExtractor,
    #[error("end-reached threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f32),
    #[error("invalid key {key:?} for {action}")]
    InvalidKey { action: &'static str, key: String },
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Whether a click on a suggestion keeps the text entry focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistTaps {
    /// Focus stays in the entry
    #[default]
    Always,
    /// Focus stays when the click was handled by a row
    Handled,
    /// Any click in the list ends editing
    Never,
}

impl PersistTaps {
    /// Keep focus after a click that a row did (or did not) handle
    pub fn keeps_focus(self, handled: bool) -> bool {
        match self {
            PersistTaps::Always => true,
            PersistTaps::Handled => handled,
            PersistTaps::Never => false,
        }
    }
}

/// Key strings for list navigation, as written in settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldKeymap {
    pub next: Vec<String>,
    pub previous: Vec<String>,
    pub accept: Vec<String>,
}

impl Default for FieldKeymap {
    fn default() -> Self {
        Self {
            next: vec!["down".into(), "ctrl+n".into()],
            previous: vec!["up".into(), "ctrl+p".into()],
            accept: vec!["enter".into()],
        }
    }
}

impl FieldKeymap {
    pub fn resolve(&self) -> Result<FieldKeys, ConfigError> {
        let parse = |action: &'static str, keys: &[String]| {
            KeySet::parse(keys).map_err(|key| ConfigError::InvalidKey { action, key })
        };
        Ok(FieldKeys {
            next: parse("next", &self.next)?,
            previous: parse("previous", &self.previous)?,
            accept: parse("accept", &self.accept)?,
        })
    }
}

/// Parsed navigation keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKeys {
    pub next: KeySet,
    pub previous: KeySet,
    pub accept: KeySet,
}

impl Default for FieldKeys {
    fn default() -> Self {
        FieldKeymap::default().resolve().unwrap_or(FieldKeys {
            next: KeySet::default(),
            previous: KeySet::default(),
            accept: KeySet::default(),
        })
    }
}

/// Serializable subset of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutocompleteSettings {
    pub hide_results: bool,
    pub styles: RegionStyles,
    pub keyboard_should_persist_taps: PersistTaps,
    pub on_end_reached_threshold: f32,
    pub input: TextInputOptions,
    pub keymap: FieldKeymap,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            hide_results: false,
            styles: RegionStyles::default(),
            keyboard_should_persist_taps: PersistTaps::default(),
            on_end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            input: TextInputOptions::default(),
            keymap: FieldKeymap::default(),
        }
    }
}

impl AutocompleteSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Options handed straight to the suggestion list
///
/// Every `Some` here wins over the matching field-level option.
pub struct ListOptions<T, A> {
    pub key_extractor: Option<KeyExtractor<T>>,
    pub render_item: Option<RenderItem<T>>,
    pub render_separator: Option<RenderSeparator>,
    pub on_end_reached: Option<fn(usize) -> A>,
    pub on_end_reached_threshold: Option<f32>,
    pub keyboard_should_persist_taps: Option<PersistTaps>,
    /// Merged over the resolved list style
    pub style: Option<StyleLayer>,
    pub highlight_style: Option<Style>,
    pub highlight_symbol: Option<String>,
}

impl<T, A> Default for ListOptions<T, A> {
    fn default() -> Self {
        Self {
            key_extractor: None,
            render_item: None,
            render_separator: None,
            on_end_reached: None,
            on_end_reached_threshold: None,
            keyboard_should_persist_taps: None,
            style: None,
            highlight_style: None,
            highlight_symbol: None,
        }
    }
}

fn default_capture() -> bool {
    false
}

fn default_text_input() -> TextInputFactory {
    Rc::new(|_: &TextEntryProps<'_>| Box::new(TextInput::new()) as Box<dyn TextEntry>)
}

/// Everything the field reads while rendering and handling events
///
/// Item type `T`, action type `A`. The key extractor has no default and is
/// supplied to [`AutocompleteConfig::new`].
pub struct AutocompleteConfig<T, A> {
    pub hide_results: bool,
    pub styles: RegionStyles,
    pub on_show_results: Option<fn(bool) -> A>,
    pub on_end_editing: Option<fn(EndEditing) -> A>,
    pub on_change_text: Option<fn(String) -> A>,
    pub on_submit_editing: Option<fn(String) -> A>,
    pub on_select: Option<fn(usize) -> A>,
    /// Asked before a press on the results region reaches the rows
    pub on_start_should_set_responder_capture: fn() -> bool,
    pub render_item: Option<RenderItem<T>>,
    pub render_separator: Option<RenderSeparator>,
    pub render_text_input: TextInputFactory,
    key_extractor: KeyExtractor<T>,
    pub list_options: ListOptions<T, A>,
    pub on_end_reached: Option<fn(usize) -> A>,
    pub on_end_reached_threshold: f32,
    pub keyboard_should_persist_taps: PersistTaps,
    pub input: TextInputOptions,
    pub keys: FieldKeys,
}

impl<T, A> AutocompleteConfig<T, A> {
    pub fn new(key_extractor: impl Fn(&T, usize) -> String + 'static) -> Self {
        Self {
            hide_results: false,
            styles: RegionStyles::default(),
            on_show_results: None,
            on_end_editing: None,
            on_change_text: None,
            on_submit_editing: None,
            on_select: None,
            on_start_should_set_responder_capture: default_capture,
            render_item: None,
            render_separator: None,
            render_text_input: default_text_input(),
            key_extractor: Rc::new(key_extractor),
            list_options: ListOptions::default(),
            on_end_reached: None,
            on_end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            keyboard_should_persist_taps: PersistTaps::default(),
            input: TextInputOptions::default(),
            keys: FieldKeys::default(),
        }
    }

    pub fn builder() -> AutocompleteBuilder<T, A> {
        AutocompleteBuilder::new()
    }

    pub fn key_extractor(&self) -> &KeyExtractor<T> {
        &self.key_extractor
    }

    pub fn set_key_extractor(&mut self, key_extractor: impl Fn(&T, usize) -> String + 'static) {
        self.key_extractor = Rc::new(key_extractor);
    }

    /// Key extractor the list uses, after the pass-through options
    pub fn list_key_extractor(&self) -> &KeyExtractor<T> {
        self.list_options
            .key_extractor
            .as_ref()
            .unwrap_or(&self.key_extractor)
    }

    pub fn list_render_item(&self) -> Option<&RenderItem<T>> {
        self.list_options
            .render_item
            .as_ref()
            .or(self.render_item.as_ref())
    }

    pub fn list_render_separator(&self) -> Option<&RenderSeparator> {
        self.list_options
            .render_separator
            .as_ref()
            .or(self.render_separator.as_ref())
    }

    pub fn list_on_end_reached(&self) -> Option<fn(usize) -> A> {
        self.list_options.on_end_reached.or(self.on_end_reached)
    }

    pub fn list_end_reached_threshold(&self) -> f32 {
        self.list_options
            .on_end_reached_threshold
            .unwrap_or(self.on_end_reached_threshold)
    }

    pub fn list_persist_taps(&self) -> PersistTaps {
        self.list_options
            .keyboard_should_persist_taps
            .unwrap_or(self.keyboard_should_persist_taps)
    }
}

/// Fallible construction from settings plus code-only options
pub struct AutocompleteBuilder<T, A> {
    settings: AutocompleteSettings,
    key_extractor: Option<KeyExtractor<T>>,
    render_item: Option<RenderItem<T>>,
    render_separator: Option<RenderSeparator>,
    render_text_input: Option<TextInputFactory>,
    on_show_results: Option<fn(bool) -> A>,
    on_end_editing: Option<fn(EndEditing) -> A>,
    on_change_text: Option<fn(String) -> A>,
    on_submit_editing: Option<fn(String) -> A>,
    on_select: Option<fn(usize) -> A>,
    on_end_reached: Option<fn(usize) -> A>,
    capture: Option<fn() -> bool>,
    list_options: ListOptions<T, A>,
}

impl<T, A> Default for AutocompleteBuilder<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A> AutocompleteBuilder<T, A> {
    pub fn new() -> Self {
        Self {
            settings: AutocompleteSettings::default(),
            key_extractor: None,
            render_item: None,
            render_separator: None,
            render_text_input: None,
            on_show_results: None,
            on_end_editing: None,
            on_change_text: None,
            on_submit_editing: None,
            on_select: None,
            on_end_reached: None,
            capture: None,
            list_options: ListOptions::default(),
        }
    }

    pub fn settings(mut self, settings: AutocompleteSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn key_extractor(mut self, f: impl Fn(&T, usize) -> String + 'static) -> Self {
        self.key_extractor = Some(Rc::new(f));
        self
    }

    pub fn render_item(mut self, f: impl Fn(&T, ItemContext) -> Line<'static> + 'static) -> Self {
        self.render_item = Some(Rc::new(f));
        self
    }

    pub fn render_separator(mut self, f: impl Fn(usize) -> Line<'static> + 'static) -> Self {
        self.render_separator = Some(Rc::new(f));
        self
    }

    pub fn render_text_input(
        mut self,
        f: impl Fn(&TextEntryProps<'_>) -> Box<dyn TextEntry> + 'static,
    ) -> Self {
        self.render_text_input = Some(Rc::new(f));
        self
    }

    pub fn hide_results(mut self, hide: bool) -> Self {
        self.settings.hide_results = hide;
        self
    }

    pub fn styles(mut self, styles: RegionStyles) -> Self {
        self.settings.styles = styles;
        self
    }

    pub fn on_show_results(mut self, f: fn(bool) -> A) -> Self {
        self.on_show_results = Some(f);
        self
    }

    pub fn on_end_editing(mut self, f: fn(EndEditing) -> A) -> Self {
        self.on_end_editing = Some(f);
        self
    }

    pub fn on_change_text(mut self, f: fn(String) -> A) -> Self {
        self.on_change_text = Some(f);
        self
    }

    pub fn on_submit_editing(mut self, f: fn(String) -> A) -> Self {
        self.on_submit_editing = Some(f);
        self
    }

    pub fn on_select(mut self, f: fn(usize) -> A) -> Self {
        self.on_select = Some(f);
        self
    }

    pub fn on_end_reached(mut self, f: fn(usize) -> A) -> Self {
        self.on_end_reached = Some(f);
        self
    }

    pub fn on_end_reached_threshold(mut self, threshold: f32) -> Self {
        self.settings.on_end_reached_threshold = threshold;
        self
    }

    pub fn on_start_should_set_responder_capture(mut self, f: fn() -> bool) -> Self {
        self.capture = Some(f);
        self
    }

    pub fn keyboard_should_persist_taps(mut self, persist: PersistTaps) -> Self {
        self.settings.keyboard_should_persist_taps = persist;
        self
    }

    pub fn input(mut self, input: TextInputOptions) -> Self {
        self.settings.input = input;
        self
    }

    pub fn keymap(mut self, keymap: FieldKeymap) -> Self {
        self.settings.keymap = keymap;
        self
    }

    pub fn list_options(mut self, options: ListOptions<T, A>) -> Self {
        self.list_options = options;
        self
    }

    pub fn build(self) -> Result<AutocompleteConfig<T, A>, ConfigError> {
        let key_extractor = self.key_extractor.ok_or(ConfigError::MissingKeyExtractor)?;

        let thresholds = std::iter::once(self.settings.on_end_reached_threshold)
            .chain(self.list_options.on_end_reached_threshold);
        for threshold in thresholds {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }
        let keys = self.settings.keymap.resolve()?;

        Ok(AutocompleteConfig {
            hide_results: self.settings.hide_results,
            styles: self.settings.styles,
            on_show_results: self.on_show_results,
            on_end_editing: self.on_end_editing,
            on_change_text: self.on_change_text,
            on_submit_editing: self.on_submit_editing,
            on_select: self.on_select,
            on_start_should_set_responder_capture: self.capture.unwrap_or(default_capture),
            render_item: self.render_item,
            render_separator: self.render_separator,
            render_text_input: self.render_text_input.unwrap_or_else(default_text_input),
            key_extractor,
            list_options: self.list_options,
            on_end_reached: self.on_end_reached,
            on_end_reached_threshold: self.settings.on_end_reached_threshold,
            keyboard_should_persist_taps: self.settings.keyboard_should_persist_taps,
            input: self.settings.input,
            keys,
        })
    }
}
