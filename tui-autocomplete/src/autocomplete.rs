//! The autocomplete field: a text entry with a data-driven suggestion list

use std::fmt::Display;
use std::rc::Rc;

use ratatui::{
    layout::{Position, Rect},
    text::Line,
    widgets::Clear,
    Frame,
};
use tui_autocomplete_core::{Component, EventKind, HandleMap};

use crate::config::AutocompleteConfig;
use crate::data::{ListModel, RenderState, SuggestionData};
use crate::style::{Placement, Platform, RegionStyles, StyleResolver};
use crate::suggestion_list::{default_highlight_style, ItemContext, ListProps, SuggestionList};
use crate::text_input::{EndEditing, EndEditingReason, TextEntry, TextEntryEvent, TextEntryProps};

/// Logical children of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Child {
    TextInput,
    ResultList,
}

/// A mounted child
pub enum ChildHandle {
    TextInput(Box<dyn TextEntry>),
    ResultList(SuggestionList),
}

fn entry_mut(handles: &mut HandleMap<Child, ChildHandle>) -> Option<&mut Box<dyn TextEntry>> {
    match handles.get_mut(Child::TextInput)? {
        ChildHandle::TextInput(entry) => Some(entry),
        ChildHandle::ResultList(_) => None,
    }
}

fn list_mut(handles: &mut HandleMap<Child, ChildHandle>) -> Option<&mut SuggestionList> {
    match handles.get_mut(Child::ResultList)? {
        ChildHandle::ResultList(list) => Some(list),
        ChildHandle::TextInput(_) => None,
    }
}

/// Screen areas of the regions drawn in a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldLayout {
    pub container: Rect,
    pub input_container: Rect,
    pub input: Rect,
    pub list_container: Option<Rect>,
    pub list: Option<Rect>,
}

/// What the last render decided and drew
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPass {
    /// The data had at least one item
    pub visible: bool,
    /// The results region (list container) was drawn
    pub results_region: bool,
    /// The list itself was drawn
    pub list_rendered: bool,
    pub item_count: usize,
    pub layout: FieldLayout,
}

/// Props for [`AutocompleteField`]
pub struct AutocompleteProps<'a, D: SuggestionData + ?Sized> {
    /// Current suggestions
    pub data: Rc<D>,
    /// Current text (owned by the application)
    pub value: &'a str,
}

/// A text entry paired with a suggestion list
///
/// The application owns the text and the suggestions and passes both in as
/// props. The field decides each frame whether the list is shown, forwards
/// text-entry events to the configured callbacks, and exposes `focus` and
/// `blur` on the mounted entry.
///
/// Notifications produced while rendering (`on_show_results`,
/// `on_end_reached`, and the end-editing event from [`blur`](Self::blur))
/// are queued and read with [`Component::drain_actions`].
pub struct AutocompleteField<D: SuggestionData + ?Sized, A> {
    config: AutocompleteConfig<D::Item, A>,
    resolver: StyleResolver,
    state: RenderState<D>,
    handles: HandleMap<Child, ChildHandle>,
    outbox: Vec<A>,
    last_pass: Option<RenderPass>,
    /// Text from the latest props
    value: String,
}

impl<D: SuggestionData + ?Sized, A> AutocompleteField<D, A> {
    pub fn new(config: AutocompleteConfig<D::Item, A>, data: Rc<D>) -> Self {
        Self::with_platform(config, data, Platform::current())
    }

    /// Field styled for a specific platform instead of the process one
    pub fn with_platform(
        config: AutocompleteConfig<D::Item, A>,
        data: Rc<D>,
        platform: Platform,
    ) -> Self {
        Self {
            config,
            resolver: StyleResolver::new(platform),
            state: RenderState::new(data),
            handles: HandleMap::new(),
            outbox: Vec::new(),
            last_pass: None,
            value: String::new(),
        }
    }

    pub fn config(&self) -> &AutocompleteConfig<D::Item, A> {
        &self.config
    }

    /// Replace the configuration; takes effect on the next render
    pub fn set_config(&mut self, config: AutocompleteConfig<D::Item, A>) {
        self.config = config;
    }

    /// Replace the suggestions outside a render
    pub fn set_data(&mut self, data: Rc<D>) {
        self.state.sync(data);
    }

    pub fn platform(&self) -> Platform {
        self.resolver.platform()
    }

    /// Final region styles: defaults, caller overrides, then list options
    pub fn resolved_styles(&self) -> RegionStyles {
        let mut styles = self.resolver.resolve(&self.config.styles);
        if let Some(list) = &self.config.list_options.style {
            styles.list = styles.list.merge(list);
        }
        styles
    }

    /// Create the text entry; does nothing if it is already mounted
    pub fn mount(&mut self) {
        if self.handles.is_mounted(Child::TextInput) {
            return;
        }
        let styles = self.resolved_styles();
        let props = TextEntryProps {
            value: &self.value,
            style: &styles.input,
            options: &self.config.input,
        };
        let mut entry = (self.config.render_text_input)(&props);
        if self.config.input.auto_focus {
            entry.focus();
        }
        self.handles
            .mount(Child::TextInput, ChildHandle::TextInput(entry));
    }

    /// Drop every child handle
    pub fn unmount(&mut self) {
        self.handles.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.handles.is_mounted(Child::TextInput)
    }

    /// Focus the text entry
    pub fn focus(&mut self) {
        match entry_mut(&mut self.handles) {
            Some(entry) => entry.focus(),
            None => tracing::debug!("focus ignored: text input not mounted"),
        }
    }

    /// Blur the text entry, queueing `on_end_editing` if it was focused
    pub fn blur(&mut self) {
        if let Some(action) = self.blur_entry() {
            self.outbox.push(action);
        }
    }

    fn blur_entry(&mut self) -> Option<A> {
        let Some(entry) = entry_mut(&mut self.handles) else {
            tracing::debug!("blur ignored: text input not mounted");
            return None;
        };
        if !entry.blur() {
            return None;
        }
        self.forward(TextEntryEvent::EndEditing(EndEditing {
            text: self.value.clone(),
            reason: EndEditingReason::Blur,
        }))
    }

    pub fn is_focused(&self) -> bool {
        match self.handles.get(Child::TextInput) {
            Some(ChildHandle::TextInput(entry)) => entry.is_focused(),
            _ => false,
        }
    }

    /// Count/index view of the suggestions while the list is mounted
    pub fn results(&self) -> Option<ListModel<'_, D>> {
        self.handles
            .is_mounted(Child::ResultList)
            .then(|| self.state.model())
    }

    /// Index of the highlighted suggestion
    pub fn highlighted(&self) -> Option<usize> {
        match self.handles.get(Child::ResultList) {
            Some(ChildHandle::ResultList(list)) => list.highlighted(),
            _ => None,
        }
    }

    pub fn last_pass(&self) -> Option<&RenderPass> {
        self.last_pass.as_ref()
    }

    fn sync(&mut self, props: AutocompleteProps<'_, D>) {
        self.state.sync(props.data);
        if self.value != props.value {
            self.value.clear();
            self.value.push_str(props.value);
        }
    }

    /// Map a text-entry event onto the configured callback
    fn forward(&self, event: TextEntryEvent) -> Option<A> {
        match event {
            TextEntryEvent::Changed(text) => self.config.on_change_text.map(|f| f(text)),
            TextEntryEvent::Submitted(text) => self.config.on_submit_editing.map(|f| f(text)),
            TextEntryEvent::EndEditing(end) => {
                tracing::debug!(reason = ?end.reason, "editing ended");
                self.config.on_end_editing.map(|f| f(end))
            }
        }
    }

    fn handle_key(&mut self, event: &EventKind, actions: &mut Vec<A>) {
        let Some(key) = event.key_press() else {
            return;
        };
        if !self.is_focused() {
            return;
        }

        let model = self.state.model();
        let key_extractor = &**self.config.list_key_extractor();
        let keys = &self.config.keys;
        if let Some(list) = list_mut(&mut self.handles) {
            if keys.next.matches(key) {
                list.reconcile(model, key_extractor);
                list.highlight_next(model, key_extractor);
                return;
            }
            if keys.previous.matches(key) {
                list.reconcile(model, key_extractor);
                list.highlight_previous(model, key_extractor);
                return;
            }
            if keys.accept.matches(key) {
                list.reconcile(model, key_extractor);
                if let Some(index) = list.highlighted() {
                    if let Some(on_select) = self.config.on_select {
                        actions.push(on_select(index));
                    }
                    return;
                }
            }
        }

        let styles = self.resolved_styles();
        let props = TextEntryProps {
            value: &self.value,
            style: &styles.input,
            options: &self.config.input,
        };
        let result = entry_mut(&mut self.handles).and_then(|entry| entry.handle_event(event, &props));
        if let Some(action) = result.and_then(|e| self.forward(e)) {
            actions.push(action);
        }
    }

    fn handle_click(&mut self, position: Position, actions: &mut Vec<A>) {
        let Some(pass) = self.last_pass else {
            return;
        };
        let on_results = pass.results_region
            && pass
                .layout
                .list_container
                .is_some_and(|area| area.contains(position));

        if on_results {
            if (self.config.on_start_should_set_responder_capture)() {
                tracing::debug!("results region captured the press");
                return;
            }
            let hit = list_mut(&mut self.handles).and_then(|list| list.item_at(position));
            if let (Some(index), Some(on_select)) = (hit, self.config.on_select) {
                actions.push(on_select(index));
            }
            if !self.config.list_persist_taps().keeps_focus(hit.is_some()) {
                actions.extend(self.blur_entry());
            }
            return;
        }

        if pass.layout.input_container.contains(position) {
            self.focus();
        }
    }

    fn handle_scroll(&mut self, event: &EventKind, delta: isize) {
        let Some(list_area) = self.last_pass.and_then(|pass| pass.layout.list) else {
            return;
        };
        if !event.is_within(list_area) {
            return;
        }
        let count = self.state.item_count();
        if let Some(list) = list_mut(&mut self.handles) {
            list.scroll_by(delta, count);
        }
    }
}

impl<D, A> AutocompleteField<D, A>
where
    D: SuggestionData + ?Sized,
    D::Item: Display,
{
    fn render_list(&mut self, frame: &mut Frame, area: Rect, styles: &RegionStyles) {
        let config = &self.config;
        let model = self.state.model();
        let key_extractor = &**config.list_key_extractor();
        let plain = |item: &D::Item, _: ItemContext| Line::raw(item.to_string());
        let render_item: &dyn Fn(&D::Item, ItemContext) -> Line<'static> =
            match config.list_render_item() {
                Some(render) => &**render,
                None => &plain,
            };
        let props = ListProps {
            model,
            key_extractor,
            render_item,
            render_separator: config.list_render_separator().map(|f| &**f),
            end_reached_threshold: config.list_end_reached_threshold(),
            style: &styles.list,
            highlight_style: config
                .list_options
                .highlight_style
                .unwrap_or_else(default_highlight_style),
            highlight_symbol: config.list_options.highlight_symbol.as_deref().unwrap_or(""),
        };

        let handle = self.handles.get_or_mount(Child::ResultList, || {
            ChildHandle::ResultList(SuggestionList::new())
        });
        let ChildHandle::ResultList(list) = handle else {
            return;
        };
        list.reconcile(model, key_extractor);
        let out = list.render(frame, area, &props);

        if out.end_reached {
            if let Some(on_end_reached) = config.list_on_end_reached() {
                self.outbox.push(on_end_reached(model.item_count()));
            }
        }
    }
}

impl<D, A> Component<A> for AutocompleteField<D, A>
where
    D: SuggestionData + ?Sized,
    D::Item: Display,
{
    type Props<'a> = AutocompleteProps<'a, D>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        self.sync(props);

        let mut actions = Vec::new();
        match event {
            EventKind::Key(_) => self.handle_key(event, &mut actions),
            EventKind::Mouse(_) => {
                if let Some(position) = event.left_click() {
                    self.handle_click(position, &mut actions);
                }
            }
            EventKind::Scroll { delta, .. } => self.handle_scroll(event, *delta),
            EventKind::Resize(..) | EventKind::Tick => {}
        }
        actions
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.sync(props);
        if !self.is_mounted() {
            self.mount();
        }

        let item_count = self.state.item_count();
        let visible = item_count > 0;
        tracing::trace!(visible, item_count, "results visibility");
        if let Some(on_show_results) = self.config.on_show_results {
            self.outbox.push(on_show_results(visible));
        }

        let styles = self.resolved_styles();
        let mut layout = FieldLayout::default();

        let container = styles.container.outer(area);
        if let Some(block) = styles.container.block() {
            frame.render_widget(block, container);
        }
        let content = styles.container.inner(container);
        layout.container = container;

        let input_rows = styles.input.height.unwrap_or(1);
        let input_height = styles
            .input_container
            .outer_height(styles.input.outer_height(input_rows))
            .min(content.height);
        let input_region = Rect {
            height: input_height,
            ..content
        };
        let input_box = styles.input_container.outer(input_region);
        if let Some(block) = styles.input_container.block() {
            frame.render_widget(block, input_box);
        }
        let input_area = styles.input.outer(styles.input_container.inner(input_box));
        layout.input_container = input_box;
        layout.input = input_area;

        let entry_props = TextEntryProps {
            value: &self.value,
            style: &styles.input,
            options: &self.config.input,
        };
        if let Some(entry) = entry_mut(&mut self.handles) {
            entry.render(frame, input_area, &entry_props);
        }

        let results_region = !self.config.hide_results;
        let mut list_rendered = false;
        if results_region {
            let with_separators = self.config.list_render_separator().is_some();
            let rows = if visible {
                SuggestionList::content_rows(item_count, with_separators)
            } else {
                0
            };
            let rows = u16::try_from(rows).unwrap_or(u16::MAX);
            let needed = styles
                .list_container
                .outer_height(styles.list.outer_height(rows));
            let top = input_region.bottom();

            let region = match styles.list.placement() {
                Placement::Flow => Rect::new(
                    content.x,
                    top,
                    content.width,
                    needed.min(content.bottom().saturating_sub(top)),
                ),
                Placement::Overlay => {
                    let bottom = frame.area().bottom();
                    let region = Rect::new(
                        container.x,
                        top,
                        container.width,
                        needed.min(bottom.saturating_sub(top)),
                    );
                    frame.render_widget(Clear, region);
                    region
                }
            };

            let list_box = styles.list_container.outer(region);
            if let Some(block) = styles.list_container.block() {
                frame.render_widget(block, list_box);
            }
            layout.list_container = Some(list_box);

            if visible {
                let list_area = styles.list.outer(styles.list_container.inner(list_box));
                layout.list = Some(list_area);
                self.render_list(frame, list_area, &styles);
                list_rendered = true;
            }
        }
        if !list_rendered {
            self.handles.unmount(Child::ResultList);
        }

        self.last_pass = Some(RenderPass {
            visible,
            results_region,
            list_rendered,
            item_count,
            layout,
        });
    }

    /// Take the actions queued since the last call
    fn drain_actions(&mut self) -> Vec<A> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_autocomplete_core::testing::{key_event, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum Action {
        ShowResults(bool),
        EndEditing(EndEditing),
    }

    fn config() -> AutocompleteConfig<String, Action> {
        let mut config = AutocompleteConfig::new(|s: &String, _| s.clone());
        config.on_show_results = Some(Action::ShowResults);
        config.on_end_editing = Some(Action::EndEditing);
        config
    }

    fn data(items: &[&str]) -> Rc<Vec<String>> {
        Rc::new(items.iter().map(|s| s.to_string()).collect())
    }

    fn draw(field: &mut AutocompleteField<Vec<String>, Action>, data: &Rc<Vec<String>>) -> String {
        let mut render = RenderHarness::new(30, 8);
        render.render_to_string_plain(|frame| {
            let props = AutocompleteProps {
                data: Rc::clone(data),
                value: "",
            };
            field.render(frame, frame.area(), props);
        })
    }

    #[test]
    fn test_first_render_mounts() {
        let mut field = AutocompleteField::with_platform(config(), data(&[]), Platform::Android);
        assert!(!field.is_mounted());
        draw(&mut field, &data(&[]));
        assert!(field.is_mounted());
        assert!(field.results().is_none());
    }

    #[test]
    fn test_proxy_noop_before_mount() {
        let mut field = AutocompleteField::with_platform(config(), data(&["a"]), Platform::Ios);
        field.focus();
        field.blur();
        assert!(!field.is_focused());
        assert!(field.drain_actions().is_empty());
    }

    #[test]
    fn test_blur_forwards_end_editing() {
        let mut field = AutocompleteField::with_platform(config(), data(&[]), Platform::Android);
        let empty = data(&[]);
        draw(&mut field, &empty);
        field.drain_actions();

        field.focus();
        assert!(field.is_focused());
        field.blur();
        assert!(!field.is_focused());

        let actions = field.drain_actions();
        assert_eq!(
            actions,
            vec![Action::EndEditing(EndEditing {
                text: String::new(),
                reason: EndEditingReason::Blur,
            })]
        );

        field.blur();
        assert!(field.drain_actions().is_empty());
    }

    #[test]
    fn test_render_pass_layout_android() {
        let mut field = AutocompleteField::with_platform(config(), data(&[]), Platform::Android);
        let items = data(&["Oslo", "Rome"]);
        let output = draw(&mut field, &items);

        let pass = *field.last_pass().unwrap();
        assert!(pass.visible && pass.list_rendered);
        assert_eq!(pass.item_count, 2);
        assert_eq!(pass.layout.input_container, Rect::new(0, 0, 30, 3));
        assert_eq!(pass.layout.input, Rect::new(1, 1, 28, 1));
        // Inline list: margin 1 each side, no top border
        assert_eq!(pass.layout.list, Some(Rect::new(1, 3, 28, 3)));
        assert!(output.contains("Oslo"));
        assert!(output.contains("Rome"));
    }

    #[test]
    fn test_unmount_drops_handles() {
        let mut field = AutocompleteField::with_platform(config(), data(&[]), Platform::Android);
        let items = data(&["x"]);
        draw(&mut field, &items);
        assert!(field.results().is_some());

        field.unmount();
        assert!(!field.is_mounted());
        assert!(field.results().is_none());
        field.focus();
        assert!(!field.is_focused());
    }

    #[test]
    fn test_escape_ends_editing() {
        let mut field = AutocompleteField::with_platform(config(), data(&[]), Platform::Android);
        let empty = data(&[]);
        draw(&mut field, &empty);
        field.focus();

        let actions: Vec<_> = field
            .handle_event(
                &key_event("esc"),
                AutocompleteProps {
                    data: Rc::clone(&empty),
                    value: "Par",
                },
            )
            .into_iter()
            .collect();

        assert_eq!(
            actions,
            vec![Action::EndEditing(EndEditing {
                text: "Par".into(),
                reason: EndEditingReason::Escape,
            })]
        );
        assert!(!field.is_focused());
    }
}
