//! Windowed suggestion list
//!
//! Draws only the rows that fit in its area, reading items through a
//! [`ListModel`] so it never copies the collection. Keeps its own scroll
//! offset and highlight between frames.

use std::collections::HashSet;

use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::data::{ListModel, SuggestionData};
use crate::style::StyleLayer;

/// Where an item sits when it is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemContext {
    pub index: usize,
    pub highlighted: bool,
}

/// Default style for the highlighted row
pub fn default_highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Everything the list needs for one frame
pub struct ListProps<'a, D: SuggestionData + ?Sized> {
    pub model: ListModel<'a, D>,
    pub key_extractor: &'a dyn Fn(&D::Item, usize) -> String,
    pub render_item: &'a dyn Fn(&D::Item, ItemContext) -> Line<'static>,
    pub render_separator: Option<&'a dyn Fn(usize) -> Line<'static>>,
    /// How close to the end (in multiples of the visible item count) counts as reached
    pub end_reached_threshold: f32,
    pub style: &'a StyleLayer,
    pub highlight_style: Style,
    pub highlight_symbol: &'a str,
}

/// What happened while drawing a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListRender {
    /// The end of the data came within the threshold for the first time at this length
    pub end_reached: bool,
    /// Items actually drawn
    pub rendered_items: usize,
}

#[derive(Debug, Clone)]
struct Highlight {
    index: usize,
    key: String,
}

/// A scrollable suggestion list with a keyboard highlight
#[derive(Debug, Default)]
pub struct SuggestionList {
    /// Index of the first drawn item
    scroll_offset: usize,
    highlight: Option<Highlight>,
    /// Item count at which end-reached last fired; cleared once the window
    /// moves back out of the threshold
    end_reached_at: Option<usize>,
    /// Screen row of each drawn item, from the last frame
    rows: Vec<(u16, usize)>,
    /// Area the items were drawn in, from the last frame
    content_area: Rect,
    /// Scroll the highlight into view on the next frame
    reveal: bool,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight.as_ref().map(|h| h.index)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Move the highlight down one item (or onto the first item)
    pub fn highlight_next<D: SuggestionData + ?Sized>(
        &mut self,
        model: ListModel<'_, D>,
        key_extractor: &dyn Fn(&D::Item, usize) -> String,
    ) {
        let count = model.item_count();
        if count == 0 {
            return;
        }
        let next = match self.highlighted() {
            None => 0,
            Some(i) => (i + 1).min(count - 1),
        };
        self.set_highlight(model, key_extractor, Some(next));
    }

    /// Move the highlight up one item; moving up from the first item clears it
    pub fn highlight_previous<D: SuggestionData + ?Sized>(
        &mut self,
        model: ListModel<'_, D>,
        key_extractor: &dyn Fn(&D::Item, usize) -> String,
    ) {
        let previous = match self.highlighted() {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
        self.set_highlight(model, key_extractor, previous);
    }

    fn set_highlight<D: SuggestionData + ?Sized>(
        &mut self,
        model: ListModel<'_, D>,
        key_extractor: &dyn Fn(&D::Item, usize) -> String,
        index: Option<usize>,
    ) {
        self.reveal = true;
        self.highlight = index.and_then(|index| {
            model.get(index).map(|item| Highlight {
                index,
                key: key_extractor(item, index),
            })
        });
    }

    /// Follow the highlighted item by key after the data was replaced
    pub fn reconcile<D: SuggestionData + ?Sized>(
        &mut self,
        model: ListModel<'_, D>,
        key_extractor: &dyn Fn(&D::Item, usize) -> String,
    ) {
        let Some(current) = self.highlight.take() else {
            return;
        };
        let key_at = |i: usize| model.get(i).map(|item| key_extractor(item, i));

        if key_at(current.index).as_deref() == Some(current.key.as_str()) {
            self.highlight = Some(current);
            return;
        }
        self.highlight = (0..model.item_count())
            .find(|&i| key_at(i).as_deref() == Some(current.key.as_str()))
            .map(|index| Highlight {
                index,
                key: current.key,
            });
    }

    /// Scroll by `delta` items, clamped to the data
    pub fn scroll_by(&mut self, delta: isize, item_count: usize) {
        let max = item_count.saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max);
    }

    /// Item drawn at a screen position in the last frame
    pub fn item_at(&self, position: Position) -> Option<usize> {
        if !self.content_area.contains(position) {
            return None;
        }
        self.rows
            .iter()
            .find(|(row, _)| *row == position.y)
            .map(|(_, index)| *index)
    }

    /// Rows needed to show every item, separators included
    pub fn content_rows(item_count: usize, with_separators: bool) -> usize {
        if with_separators {
            (item_count * 2).saturating_sub(1)
        } else {
            item_count
        }
    }

    fn ensure_visible(&mut self, items_fit: usize) {
        let Some(selected) = self.highlighted() else {
            return;
        };
        if items_fit == 0 {
            return;
        }
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + items_fit {
            self.scroll_offset = selected + 1 - items_fit;
        }
    }

    pub fn render<D: SuggestionData + ?Sized>(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        props: &ListProps<'_, D>,
    ) -> ListRender {
        if let Some(block) = props.style.block() {
            frame.render_widget(block, area);
        }
        let content = props.style.inner(area);
        self.content_area = content;
        self.rows.clear();

        let count = props.model.item_count();
        let height = content.height as usize;
        let with_separators = props.render_separator.is_some();
        let items_fit = if with_separators {
            height.div_ceil(2)
        } else {
            height
        };

        if std::mem::take(&mut self.reveal) {
            self.ensure_visible(items_fit);
        }
        self.scroll_offset = self.scroll_offset.min(count.saturating_sub(items_fit));

        let text_style = props.style.text_style();
        let mut seen_keys = HashSet::new();
        let mut row = 0usize;
        let mut index = self.scroll_offset;
        let mut rendered_items = 0;

        while row < height && index < count {
            let Some(item) = props.model.get(index) else {
                break;
            };
            let key = (props.key_extractor)(item, index);
            if !seen_keys.insert(key.clone()) {
                tracing::warn!(key = %key, index, "duplicate suggestion key");
            }

            let highlighted = self.highlighted() == Some(index);
            let ctx = ItemContext { index, highlighted };
            let mut line = (props.render_item)(item, ctx);
            let mut style = text_style;
            if highlighted {
                style = style.patch(props.highlight_style);
                if !props.highlight_symbol.is_empty() {
                    line.spans
                        .insert(0, Span::raw(props.highlight_symbol.to_string()));
                }
            }

            let y = content.y + row as u16;
            let row_area = Rect::new(content.x, y, content.width, 1);
            frame.render_widget(Paragraph::new(line).style(style), row_area);
            self.rows.push((y, index));
            rendered_items += 1;
            row += 1;

            if let Some(separator) = props.render_separator {
                if row < height && index + 1 < count {
                    let y = content.y + row as u16;
                    let sep_area = Rect::new(content.x, y, content.width, 1);
                    frame.render_widget(Paragraph::new(separator(index)).style(text_style), sep_area);
                    row += 1;
                }
            }
            index += 1;
        }

        let end_reached = self.check_end_reached(count, rendered_items, props.end_reached_threshold);
        ListRender {
            end_reached,
            rendered_items,
        }
    }

    fn check_end_reached(&mut self, count: usize, rendered: usize, threshold: f32) -> bool {
        if count == 0 {
            return false;
        }
        let remaining = count.saturating_sub(self.scroll_offset + rendered);
        let window = rendered.max(1) as f32;
        if remaining as f32 > threshold * window {
            self.end_reached_at = None;
            return false;
        }
        if self.end_reached_at == Some(count) {
            return false;
        }
        tracing::debug!(count, remaining, "end of suggestions reached");
        self.end_reached_at = Some(count);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Edges;
    use tui_autocomplete_core::testing::RenderHarness;

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Item {i}")).collect()
    }

    fn key_of(item: &String, _: usize) -> String {
        item.clone()
    }

    fn plain(item: &String, _: ItemContext) -> Line<'static> {
        Line::raw(item.clone())
    }

    fn sep(_: usize) -> Line<'static> {
        Line::raw("--")
    }

    fn props<'a>(
        data: &'a Vec<String>,
        style: &'a StyleLayer,
        separator: Option<&'a dyn Fn(usize) -> Line<'static>>,
        threshold: f32,
    ) -> ListProps<'a, Vec<String>> {
        ListProps {
            model: ListModel::new(data),
            key_extractor: &key_of,
            render_item: &plain,
            render_separator: separator,
            end_reached_threshold: threshold,
            style,
            highlight_style: default_highlight_style(),
            highlight_symbol: "",
        }
    }

    #[test]
    fn test_renders_only_visible_window() {
        let data = items(10);
        let style = StyleLayer::default();
        let mut list = SuggestionList::new();
        let mut render = RenderHarness::new(20, 3);

        let output = render.render_to_string_plain(|frame| {
            let out = list.render(frame, frame.area(), &props(&data, &style, None, 0.0));
            assert_eq!(out.rendered_items, 3);
        });

        assert!(output.contains("Item 0"));
        assert!(output.contains("Item 2"));
        assert!(!output.contains("Item 3"));
    }

    #[test]
    fn test_separators_between_items() {
        let data = items(2);
        let style = StyleLayer::default();
        let mut list = SuggestionList::new();
        let mut render = RenderHarness::new(10, 4);

        let output = render.render_to_string_plain(|frame| {
            list.render(frame, frame.area(), &props(&data, &style, Some(&sep), 0.0));
        });

        assert_eq!(output, "Item 0\n--\nItem 1\n");
    }

    #[test]
    fn test_highlight_navigation() {
        let data = items(3);
        let mut list = SuggestionList::new();
        let model = ListModel::new(&data);

        list.highlight_next(model, &key_of);
        assert_eq!(list.highlighted(), Some(0));
        list.highlight_next(model, &key_of);
        list.highlight_next(model, &key_of);
        list.highlight_next(model, &key_of);
        assert_eq!(list.highlighted(), Some(2));

        list.highlight_previous(model, &key_of);
        list.highlight_previous(model, &key_of);
        assert_eq!(list.highlighted(), Some(0));
        list.highlight_previous(model, &key_of);
        assert_eq!(list.highlighted(), None);
    }

    #[test]
    fn test_reconcile_follows_key() {
        let data = items(3);
        let mut list = SuggestionList::new();
        list.highlight_next(ListModel::new(&data), &key_of);
        list.highlight_next(ListModel::new(&data), &key_of);
        assert_eq!(list.highlighted(), Some(1));

        let moved = vec!["Item 9".to_string(), "Item 0".to_string(), "x".to_string(), "Item 1".to_string()];
        list.reconcile(ListModel::new(&moved), &key_of);
        assert_eq!(list.highlighted(), Some(3));

        let gone = vec!["nope".to_string()];
        list.reconcile(ListModel::new(&gone), &key_of);
        assert_eq!(list.highlighted(), None);
    }

    #[test]
    fn test_highlight_scrolls_into_view() {
        let data = items(10);
        let style = StyleLayer::default();
        let mut list = SuggestionList::new();
        for _ in 0..6 {
            list.highlight_next(ListModel::new(&data), &key_of);
        }
        let mut render = RenderHarness::new(20, 3);

        let output = render.render_to_string_plain(|frame| {
            list.render(frame, frame.area(), &props(&data, &style, None, 0.0));
        });

        assert_eq!(list.scroll_offset(), 3);
        assert!(output.contains("Item 5"));
        assert!(!output.contains("Item 2"));
    }

    #[test]
    fn test_item_at_uses_last_frame() {
        let data = items(3);
        let style = StyleLayer::new().with_borders(Edges::LEFT | Edges::RIGHT | Edges::BOTTOM);
        let mut list = SuggestionList::new();
        let mut render = RenderHarness::new(20, 5);
        render.render(|frame| {
            list.render(frame, frame.area(), &props(&data, &style, None, 0.0));
        });

        assert_eq!(list.item_at(Position::new(5, 0)), Some(0));
        assert_eq!(list.item_at(Position::new(5, 2)), Some(2));
        assert_eq!(list.item_at(Position::new(5, 3)), None);
        assert_eq!(list.item_at(Position::new(0, 1)), None);
    }

    #[test]
    fn test_end_reached_fires_once_per_length() {
        let style = StyleLayer::default();
        let mut list = SuggestionList::new();
        let mut render = RenderHarness::new(20, 3);

        let data = items(4);
        let mut fired = Vec::new();
        for _ in 0..2 {
            render.render(|frame| {
                let out = list.render(frame, frame.area(), &props(&data, &style, None, 1.0));
                fired.push(out.end_reached);
            });
        }
        assert_eq!(fired, vec![true, false]);

        let more = items(8);
        render.render(|frame| {
            let out = list.render(frame, frame.area(), &props(&more, &style, None, 1.0));
            assert!(!out.end_reached);
        });
    }

    #[test]
    fn test_end_reached_rearms_after_leaving_threshold() {
        let style = StyleLayer::default();
        let mut list = SuggestionList::new();
        let mut render = RenderHarness::new(20, 2);
        let data = items(6);
        let mut draw = |list: &mut SuggestionList| {
            let mut fired = false;
            render.render(|frame| {
                fired = list.render(frame, frame.area(), &props(&data, &style, None, 0.5)).end_reached;
            });
            fired
        };

        list.scroll_by(4, 6);
        assert!(draw(&mut list));
        assert!(!draw(&mut list));

        list.scroll_by(-4, 6);
        assert!(!draw(&mut list));
        list.scroll_by(4, 6);
        assert!(draw(&mut list));
    }

    #[test]
    fn test_scroll_by_clamps() {
        let mut list = SuggestionList::new();
        list.scroll_by(-3, 5);
        assert_eq!(list.scroll_offset(), 0);
        list.scroll_by(10, 5);
        assert_eq!(list.scroll_offset(), 4);
    }

    #[test]
    fn test_content_rows() {
        assert_eq!(SuggestionList::content_rows(3, false), 3);
        assert_eq!(SuggestionList::content_rows(3, true), 5);
        assert_eq!(SuggestionList::content_rows(0, true), 0);
    }
}
