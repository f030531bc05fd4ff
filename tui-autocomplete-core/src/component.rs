//! Component trait for UI elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A UI component that renders from props and emits actions
///
/// Components follow these rules:
/// 1. Props contain ALL read-only data needed for rendering
/// 2. `handle_event` returns actions, never mutates external state
/// 3. `render` draws from props plus internal UI state (cursor, scroll, highlight)
///
/// Data owned by the application only changes through the actions a
/// component returns. Actions that arise while drawing (a list noticing it
/// reached its end) cannot be returned from `render`; such components queue
/// them and hand them over from [`drain_actions`](Component::drain_actions).
///
/// # Example
///
/// ```ignore
/// use tui_autocomplete_core::{Component, EventKind};
///
/// struct MatchBadge {
///     queued: Vec<AppAction>,
/// }
///
/// struct MatchBadgeProps {
///     matches: usize,
/// }
///
/// impl Component<AppAction> for MatchBadge {
///     type Props<'a> = MatchBadgeProps;
///
///     fn handle_event(&mut self, event: &EventKind, _props: Self::Props<'_>) -> impl IntoIterator<Item = AppAction> {
///         event.left_click().map(|_| AppAction::ClearQuery)
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
///         if props.matches == 0 {
///             self.queued.push(AppAction::NoMatches);
///         }
///         frame.render_widget(Paragraph::new(format!("{} matches", props.matches)), area);
///     }
///
///     fn drain_actions(&mut self) -> Vec<AppAction> {
///         std::mem::take(&mut self.queued)
///     }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions to dispatch
    ///
    /// Returns any type implementing `IntoIterator<Item = A>`:
    /// `None`, `Some(action)`, or a `Vec` of actions.
    /// The default returns no actions (render-only components).
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    /// Render the component to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);

    /// Take the actions queued during earlier renders
    fn drain_actions(&mut self) -> Vec<A> {
        Vec::new()
    }
}
