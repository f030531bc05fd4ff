//! Terminal event polling on a background task

use crate::event::EventKind;
use crossterm::event::{self, MouseEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Raw event from crossterm before processing
#[derive(Debug)]
pub enum RawEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize(u16, u16),
}

/// Spawn the event polling task with cancellation support
///
/// Polls crossterm for events and sends them through `tx` until the token is
/// cancelled or the receiver is dropped.
///
/// # Arguments
/// * `tx` - Channel to send raw events
/// * `poll_timeout` - Timeout for each poll operation
/// * `loop_sleep` - Sleep duration between poll cycles
/// * `cancel_token` - Token to cancel the polling task
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut events_processed = 0;
                    while events_processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        events_processed += 1;
                        let Ok(evt) = event::read() else { continue };
                        let Some(raw) = into_raw(evt) else { continue };
                        if tx.send(raw).is_err() {
                            debug!("Event channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}

fn into_raw(evt: event::Event) -> Option<RawEvent> {
    match evt {
        event::Event::Key(key) => Some(RawEvent::Key(key)),
        event::Event::Mouse(mouse) => Some(RawEvent::Mouse(mouse)),
        event::Event::Resize(w, h) => Some(RawEvent::Resize(w, h)),
        _ => None,
    }
}

/// Process a raw event into an EventKind
pub fn process_raw_event(raw: RawEvent) -> EventKind {
    match raw {
        RawEvent::Key(key) => EventKind::Key(key),
        RawEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: 1,
            },
            MouseEventKind::ScrollUp => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: -1,
            },
            _ => EventKind::Mouse(mouse),
        },
        RawEvent::Resize(w, h) => EventKind::Resize(w, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    #[test]
    fn test_process_raw_event_key() {
        let key_event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let kind = process_raw_event(RawEvent::Key(key_event));
        assert!(matches!(kind, EventKind::Key(_)));
    }

    #[test]
    fn test_process_raw_event_scroll() {
        let scroll_up = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 10,
            row: 20,
            modifiers: KeyModifiers::NONE,
        };

        match process_raw_event(RawEvent::Mouse(scroll_up)) {
            EventKind::Scroll { column, row, delta } => {
                assert_eq!(column, 10);
                assert_eq!(row, 20);
                assert_eq!(delta, -1);
            }
            other => panic!("Expected Scroll event, got {other:?}"),
        }
    }

    #[test]
    fn test_process_raw_event_resize() {
        let kind = process_raw_event(RawEvent::Resize(80, 24));
        assert!(matches!(kind, EventKind::Resize(80, 24)));
    }

    #[test]
    fn test_into_raw_skips_focus_events() {
        assert!(into_raw(event::Event::FocusGained).is_none());
        assert!(matches!(
            into_raw(event::Event::Resize(1, 2)),
            Some(RawEvent::Resize(1, 2))
        ));
    }

    #[tokio::test]
    async fn test_poller_stops_on_cancel() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let handle = spawn_event_poller(
            tx,
            Duration::ZERO,
            Duration::from_secs(60),
            token.clone(),
        );
        token.cancel();
        handle.await.unwrap();
    }
}
