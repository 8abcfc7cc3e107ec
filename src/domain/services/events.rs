use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

/// Merges terminal input with events coming back from background work, and
/// ticks so the UI redraws even when nothing happens.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_key(&self, keyevent: KeyEvent) -> Option<Event> {
        if keyevent.kind == KeyEventKind::Release {
            return None;
        }
        if keyevent.code == KeyCode::BackTab {
            return Some(Event::KeyboardBackTab());
        }

        match keyevent.into() {
            Input { key: Key::Down, .. } | Input {
                key: Key::MouseScrollDown,
                ..
            } => {
                return Some(Event::UIScrollDown());
            }
            Input { key: Key::Up, .. } | Input {
                key: Key::MouseScrollUp,
                ..
            } => {
                return Some(Event::UIScrollUp());
            }
            Input {
                key: Key::PageDown, ..
            }
            | Input {
                key: Key::Char('d'),
                ctrl: true,
                ..
            } => {
                return Some(Event::UIScrollPageDown());
            }
            Input {
                key: Key::PageUp, ..
            }
            | Input {
                key: Key::Char('u'),
                ctrl: true,
                ..
            } => {
                return Some(Event::UIScrollPageUp());
            }
            Input {
                key: Key::Char('c'),
                ctrl: true,
                ..
            } => {
                return Some(Event::KeyboardCTRLC());
            }
            Input {
                key: Key::Char('n'),
                ctrl: true,
                ..
            } => {
                return Some(Event::KeyboardCTRLN());
            }
            Input { key: Key::Tab, .. } => {
                return Some(Event::KeyboardTab());
            }
            Input {
                key: Key::Enter, ..
            } => {
                return Some(Event::KeyboardEnter());
            }
            input => {
                return Some(Event::KeyboardCharInput(input));
            }
        }
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            CrosstermEvent::Key(keyevent) => return self.handle_key(keyevent),
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
