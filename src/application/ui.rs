use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::SessionId;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::SessionStore;

const SIDEBAR_WIDTH: u16 = 30;

fn render_sidebar<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let items = app_state
        .sidebar()
        .into_iter()
        .map(|entry| {
            let mut style = Style::default();
            if entry.active {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            return ListItem::new(entry.title).style(style);
        })
        .collect::<Vec<ListItem>>();

    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("Chats")),
        rect,
    );
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let mut loading = Loading::default();

    loop {
        textarea.set_session_title(&app_state.active_title());
        terminal.draw(|frame| {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(frame.size());

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(columns[1]);

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            render_sidebar(frame, columns[0], app_state);

            app_state
                .bubble_list
                .draw(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            match app_state.pending_title() {
                Some(title) => loading.render(frame, layout[1], &title),
                None => frame.render_widget(textarea.widget(), layout[1]),
            }
        })?;

        match events.next().await? {
            Event::EndpointResponse(res) => {
                app_state.handle_response(res).await;
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLN() => {
                app_state.new_session().await;
            }
            Event::KeyboardTab() => {
                app_state.select_next().await;
            }
            Event::KeyboardBackTab() => {
                app_state.select_previous().await;
            }
            Event::KeyboardEnter() => {
                if app_state.is_waiting() {
                    continue;
                }

                if app_state.submit(&textarea.text(), &tx).await? {
                    textarea.clear();
                    loading.reset();
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.is_waiting() {
                    textarea.insert_str(text);
                }
            }
            Event::KeyboardCharInput(input) => {
                if !app_state.is_waiting() {
                    textarea.input(input);
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                if app_state.is_waiting() {
                    loading.tick();
                }
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    );
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    store: SessionStore,
    requested: Option<SessionId>,
) -> Result<()> {
    let mut app_state = AppState::new(store, requested.as_ref()).await;
    let mut events = EventsService::new(rx);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state, tx, &mut events).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = app_state.store.flush().await {
        tracing::error!(error = ?err, "Failed to save chat history on exit");
    }

    return res;
}
