use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::warn;

use crate::{
    model::{Filter, Stats, Task},
    presenter::{ListView, Presenter},
    ui::{self, Dialog, InputField, Mode, Screen},
};

pub trait EventSource {
    fn next_event(&mut self) -> io::Result<Event>;
}

/// Reads events from the real terminal.
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        loop {
            if event::poll(Duration::from_millis(250))? {
                return event::read();
            }
        }
    }
}

/// Draws the task list on a terminal and runs the blocking dialogs.
pub struct TerminalPresenter<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    pub screen: Screen,
}

impl<B: Backend, E: EventSource> TerminalPresenter<B, E> {
    pub fn new(terminal: Terminal<B>, events: E, screen: Screen) -> Self {
        TerminalPresenter {
            terminal,
            events,
            screen,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    #[cfg(test)]
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn next_event(&mut self) -> io::Result<Event> {
        self.events.next_event()
    }

    pub fn redraw(&mut self) {
        let screen = &mut self.screen;
        if let Err(err) = self.terminal.draw(|frame| ui::draw(frame, screen)) {
            warn!(%err, "failed to draw");
        }
    }

    /// Waits for the next key press, skipping everything else.
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            match self.events.next_event()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(key),
                Event::Resize(_, _) => self.redraw(),
                _ => {}
            }
        }
    }
}

impl<B: Backend, E: EventSource> Presenter for TerminalPresenter<B, E> {
    fn render(&mut self, view: ListView) {
        self.screen.rows = view.rows;
        self.screen.placeholder = view.placeholder;
        self.screen.clamp_selection();
        self.redraw();
    }

    fn update_stats(&mut self, stats: Stats) {
        self.screen.stats = stats;
        self.redraw();
    }

    fn notify(&mut self, message: &str) {
        self.screen.dialog = Some(Dialog::Notice(message.to_string()));
        self.redraw();
        if let Err(err) = self.next_key() {
            warn!(%err, "notification closed without input");
        }
        self.screen.dialog = None;
        self.redraw();
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.screen.dialog = Some(Dialog::Confirm(message.to_string()));
        self.redraw();
        let accepted = match self.next_key() {
            Ok(key) => matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter),
            Err(err) => {
                warn!(%err, "confirmation closed without input");
                false
            }
        };
        self.screen.dialog = None;
        self.redraw();
        accepted
    }

    fn show_filter(&mut self, filter: Filter) {
        self.screen.filter = filter;
        self.redraw();
    }

    fn clear_inputs(&mut self) {
        self.screen.new_text.clear();
        self.screen.new_date.clear();
    }

    fn focus_edit(&mut self, task: &Task) {
        self.screen.edit_text = task.text.clone();
        self.screen.edit_date = task.due_date.map(|date| date.to_string()).unwrap_or_default();
        self.screen.select_id(task.id);
        self.screen.mode = Mode::Input(InputField::EditText);
        self.redraw();
    }
}
