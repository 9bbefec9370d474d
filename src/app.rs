use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use tracing::debug;

use crate::{
    controller::TaskList,
    error::AppError,
    terminal::{EventSource, TerminalPresenter},
    ui::{InputField, Mode},
};

pub type App<B, E> = TaskList<TerminalPresenter<B, E>>;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run<B: Backend, E: EventSource>(app: &mut App<B, E>) -> Result<(), AppError> {
    app.presenter_mut().redraw();
    loop {
        let event = app.presenter_mut().next_event()?;
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) == Flow::Quit {
                    return Ok(());
                }
            }
            _ => {}
        }
        app.presenter_mut().redraw();
    }
}

fn handle_key<B: Backend, E: EventSource>(app: &mut App<B, E>, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('f') {
        focus(app, InputField::Search);
        return Flow::Continue;
    }

    match app.presenter().screen.mode {
        Mode::Browse => return handle_browse(app, key),
        Mode::Input(field) => handle_input(app, field, key),
        Mode::FilterMenu => handle_filter_menu(app, key),
    }
    Flow::Continue
}

fn handle_browse<B: Backend, E: EventSource>(app: &mut App<B, E>, key: KeyEvent) -> Flow {
    let selected = app.presenter().screen.selected_id();
    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.presenter_mut().screen.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.presenter_mut().screen.move_up(),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = selected {
                app.toggle_task(id);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = selected {
                app.edit_task(id);
            }
        }
        KeyCode::Char('D') => {
            if let Some(id) = selected {
                app.delete_task(id);
            }
        }
        KeyCode::Char('X') => app.delete_all_tasks(),
        KeyCode::Char('a') => focus(app, InputField::NewText),
        KeyCode::Char('/') => focus(app, InputField::Search),
        KeyCode::Char('f') => app.presenter_mut().screen.open_filter_menu(),
        _ => {}
    }
    Flow::Continue
}

fn handle_input<B: Backend, E: EventSource>(app: &mut App<B, E>, field: InputField, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.presenter_mut().screen.field_mut(field).push(c);
            if field == InputField::Search {
                sync_search(app);
            }
        }
        KeyCode::Backspace => {
            app.presenter_mut().screen.field_mut(field).pop();
            if field == InputField::Search {
                sync_search(app);
            }
        }
        KeyCode::Tab => focus(app, field.next()),
        KeyCode::Enter => submit(app, field),
        KeyCode::Esc => {
            if field.is_edit() {
                if let Some(id) = app.editing() {
                    app.cancel_edit_task(id);
                }
            }
            focus_list(app);
        }
        _ => {}
    }
}

fn submit<B: Backend, E: EventSource>(app: &mut App<B, E>, field: InputField) {
    match field {
        InputField::NewText | InputField::NewDate => {
            let screen = &app.presenter().screen;
            let (text, date) = (screen.new_text.clone(), screen.new_date.clone());
            if let Ok(id) = app.add_task(&text, &date) {
                debug!(task_id = %id, "added from input");
                focus(app, InputField::NewText);
            }
        }
        InputField::Search => focus_list(app),
        InputField::EditText | InputField::EditDate => {
            let Some(id) = app.editing() else {
                focus_list(app);
                return;
            };
            let screen = &app.presenter().screen;
            let (text, date) = (screen.edit_text.clone(), screen.edit_date.clone());
            if app.save_edit_task(id, &text, &date).is_ok() {
                focus_list(app);
            }
        }
    }
}

fn handle_filter_menu<B: Backend, E: EventSource>(app: &mut App<B, E>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.presenter_mut().screen.filter_menu_move(true),
        KeyCode::Char('k') | KeyCode::Up => app.presenter_mut().screen.filter_menu_move(false),
        KeyCode::Enter => {
            let filter = app.presenter().screen.filter_menu_choice();
            focus_list(app);
            app.set_filter(filter);
        }
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => focus_list(app),
        _ => {}
    }
}

fn sync_search<B: Backend, E: EventSource>(app: &mut App<B, E>) {
    let term = app.presenter().screen.search.clone();
    app.set_search_term(&term);
}

fn focus<B: Backend, E: EventSource>(app: &mut App<B, E>, field: InputField) {
    // Leaving an edit row through a shortcut drops the edit.
    if !field.is_edit() {
        if let Some(id) = app.editing() {
            app.cancel_edit_task(id);
        }
    }
    app.presenter_mut().screen.mode = Mode::Input(field);
}

fn focus_list<B: Backend, E: EventSource>(app: &mut App<B, E>) {
    app.presenter_mut().screen.mode = Mode::Browse;
}
