use std::cmp::min;

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::{
    model::{Filter, Stats, TaskId},
    presenter::Row,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputField {
    NewText,
    NewDate,
    Search,
    EditText,
    EditDate,
}

impl InputField {
    fn title(self) -> &'static str {
        match self {
            InputField::NewText => "New task",
            InputField::NewDate => "Due (YYYY-MM-DD)",
            InputField::Search => "Search",
            InputField::EditText => "Task",
            InputField::EditDate => "Due",
        }
    }

    /// The field Tab moves to.
    pub fn next(self) -> Self {
        match self {
            InputField::NewText => InputField::NewDate,
            InputField::NewDate => InputField::NewText,
            InputField::Search => InputField::Search,
            InputField::EditText => InputField::EditDate,
            InputField::EditDate => InputField::EditText,
        }
    }

    pub fn is_edit(self) -> bool {
        matches!(self, InputField::EditText | InputField::EditDate)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Input(InputField),
    FilterMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Notice(String),
    Confirm(String),
}

/// What the terminal shows, kept between draws.
pub struct Screen {
    pub mode: Mode,
    pub rows: Vec<Row>,
    pub placeholder: Option<&'static str>,
    pub stats: Stats,
    pub filter: Filter,
    pub new_text: String,
    pub new_date: String,
    pub search: String,
    pub edit_text: String,
    pub edit_date: String,
    pub list_state: ListState,
    pub filter_menu: ListState,
    pub dialog: Option<Dialog>,
}

impl Screen {
    pub fn new(search: String) -> Self {
        Screen {
            mode: Mode::Browse,
            rows: vec![],
            placeholder: None,
            stats: Stats::default(),
            filter: Filter::All,
            new_text: String::new(),
            new_date: String::new(),
            search,
            edit_text: String::new(),
            edit_date: String::new(),
            list_state: ListState::default(),
            filter_menu: ListState::default(),
            dialog: None,
        }
    }

    pub fn field(&self, field: InputField) -> &str {
        match field {
            InputField::NewText => &self.new_text,
            InputField::NewDate => &self.new_date,
            InputField::Search => &self.search,
            InputField::EditText => &self.edit_text,
            InputField::EditDate => &self.edit_date,
        }
    }

    pub fn field_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::NewText => &mut self.new_text,
            InputField::NewDate => &mut self.new_date,
            InputField::Search => &mut self.search,
            InputField::EditText => &mut self.edit_text,
            InputField::EditDate => &mut self.edit_date,
        }
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.list_state
            .selected()
            .and_then(|index| self.rows.get(index))
            .map(|row| row.task.id)
    }

    pub fn select_id(&mut self, id: TaskId) {
        if let Some(index) = self.rows.iter().position(|row| row.task.id == id) {
            self.list_state.select(Some(index));
        }
    }

    /// Keeps the selection on a row that still exists after a render.
    pub fn clamp_selection(&mut self) {
        let selected = match (self.rows.len(), self.list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(index)) => Some(min(index, len - 1)),
        };
        self.list_state.select(selected);
    }

    pub fn move_up(&mut self) {
        match self.list_state.selected() {
            Some(v) => self.list_state.select(Some(v.saturating_sub(1))),
            None => self.clamp_selection(),
        }
    }

    pub fn move_down(&mut self) {
        match self.list_state.selected() {
            Some(v) if !self.rows.is_empty() => {
                self.list_state.select(Some(min(v + 1, self.rows.len() - 1)))
            }
            _ => self.clamp_selection(),
        }
    }

    pub fn open_filter_menu(&mut self) {
        self.filter_menu.select(Some(self.filter.index()));
        self.mode = Mode::FilterMenu;
    }

    pub fn filter_menu_move(&mut self, down: bool) {
        let current = self.filter_menu.selected().unwrap_or(0);
        let next = match down {
            true => min(current + 1, Filter::ALL.len() - 1),
            false => current.saturating_sub(1),
        };
        self.filter_menu.select(Some(next));
    }

    pub fn filter_menu_choice(&self) -> Filter {
        Filter::ALL[self.filter_menu.selected().unwrap_or(0)]
    }

    fn focused(&self) -> Option<InputField> {
        match self.mode {
            Mode::Input(field) => Some(field),
            _ => None,
        }
    }
}

/// Makes user text safe to put on the terminal: control characters would
/// otherwise be sent to the terminal as-is.
pub fn literal(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { char::REPLACEMENT_CHARACTER } else { c })
        .collect()
}

pub fn draw<B: Backend>(frame: &mut Frame<B>, screen: &mut Screen) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(size);

    frame.render_widget(
        Paragraph::new(vec![Line::from(vec![
            Span::styled("Tasks", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("[{}]", screen.filter.label()), Style::default().fg(Color::Cyan)),
        ])])
        .alignment(Alignment::Center),
        chunks[0],
    );

    draw_stats(frame, chunks[1], &screen.stats);
    draw_inputs(frame, chunks[2], chunks[3], screen);
    draw_tasks(frame, chunks[4], screen);
    frame.render_widget(Paragraph::new(vec![help_line(screen.mode)]), chunks[5]);

    if screen.mode == Mode::FilterMenu {
        draw_filter_menu(frame, chunks[0], screen);
    }
    if let Some(dialog) = &screen.dialog {
        draw_dialog(frame, size, dialog);
    }
}

fn draw_stats<B: Backend>(frame: &mut Frame<B>, area: Rect, stats: &Stats) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(40),
            ]
            .as_ref(),
        )
        .split(area);

    let counters = [
        ("Total", stats.total, Color::White),
        ("Completed", stats.completed, Color::Green),
        ("Pending", stats.pending, Color::Yellow),
    ];
    for (i, (title, value, color)) in counters.into_iter().enumerate() {
        frame.render_widget(
            Paragraph::new(value.to_string())
                .style(Style::default().fg(color))
                .block(Block::default().title(title).borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[i],
        );
    }

    frame.render_widget(
        Gauge::default()
            .block(Block::default().title("Progress").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(u16::from(stats.progress_percentage))
            .label(format!("{}%", stats.progress_percentage)),
        chunks[3],
    );
}

fn input_box<'a>(field: InputField, value: &str, focused: bool) -> Paragraph<'a> {
    let border = match focused {
        true => Style::default().fg(Color::Cyan),
        false => Style::default(),
    };
    Paragraph::new(literal(value)).block(
        Block::default()
            .title(field.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    )
}

fn draw_inputs<B: Backend>(frame: &mut Frame<B>, new_area: Rect, search_area: Rect, screen: &Screen) {
    let focused = screen.focused();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(22)].as_ref())
        .split(new_area);

    let fields = [
        (InputField::NewText, chunks[0]),
        (InputField::NewDate, chunks[1]),
        (InputField::Search, search_area),
    ];
    for (field, area) in fields {
        let value = screen.field(field);
        frame.render_widget(input_box(field, value, focused == Some(field)), area);
        if focused == Some(field) {
            place_cursor(frame, area, value);
        }
    }
}

fn place_cursor<B: Backend>(frame: &mut Frame<B>, area: Rect, value: &str) {
    let width = Span::raw(value).width();
    let offset = min(width, usize::from(area.width.saturating_sub(3))) as u16;
    frame.set_cursor(area.x + 1 + offset, area.y + 1);
}

fn task_line(row: &Row) -> Line<'static> {
    let task = &row.task;
    let checkbox = match task.completed {
        true => "[x] ",
        false => "[ ] ",
    };
    let text_style = match task.completed {
        true => Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM),
        false => Style::default(),
    };
    let badge = match task.completed {
        true => Span::styled(task.status_label(), Style::default().fg(Color::Green)),
        false => Span::styled(task.status_label(), Style::default().fg(Color::Yellow)),
    };
    Line::from(vec![
        Span::raw(checkbox),
        Span::styled(literal(&task.text), text_style),
        Span::raw("  "),
        Span::styled(task.due_label(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        badge,
    ])
}

fn edit_line(row: &Row, screen: &Screen) -> Line<'static> {
    let checkbox = match row.task.completed {
        true => "[x] ",
        false => "[ ] ",
    };
    let focused = screen.focused();
    let field_style = |field: InputField| match focused == Some(field) {
        true => Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
        false => Style::default().add_modifier(Modifier::UNDERLINED),
    };
    Line::from(vec![
        Span::raw(checkbox),
        Span::styled(literal(&screen.edit_text), field_style(InputField::EditText)),
        Span::raw("  "),
        Span::styled(literal(&screen.edit_date), field_style(InputField::EditDate)),
        Span::raw("  "),
        "(Enter) Save".green(),
        Span::raw(" "),
        "(Esc) Cancel".red(),
    ])
}

fn draw_tasks<B: Backend>(frame: &mut Frame<B>, area: Rect, screen: &mut Screen) {
    let block = Block::default().title("Tasks").borders(Borders::ALL);

    if let Some(placeholder) = screen.placeholder {
        frame.render_widget(
            Paragraph::new(placeholder)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = screen
        .rows
        .iter()
        .map(|row| match row.editing {
            true => ListItem::new(vec![edit_line(row, screen)]),
            false => ListItem::new(vec![task_line(row)]),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().add_modifier(Modifier::ITALIC))
        .highlight_symbol(">>");

    frame.render_stateful_widget(list, area, &mut screen.list_state);
}

fn draw_filter_menu<B: Backend>(frame: &mut Frame<B>, anchor: Rect, screen: &mut Screen) {
    let area = Rect {
        x: anchor.x + anchor.width / 2,
        y: anchor.y + 1,
        width: min(16, anchor.width / 2),
        height: Filter::ALL.len() as u16 + 2,
    }
    .intersection(frame.size());

    let items: Vec<ListItem> = Filter::ALL
        .iter()
        .map(|filter| ListItem::new(vec![Line::from(filter.name())]))
        .collect();
    let menu = List::new(items)
        .block(Block::default().title("Filter").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(menu, area, &mut screen.filter_menu);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = min(width, area.width);
    let height = min(height, area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_dialog<B: Backend>(frame: &mut Frame<B>, size: Rect, dialog: &Dialog) {
    let (title, message, hint) = match dialog {
        Dialog::Notice(message) => ("Notice", message, Line::from("(any key) OK".italic())),
        Dialog::Confirm(message) => (
            "Confirm",
            message,
            Line::from(vec!["(y) Yes".green(), Span::raw("  "), "(n) No".red()]),
        ),
    };
    let area = centered(size, 50, 7);
    let text = vec![Line::from(literal(message)), Line::from(""), hint];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        area,
    );
}

fn help_line(mode: Mode) -> Line<'static> {
    let help = match mode {
        Mode::Browse => {
            "(a) add  (space) toggle  (e) edit  (D) delete  (X) delete all  (/) search  (f) filter  (q) quit"
        }
        Mode::Input(field) if field.is_edit() => "(Tab) switch field  (Enter) save  (Esc) cancel",
        Mode::Input(InputField::Search) => "(Enter/Esc) back to list",
        Mode::Input(_) => "(Tab) switch field  (Enter) add  (Esc) back to list",
        Mode::FilterMenu => "(j/k) choose  (Enter) apply  (Esc) close",
    };
    Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))
}
