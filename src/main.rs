use std::{
    error::Error,
    io::{self, Stdout},
};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::{
    cli::CommandLineArgs,
    controller::TaskList,
    logging::init_logging,
    terminal::{CrosstermEvents, TerminalPresenter},
    ui::Screen,
};

mod app;
mod cli;
mod controller;
mod error;
mod logging;
mod model;
mod presenter;
mod terminal;
mod ui;

fn main() -> Result<(), Box<dyn Error>> {
    let args = CommandLineArgs::parse();

    let _logging = match args.log_dir().map(|dir| init_logging(&dir, &args.log_level)) {
        Some(Ok(guard)) => Some(guard),
        Some(Err(err)) => {
            eprintln!("Logging disabled: {}", err);
            None
        }
        None => None,
    };

    let terminal = setup_terminal()?;
    let presenter = TerminalPresenter::new(terminal, CrosstermEvents, Screen::new(args.search.clone()));
    let mut tasks = TaskList::new(presenter, args.filter, args.search);

    tracing::info!(filter = %tasks.filter(), search = tasks.search_term(), "task list started");

    let result = app::run(&mut tasks);
    restore_terminal(tasks.presenter_mut().terminal_mut())?;
    match &result {
        Ok(()) => tracing::info!(count = tasks.tasks().len(), "task list closed"),
        Err(err) => tracing::error!(%err, "task list stopped"),
    }
    Ok(result?)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, Box<dyn Error>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    Ok(terminal.show_cursor()?)
}
