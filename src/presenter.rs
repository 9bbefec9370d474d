use crate::model::{Filter, Stats, Task};

pub const NO_TASKS: &str = "No tasks found";
pub const NO_MATCHES: &str = "No tasks match your search";

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub task: Task,
    pub editing: bool,
}

/// Everything needed to draw the task list once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListView {
    pub rows: Vec<Row>,
    /// Set when there are no rows to show.
    pub placeholder: Option<&'static str>,
}

/// The side of the application that shows things to the user and asks
/// questions back. The controller calls into it after every change.
pub trait Presenter {
    fn render(&mut self, view: ListView);

    fn update_stats(&mut self, stats: Stats);

    /// Blocks until the user has seen the message.
    fn notify(&mut self, message: &str);

    /// Blocks until the user accepts or declines.
    fn confirm(&mut self, message: &str) -> bool;

    fn show_filter(&mut self, filter: Filter);

    /// Empties the new task inputs after a successful add.
    fn clear_inputs(&mut self);

    /// Called after the render that put `task` in edit mode.
    fn focus_edit(&mut self, task: &Task);
}
