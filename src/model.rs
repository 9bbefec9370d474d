use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate};

use crate::error::{UnknownFilter, ValidationError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Local>,
}

impl Task {
    pub fn new(id: TaskId, text: String, due_date: Option<NaiveDate>) -> Self {
        Task {
            id,
            text,
            completed: false,
            due_date,
            created_at: Local::now(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.completed {
            true => "Completed",
            false => "Pending",
        }
    }

    pub fn due_label(&self) -> String {
        match self.due_date {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => "-".to_string(),
        }
    }
}

/// Parses a due date typed by the user. Empty input means "no date".
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Pending];

    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
        }
    }

    /// Text shown on the filter control.
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "FILTER",
            Filter::Completed => "COMPLETED",
            Filter::Pending => "PENDING",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Pending => !task.completed,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Filter::All => 0,
            Filter::Completed => 1,
            Filter::Pending => 2,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "pending" => Ok(Filter::Pending),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub progress_percentage: u8,
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let progress_percentage = match total {
            0 => 0,
            total => ((completed as f64 / total as f64) * 100.0).round() as u8,
        };
        Stats {
            total,
            completed,
            pending: total - completed,
            progress_percentage,
        }
    }
}
