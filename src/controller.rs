use chrono::Local;
use tracing::{debug, info};

use crate::{
    error::ValidationError,
    model::{parse_due_date, Filter, Stats, Task, TaskId},
    presenter::{ListView, Presenter, Row, NO_MATCHES, NO_TASKS},
};

pub const DELETE_ALL_PROMPT: &str = "Are you sure you want to delete all tasks?";

/// Owns the tasks and the view filters. Every mutation ends with the
/// presenter being told about the new state.
pub struct TaskList<P: Presenter> {
    tasks: Vec<Task>,
    filter: Filter,
    search_term: String,
    editing: Option<TaskId>,
    last_id: u64,
    presenter: P,
}

impl<P: Presenter> TaskList<P> {
    pub fn new(presenter: P, filter: Filter, search_term: String) -> Self {
        let mut list = TaskList {
            tasks: vec![],
            filter,
            search_term,
            editing: None,
            last_id: 0,
            presenter,
        };
        list.presenter.show_filter(filter);
        list.update_stats();
        list.render();
        list
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn add_task(&mut self, text: &str, due_date: &str) -> Result<TaskId, ValidationError> {
        let text = text.trim();
        let due_date = due_date.trim();
        let checked = match (text.is_empty(), due_date.is_empty()) {
            (true, true) => Err(ValidationError::MissingTextAndDate),
            (true, false) => Err(ValidationError::MissingText),
            (false, true) => Err(ValidationError::MissingDate),
            (false, false) => parse_due_date(due_date),
        };
        let due_date = match checked {
            Ok(date) => date,
            Err(err) => return Err(self.reject(err)),
        };

        let id = self.next_id();
        self.tasks.push(Task::new(id, text.to_string(), due_date));
        info!(task_id = %id, "task added");

        self.presenter.clear_inputs();
        self.refresh();
        Ok(id)
    }

    pub fn toggle_task(&mut self, id: TaskId) {
        let Some(task) = self.find_mut(id) else {
            debug!(task_id = %id, "toggle of unknown task ignored");
            return;
        };
        task.completed = !task.completed;
        info!(task_id = %id, completed = task.completed, "task toggled");
        self.refresh();
    }

    pub fn delete_task(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!(task_id = %id, "delete of unknown task ignored");
            return;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        info!(task_id = %id, "task deleted");
        self.refresh();
    }

    pub fn delete_all_tasks(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        if !self.presenter.confirm(DELETE_ALL_PROMPT) {
            debug!("delete all declined");
            return;
        }
        info!(count = self.tasks.len(), "all tasks deleted");
        self.tasks.clear();
        self.editing = None;
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        debug!(%filter, "filter changed");
        self.render();
        self.presenter.show_filter(filter);
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.render();
    }

    pub fn edit_task(&mut self, id: TaskId) {
        if self.find(id).is_none() {
            debug!(task_id = %id, "edit of unknown task ignored");
            return;
        }
        self.editing = Some(id);
        self.render();
        if let Some(task) = self.tasks.iter().find(|task| task.id == id) {
            self.presenter.focus_edit(task);
        }
    }

    /// Commits the edit buffers of `id`. On rejection the task stays in
    /// edit mode.
    pub fn save_edit_task(
        &mut self,
        id: TaskId,
        text: &str,
        due_date: &str,
    ) -> Result<(), ValidationError> {
        if self.find(id).is_none() {
            debug!(task_id = %id, "save of unknown task ignored");
            return Ok(());
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(self.reject(ValidationError::EmptyText));
        }
        let due_date = match parse_due_date(due_date) {
            Ok(date) => date,
            Err(err) => return Err(self.reject(err)),
        };

        if let Some(task) = self.find_mut(id) {
            task.text = text.to_string();
            task.due_date = due_date;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
        info!(task_id = %id, "task edited");
        self.render();
        Ok(())
    }

    pub fn cancel_edit_task(&mut self, id: TaskId) {
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.render();
    }

    /// Tasks matching the search term and the status filter, in insertion
    /// order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let needle = self.search_term.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| needle.is_empty() || task.text.to_lowercase().contains(&needle))
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.tasks)
    }

    pub fn update_stats(&mut self) {
        let stats = self.stats();
        self.presenter.update_stats(stats);
    }

    fn render(&mut self) {
        let rows: Vec<Row> = self
            .filtered_tasks()
            .into_iter()
            .map(|task| Row {
                task: task.clone(),
                editing: self.editing == Some(task.id),
            })
            .collect();
        let placeholder = match (rows.is_empty(), self.tasks.is_empty()) {
            (false, _) => None,
            (true, true) => Some(NO_TASKS),
            (true, false) => Some(NO_MATCHES),
        };
        self.presenter.render(ListView { rows, placeholder });
    }

    fn refresh(&mut self) {
        self.update_stats();
        self.render();
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        debug!(%err, "input rejected");
        self.presenter.notify(&err.to_string());
        err
    }

    fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn next_id(&mut self) -> TaskId {
        let now = Local::now().timestamp_millis().max(0) as u64;
        self.last_id = now.max(self.last_id + 1);
        TaskId(self.last_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    #[derive(Default)]
    pub struct RecordingPresenter {
        pub views: Vec<ListView>,
        pub stats: Vec<Stats>,
        pub notices: Vec<String>,
        pub prompts: Vec<String>,
        pub answers: VecDeque<bool>,
        pub filters: Vec<Filter>,
        pub cleared: usize,
        pub focused: Vec<TaskId>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, view: ListView) {
            self.views.push(view);
        }

        fn update_stats(&mut self, stats: Stats) {
            self.stats.push(stats);
        }

        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }

        fn confirm(&mut self, message: &str) -> bool {
            self.prompts.push(message.to_string());
            self.answers.pop_front().unwrap_or(false)
        }

        fn show_filter(&mut self, filter: Filter) {
            self.filters.push(filter);
        }

        fn clear_inputs(&mut self) {
            self.cleared += 1;
        }

        fn focus_edit(&mut self, task: &Task) {
            self.focused.push(task.id);
        }
    }

    fn list() -> TaskList<RecordingPresenter> {
        TaskList::new(RecordingPresenter::default(), Filter::All, String::new())
    }

    fn last_view(list: &TaskList<RecordingPresenter>) -> &ListView {
        list.presenter().views.last().unwrap()
    }

    fn last_stats(list: &TaskList<RecordingPresenter>) -> Stats {
        *list.presenter().stats.last().unwrap()
    }

    #[test]
    fn starts_empty_and_renders_once() {
        let list = list();
        assert!(list.tasks().is_empty());
        assert_eq!(list.presenter().views.len(), 1);
        assert_eq!(last_view(&list).placeholder, Some(NO_TASKS));
        assert_eq!(last_stats(&list), Stats::default());
        assert_eq!(list.presenter().filters, vec![Filter::All]);
    }

    #[test]
    fn add_appends_and_clears_inputs() {
        let mut list = list();
        let id = list.add_task("  Buy milk ", " 2024-01-01 ").unwrap();

        assert_eq!(list.tasks().len(), 1);
        let task = &list.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.due_label(), "2024-01-01");
        assert!(!task.completed);
        assert_eq!(list.presenter().cleared, 1);
        assert_eq!(last_view(&list).rows.len(), 1);
        assert_eq!(last_stats(&list).total, 1);
    }

    #[test]
    fn add_validation_order() {
        let mut list = list();
        assert_eq!(list.add_task("", ""), Err(ValidationError::MissingTextAndDate));
        assert_eq!(list.add_task("  ", "2024-01-01"), Err(ValidationError::MissingText));
        assert_eq!(list.add_task("Walk", " "), Err(ValidationError::MissingDate));
        assert_eq!(
            list.add_task("Walk", "someday"),
            Err(ValidationError::InvalidDate("someday".to_string()))
        );
        assert!(list.tasks().is_empty());
        assert_eq!(list.presenter().notices.len(), 4);
        assert_eq!(list.presenter().cleared, 0);
        assert_eq!(list.presenter().views.len(), 1);
    }

    #[test]
    fn rejected_add_does_not_grow_list() {
        let mut list = list();
        assert!(list.add_task("Buy milk", "2024-01-01").is_ok());
        assert_eq!(list.tasks().len(), 1);
        assert!(list.add_task("", "").is_err());
        assert_eq!(list.tasks().len(), 1);
        assert_eq!(
            list.presenter().notices,
            vec![ValidationError::MissingTextAndDate.to_string()]
        );
    }

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let mut list = list();
        let ids: Vec<TaskId> = (0..50)
            .map(|i| list.add_task(&format!("task {}", i), "2024-01-01").unwrap())
            .collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn toggle_updates_stats_and_is_idempotent_twice() {
        let mut list = list();
        let id = list.add_task("Task A", "2024-01-01").unwrap();

        list.toggle_task(id);
        assert!(list.tasks()[0].completed);
        assert_eq!(
            last_stats(&list),
            Stats {
                total: 1,
                completed: 1,
                pending: 0,
                progress_percentage: 100
            }
        );

        list.toggle_task(id);
        assert!(!list.tasks()[0].completed);
        assert_eq!(last_stats(&list).progress_percentage, 0);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut list = list();
        list.add_task("Task A", "2024-01-01").unwrap();
        let renders = list.presenter().views.len();
        let missing = TaskId(1);

        list.toggle_task(missing);
        list.delete_task(missing);
        list.edit_task(missing);
        list.cancel_edit_task(TaskId(2)); // re-renders but changes nothing
        assert_eq!(list.save_edit_task(missing, "", ""), Ok(()));

        assert_eq!(list.tasks().len(), 1);
        assert!(!list.tasks()[0].completed);
        assert_eq!(list.editing(), None);
        assert!(list.presenter().notices.is_empty());
        assert_eq!(list.presenter().views.len(), renders + 1);
    }

    #[test]
    fn delete_removes_in_place() {
        let mut list = list();
        let a = list.add_task("A", "2024-01-01").unwrap();
        let b = list.add_task("B", "2024-01-02").unwrap();
        let c = list.add_task("C", "2024-01-03").unwrap();

        list.delete_task(b);
        let ids: Vec<TaskId> = list.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(last_stats(&list).total, 2);
    }

    #[test]
    fn delete_all_asks_and_respects_answer() {
        let mut list = list();
        list.add_task("A", "2024-01-01").unwrap();
        list.add_task("B", "2024-01-01").unwrap();

        list.presenter_mut().answers.push_back(false);
        list.delete_all_tasks();
        assert_eq!(list.tasks().len(), 2);

        list.presenter_mut().answers.push_back(true);
        list.delete_all_tasks();
        assert!(list.tasks().is_empty());
        assert_eq!(list.presenter().prompts, vec![DELETE_ALL_PROMPT; 2]);
        assert_eq!(last_view(&list).placeholder, Some(NO_TASKS));
        assert_eq!(last_stats(&list), Stats::default());
    }

    #[test]
    fn delete_all_on_empty_list_does_not_prompt() {
        let mut list = list();
        list.delete_all_tasks();
        assert!(list.presenter().prompts.is_empty());
    }

    #[test]
    fn filter_changes_render_but_not_stats() {
        let mut list = list();
        let a = list.add_task("A", "2024-01-01").unwrap();
        list.add_task("B", "2024-01-01").unwrap();
        list.add_task("C", "2024-01-01").unwrap();
        list.toggle_task(a);
        let stats_calls = list.presenter().stats.len();

        list.set_filter(Filter::Pending);
        let texts: Vec<&str> = last_view(&list).rows.iter().map(|r| r.task.text.as_str()).collect();
        assert_eq!(texts, vec!["B", "C"]);
        assert_eq!(list.presenter().stats.len(), stats_calls);
        assert_eq!(list.presenter().filters.last(), Some(&Filter::Pending));

        list.set_filter(Filter::Completed);
        let texts: Vec<&str> = last_view(&list).rows.iter().map(|r| r.task.text.as_str()).collect();
        assert_eq!(texts, vec!["A"]);
    }

    #[test]
    fn search_is_case_insensitive_and_combines_with_filter() {
        let mut list = list();
        let milk = list.add_task("Buy MILK", "2024-01-01").unwrap();
        list.add_task("Walk dog", "2024-01-01").unwrap();
        list.add_task("milkshake", "2024-01-01").unwrap();
        list.toggle_task(milk);

        list.set_search_term("Milk");
        let texts: Vec<&str> = list.filtered_tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Buy MILK", "milkshake"]);

        list.set_filter(Filter::Pending);
        let texts: Vec<&str> = list.filtered_tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["milkshake"]);

        list.set_search_term("nothing like this");
        assert_eq!(last_view(&list).placeholder, Some(NO_MATCHES));
    }

    #[test]
    fn only_one_task_edits_at_a_time() {
        let mut list = list();
        let x = list.add_task("X", "2024-01-01").unwrap();
        let y = list.add_task("Y", "2024-01-01").unwrap();

        list.edit_task(x);
        list.edit_task(y);
        assert_eq!(list.editing(), Some(y));
        let editing: Vec<bool> = last_view(&list).rows.iter().map(|r| r.editing).collect();
        assert_eq!(editing, vec![false, true]);
        assert_eq!(list.presenter().focused, vec![x, y]);
    }

    #[test]
    fn save_edit_updates_text_and_date_but_not_completion() {
        let mut list = list();
        let id = list.add_task("Task A", "2024-01-01").unwrap();
        list.toggle_task(id);
        list.edit_task(id);

        list.save_edit_task(id, " Task B ", "").unwrap();
        let task = &list.tasks()[0];
        assert_eq!(task.text, "Task B");
        assert_eq!(task.due_date, None);
        assert!(task.completed);
        assert_eq!(list.editing(), None);
    }

    #[test]
    fn save_edit_with_empty_text_stays_editing() {
        let mut list = list();
        let id = list.add_task("Task A", "2024-01-01").unwrap();
        list.edit_task(id);

        assert_eq!(
            list.save_edit_task(id, "   ", "2024-02-02"),
            Err(ValidationError::EmptyText)
        );
        assert_eq!(list.tasks()[0].text, "Task A");
        assert_eq!(list.tasks()[0].due_label(), "2024-01-01");
        assert_eq!(list.editing(), Some(id));
        assert_eq!(list.presenter().notices, vec![ValidationError::EmptyText.to_string()]);
    }

    #[test]
    fn save_edit_with_bad_date_stays_editing() {
        let mut list = list();
        let id = list.add_task("Task A", "2024-01-01").unwrap();
        list.edit_task(id);

        assert!(list.save_edit_task(id, "Task A", "01/02/2024").is_err());
        assert_eq!(list.editing(), Some(id));
        assert_eq!(list.tasks()[0].due_label(), "2024-01-01");
    }

    #[test]
    fn cancel_edit_discards() {
        let mut list = list();
        let id = list.add_task("Task A", "2024-01-01").unwrap();
        list.edit_task(id);
        list.cancel_edit_task(id);
        assert_eq!(list.editing(), None);
        assert_eq!(list.tasks()[0].text, "Task A");
    }

    #[test]
    fn stats_always_add_up() {
        let mut list = list();
        let ids: Vec<TaskId> = (0..7)
            .map(|i| list.add_task(&format!("t{}", i), "2024-01-01").unwrap())
            .collect();
        for id in ids.iter().step_by(2) {
            list.toggle_task(*id);
        }
        list.delete_task(ids[1]);
        for stats in &list.presenter().stats {
            assert_eq!(stats.pending + stats.completed, stats.total);
        }
        let stats = last_stats(&list);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.progress_percentage, 67);
    }

    #[test]
    fn search_renders_without_touching_stats() {
        let mut list = list();
        list.add_task("Buy milk", "2024-01-01").unwrap();
        list.add_task("Walk dog", "2024-01-01").unwrap();
        let stats_calls = list.presenter().stats.len();
        let renders = list.presenter().views.len();

        list.set_search_term("dog");
        assert_eq!(list.presenter().views.len(), renders + 1);
        assert_eq!(list.presenter().stats.len(), stats_calls);
        assert_eq!(last_view(&list).rows.len(), 1);
        assert_eq!(list.stats().total, 2);
    }

    #[test]
    fn deleting_the_edited_task_ends_edit_mode() {
        let mut list = list();
        let a = list.add_task("A", "2024-01-01").unwrap();
        list.add_task("B", "2024-01-01").unwrap();
        list.edit_task(a);

        list.delete_task(a);
        assert_eq!(list.editing(), None);
        assert!(last_view(&list).rows.iter().all(|row| !row.editing));
    }

    #[test]
    fn editing_an_unknown_task_keeps_the_current_edit() {
        let mut list = list();
        let a = list.add_task("A", "2024-01-01").unwrap();
        list.edit_task(a);

        list.edit_task(TaskId(3));
        assert_eq!(list.editing(), Some(a));
        assert_eq!(list.presenter().focused, vec![a]);
    }
}
