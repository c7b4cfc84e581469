//! Repeater row state machine
//!
//! Reconciles the number of rendered repeated-field groups with the
//! configured minimum, the length of the backing answers array, and
//! explicit add/remove intents. Every transition is a named outcome so
//! each reconciliation case stays independently testable.

use crate::fields::{Field, RepeaterField};
use crate::store::FormStateStore;
use serde_json::Value;

/// Result of an add intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new blank row is rendered; the answers array is untouched until
    /// the user commits values through the host form-state mechanism.
    Added,
    /// Already at `max_rows`; state unchanged.
    Rejected,
}

/// Result of a remove intent, one variant per reconciliation case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// An uncommitted trailing blank row existed (`count > answers.len()`);
    /// only the rendered count dropped.
    DroppedBlankRow,
    /// Count and answers were in sync; the last answers element was
    /// truncated along with the rendered count.
    TruncatedAnswers,
    /// Stale answers from a prior larger configuration
    /// (`count < answers.len()`); the array was sliced down to the
    /// rendered count, which itself stays put.
    ReconciledStaleAnswers,
    /// Already at `min_rows`; state unchanged.
    Rejected,
}

/// Live state for one rendered repeater field instance.
///
/// Scoped per rendered instance: concurrent applications never share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeaterState {
    repeater_id: String,
    min_rows: usize,
    max_rows: Option<usize>,
    number_of_items: usize,
    /// Per-index backing registration used for stable row identity;
    /// removals always drop the highest index.
    registered_rows: Vec<usize>,
}

impl RepeaterState {
    /// Initialize from the stored answers: `max(answers.len(), min_rows)`
    /// rows are rendered.
    pub fn new(field: &RepeaterField, store: &dyn FormStateStore) -> Self {
        let answers_len = answers_len(store, &field.base.id);
        let number_of_items = answers_len.max(field.min_rows);
        Self {
            repeater_id: field.base.id.clone(),
            min_rows: field.min_rows,
            max_rows: field.max_rows,
            number_of_items,
            registered_rows: (0..number_of_items).collect(),
        }
    }

    pub fn number_of_items(&self) -> usize {
        self.number_of_items
    }

    pub fn registered_rows(&self) -> &[usize] {
        &self.registered_rows
    }

    /// Render one more blank row. No-op once `max_rows` is reached.
    pub fn add_item(&mut self) -> AddOutcome {
        if let Some(max_rows) = self.max_rows {
            if self.number_of_items >= max_rows {
                tracing::debug!(
                    repeater_id = %self.repeater_id,
                    max_rows,
                    "add rejected at row bound"
                );
                return AddOutcome::Rejected;
            }
        }
        self.registered_rows.push(self.number_of_items);
        self.number_of_items += 1;
        AddOutcome::Added
    }

    /// Remove the last row, reconciling the answers array. No-op at
    /// `min_rows`.
    pub fn remove_item(&mut self, store: &mut dyn FormStateStore) -> RemoveOutcome {
        if self.number_of_items <= self.min_rows {
            tracing::debug!(
                repeater_id = %self.repeater_id,
                min_rows = self.min_rows,
                "remove rejected at row bound"
            );
            return RemoveOutcome::Rejected;
        }
        let answers_len = answers_len(store, &self.repeater_id);
        let outcome = if self.number_of_items > answers_len {
            self.number_of_items -= 1;
            RemoveOutcome::DroppedBlankRow
        } else if self.number_of_items == answers_len {
            truncate_answers(store, &self.repeater_id, answers_len - 1);
            self.number_of_items -= 1;
            RemoveOutcome::TruncatedAnswers
        } else {
            truncate_answers(store, &self.repeater_id, self.number_of_items);
            RemoveOutcome::ReconciledStaleAnswers
        };
        self.registered_rows.pop();
        outcome
    }
}

fn answers_len(store: &dyn FormStateStore, repeater_id: &str) -> usize {
    match store.get_value(repeater_id) {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

fn truncate_answers(store: &mut dyn FormStateStore, repeater_id: &str, len: usize) {
    if let Some(Value::Array(mut items)) = store.get_value(repeater_id) {
        items.truncate(len);
        store.set_value(repeater_id, Value::Array(items));
    }
}

/// Answer path of one child field within one row:
/// `{repeater}[{index}].{child}`.
///
/// Row identity is index-based, so reordering rows without re-keying is
/// unsupported.
pub fn row_answer_path(repeater_id: &str, index: usize, child_id: &str) -> String {
    format!("{repeater_id}[{index}].{child_id}")
}

/// Instantiate the child templates for one row, re-keyed to the row's
/// answer paths. Pseudo-fields without an id are carried over as-is.
pub fn instantiate_row(field: &RepeaterField, index: usize) -> Vec<Field> {
    field
        .fields
        .iter()
        .map(|template| {
            let mut child = template.clone();
            if !child.id().is_empty() {
                child.base_mut().id = row_answer_path(&field.base.id, index, template.id());
            }
            child
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Application;
    use crate::fields::{
        build_repeater_field, build_text_field, CommonFieldConfig, RepeaterFieldConfig,
        TextFieldConfig,
    };
    use serde_json::json;

    fn repeater(min_rows: usize, max_rows: Option<usize>) -> RepeaterField {
        let child = |id: &str| {
            build_text_field(TextFieldConfig {
                common: CommonFieldConfig {
                    id: id.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .expect("child")
        };
        let field = build_repeater_field(RepeaterFieldConfig {
            common: CommonFieldConfig {
                id: "periods".to_string(),
                title: "Periods".into(),
                ..Default::default()
            },
            fields: vec![child("startDate"), child("endDate")],
            min_rows: Some(min_rows),
            max_rows,
            ..Default::default()
        })
        .expect("repeater");
        match field {
            Field::Repeater(f) => f,
            _ => unreachable!(),
        }
    }

    fn app_with_rows(count: usize) -> Application {
        let mut app = Application::new("applicant");
        let rows: Vec<_> = (0..count).map(|i| json!({"startDate": i})).collect();
        if count > 0 {
            app.set_answer("periods", json!(rows));
        }
        app
    }

    mod initialization {
        use super::*;

        #[test]
        fn test_initial_count_is_answers_length_when_larger() {
            let app = app_with_rows(2);
            let state = RepeaterState::new(&repeater(1, Some(3)), &app);
            assert_eq!(state.number_of_items(), 2);
            assert_eq!(state.registered_rows(), &[0, 1]);
        }

        #[test]
        fn test_initial_count_is_min_rows_when_answers_empty() {
            let app = app_with_rows(0);
            let state = RepeaterState::new(&repeater(1, None), &app);
            assert_eq!(state.number_of_items(), 1);
        }

        #[test]
        fn test_non_array_answer_counts_as_empty() {
            let mut app = Application::new("applicant");
            app.set_answer("periods", json!("oops"));
            let state = RepeaterState::new(&repeater(2, None), &app);
            assert_eq!(state.number_of_items(), 2);
        }
    }

    mod bounds_walk {
        use super::*;

        #[test]
        fn test_spec_walk_min_one_max_three() {
            let mut app = app_with_rows(2);
            let mut state = RepeaterState::new(&repeater(1, Some(3)), &app);
            assert_eq!(state.number_of_items(), 2);

            assert_eq!(state.add_item(), AddOutcome::Added);
            assert_eq!(state.number_of_items(), 3);

            assert_eq!(state.add_item(), AddOutcome::Rejected);
            assert_eq!(state.number_of_items(), 3);

            assert_eq!(state.remove_item(&mut app), RemoveOutcome::DroppedBlankRow);
            assert_eq!(state.number_of_items(), 2);

            assert_eq!(state.remove_item(&mut app), RemoveOutcome::TruncatedAnswers);
            assert_eq!(state.number_of_items(), 1);
            assert_eq!(app.answer("periods").and_then(|v| v.as_array()).map(Vec::len), Some(1));

            assert_eq!(state.remove_item(&mut app), RemoveOutcome::Rejected);
            assert_eq!(state.number_of_items(), 1);
        }

        #[test]
        fn test_add_without_max_is_unbounded() {
            let app = app_with_rows(0);
            let mut state = RepeaterState::new(&repeater(1, None), &app);
            for _ in 0..10 {
                assert_eq!(state.add_item(), AddOutcome::Added);
            }
            assert_eq!(state.number_of_items(), 11);
        }
    }

    mod removal_cases {
        use super::*;

        #[test]
        fn test_blank_row_removal_leaves_answers_alone() {
            let mut app = app_with_rows(1);
            let mut state = RepeaterState::new(&repeater(1, None), &app);
            state.add_item();

            assert_eq!(state.remove_item(&mut app), RemoveOutcome::DroppedBlankRow);
            assert_eq!(app.answer("periods").and_then(|v| v.as_array()).map(Vec::len), Some(1));
        }

        #[test]
        fn test_synced_removal_truncates_last_element() {
            let mut app = app_with_rows(3);
            let mut state = RepeaterState::new(&repeater(1, None), &app);

            assert_eq!(state.remove_item(&mut app), RemoveOutcome::TruncatedAnswers);
            assert_eq!(state.number_of_items(), 2);
            let periods = app.answer("periods").and_then(|v| v.as_array()).cloned().expect("array");
            assert_eq!(periods.len(), 2);
            assert_eq!(periods[0], json!({"startDate": 0}));
        }

        #[test]
        fn test_stale_answers_are_sliced_to_rendered_count() {
            // Rendered two rows, then stale answers grew behind the
            // engine's back (prior larger configuration).
            let mut app = app_with_rows(2);
            let mut state = RepeaterState::new(&repeater(1, None), &app);
            app.set_answer(
                "periods",
                json!([{"startDate": 0}, {"startDate": 1}, {"startDate": 2}, {"startDate": 3}]),
            );

            assert_eq!(
                state.remove_item(&mut app),
                RemoveOutcome::ReconciledStaleAnswers
            );
            // Count is unchanged; the array is reconciled to it.
            assert_eq!(state.number_of_items(), 2);
            assert_eq!(app.answer("periods").and_then(|v| v.as_array()).map(Vec::len), Some(2));
        }

        #[test]
        fn test_every_removal_drops_highest_registered_row() {
            let mut app = app_with_rows(3);
            let mut state = RepeaterState::new(&repeater(1, None), &app);
            assert_eq!(state.registered_rows(), &[0, 1, 2]);

            state.remove_item(&mut app);
            assert_eq!(state.registered_rows(), &[0, 1]);
        }

        #[test]
        fn test_remove_at_min_rows_is_side_effect_free() {
            let mut app = app_with_rows(2);
            let mut state = RepeaterState::new(&repeater(2, None), &app);

            assert_eq!(state.remove_item(&mut app), RemoveOutcome::Rejected);
            assert_eq!(state.number_of_items(), 2);
            assert_eq!(app.answer("periods").and_then(|v| v.as_array()).map(Vec::len), Some(2));
            assert_eq!(state.registered_rows(), &[0, 1]);
        }
    }

    mod row_instantiation {
        use super::*;

        #[test]
        fn test_children_are_rekeyed_per_row() {
            let field = repeater(1, None);
            let row = instantiate_row(&field, 1);
            let ids: Vec<_> = row.iter().map(Field::id).collect();
            assert_eq!(ids, vec!["periods[1].startDate", "periods[1].endDate"]);
        }

        #[test]
        fn test_rows_are_fresh_instantiations() {
            let field = repeater(1, None);
            let first = instantiate_row(&field, 0);
            let second = instantiate_row(&field, 0);
            assert_eq!(first, second);
            assert_ne!(first[0].id(), instantiate_row(&field, 1)[0].id());
        }

        #[test]
        fn test_row_answer_path_format() {
            assert_eq!(
                row_answer_path("periods", 2, "endDate"),
                "periods[2].endDate"
            );
        }
    }
}
