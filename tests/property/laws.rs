//! Property tests for the label toggle and the filter projection.
//!
//! 1. Toggling an absent label twice restores the selection exactly; a
//!    present label comes back with the same membership, moved to the end.
//! 2. After one toggle the candidate id appears exactly once or not at all.
//! 3. Toggling never reorders the untouched elements.
//! 4. The filter projection is the identity without a filter and the
//!    membership subset with one.

use proptest::prelude::*;
use taskdeck_proto::filter::{LabelFilter, visible_tasks};
use taskdeck_proto::label::{Label, LabelId, toggle};
use taskdeck_proto::task::{Task, TaskId};

/// Strategy for a label whose id is drawn from a small range so that
/// collisions with a selection are common.
fn arb_label() -> impl Strategy<Value = Label> {
    (0..16i32, "[a-z]{1,8}").prop_map(|(id, name)| Label::new(LabelId::new(id), name))
}

/// Strategy for a selection with unique ids, as a label picker produces.
fn arb_selection() -> impl Strategy<Value = Vec<Label>> {
    prop::collection::btree_map(0..16i32, "[a-z]{1,8}", 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, name)| Label::new(LabelId::new(id), name))
            .collect()
    })
}

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((any::<i32>(), "[a-z ]{1,20}", arb_selection()), 0..12).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(id, text, labels)| Task::new(TaskId::new(id), text).with_labels(labels))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn double_toggle_of_absent_label_is_identity(selected in arb_selection(), candidate in arb_label()) {
        prop_assume!(selected.iter().all(|l| l.id != candidate.id));
        let twice = toggle(&toggle(&selected, &candidate), &candidate);
        prop_assert_eq!(selected, twice);
    }

    /// Removing then re-adding appends the label at the end, so only
    /// membership is restored, not order.
    #[test]
    fn double_toggle_of_present_label_restores_membership(selected in arb_selection(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!selected.is_empty());
        let candidate = selected[pick.index(selected.len())].clone();
        let twice = toggle(&toggle(&selected, &candidate), &candidate);

        let mut before: Vec<_> = selected.iter().map(|l| l.id).collect();
        let mut after: Vec<_> = twice.iter().map(|l| l.id).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
        prop_assert_eq!(twice.last(), Some(&candidate));
    }

    #[test]
    fn toggle_membership_flips(selected in arb_selection(), candidate in arb_label()) {
        let was_present = selected.iter().any(|l| l.id == candidate.id);
        let next = toggle(&selected, &candidate);
        let count = next.iter().filter(|l| l.id == candidate.id).count();
        prop_assert_eq!(count, usize::from(!was_present));
    }

    #[test]
    fn toggle_preserves_relative_order(selected in arb_selection(), candidate in arb_label()) {
        let next = toggle(&selected, &candidate);
        let untouched: Vec<_> = selected.iter().filter(|l| l.id != candidate.id).collect();
        let kept: Vec<_> = next.iter().filter(|l| l.id != candidate.id).collect();
        prop_assert_eq!(untouched, kept);
    }

    #[test]
    fn no_filter_is_identity(tasks in arb_tasks()) {
        let visible: Vec<Task> = visible_tasks(&tasks, LabelFilter::NONE).cloned().collect();
        prop_assert_eq!(visible, tasks);
    }

    #[test]
    fn filter_is_membership_subset(tasks in arb_tasks(), id in 0..16i32) {
        let id = LabelId::new(id);
        let visible: Vec<Task> = visible_tasks(&tasks, LabelFilter::only(id)).cloned().collect();
        let expected: Vec<Task> = tasks
            .iter()
            .filter(|t| t.labels.iter().map(|l| l.id).any(|l| l == id))
            .cloned()
            .collect();
        prop_assert_eq!(visible, expected);
    }
}
