//! In-memory copy of the service state.
//!
//! The [`Store`] is the single source of truth the presentation layer reads
//! from. It holds the task and label collections and the active label
//! filter, and it tracks a per-collection generation so that a slow read
//! cannot overwrite the result of a later action.
//!
//! # Generations
//!
//! Each collection hands out increasing [`Token`]s. There are two kinds of
//! writes, with different rules:
//!
//! - A full list is read under a token from [`Store::begin_read`]. It
//!   replaces the collection only if no newer list has been applied. Local
//!   patches issued after the read started are then replayed on top, so a
//!   slow read never erases a newer local change.
//! - A local patch (upsert or removal of one entity) carries a token from
//!   [`Store::begin`], taken when the action started. It applies only if no
//!   action started later has already written the same entity, so the most
//!   recent intent wins no matter which response arrives first.
//!
//! A chain that fails simply never presents its token; it does not block
//! anything else.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use taskdeck_proto::filter::{LabelFilter, visible_tasks};
use taskdeck_proto::label::{Label, LabelId};
use taskdeck_proto::task::{Task, TaskId};

/// Which collection a [`Token`] guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The task collection.
    Tasks,
    /// The label collection.
    Labels,
}

/// Ticket for one state-affecting action on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    resource: Resource,
    seq: u64,
}

impl Token {
    /// The collection this token guards.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }
}

/// Owned snapshot handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppView {
    /// Every task, in service order.
    pub tasks: Vec<Task>,
    /// Every label, in service order.
    pub labels: Vec<Label>,
    /// Active label filter, if any.
    pub filter_label_id: Option<LabelId>,
}

impl AppView {
    /// Tasks that pass the active filter.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        visible_tasks(&self.tasks, LabelFilter::from(self.filter_label_id))
    }

    /// The label the view is filtered on.
    #[must_use]
    pub fn filter_label(&self) -> Option<&Label> {
        let id = self.filter_label_id?;
        self.labels.iter().find(|label| label.id == id)
    }

    /// Looks a task up by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Looks a label up by id.
    #[must_use]
    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|label| label.id == id)
    }
}

/// An entity addressed by a stable key.
trait Keyed: Clone + fmt::Debug {
    type Key: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    fn key(&self) -> Self::Key;
}

impl Keyed for Task {
    type Key = TaskId;

    fn key(&self) -> TaskId {
        self.id
    }
}

impl Keyed for Label {
    type Key = LabelId;

    fn key(&self) -> LabelId {
        self.id
    }
}

/// One local patch.
#[derive(Debug, Clone)]
enum Change<T: Keyed> {
    Upsert(T),
    Remove(T::Key),
}

impl<T: Keyed> Change<T> {
    fn key(&self) -> T::Key {
        match self {
            Self::Upsert(item) => item.key(),
            Self::Remove(key) => *key,
        }
    }

    fn apply(&self, items: &mut Vec<T>) {
        match self {
            Self::Upsert(item) => match items.iter_mut().find(|i| i.key() == item.key()) {
                Some(slot) => *slot = item.clone(),
                None => items.push(item.clone()),
            },
            Self::Remove(key) => items.retain(|i| i.key() != *key),
        }
    }
}

/// A collection plus the bookkeeping that orders writes to it.
#[derive(Debug)]
struct Collection<T: Keyed> {
    items: Vec<T>,
    /// Last sequence number handed out.
    issued: u64,
    /// Token of the newest read started.
    read_issued: u64,
    /// Token of the last list applied.
    listed: u64,
    /// Token of the last patch applied, per entity.
    written: HashMap<T::Key, u64>,
    /// Patches newer than `listed`, kept while a read may still land.
    pending: Vec<(u64, Change<T>)>,
}

impl<T: Keyed> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            issued: 0,
            read_issued: 0,
            listed: 0,
            written: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

impl<T: Keyed> Collection<T> {
    const fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    const fn begin_read(&mut self) -> u64 {
        let seq = self.next();
        self.read_issued = seq;
        seq
    }

    fn replace(&mut self, seq: u64, items: Vec<T>) -> bool {
        if seq <= self.listed {
            return false;
        }
        self.items = items;
        self.listed = seq;
        self.pending.retain(|(at, _)| *at > seq);
        for (_, change) in &self.pending {
            change.apply(&mut self.items);
        }
        // No read newer than this one is outstanding.
        if self.read_issued <= seq {
            self.pending.clear();
        }
        true
    }

    fn change(&mut self, seq: u64, change: Change<T>) -> bool {
        let key = change.key();
        if self.written.get(&key).is_some_and(|&at| at >= seq) {
            return false;
        }
        self.written.insert(key, seq);
        change.apply(&mut self.items);
        if self.read_issued > self.listed && seq > self.listed {
            self.pending.push((seq, change));
        }
        true
    }
}

/// Task and label collections plus the active filter.
#[derive(Debug, Default)]
pub struct Store {
    tasks: Collection<Task>,
    labels: Collection<Label>,
    filter: LabelFilter,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a local patch to `resource`.
    pub const fn begin(&mut self, resource: Resource) -> Token {
        let seq = match resource {
            Resource::Tasks => self.tasks.next(),
            Resource::Labels => self.labels.next(),
        };
        Token { resource, seq }
    }

    /// Issues a token for a full read of `resource`.
    pub const fn begin_read(&mut self, resource: Resource) -> Token {
        let seq = match resource {
            Resource::Tasks => self.tasks.begin_read(),
            Resource::Labels => self.labels.begin_read(),
        };
        Token { resource, seq }
    }

    /// Replaces the task collection unless a newer list already landed.
    ///
    /// Returns `false` and leaves the collection untouched if `token` is
    /// stale.
    pub fn replace_tasks(&mut self, token: Token, tasks: Vec<Task>) -> bool {
        debug_assert_eq!(token.resource, Resource::Tasks);
        if !self.tasks.replace(token.seq, tasks) {
            tracing::debug!(seq = token.seq, listed = self.tasks.listed, "discarding stale task list");
            return false;
        }
        true
    }

    /// Replaces the label collection unless a newer list already landed.
    ///
    /// Clears the filter when its label is gone from the new collection.
    pub fn replace_labels(&mut self, token: Token, labels: Vec<Label>) -> bool {
        debug_assert_eq!(token.resource, Resource::Labels);
        if !self.labels.replace(token.seq, labels) {
            tracing::debug!(seq = token.seq, listed = self.labels.listed, "discarding stale label list");
            return false;
        }
        self.drop_dangling_filter();
        true
    }

    /// Inserts `task`, or replaces the task with the same id in place.
    ///
    /// Returns `false` if a later action already wrote this task.
    pub fn upsert_task(&mut self, token: Token, task: Task) -> bool {
        debug_assert_eq!(token.resource, Resource::Tasks);
        Self::patch(&mut self.tasks, token, Change::Upsert(task))
    }

    /// Removes the task with `id`.
    ///
    /// Returns `false` if a later action already wrote this task.
    pub fn remove_task(&mut self, token: Token, id: TaskId) -> bool {
        debug_assert_eq!(token.resource, Resource::Tasks);
        Self::patch(&mut self.tasks, token, Change::Remove(id))
    }

    /// Inserts `label`, or replaces the label with the same id in place.
    ///
    /// Returns `false` if a later action already wrote this label.
    pub fn upsert_label(&mut self, token: Token, label: Label) -> bool {
        debug_assert_eq!(token.resource, Resource::Labels);
        Self::patch(&mut self.labels, token, Change::Upsert(label))
    }

    /// Removes the label with `id`.
    ///
    /// Tasks keep whatever labels the service last reported for them.
    /// Returns `false` if a later action already wrote this label.
    pub fn remove_label(&mut self, token: Token, id: LabelId) -> bool {
        debug_assert_eq!(token.resource, Resource::Labels);
        let applied = Self::patch(&mut self.labels, token, Change::Remove(id));
        self.drop_dangling_filter();
        applied
    }

    fn patch<T: Keyed>(collection: &mut Collection<T>, token: Token, change: Change<T>) -> bool {
        let key = change.key();
        if !collection.change(token.seq, change) {
            tracing::debug!(%key, seq = token.seq, "discarding patch superseded by a later action");
            return false;
        }
        true
    }

    fn drop_dangling_filter(&mut self) {
        if let Some(id) = self.filter.label_id()
            && !self.labels.items.iter().any(|label| label.id == id)
        {
            tracing::debug!(%id, "filter label no longer exists, clearing filter");
            self.filter = LabelFilter::NONE;
        }
    }

    /// Sets the active filter.
    pub const fn set_filter(&mut self, filter: LabelFilter) {
        self.filter = filter;
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> LabelFilter {
        self.filter
    }

    /// Every task, in service order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks.items
    }

    /// Every label, in service order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels.items
    }

    /// Whether some label already uses `name` (exact match).
    #[must_use]
    pub fn has_label_named(&self, name: &str) -> bool {
        self.labels.items.iter().any(|label| label.name == name)
    }

    /// Tasks that pass the active filter, cloned.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<Task> {
        visible_tasks(&self.tasks.items, self.filter).cloned().collect()
    }

    /// Owned snapshot for rendering.
    #[must_use]
    pub fn snapshot(&self) -> AppView {
        AppView {
            tasks: self.tasks.items.clone(),
            labels: self.labels.items.clone(),
            filter_label_id: self.filter.label_id(),
        }
    }
}
