//! Overlapping actions must not let an older read overwrite newer state.
//!
//! Uses an in-process service whose list responses are held back behind
//! oneshot gates, so each test decides exactly when every read resolves.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::Mutex;
use taskdeck::controller::{Controller, SyncMode};
use taskdeck::remote::{LabelApi, Operation, RequestError, TaskApi};
use taskdeck_proto::label::{Label, LabelId, NewLabelPayload};
use taskdeck_proto::task::{NewTaskPayload, Task, TaskId, UpdateTaskPayload};
use tokio::sync::oneshot;

type Gate<T> = oneshot::Receiver<Result<T, RequestError>>;
type Release<T> = oneshot::Sender<Result<T, RequestError>>;

/// Service double: list calls wait on gates queued in call order, task
/// updates wait on their own gates when any are queued, every other
/// mutation answers at once.
#[derive(Default)]
struct GatedService {
    task_lists: Mutex<VecDeque<Gate<Vec<Task>>>>,
    label_lists: Mutex<VecDeque<Gate<Vec<Label>>>>,
    updates: Mutex<VecDeque<Gate<Task>>>,
    next_id: AtomicI32,
}

impl GatedService {
    /// Queues the response for the next `GET /task`.
    fn gate_task_list(&self) -> Release<Vec<Task>> {
        let (tx, rx) = oneshot::channel();
        self.task_lists.lock().push_back(rx);
        tx
    }

    /// Queues the response for the next `GET /label`.
    fn gate_label_list(&self) -> Release<Vec<Label>> {
        let (tx, rx) = oneshot::channel();
        self.label_lists.lock().push_back(rx);
        tx
    }

    /// Queues the response for the next `PATCH /task/{id}`.
    fn gate_update(&self) -> Release<Task> {
        let (tx, rx) = oneshot::channel();
        self.updates.lock().push_back(rx);
        tx
    }

    fn assign_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 100
    }
}

async fn wait<T>(op: Operation, gate: Option<Gate<T>>) -> Result<T, RequestError> {
    let gate = gate.ok_or_else(|| RequestError::new(op, "unscripted call"))?;
    gate.await
        .unwrap_or_else(|_| Err(RequestError::new(op, "gate dropped")))
}

impl TaskApi for GatedService {
    async fn list_tasks(&self) -> Result<Vec<Task>, RequestError> {
        let gate = self.task_lists.lock().pop_front();
        wait(Operation::ListTasks, gate).await
    }

    async fn create_task(&self, payload: &NewTaskPayload) -> Result<Task, RequestError> {
        Ok(Task::new(TaskId::new(self.assign_id()), payload.text.clone()))
    }

    async fn update_task(&self, payload: &UpdateTaskPayload) -> Result<Task, RequestError> {
        let gate = self.updates.lock().pop_front();
        if gate.is_some() {
            return wait(Operation::UpdateTask, gate).await;
        }
        let mut task = Task::new(payload.id, payload.text.clone().unwrap_or_default());
        task.completed = payload.completed.unwrap_or_default();
        Ok(task)
    }

    async fn delete_task(&self, _id: TaskId) -> Result<(), RequestError> {
        Ok(())
    }
}

impl LabelApi for GatedService {
    async fn list_labels(&self) -> Result<Vec<Label>, RequestError> {
        let gate = self.label_lists.lock().pop_front();
        wait(Operation::ListLabels, gate).await
    }

    async fn create_label(&self, payload: &NewLabelPayload) -> Result<Label, RequestError> {
        Ok(Label::new(LabelId::new(self.assign_id()), payload.name.clone()))
    }

    async fn delete_label(&self, _id: LabelId) -> Result<(), RequestError> {
        Ok(())
    }
}

fn task(id: i32, text: &str) -> Task {
    Task::new(TaskId::new(id), text)
}

fn label(id: i32, name: &str) -> Label {
    Label::new(LabelId::new(id), name)
}

#[tokio::test]
async fn older_refetch_resolving_last_is_discarded() {
    let service = GatedService::default();
    let first_list = service.gate_task_list();
    let second_list = service.gate_task_list();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Refetch);

    let first_payload = NewTaskPayload::new("first", vec![]);
    let second_payload = NewTaskPayload::new("second", vec![]);
    let first = controller.submit_task(&first_payload);
    let second = controller.submit_task(&second_payload);
    let release = async {
        second_list
            .send(Ok(vec![task(100, "first"), task(101, "second")]))
            .unwrap();
        tokio::task::yield_now().await;
        first_list.send(Ok(vec![task(100, "first")])).unwrap();
    };

    let (first, second, ()) = tokio::join!(first, second, release);
    first.unwrap();
    second.unwrap();

    assert_eq!(controller.tasks(), vec![task(100, "first"), task(101, "second")]);
}

#[tokio::test]
async fn newer_refetch_overwrites_older_one() {
    let service = GatedService::default();
    let first_list = service.gate_task_list();
    let second_list = service.gate_task_list();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Refetch);

    let first = controller.delete_task(TaskId::new(1));
    let second = controller.delete_task(TaskId::new(2));
    let release = async {
        first_list.send(Ok(vec![task(2, "read")])).unwrap();
        tokio::task::yield_now().await;
        second_list.send(Ok(Vec::new())).unwrap();
    };

    let (first, second, ()) = tokio::join!(first, second, release);
    first.unwrap();
    second.unwrap();

    assert!(controller.tasks().is_empty());
}

#[tokio::test]
async fn local_patch_survives_in_flight_load() {
    let service = GatedService::default();
    let load_tasks = service.gate_task_list();
    let load_labels = service.gate_label_list();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Patch);

    let payload = NewTaskPayload::new("buy milk", vec![]);
    let load = controller.load();
    let act_then_release = async {
        let created = controller.submit_task(&payload).await.unwrap().unwrap();
        // The read was served before the create reached the service.
        load_tasks.send(Ok(vec![task(1, "existing")])).unwrap();
        load_labels.send(Ok(vec![label(1, "home")])).unwrap();
        created
    };

    let (loaded, created) = tokio::join!(load, act_then_release);
    loaded.unwrap();

    assert_eq!(controller.tasks(), vec![task(1, "existing"), created]);
    assert_eq!(controller.labels(), vec![label(1, "home")]);
}

#[tokio::test]
async fn load_that_already_includes_patch_is_not_duplicated() {
    let service = GatedService::default();
    let load_tasks = service.gate_task_list();
    let load_labels = service.gate_label_list();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Patch);

    let payload = NewTaskPayload::new("new", vec![]);
    let load = controller.load();
    let act_then_release = async {
        let created = controller.submit_task(&payload).await.unwrap().unwrap();
        load_tasks
            .send(Ok(vec![task(1, "existing"), created.clone()]))
            .unwrap();
        load_labels.send(Ok(Vec::new())).unwrap();
        created
    };

    let (loaded, created) = tokio::join!(load, act_then_release);
    loaded.unwrap();

    let ids: Vec<TaskId> = controller.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![TaskId::new(1), created.id]);
}

#[tokio::test]
async fn later_update_wins_when_earlier_response_arrives_last() {
    let service = GatedService::default();
    let first_reply = service.gate_update();
    let second_reply = service.gate_update();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Patch);

    let first_edit = UpdateTaskPayload::new(TaskId::new(5)).with_text("A");
    let second_edit = UpdateTaskPayload::new(TaskId::new(5)).with_text("B");
    let first = controller.update_task(&first_edit);
    let second = controller.update_task(&second_edit);
    let release = async {
        second_reply.send(Ok(task(5, "B"))).unwrap();
        tokio::task::yield_now().await;
        first_reply.send(Ok(task(5, "A"))).unwrap();
    };

    let (first, second, ()) = tokio::join!(first, second, release);
    first.unwrap();
    second.unwrap();

    assert_eq!(controller.tasks(), vec![task(5, "B")]);
}

#[tokio::test]
async fn overlapping_creates_both_land_in_patch_mode() {
    let service = GatedService::default();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Patch);

    let first_payload = NewTaskPayload::new("first", vec![]);
    let second_payload = NewTaskPayload::new("second", vec![]);
    let (first, second) = tokio::join!(
        controller.submit_task(&first_payload),
        controller.submit_task(&second_payload)
    );
    first.unwrap();
    second.unwrap();

    let texts: Vec<String> = controller.tasks().into_iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn failed_mutation_does_not_hide_earlier_refresh() {
    let service = GatedService::default();
    let load_tasks = service.gate_task_list();
    let load_labels = service.gate_label_list();
    load_tasks
        .send(Ok(vec![task(1, "sweep"), task(2, "read")]))
        .unwrap();
    load_labels.send(Ok(Vec::new())).unwrap();
    let after_delete = service.gate_task_list();
    let update_reply = service.gate_update();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Refetch);
    controller.load().await.unwrap();

    let edit = UpdateTaskPayload::new(TaskId::new(2)).with_text("read more");
    let delete = controller.delete_task(TaskId::new(1));
    let update = controller.update_task(&edit);
    let release = async {
        update_reply
            .send(Err(RequestError::from_status(Operation::UpdateTask, 500, "HTTP 500")))
            .unwrap();
        tokio::task::yield_now().await;
        after_delete.send(Ok(vec![task(2, "read")])).unwrap();
    };

    let (deleted, updated, ()) = tokio::join!(delete, update, release);
    deleted.unwrap();
    assert_eq!(updated.unwrap_err().status, Some(500));

    assert_eq!(controller.tasks(), vec![task(2, "read")]);
}

#[tokio::test]
async fn label_reads_are_tracked_separately_from_task_reads() {
    let service = GatedService::default();
    let task_list = service.gate_task_list();
    let label_list = service.gate_label_list();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Refetch);

    let new_task = NewTaskPayload::new("sweep", vec![]);
    let new_label = NewLabelPayload::new("home");
    let add_task = controller.submit_task(&new_task);
    let add_label = controller.submit_label(&new_label);
    let release = async {
        label_list.send(Ok(vec![label(101, "home")])).unwrap();
        tokio::task::yield_now().await;
        task_list.send(Ok(vec![task(100, "sweep")])).unwrap();
    };

    let (added_task, added_label, ()) = tokio::join!(add_task, add_label, release);
    added_task.unwrap();
    added_label.unwrap();

    assert_eq!(controller.tasks(), vec![task(100, "sweep")]);
    assert_eq!(controller.labels(), vec![label(101, "home")]);
}

#[tokio::test]
async fn failed_newer_refetch_does_not_block_older_result() {
    let service = GatedService::default();
    let first_list = service.gate_task_list();
    let second_list = service.gate_task_list();
    let controller = Controller::new(service).with_sync_mode(SyncMode::Refetch);

    let first = controller.delete_task(TaskId::new(1));
    let second = controller.delete_task(TaskId::new(2));
    let release = async {
        second_list
            .send(Err(RequestError::from_status(Operation::ListTasks, 500, "HTTP 500")))
            .unwrap();
        tokio::task::yield_now().await;
        first_list.send(Ok(vec![task(3, "read")])).unwrap();
    };

    let (first, second, ()) = tokio::join!(first, second, release);
    first.unwrap();
    assert_eq!(second.unwrap_err().status, Some(500));

    // The only list that arrived is applied.
    assert_eq!(controller.tasks(), vec![task(3, "read")]);
}
