use eyre::WrapErr;
use futures::future::join_all;
use kanri_store::{from_record, to_record, Query, StoreBox, Table};
use serde_json::json;
use tracing::{debug, warn};

use crate::session::Account;
use crate::task::{SyncState, Task, TaskId, TaskStatus};

/// A drag gesture: the dragged task, where it started and where it was
/// dropped. Indices are 0-based positions within the ordered column views;
/// cancelled drags never reach the board.
#[derive(Clone, PartialEq, Debug)]
pub struct DragRequest {
    pub task_id: TaskId,
    pub source: (TaskStatus, usize),
    pub destination: (TaskStatus, usize),
}

/// In-memory mirror of the authenticated account's tasks. Mutations write
/// through to the store; reads always come from the local collection. With
/// no owner the board is empty and every mutation is a silent no-op.
pub struct Board {
    store: StoreBox,
    owner: Option<Account>,
    tasks: Vec<Task>,
}

impl Board {
    pub fn new(store: StoreBox) -> Self {
        Board {
            store,
            owner: None,
            tasks: Vec::new(),
        }
    }

    pub fn owner(&self) -> Option<&Account> {
        self.owner.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replace the collection wholesale with the account's remote rows and
    /// scope every later mutation to that account.
    pub async fn load(&mut self, account: &Account) -> eyre::Result<()> {
        let rows = self
            .store
            .select(Query::table(Table::Tasks).eq("owner", account.id.clone()))
            .await?;
        self.tasks = rows
            .into_iter()
            .map(from_record::<Task>)
            .collect::<Result<Vec<_>, _>>()?;
        self.owner = Some(account.clone());
        debug!(count = self.tasks.len(), "loaded board");
        Ok(())
    }

    /// Refetch remote truth for the current owner.
    pub async fn refresh(&mut self) -> eyre::Result<()> {
        if let Some(owner) = self.owner.clone() {
            self.load(&owner).await?;
        }
        Ok(())
    }

    /// Forget the owner and every task (logout path).
    pub fn clear(&mut self) {
        self.owner = None;
        self.tasks.clear();
    }

    /// The ordered column view: tasks of the given status, sorted by order
    /// ascending. Tasks that predate ordering carry order 0 and sort first.
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.status == status)
            .collect();
        tasks.sort_by_key(|task| task.order);
        tasks
    }

    fn column_ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.column(status)
            .into_iter()
            .map(|task| task.id.clone())
            .collect()
    }

    /// Create a task at the bottom of the todo column. Blank text and
    /// anonymous boards are silent no-ops. The row is written remotely
    /// first; local state only changes once the store has answered.
    pub async fn add(&mut self, text: &str) -> eyre::Result<Option<Task>> {
        let Some(owner) = self.owner.clone() else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let order = self
            .column(TaskStatus::Todo)
            .iter()
            .map(|task| task.order)
            .max()
            .unwrap_or(0)
            + 1;

        let row = to_record(&json!({
            "text": text,
            "status": TaskStatus::Todo,
            "owner": owner.id,
            "order": order,
        }))?;
        let mut rows = self.store.insert(Table::Tasks, vec![row]).await?;
        let record = rows
            .pop()
            .ok_or_else(|| eyre::eyre!("store returned no row for the inserted task"))?;

        let task: Task = from_record(record)?;
        self.tasks.push(task.clone());
        Ok(Some(task))
    }

    /// Remove one task by id. The remote delete goes first; a store failure
    /// leaves local state untouched. The vacated column keeps its order
    /// gaps, ordering is relative.
    pub async fn delete(&mut self, id: &str) -> eyre::Result<bool> {
        let Some(owner) = self.owner.clone() else {
            return Ok(false);
        };
        if !self.tasks.iter().any(|task| task.id == id) {
            return Ok(false);
        }

        self.store
            .delete(Query::table(Table::Tasks).eq("id", id).eq("owner", owner.id))
            .await?;
        self.tasks.retain(|task| task.id != id);
        Ok(true)
    }

    /// Rewrite a task's text. Blank replacement text is a silent no-op.
    pub async fn edit(&mut self, id: &str, text: &str) -> eyre::Result<bool> {
        let Some(owner) = self.owner.clone() else {
            return Ok(false);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };

        self.store
            .update(
                Query::table(Table::Tasks).eq("id", id).eq("owner", owner.id),
                to_record(&json!({ "text": text }))?,
            )
            .await?;
        self.tasks[index].text = text.to_string();
        Ok(true)
    }

    /// Click-style column change: only the status moves. The order value
    /// stays, so the task interleaves with the destination column until the
    /// user reorders it.
    pub async fn set_status(&mut self, id: &str, status: TaskStatus) -> eyre::Result<bool> {
        let Some(owner) = self.owner.clone() else {
            return Ok(false);
        };
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(false);
        };

        self.store
            .update(
                Query::table(Table::Tasks).eq("id", id).eq("owner", owner.id),
                to_record(&json!({ "status": status }))?,
            )
            .await?;
        self.tasks[index].status = status;
        Ok(true)
    }

    /// Positional reorder. The local collection is updated optimistically,
    /// then every task now in the destination column is persisted as one
    /// concurrent batch of status+order updates. When any update fails, the
    /// board refetches the store wholesale instead of keeping the divergent
    /// optimistic view, and the failure is reported.
    pub async fn drag(&mut self, request: DragRequest) -> eyre::Result<bool> {
        let Some(owner) = self.owner.clone() else {
            return Ok(false);
        };
        if !self.tasks.iter().any(|task| task.id == request.task_id) {
            return Ok(false);
        }

        let (source_status, source_index) = request.source;
        let (destination_status, destination_index) = request.destination;
        if source_status == destination_status && source_index == destination_index {
            return Ok(false);
        }

        let mut source_ids = self.column_ids(source_status);
        match source_ids.get(source_index) {
            Some(id) if *id == request.task_id => {}
            _ => return Err(eyre::eyre!("drag source does not match the board state")),
        }

        if source_status == destination_status {
            let id = source_ids.remove(source_index);
            let index = destination_index.min(source_ids.len());
            source_ids.insert(index, id);
            self.apply_positions(&source_ids, source_status);
        } else {
            let mut destination_ids = self.column_ids(destination_status);
            let id = source_ids.remove(source_index);
            let index = destination_index.min(destination_ids.len());
            destination_ids.insert(index, id);
            self.apply_positions(&source_ids, source_status);
            self.apply_positions(&destination_ids, destination_status);
        }

        self.sync_column(destination_status, &owner).await?;
        Ok(true)
    }

    /// Renumber a materialized column to consecutive 1-based positions and
    /// write the (status, order) pairs into local state.
    fn apply_positions(&mut self, ids: &[TaskId], status: TaskStatus) {
        for (position, id) in ids.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) {
                task.status = status;
                task.order = position as i64 + 1;
            }
        }
    }

    /// Persist every task of a column as one batch of independent updates,
    /// dispatched concurrently and awaited as a group. Tasks are flagged
    /// pending on dispatch and confirmed as their update lands.
    async fn sync_column(&mut self, status: TaskStatus, owner: &Account) -> eyre::Result<()> {
        let mut batch = Vec::new();
        for task in self.tasks.iter_mut().filter(|task| task.status == status) {
            task.sync = SyncState::Pending;
            batch.push((task.id.clone(), task.status, task.order));
        }

        let store = &self.store;
        let updates = batch.iter().map(|(id, status, order)| {
            let query = Query::table(Table::Tasks)
                .eq("id", id.clone())
                .eq("owner", owner.id.clone());
            let patch = to_record(&json!({ "status": status, "order": order }));
            async move {
                match patch {
                    Ok(patch) => store.update(query, patch).await,
                    Err(e) => Err(e),
                }
            }
        });
        let results = join_all(updates).await;

        let mut failure = None;
        for ((id, _, _), result) in batch.iter().zip(results) {
            match result {
                Ok(()) => {
                    if let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) {
                        task.sync = SyncState::Confirmed;
                    }
                }
                Err(e) => {
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        if let Some(error) = failure {
            warn!(error = %error, "column sync failed, refreshing the board from the store");
            if let Err(refresh_error) = self.recover().await {
                warn!(
                    error = %refresh_error,
                    "recovery refetch failed, local state may diverge until the next load"
                );
            }
            return Err(error).wrap_err("failed to persist the reordered column");
        }
        Ok(())
    }

    /// Refetch-and-merge after a failed batch: remote truth replaces the
    /// optimistic view, then each column is renumbered locally so order
    /// values are unique again.
    async fn recover(&mut self) -> eyre::Result<()> {
        self.refresh().await?;
        for status in TaskStatus::ALL {
            let ids = self.column_ids(status);
            self.apply_positions(&ids, status);
        }
        Ok(())
    }
}
