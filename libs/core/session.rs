use kanri_store::{from_record, to_record, Query, StoreBox, StoreError, Table};
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::SessionCache;

pub type AccountId = String;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Account {
    #[serde(with = "crate::task::id_string")]
    pub id: AccountId,
    pub username: String,
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Covers both unknown users and wrong passwords; the two are not told
    /// apart.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username already exists")]
    UsernameTaken,

    #[error("username and password must not be empty")]
    EmptyCredentials,

    #[error("no account is logged in")]
    NotLoggedIn,

    /// Profile deletion runs in two non-atomic phases; this names the one
    /// that failed. A failure on the account phase leaves an orphaned
    /// account whose tasks are already gone.
    #[error("failed to delete the profile {phase}")]
    ProfileDeletion {
        phase: DeletionPhase,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletionPhase {
    Tasks,
    Account,
}

impl std::fmt::Display for DeletionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletionPhase::Tasks => write!(f, "tasks"),
            DeletionPhase::Account => write!(f, "account record"),
        }
    }
}

/// Owns the authenticated account, if any, together with its durable cache.
pub struct Session {
    store: StoreBox,
    cache: SessionCache,
    current: Option<Account>,
}

impl Session {
    pub fn new(store: StoreBox, cache: SessionCache) -> Self {
        Session {
            store,
            cache,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    /// Adopt the cached identity without remote validation; it is trusted
    /// until an explicit logout.
    pub fn restore(&mut self) {
        if let Some(account) = self.cache.load() {
            debug!(username = %account.username, "restored session from cache");
            self.current = Some(account);
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> SessionResult<Account> {
        let query = Query::table(Table::Users)
            .eq("username", username)
            .eq("password", password)
            .single();

        let rows = match self.store.select(query).await {
            Ok(rows) => rows,
            Err(StoreError::NotFound | StoreError::NotSingular) => {
                return Err(SessionError::InvalidCredentials)
            }
            Err(e) => return Err(e.into()),
        };

        let record = rows
            .into_iter()
            .next()
            .ok_or(SessionError::InvalidCredentials)?;
        let account: Account = from_record(record)?;

        Ok(self.set_current(account))
    }

    pub async fn register(&mut self, username: &str, password: &str) -> SessionResult<Account> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(SessionError::EmptyCredentials);
        }

        // A single conditional insert; the store's uniqueness constraint is
        // the only existence check.
        let row = to_record(&serde_json::json!({
            "username": username,
            "password": password,
        }))?;

        let mut rows = match self.store.insert(Table::Users, vec![row]).await {
            Ok(rows) => rows,
            Err(StoreError::Conflict(_)) => return Err(SessionError::UsernameTaken),
            Err(e) => return Err(e.into()),
        };

        let record = rows
            .pop()
            .ok_or_else(|| StoreError::Malformed("insert returned no row".to_string()))?;
        let account: Account = from_record(record)?;

        Ok(self.set_current(account))
    }

    /// Always succeeds; only touches memory and the cache file.
    pub fn logout(&mut self) {
        self.current = None;
        self.cache.clear();
    }

    /// Delete every owned task, then the account row, then log out. The two
    /// phases are not atomic: when the second fails, the tasks are already
    /// gone and the session stays authenticated.
    pub async fn delete_profile(&mut self, username: &str, password: &str) -> SessionResult<()> {
        let current = self.current.clone().ok_or(SessionError::NotLoggedIn)?;

        // The re-entered credentials must identify the logged-in account.
        let query = Query::table(Table::Users)
            .eq("username", username)
            .eq("password", password)
            .single();
        let rows = match self.store.select(query).await {
            Ok(rows) => rows,
            Err(StoreError::NotFound | StoreError::NotSingular) => {
                return Err(SessionError::InvalidCredentials)
            }
            Err(e) => return Err(e.into()),
        };
        let confirmed: Account = from_record(
            rows.into_iter()
                .next()
                .ok_or(SessionError::InvalidCredentials)?,
        )?;
        if confirmed.id != current.id {
            return Err(SessionError::InvalidCredentials);
        }

        self.store
            .delete(Query::table(Table::Tasks).eq("owner", current.id.clone()))
            .await
            .map_err(|source| SessionError::ProfileDeletion {
                phase: DeletionPhase::Tasks,
                source,
            })?;

        self.store
            .delete(Query::table(Table::Users).eq("id", current.id.clone()))
            .await
            .map_err(|source| SessionError::ProfileDeletion {
                phase: DeletionPhase::Account,
                source,
            })?;

        self.logout();
        Ok(())
    }

    fn set_current(&mut self, account: Account) -> Account {
        if let Err(e) = self.cache.save(&account) {
            warn!(error = %e, "failed to persist the session cache");
        }
        self.current = Some(account.clone());
        account
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanri_store::store::in_memory::{InMemoryStore, InMemoryStoreConfig};
    use kanri_store::{PinFuture, Record, Store, StoreResult};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn setup(dir: &tempfile::TempDir) -> (Session, StoreBox) {
        let store = StoreBox::new(InMemoryStore::new(InMemoryStoreConfig::default()));
        let cache = SessionCache::new(dir.path().join("current_user.json"));
        (Session::new(store.clone(), cache), store)
    }

    async fn count(store: &StoreBox, table: Table) -> usize {
        store.select(Query::table(table)).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_register_then_login_roundtrip() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, _store) = setup(&dir);

        let registered = session.register("ada", "pw").await?;
        assert!(!registered.id.is_empty());
        assert_eq!(session.current(), Some(&registered));

        session.logout();
        assert_eq!(session.current(), None);

        let logged_in = session.login("ada", "pw").await?;
        assert_eq!(logged_in, registered);
        assert_eq!(session.current(), Some(&registered));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);

        session.register("ada", "pw").await?;
        session.logout();

        let second = session.register("ada", "other").await;
        assert!(matches!(second, Err(SessionError::UsernameTaken)));
        assert_eq!(session.current(), None);
        assert_eq!(count(&store, Table::Users).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_blank_input() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);

        let result = session.register("   ", "pw").await;
        assert!(matches!(result, Err(SessionError::EmptyCredentials)));
        let result = session.register("ada", "").await;
        assert!(matches!(result, Err(SessionError::EmptyCredentials)));
        assert_eq!(count(&store, Table::Users).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, _store) = setup(&dir);

        session.register("ada", "pw").await?;
        session.logout();

        let result = session.login("ada", "nope").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        let result = session.login("grace", "pw").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert_eq!(session.current(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_requires_exactly_one_match() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);

        // Manufacture two identical credential rows; updates bypass the
        // insert-time uniqueness constraint.
        store
            .insert(
                Table::Users,
                vec![
                    kanri_store::to_record(&serde_json::json!({
                        "username": "ada", "password": "pw",
                    }))?,
                    kanri_store::to_record(&serde_json::json!({
                        "username": "bob", "password": "pw",
                    }))?,
                ],
            )
            .await?;
        store
            .update(
                Query::table(Table::Users).eq("username", "bob"),
                kanri_store::to_record(&serde_json::json!({"username": "ada"}))?,
            )
            .await?;

        let result = session.login("ada", "pw").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_roundtrip_between_sessions() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);
        let account = session.register("ada", "pw").await?;

        // A later invocation restores the cached identity without touching
        // the store.
        let cache = SessionCache::new(dir.path().join("current_user.json"));
        let mut next = Session::new(store, cache);
        next.restore();
        assert_eq!(next.current(), Some(&account));
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_tolerates_corrupt_cache() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, _store) = setup(&dir);

        std::fs::write(dir.path().join("current_user.json"), "not json")?;
        session.restore();
        assert_eq!(session.current(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_cache() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);
        session.register("ada", "pw").await?;

        session.logout();

        let cache = SessionCache::new(dir.path().join("current_user.json"));
        let mut next = Session::new(store, cache);
        next.restore();
        assert_eq!(next.current(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_profile_rejects_wrong_password() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);
        let account = session.register("ada", "pw").await?;
        seed_task(&store, &account.id).await?;

        let result = session.delete_profile("ada", "nope").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));

        // Nothing was deleted and the session is unchanged.
        assert_eq!(count(&store, Table::Users).await, 1);
        assert_eq!(count(&store, Table::Tasks).await, 1);
        assert_eq!(session.current(), Some(&account));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_profile_rejects_other_accounts_credentials() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);
        session.register("grace", "gpw").await?;
        session.logout();
        session.register("ada", "pw").await?;

        // Valid credentials, but not the logged-in account's.
        let result = session.delete_profile("grace", "gpw").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert_eq!(count(&store, Table::Users).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_profile_removes_tasks_then_account() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, store) = setup(&dir);
        let account = session.register("ada", "pw").await?;
        seed_task(&store, &account.id).await?;

        session.delete_profile("ada", "pw").await?;

        assert_eq!(count(&store, Table::Users).await, 0);
        assert_eq!(count(&store, Table::Tasks).await, 0);
        assert_eq!(session.current(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_profile_requires_login() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let (mut session, _store) = setup(&dir);

        let result = session.delete_profile("ada", "pw").await;
        assert!(matches!(result, Err(SessionError::NotLoggedIn)));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_profile_account_phase_failure_is_partial() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let fail_user_deletes = Arc::new(AtomicBool::new(false));
        let store = StoreBox::new(FlakyStore {
            inner: InMemoryStore::new(InMemoryStoreConfig::default()),
            fail_user_deletes: fail_user_deletes.clone(),
        });
        let cache = SessionCache::new(dir.path().join("current_user.json"));
        let mut session = Session::new(store.clone(), cache);

        let account = session.register("ada", "pw").await?;
        seed_task(&store, &account.id).await?;

        fail_user_deletes.store(true, Ordering::SeqCst);
        let result = session.delete_profile("ada", "pw").await;
        assert!(matches!(
            result,
            Err(SessionError::ProfileDeletion {
                phase: DeletionPhase::Account,
                ..
            })
        ));

        // The documented partial state: tasks gone, account orphaned, session
        // still authenticated.
        assert_eq!(count(&store, Table::Tasks).await, 0);
        assert_eq!(count(&store, Table::Users).await, 1);
        assert_eq!(session.current(), Some(&account));
        Ok(())
    }

    async fn seed_task(store: &StoreBox, owner: &str) -> eyre::Result<()> {
        let row = kanri_store::to_record(&serde_json::json!({
            "text": "Buy milk",
            "status": "todo",
            "owner": owner,
            "order": 1,
        }))?;
        store.insert(Table::Tasks, vec![row]).await?;
        Ok(())
    }

    /// Delegating store double that can be told to fail `Users` deletions.
    struct FlakyStore {
        inner: InMemoryStore,
        fail_user_deletes: Arc<AtomicBool>,
    }

    impl Store for FlakyStore {
        fn select(&self, query: Query) -> PinFuture<StoreResult<Vec<Record>>> {
            self.inner.select(query)
        }

        fn insert(&self, table: Table, rows: Vec<Record>) -> PinFuture<StoreResult<Vec<Record>>> {
            self.inner.insert(table, rows)
        }

        fn update(&self, query: Query, patch: Record) -> PinFuture<StoreResult<()>> {
            self.inner.update(query, patch)
        }

        fn delete(&self, query: Query) -> PinFuture<StoreResult<()>> {
            if query.table == Table::Users && self.fail_user_deletes.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(StoreError::Backend("injected failure".to_string()))
                });
            }
            self.inner.delete(query)
        }
    }
}
