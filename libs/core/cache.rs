use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::session::Account;

/// Durable session cache: remembers the logged-in account between
/// invocations, the way a browser keeps it in local storage. Missing or
/// unreadable content degrades to an anonymous session, never to an error.
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: PathBuf) -> Self {
        SessionCache { path }
    }

    /// Cache file under the platform data directory, e.g.
    /// `~/.local/share/kanri/current_user.json`.
    pub fn default_path() -> eyre::Result<Self> {
        let dirs = directories_next::ProjectDirs::from("", "", "kanri")
            .ok_or_else(|| eyre::eyre!("could not determine a home directory for this system"))?;
        Ok(SessionCache::new(dirs.data_dir().join("current_user.json")))
    }

    pub fn load(&self) -> Option<Account> {
        match read_json_document_as_struct_with_default::<Option<Account>, _>(&self.path) {
            Ok(account) => account,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session cache");
                None
            }
        }
    }

    pub fn save(&self, account: &Account) -> eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        save_json_document(&self.path, account)
    }

    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %e, "failed to remove the session cache");
            }
        }
    }
}

fn read_json_document_as_struct_with_default<T: DeserializeOwned + Default, P: AsRef<Path>>(
    path: P,
) -> eyre::Result<T> {
    let path = path.as_ref();
    if path.exists() {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(T::default())
    }
}

fn save_json_document<T: Serialize, P: AsRef<Path>>(path: P, data: &T) -> eyre::Result<()> {
    let serialized = serde_json::to_string(data)?;
    let mut file = File::create(path)?;
    file.write_all(serialized.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_in(dir: &tempfile::TempDir) -> SessionCache {
        SessionCache::new(dir.path().join("nested").join("current_user.json"))
    }

    fn account() -> Account {
        Account {
            id: "acc-1".to_string(),
            username: "ada".to_string(),
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        cache.save(&account()).unwrap();
        assert_eq!(cache.load(), Some(account()));
    }

    #[test]
    fn test_missing_file_loads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cache_in(&dir).load(), None);
    }

    #[test]
    fn test_corrupt_file_loads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.save(&account()).unwrap();

        std::fs::write(dir.path().join("nested").join("current_user.json"), "{oops").unwrap();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_clear_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.save(&account()).unwrap();

        cache.clear();
        assert_eq!(cache.load(), None);
        // Clearing an already-empty cache is fine.
        cache.clear();
    }
}
