use std::collections::HashMap;
use std::sync::Mutex;

use serde_derive::Deserialize;
use serde_json::Value;
use ulid::Ulid;

use crate::{PinFuture, Query, Record, Store, StoreBox, StoreConfig, StoreError, StoreResult, Table};

/// This store type is used for testing and throwaway sessions, rows are only
/// present in memory
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<Table, Vec<Record>>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct InMemoryStoreConfig {}

impl StoreConfig for InMemoryStoreConfig {
    type Store = InMemoryStore;

    fn try_into_store(self) -> eyre::Result<StoreBox> {
        Ok(StoreBox::new(InMemoryStore::new(self)))
    }
}

impl InMemoryStore {
    pub fn new(_config: InMemoryStoreConfig) -> Self {
        InMemoryStore::default()
    }

    fn with_table<T>(&self, table: Table, f: impl FnOnce(&mut Vec<Record>) -> T) -> T {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        f(tables.entry(table).or_default())
    }
}

impl Store for InMemoryStore {
    fn select(&self, query: Query) -> PinFuture<StoreResult<Vec<Record>>> {
        Box::pin(async move {
            let rows = self.with_table(query.table, |rows| {
                rows.iter()
                    .filter(|row| query.matches(row))
                    .cloned()
                    .collect::<Vec<_>>()
            });

            if query.single {
                match rows.len() {
                    0 => return Err(StoreError::NotFound),
                    1 => {}
                    _ => return Err(StoreError::NotSingular),
                }
            }

            Ok(rows)
        })
    }

    fn insert(&self, table: Table, rows: Vec<Record>) -> PinFuture<StoreResult<Vec<Record>>> {
        Box::pin(async move {
            self.with_table(table, |existing| {
                // Validate the whole batch before touching the table, so a
                // conflicting insert fails without a partial write.
                if table == Table::Users {
                    let mut taken: Vec<&Value> = existing
                        .iter()
                        .filter_map(|row| row.get("username"))
                        .collect();
                    for row in &rows {
                        if let Some(username) = row.get("username") {
                            if taken.contains(&username) {
                                return Err(StoreError::Conflict("username".to_string()));
                            }
                            taken.push(username);
                        }
                    }
                }

                let mut inserted = Vec::with_capacity(rows.len());
                for mut row in rows {
                    if !row.contains_key("id") {
                        row.insert("id".to_string(), Value::String(Ulid::new().to_string()));
                    }
                    existing.push(row.clone());
                    inserted.push(row);
                }
                Ok(inserted)
            })
        })
    }

    fn update(&self, query: Query, patch: Record) -> PinFuture<StoreResult<()>> {
        Box::pin(async move {
            self.with_table(query.table, |rows| {
                for row in rows.iter_mut().filter(|row| query.matches(row)) {
                    for (field, value) in &patch {
                        row.insert(field.clone(), value.clone());
                    }
                }
            });
            Ok(())
        })
    }

    fn delete(&self, query: Query) -> PinFuture<StoreResult<()>> {
        Box::pin(async move {
            self.with_table(query.table, |rows| {
                rows.retain(|row| !query.matches(row));
            });
            Ok(())
        })
    }
}
