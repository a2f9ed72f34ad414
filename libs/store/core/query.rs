use serde_json::Value;
use strum_macros::{Display, EnumString};

use super::record::Record;

/// Tables of the remote store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Table {
    #[strum(serialize = "Users")]
    Users,
    #[strum(serialize = "Tasks")]
    Tasks,
}

/// Equality predicate on a single column.
#[derive(Clone, Debug)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// A select/update/delete target: a table plus equality filters, optionally
/// constrained to exactly one row.
#[derive(Clone, Debug)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub single: bool,
}

impl Query {
    pub fn table(table: Table) -> Self {
        Query {
            table,
            filters: Vec::new(),
            single: false,
        }
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Require exactly one matching row: zero rows select as
    /// `StoreError::NotFound`, several as `StoreError::NotSingular`.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Whether a row satisfies every filter of this query.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|filter| record.get(&filter.field) == Some(&filter.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_wire_names() {
        assert_eq!(Table::Users.to_string(), "Users");
        assert_eq!(Table::Tasks.to_string(), "Tasks");
        assert_eq!("Tasks".parse::<Table>().unwrap(), Table::Tasks);
    }

    #[test]
    fn test_query_matches_all_filters() {
        let record = crate::to_record(&json!({"id": "t1", "owner": "a1", "order": 2})).unwrap();

        let query = Query::table(Table::Tasks).eq("owner", "a1").eq("order", 2);
        assert!(query.matches(&record));

        let query = Query::table(Table::Tasks).eq("owner", "a1").eq("order", 3);
        assert!(!query.matches(&record));

        let query = Query::table(Table::Tasks).eq("missing", "x");
        assert!(!query.matches(&record));
    }
}
