//! In-memory stand-in for the backend database.
//!
//! Every collection keeps its records as JSON objects in insertion order.
//! Records are never validated here; typing happens on the client side.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use serde_json::{Map, Value};

pub mod fixtures;

pub type Record = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Expenses,
    Incomes,
    Budgets,
    Goals,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Expenses,
        Collection::Incomes,
        Collection::Budgets,
        Collection::Goals,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Expenses => "expenses",
            Collection::Incomes => "incomes",
            Collection::Budgets => "budgets",
            Collection::Goals => "goals",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|collection| collection.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Default)]
struct CollectionData {
    records: Vec<Record>,
    // Highest id ever issued, so ids are not reused after deletes.
    last_issued: u64,
}

impl CollectionData {
    fn next_id(&mut self) -> u64 {
        let highest = self
            .records
            .iter()
            .filter_map(record_id)
            .max()
            .unwrap_or(0);

        self.last_issued = highest.max(self.last_issued) + 1;
        self.last_issued
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record_id(record) == Some(id))
    }
}

#[derive(Clone)]
pub struct MockStore {
    collections: Arc<DashMap<Collection, CollectionData>>,
}

impl MockStore {
    pub fn empty() -> Self {
        let collections = DashMap::new();
        for collection in Collection::ALL {
            collections.insert(collection, CollectionData::default());
        }

        Self {
            collections: Arc::new(collections),
        }
    }

    /// Store pre-populated with the demo account, dated around `today`.
    pub fn seeded(today: NaiveDate) -> Result<Self, anyhow::Error> {
        let store = Self::empty();
        fixtures::seed(&store, today)?;

        log::info!(
            "Seeded mock store: {} users, {} expenses, {} incomes, {} budgets, {} goals.",
            store.len(Collection::Users),
            store.len(Collection::Expenses),
            store.len(Collection::Incomes),
            store.len(Collection::Budgets),
            store.len(Collection::Goals),
        );

        Ok(store)
    }

    /// Records matching every `(field, value)` filter, in insertion order.
    pub fn list(&self, collection: Collection, filters: &[(String, String)]) -> Vec<Record> {
        match self.collections.get(&collection) {
            Some(data) => data
                .records
                .iter()
                .filter(|record| {
                    filters
                        .iter()
                        .all(|(field, expected)| field_equals(record, field, expected))
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn get(&self, collection: Collection, id: u64) -> Option<Record> {
        let data = self.collections.get(&collection)?;
        let position = data.position(id)?;

        Some(data.records[position].clone())
    }

    /// Appends `body` under a freshly allocated id. Any id in the body is
    /// ignored.
    pub fn insert(&self, collection: Collection, body: Value) -> Record {
        let mut record = match body {
            Value::Object(fields) => fields,
            _ => Record::new(),
        };

        let mut data = self.collections.entry(collection).or_default();
        let id = data.next_id();
        record.insert("id".to_string(), Value::from(id));
        data.records.push(record.clone());

        record
    }

    /// Shallow merge of `body` over the stored record. The stored id wins.
    pub fn update(&self, collection: Collection, id: u64, body: Value) -> Option<Record> {
        let mut data = self.collections.get_mut(&collection)?;
        let position = data.position(id)?;
        let record = &mut data.records[position];

        if let Value::Object(fields) = body {
            for (field, value) in fields {
                if field != "id" {
                    record.insert(field, value);
                }
            }
        }

        Some(record.clone())
    }

    pub fn remove(&self, collection: Collection, id: u64) -> Option<Record> {
        let mut data = self.collections.get_mut(&collection)?;
        let position = data.position(id)?;

        Some(data.records.remove(position))
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|data| data.records.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

pub fn record_id(record: &Record) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

fn field_equals(record: &Record, field: &str, expected: &str) -> bool {
    match record.get(field) {
        Some(Value::String(value)) => value == expected,
        Some(Value::Number(value)) => {
            value.to_string() == expected
                || match (value.as_f64(), expected.parse::<f64>()) {
                    (Some(value), Ok(expected)) => value == expected,
                    _ => false,
                }
        }
        Some(Value::Bool(value)) => value.to_string() == expected,
        _ => false,
    }
}
