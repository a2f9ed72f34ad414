use std::{future::Future, pin::Pin};

mod core {
    pub(crate) mod error;
    pub(crate) mod query;
    pub(crate) mod record;
    pub(crate) mod store;
    pub(crate) mod store_config;
}

pub use core::{
    error::{StoreError, StoreResult},
    query::{Filter, Query, Table},
    record::{from_record, to_record, Record},
    store::{Store, StoreBox},
    store_config::StoreConfig,
};

pub mod store {
    pub mod in_memory;
    #[cfg(feature = "rest")]
    pub mod rest;
}

pub type PinFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone, Debug)]
pub enum BuiltinStoreType {
    #[cfg(feature = "rest")]
    Rest,
    InMemory,
}
