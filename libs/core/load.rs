use kanri_store::{
    store::{in_memory::InMemoryStoreConfig, rest::RestStoreConfig},
    BuiltinStoreType, StoreConfig,
};

use crate::{board::Board, cache::SessionCache, session::Session, Core};

pub async fn load(store_type: BuiltinStoreType, config_path: &str) -> eyre::Result<Core> {
    match store_type {
        BuiltinStoreType::Rest => load_core::<RestStoreConfig>(config_path).await,
        BuiltinStoreType::InMemory => load_core::<InMemoryStoreConfig>(config_path).await,
    }
}

pub async fn load_core<SC>(config_path: &str) -> eyre::Result<Core>
where
    SC: StoreConfig,
{
    let mut found_config_file = Ok(());
    let config = match kanri_config::get_config_from_path::<SC>(config_path).await {
        Ok(v) => v,
        Err(e) => {
            found_config_file = Err(e);
            kanri_config::get_default_store_config::<SC>()
        }
    };

    let store = config.store.try_into_store()?;
    let cache = SessionCache::default_path()?;

    Ok(Core {
        session: Session::new(store.clone(), cache),
        board: Board::new(store),
        found_config_file,
    })
}
