use kanri_store::StoreConfig;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

#[derive(Deserialize)]
#[serde(bound = "S: DeserializeOwned")]
pub struct Config<S: StoreConfig> {
    /// default store type to be used by frontends (default to: rest)
    pub default_store_type: Option<String>,
    pub store: S,
}
