//! Runtime config store commands (get/set persisted keys)

use crate::config::Config;
use crate::constants::{config_keys, playback};
use crate::db::Store;

pub async fn cmd_config_get(config: &Config, key: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    match store.get_config_value(key).await? {
        Some(value) => println!("{key} = {value}"),
        None if key == config_keys::BASE_PLAYBACK_URL => {
            println!("{key} = (not set, default: {})", playback::DEFAULT_BASE_URL);
        }
        None => println!("{key} is not set."),
    }

    Ok(())
}

pub async fn cmd_config_set(config: &Config, key: &str, value: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    store.set_config_value(key, value).await?;
    println!("✓ {key} set.");

    if key == config_keys::BASE_PLAYBACK_URL {
        println!("New playback links will use this base. Stored links are unchanged.");
    }

    Ok(())
}
