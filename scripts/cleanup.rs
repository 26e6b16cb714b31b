//! Run with: cargo run --bin cleanup

use std::env;

use fleetchat::config::redis;
use fleetchat::modules::session::crud::{
    KeyValueStore, RedisStore, ACTIVE_SESSION_KEY, SESSIONS_KEY,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let uri = env::var("REDIS_URI")?;
    let namespace = env::var("REDIS_NAMESPACE").unwrap_or_else(|_| "fleetchat".to_string());

    println!("Connecting to Redis...");
    let store = RedisStore::new(redis::connect(&uri).await?, namespace.clone());

    for key in [SESSIONS_KEY, ACTIVE_SESSION_KEY] {
        store.remove(key).await?;
        println!("✓ Removed {}:{}", namespace, key);
    }

    println!("\n✓ Cleanup complete!");
    Ok(())
}
