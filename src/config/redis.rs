use redis::aio::ConnectionManager;
use tracing::info;

pub async fn connect(uri: &str) -> Result<ConnectionManager, redis::RedisError> {
    let client = redis::Client::open(uri)?;
    let manager = ConnectionManager::new(client).await?;
    info!("Connected to Redis");
    Ok(manager)
}
