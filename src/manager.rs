use crate::client::RealtimeClient;
use crate::types::Result;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

// One client per process; explicit factory lifecycle instead of hidden
// module state so tests can construct clients directly.
static INSTANCE: Lazy<Mutex<Option<Arc<RealtimeClient>>>> = Lazy::new(|| Mutex::new(None));

/// Get the process-wide client, building it on first access.
///
/// `init` runs only when no instance exists; subsequent calls return the
/// shared handle and ignore their argument.
pub fn get_or_create<F>(init: F) -> Result<Arc<RealtimeClient>>
where
    F: FnOnce() -> Result<RealtimeClient>,
{
    let mut instance = INSTANCE.lock().unwrap();
    if let Some(client) = instance.as_ref() {
        return Ok(Arc::clone(client));
    }

    let client = Arc::new(init()?);
    *instance = Some(Arc::clone(&client));
    Ok(client)
}

/// Peek at the process-wide client without building one
pub fn current() -> Option<Arc<RealtimeClient>> {
    INSTANCE.lock().unwrap().clone()
}

/// Disconnect and release the process-wide client (logout path).
///
/// The next `get_or_create` builds a fresh instance.
pub async fn teardown() -> Result<()> {
    let client = INSTANCE.lock().unwrap().take();
    if let Some(client) = client {
        client.disconnect().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RealtimeClientOptions;
    use crate::session::StaticTokenProvider;

    fn build_client() -> Result<RealtimeClient> {
        RealtimeClient::new(
            "ws://127.0.0.1:9/ws",
            Arc::new(StaticTokenProvider::new("jwt")),
            RealtimeClientOptions::default(),
        )
    }

    // Single test since the factory is process-global state
    #[tokio::test]
    async fn test_factory_lifecycle() {
        assert!(current().is_none());

        let first = get_or_create(build_client).unwrap();
        let second = get_or_create(|| unreachable!("instance already exists")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(current().is_some());

        teardown().await.unwrap();
        assert!(current().is_none());

        let rebuilt = get_or_create(build_client).unwrap();
        assert!(!Arc::ptr_eq(&first, &rebuilt));

        teardown().await.unwrap();
    }
}
