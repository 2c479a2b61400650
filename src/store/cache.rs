use std::{future::Future, sync::atomic::{AtomicU64, Ordering}};
use tokio::sync::RwLock;
use crate::{api, log_info};

#[derive(Debug)]
struct State<T> {
    items: Vec<T>,
    /// Génération de la dernière réponse appliquée
    applied: u64,
    stale: bool,
}

/// Liste en cache d'une ressource du backend.
///
/// La liste n'est remplacée que par un rafraîchissement réussi. Les réponses arrivées
/// après une réponse plus récente sont ignorées.
#[derive(Debug)]
pub struct Cache<T> {
    name: &'static str,
    state: RwLock<State<T>>,
    issued: AtomicU64,
}

impl<T: Clone> Cache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(State { items: Vec::new(), applied: 0, stale: true }),
            issued: AtomicU64::new(0),
        }
    }
    pub async fn cached(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }
    pub async fn is_stale(&self) -> bool {
        self.state.read().await.stale
    }
    /// A appeler après une écriture réussie. La liste reste telle quelle.
    pub async fn invalidate(&self) {
        self.state.write().await.stale = true;
    }

    /// Remplace la liste par le résultat de `fetch`. En cas d'échec la liste est conservée.
    pub async fn refresh_with<F>(&self, fetch: F) -> api::Result<Vec<T>>
    where
        F: Future<Output = api::Result<Vec<T>>>,
    {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let items = fetch.await?;
        let mut state = self.state.write().await;
        if generation < state.applied {
            log_info!("{}: response {} dropped, {} already applied", self.name, generation, state.applied);
            return Ok(state.items.clone());
        }
        state.items = items;
        state.applied = generation;
        state.stale = false;
        Ok(state.items.clone())
    }
    /// Liste en cache, rechargée si elle n'est plus à jour
    pub async fn list_with<F>(&self, fetch: F) -> api::Result<Vec<T>>
    where
        F: Future<Output = api::Result<Vec<T>>>,
    {
        if self.is_stale().await {
            self.refresh_with(fetch).await
        } else {
            Ok(self.cached().await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn ok(items: Vec<u32>) -> api::Result<Vec<u32>> {
        Ok(items)
    }

    #[tokio::test]
    async fn failed_refresh_keeps_list() {
        let cache = Cache::new("test");
        cache.refresh_with(ok(vec![1, 2])).await.unwrap();
        let failed = cache.refresh_with(async { Err(api::Error::MissingToken) }).await;
        assert!(failed.is_err());
        assert_eq!(cache.cached().await, vec![1, 2]);
    }

    #[tokio::test]
    async fn invalidate_only_marks_stale() {
        let cache = Cache::new("test");
        assert!(cache.is_stale().await);
        cache.list_with(ok(vec![1])).await.unwrap();
        assert!(!cache.is_stale().await);
        // Pas de rechargement tant que la liste est à jour
        assert_eq!(cache.list_with(ok(vec![9])).await.unwrap(), vec![1]);
        cache.invalidate().await;
        assert_eq!(cache.cached().await, vec![1]);
        assert_eq!(cache.list_with(ok(vec![1, 2])).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn older_response_is_dropped() {
        let cache = Cache::new("test");
        let slow = cache.refresh_with(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(vec![1])
        });
        let fast = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            cache.refresh_with(ok(vec![2])).await
        };
        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(fast.unwrap(), vec![2]);
        assert_eq!(slow.unwrap(), vec![2]);
        assert_eq!(cache.cached().await, vec![2]);
    }
}
