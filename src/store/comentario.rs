use tokio::sync::RwLock;
use reqdesk_core::{form::StagedFile, model::{Comentario, ComentarioPayload}};
use crate::api;

use super::Cache;

/// Commentaires du dernier ticket consulté
pub struct ComentarioStore {
    api: api::Client,
    codigo: RwLock<Option<String>>,
    cache: Cache<Comentario>,
}

impl ComentarioStore {
    pub fn new(api: api::Client) -> Self {
        Self {
            api,
            codigo: RwLock::new(None),
            cache: Cache::new("comentarios"),
        }
    }
    /// Ticket dont les commentaires sont en cache
    pub async fn codigo(&self) -> Option<String> {
        self.codigo.read().await.clone()
    }
    /// Charge les commentaires d'un ticket. Changer de ticket vide d'abord la liste.
    pub async fn refresh(&self, codigo: &str) -> api::Result<Vec<Comentario>> {
        {
            let mut current = self.codigo.write().await;
            if current.as_deref() != Some(codigo) {
                *current = Some(codigo.to_string());
                self.cache.refresh_with(async { Ok(Vec::new()) }).await?;
            }
        }
        self.cache.refresh_with(self.api.get_comentarios(codigo)).await
    }
    pub async fn cached(&self) -> Vec<Comentario> {
        self.cache.cached().await
    }
    pub async fn invalidate(&self) {
        self.cache.invalidate().await
    }
    pub async fn create(&self, payload: &ComentarioPayload, archivos: &[StagedFile]) -> api::Result<()> {
        self.api.create_comentario(payload, archivos).await?;
        self.cache.invalidate().await;
        Ok(())
    }
}
