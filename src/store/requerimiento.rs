use async_trait::async_trait;
use reqdesk_core::{
    form::Submission,
    model::{IDType, Requerimiento},
    SequenceSource,
};
use crate::api;

use super::{Cache, Repository};

pub struct RequerimientoStore {
    api: api::Client,
    cache: Cache<Requerimiento>,
}

impl RequerimientoStore {
    pub fn new(api: api::Client) -> Self {
        Self { api, cache: Cache::new("requerimientos") }
    }
    /// Envoie un formulaire soumis: création, ou mise à jour si le ticket existe déjà.
    pub async fn save(&self, submission: &Submission) -> api::Result<()> {
        match &submission.codigo_original {
            Some(codigo) => self.api.update_requerimiento(codigo, &submission.payload, &submission.archivos).await?,
            None => {
                self.api.create_requerimiento(&submission.payload, &submission.archivos).await?;
            }
        }
        self.cache.invalidate().await;
        Ok(())
    }
    pub async fn delete(&self, codigo: &str) -> api::Result<()> {
        self.api.delete_requerimiento(codigo).await?;
        self.cache.invalidate().await;
        Ok(())
    }
    /// La suppression d'une pièce jointe modifie le ticket qui la porte.
    pub async fn delete_archivo(&self, id: IDType) -> api::Result<()> {
        self.api.delete_archivo(id).await?;
        self.cache.invalidate().await;
        Ok(())
    }
    pub async fn find(&self, codigo: &str) -> api::Result<Option<Requerimiento>> {
        Ok(self.list().await?.into_iter().find(|r| r.codigo == codigo))
    }
}

#[async_trait]
impl Repository for RequerimientoStore {
    type Item = Requerimiento;
    async fn refresh(&self) -> api::Result<Vec<Requerimiento>> {
        self.cache.refresh_with(self.api.get_requerimientos()).await
    }
    async fn cached(&self) -> Vec<Requerimiento> {
        self.cache.cached().await
    }
    async fn list(&self) -> api::Result<Vec<Requerimiento>> {
        self.cache.list_with(self.api.get_requerimientos()).await
    }
    async fn invalidate(&self) {
        self.cache.invalidate().await
    }
}

#[async_trait]
impl SequenceSource for RequerimientoStore {
    /// L'échec est déjà journalisé par la passerelle.
    async fn next_sequence(&self, tipo_id: IDType) -> Option<u64> {
        self.api.get_next_sequence(tipo_id).await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client;
    use reqdesk_core::{form::{Catalogos, RequerimientoForm}, model::{Estado, Prioridad}};
    use std::time::Instant;

    #[tokio::test]
    async fn form_gets_code_from_backend() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/requerimiento/ultimo-secuencial/1").with_body("7").create_async().await;
        let store = RequerimientoStore::new(client(&server, Some("tok")));
        let tipos = serde_json::from_str(r#"[{"id": 1, "codigo": "INC", "descripcion": "Incidente"}]"#).unwrap();
        let catalogos = Catalogos {
            tipos,
            estados: vec![Estado { id: 1, nombre: "Abierto".into() }],
            prioridades: vec![Prioridad { id: 1, nombre: "Alta".into() }],
        };
        let mut form = RequerimientoForm::create(catalogos, Some(12));
        let codigo = form.select_tipo_in_year(Some(1), &store, 2024).await;
        assert_eq!(codigo.map(|c| c.as_str()), Some("INC-2024-0000000007"));
        assert!(form.errors().is_empty(Instant::now()));
    }

    #[tokio::test]
    async fn sequence_failure_is_none() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/requerimiento/ultimo-secuencial/1").with_status(500).create_async().await;
        let store = RequerimientoStore::new(client(&server, Some("tok")));
        assert_eq!(store.next_sequence(1).await, None);
    }

    #[tokio::test]
    async fn delete_marks_stale() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/requerimiento").with_body(r#"[{"codigo": "INC-2024-0000000007"}]"#).create_async().await;
        server.mock("POST", "/requerimiento/delete/INC-2024-0000000007").create_async().await;
        let store = RequerimientoStore::new(client(&server, Some("tok")));
        store.refresh().await.unwrap();
        store.delete("INC-2024-0000000007").await.unwrap();
        assert_eq!(store.cached().await.len(), 1);
        assert!(store.cache.is_stale().await);
    }
}
