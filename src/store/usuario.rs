use async_trait::async_trait;
use reqdesk_core::{form::AvailabilityCheck, model::{Legajo, Usuario, UsuarioPayload}};
use crate::{api, log_warn};

use super::{Cache, Repository};

pub struct UsuarioStore {
    api: api::Client,
    cache: Cache<Usuario>,
}

impl UsuarioStore {
    pub fn new(api: api::Client) -> Self {
        Self { api, cache: Cache::new("usuarios") }
    }
    pub async fn create(&self, usuario: &UsuarioPayload) -> api::Result<()> {
        self.api.create_usuario(usuario).await?;
        self.cache.invalidate().await;
        Ok(())
    }
    pub async fn update(&self, legajo: Legajo, usuario: &UsuarioPayload) -> api::Result<()> {
        self.api.update_usuario(legajo, usuario).await?;
        self.cache.invalidate().await;
        Ok(())
    }
    pub async fn delete(&self, legajo: Legajo) -> api::Result<()> {
        self.api.delete_usuario(legajo).await?;
        self.cache.invalidate().await;
        Ok(())
    }
    /// Recherche dans la liste (rechargée si périmée)
    pub async fn find(&self, legajo: Legajo) -> api::Result<Option<Usuario>> {
        Ok(self.list().await?.into_iter().find(|u| u.legajo == legajo))
    }
}

#[async_trait]
impl Repository for UsuarioStore {
    type Item = Usuario;
    async fn refresh(&self) -> api::Result<Vec<Usuario>> {
        self.cache.refresh_with(self.api.get_usuarios()).await
    }
    async fn cached(&self) -> Vec<Usuario> {
        self.cache.cached().await
    }
    async fn list(&self) -> api::Result<Vec<Usuario>> {
        self.cache.list_with(self.api.get_usuarios()).await
    }
    async fn invalidate(&self) {
        self.cache.invalidate().await
    }
}

#[async_trait]
impl AvailabilityCheck for UsuarioStore {
    async fn email_available(&self, email: &str) -> Option<bool> {
        match self.api.validate_email(email).await {
            Ok(available) => Some(available),
            Err(e) => {
                log_warn!("Email availability unknown: {}", e);
                None
            }
        }
    }
    async fn username_available(&self, username: &str) -> Option<bool> {
        match self.api.validate_username(username).await {
            Ok(available) => Some(available),
            Err(e) => {
                log_warn!("Username availability unknown: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client;

    const ANA: &str = r#"{"legajo": 12, "nombre": "Ana", "apellido": "Gómez", "username": "agomez", "email": "ana@empresa.com"}"#;

    fn payload() -> UsuarioPayload {
        UsuarioPayload {
            nombre: "Luis".into(),
            apellido: "Pérez".into(),
            username: "lperez".into(),
            email: "luis@empresa.com".into(),
            cargo_id: 1,
            departamento_id: 2,
            clave: Some("Abc123!@#xyz".into()),
        }
    }

    #[tokio::test]
    async fn create_leaves_cached_list_until_refresh() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        server.mock("POST", "/auth/register").with_status(201).create_async().await;
        let store = UsuarioStore::new(client(&server, Some("tok")));
        store.refresh().await.unwrap();
        store.create(&payload()).await.unwrap();
        assert_eq!(store.cached().await.len(), 1);
        assert!(store.cache.is_stale().await);
    }

    #[tokio::test]
    async fn failed_write_does_not_invalidate() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        server.mock("DELETE", "/usuarios/delete/12").with_status(500).create_async().await;
        let store = UsuarioStore::new(client(&server, Some("tok")));
        store.list().await.unwrap();
        assert!(store.delete(12).await.is_err());
        assert!(!store.cache.is_stale().await);
        assert_eq!(store.find(12).await.unwrap().map(|u| u.username).as_deref(), Some("agomez"));
    }

    #[tokio::test]
    async fn availability_is_unknown_on_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios/validate-username/agomez").with_status(500).create_async().await;
        let store = UsuarioStore::new(client(&server, Some("tok")));
        assert_eq!(store.username_available("agomez").await, None);
    }
}
