use reqwest::Method;
use reqdesk_core::model::{Legajo, Usuario, UsuarioPayload};

use super::{Client, Result};

impl Client {
    pub async fn get_usuarios(&self) -> Result<Vec<Usuario>> {
        self.get_json("usuarios", "get_usuarios").await
    }
    /// Alias de [`Client::register`]
    pub async fn create_usuario(&self, usuario: &UsuarioPayload) -> Result<()> {
        self.register(usuario).await
    }
    pub async fn update_usuario(&self, legajo: Legajo, usuario: &UsuarioPayload) -> Result<()> {
        let what = "update_usuario";
        let req = self.request(Method::PATCH, &format!("usuarios/update/{}", legajo), what).await?.json(usuario);
        self.send(req, what).await.map(|_| ())
    }
    pub async fn delete_usuario(&self, legajo: Legajo) -> Result<()> {
        let what = "delete_usuario";
        let req = self.request(Method::DELETE, &format!("usuarios/delete/{}", legajo), what).await?;
        self.send(req, what).await.map(|_| ())
    }
    /// `true` si l'email n'est pas encore utilisé
    pub async fn validate_email(&self, email: &str) -> Result<bool> {
        let path = format!("usuarios/validate-email/{}", urlencoding::encode(email));
        self.get_json(&path, "validate_email").await
    }
    /// `true` si le username n'est pas encore utilisé
    pub async fn validate_username(&self, username: &str) -> Result<bool> {
        let path = format!("usuarios/validate-username/{}", urlencoding::encode(username));
        self.get_json(&path, "validate_username").await
    }
}
