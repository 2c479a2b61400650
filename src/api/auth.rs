use serde::{Deserialize, Serialize};
use reqdesk_core::model::UsuarioPayload;
use crate::log_error;

use super::{Client, Error, Result};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    clave: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl Client {
    /// Demande un jeton. Seul appel qui ne requiert pas de session.
    pub async fn login(&self, username: &str, clave: &str) -> Result<String> {
        let what = "login";
        let req = self.http
            .post(self.url("auth/login"))
            .json(&LoginRequest { username, clave });
        let resp = self.send(req, what).await?;
        let LoginResponse { token } = Self::decode(resp, what).await?;
        if token.is_empty() {
            log_error!("{}: empty token", what);
            return Err(Error::Unexpected(reqwest::StatusCode::OK));
        }
        Ok(token)
    }
    /// Création d'un utilisateur (réservée à un utilisateur connecté)
    pub async fn register(&self, usuario: &UsuarioPayload) -> Result<()> {
        let what = "register";
        let req = self.request(reqwest::Method::POST, "auth/register", what).await?.json(usuario);
        self.send(req, what).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use mockito::Matcher;

    #[tokio::test]
    async fn login_posts_clave_and_reads_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/auth/login")
            .match_body(Matcher::Json(serde_json::json!({"username": "agomez", "clave": "secreto"})))
            .with_status(200)
            .with_body(r#"{"token": "jwt"}"#)
            .create_async().await;
        let api = client(&server, None);
        assert_eq!(api.login("agomez", "secreto").await.unwrap(), "jwt");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bad_credentials() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/auth/login").with_status(401).create_async().await;
        let api = client(&server, None);
        assert!(api.login("agomez", "mal").await.is_err());
    }
}
