//! Passerelles vers le backend REST.
//!
//! Une fonction par opération. Chaque appel lit le jeton dans la session au moment de
//! construire la requête; sans jeton, rien n'est envoyé et l'appel renvoie
//! [`Error::MissingToken`]. Tous les échecs sont journalisés avant d'être renvoyés.

mod archivo;
mod auth;
mod catalogo;
mod comentario;
mod error;
mod requerimiento;
mod usuario;

use std::{sync::Arc, time::Duration};

use reqwest::{multipart, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use reqdesk_core::form::StagedFile;
use crate::{log_error, session::Session};

pub use error::{Error, Result};

/// Client HTTP partagé par toutes les passerelles
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl Client {
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration, session: Arc<Session>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
    async fn bearer(&self, what: &str) -> Result<String> {
        match self.session.token().await {
            Some(token) => Ok(token),
            None => {
                log_error!("{}: no session token, request not sent", what);
                Err(Error::MissingToken)
            }
        }
    }
    /// Requête authentifiée
    async fn request(&self, method: reqwest::Method, path: &str, what: &str) -> Result<RequestBuilder> {
        let token = self.bearer(what).await?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    /// Envoie la requête et refuse les réponses hors 2xx.
    async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
        let resp = req.send().await.map_err(|e| {
            log_error!("{}: {}", what, e);
            Error::from(e)
        })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        log_error!("{}: backend answered {} {}", what, status, body);
        Err(Error::Status(status, body))
    }
    async fn send_expecting(&self, req: RequestBuilder, expected: StatusCode, what: &str) -> Result<Response> {
        let resp = self.send(req, what).await?;
        if resp.status() != expected {
            log_error!("{}: unexpected response {}", what, resp.status());
            return Err(Error::Unexpected(resp.status()));
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
        let bytes = resp.bytes().await.map_err(|e| {
            log_error!("{}: {}", what, e);
            Error::from(e)
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            log_error!("{}: invalid response body: {}", what, e);
            Error::Decode(e)
        })
    }
    /// Corps optionnel: `None` pour une réponse vide.
    async fn decode_optional<T: DeserializeOwned>(resp: Response, what: &str) -> Result<Option<T>> {
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            log_error!("{}: invalid response body: {}", what, e);
            Error::Decode(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let req = self.request(reqwest::Method::GET, path, what).await?;
        let resp = self.send(req, what).await?;
        Self::decode(resp, what).await
    }
}

/// Corps multipart: une partie JSON puis une partie `archivos` par fichier.
fn multipart_form<T: Serialize>(json_name: &'static str, json_file: Option<&'static str>, value: &T, archivos: &[StagedFile]) -> Result<multipart::Form> {
    let json = serde_json::to_vec(value)?;
    let mut part = multipart::Part::bytes(json).mime_str("application/json")?;
    if let Some(file_name) = json_file {
        part = part.file_name(file_name);
    }
    let mut form = multipart::Form::new().part(json_name, part);
    for archivo in archivos {
        let part = multipart::Part::bytes(archivo.content.clone())
            .file_name(archivo.name.clone())
            .mime_str(&archivo.mime)?;
        form = form.part("archivos", part);
    }
    Ok(form)
}
