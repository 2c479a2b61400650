use reqwest::{Method, StatusCode};
use reqdesk_core::{form::StagedFile, model::{Comentario, ComentarioPayload}};

use super::{multipart_form, Client, Result};

impl Client {
    pub async fn get_comentarios(&self, codigo: &str) -> Result<Vec<Comentario>> {
        let path = format!("comentarios/{}", urlencoding::encode(codigo));
        self.get_json(&path, "get_comentarios").await
    }
    /// Création multipart (partie `comentario` + `archivos`), `201 Created` attendu.
    pub async fn create_comentario(&self, payload: &ComentarioPayload, archivos: &[StagedFile]) -> Result<Option<Comentario>> {
        let what = "create_comentario";
        let form = multipart_form("comentario", Some("comentario.json"), payload, archivos)?;
        let req = self.request(Method::POST, "comentarios/create", what).await?.multipart(form);
        let resp = self.send_expecting(req, StatusCode::CREATED, what).await?;
        Self::decode_optional(resp, what).await
    }
}
