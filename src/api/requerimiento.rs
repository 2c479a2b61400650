use reqwest::{Method, StatusCode};
use reqdesk_core::{form::StagedFile, model::{IDType, Requerimiento, RequerimientoPayload}};

use super::{multipart_form, Client, Result};

impl Client {
    pub async fn get_requerimientos(&self) -> Result<Vec<Requerimiento>> {
        self.get_json("requerimiento", "get_requerimientos").await
    }
    /// Prochain numéro libre pour ce type (et non le dernier utilisé)
    pub async fn get_next_sequence(&self, tipo_id: IDType) -> Result<u64> {
        self.get_json(&format!("requerimiento/ultimo-secuencial/{}", tipo_id), "get_next_sequence").await
    }
    /// Création multipart. Seule une réponse `201 Created` est acceptée.
    pub async fn create_requerimiento(&self, payload: &RequerimientoPayload, archivos: &[StagedFile]) -> Result<Option<Requerimiento>> {
        let what = "create_requerimiento";
        let form = multipart_form("requerimiento", None, payload, archivos)?;
        let req = self.request(Method::POST, "requerimiento/create", what).await?.multipart(form);
        let resp = self.send_expecting(req, StatusCode::CREATED, what).await?;
        Self::decode_optional(resp, what).await
    }
    /// Mise à jour partielle. Seules les nouvelles pièces jointes sont envoyées.
    pub async fn update_requerimiento(&self, codigo: &str, payload: &RequerimientoPayload, archivos: &[StagedFile]) -> Result<()> {
        let what = "update_requerimiento";
        let form = multipart_form("requerimiento", None, payload, archivos)?;
        let path = format!("requerimiento/update/{}", urlencoding::encode(codigo));
        let req = self.request(Method::PATCH, &path, what).await?.multipart(form);
        self.send(req, what).await.map(|_| ())
    }
    /// Suppression logique, côté backend
    pub async fn delete_requerimiento(&self, codigo: &str) -> Result<()> {
        let what = "delete_requerimiento";
        let path = format!("requerimiento/delete/{}", urlencoding::encode(codigo));
        let req = self.request(Method::POST, &path, what).await?;
        self.send(req, what).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{tests::client, Error};
    use reqdesk_core::{form::StagedFile, model::RequerimientoPayload};
    use reqwest::StatusCode;
    use mockito::Matcher;

    fn payload() -> RequerimientoPayload {
        RequerimientoPayload {
            codigo: "INC-2024-0000000007".into(),
            fecha_hora_alta: Some("2024-03-01T10:00:00+00:00".into()),
            asunto: "Impresora".into(),
            descripcion: "No imprime".into(),
            tipo_requerimiento_id: 1,
            categoria_requerimiento_id: 10,
            estado_requerimiento_id: 1,
            prioridad_requerimiento_id: 1,
            emisor_legajo: Some(12),
            destinatario_id: None,
            requerimientos_relacionados_codigos: vec![],
        }
    }

    #[tokio::test]
    async fn next_sequence() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/requerimiento/ultimo-secuencial/1").with_body("7").create_async().await;
        let api = client(&server, Some("tok"));
        assert_eq!(api.get_next_sequence(1).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn create_sends_multipart_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/requerimiento/create")
            .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="requerimiento""#.into()),
                Matcher::Regex(r#""codigo":"INC-2024-0000000007""#.into()),
                Matcher::Regex(r#"name="archivos"; filename="informe.pdf""#.into()),
            ]))
            .with_status(201)
            .with_body(r#"{"codigo": "INC-2024-0000000007"}"#)
            .create_async().await;
        let api = client(&server, Some("tok"));
        let created = api.create_requerimiento(&payload(), &[StagedFile::new("informe.pdf", b"%PDF".to_vec())]).await.unwrap();
        assert_eq!(created.map(|r| r.codigo).as_deref(), Some("INC-2024-0000000007"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_rejects_plain_ok() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/requerimiento/create").with_status(200).create_async().await;
        let api = client(&server, Some("tok"));
        assert!(matches!(api.create_requerimiento(&payload(), &[]).await, Err(Error::Unexpected(StatusCode::OK))));
    }

    #[tokio::test]
    async fn update_is_a_multipart_patch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("PATCH", "/requerimiento/update/INC-2023-0000000003")
            .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
            .create_async().await;
        let api = client(&server, Some("tok"));
        api.update_requerimiento("INC-2023-0000000003", &payload(), &[]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_is_a_post() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/requerimiento/delete/INC-2024-0000000007").create_async().await;
        let api = client(&server, Some("tok"));
        api.delete_requerimiento("INC-2024-0000000007").await.unwrap();
        mock.assert_async().await;
    }
}
