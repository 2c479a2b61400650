use reqwest::Method;
use reqdesk_core::model::{archivo::normalize_ruta, IDType};
use crate::log_error;

use super::{Client, Error, Result};

impl Client {
    /// Télécharge une pièce jointe à partir de sa route côté serveur.
    ///
    /// La route est normalisée puis encodée comme un seul segment d'URL.
    pub async fn download_archivo(&self, ruta: &str) -> Result<Vec<u8>> {
        let what = "download_archivo";
        let ruta = match normalize_ruta(ruta) {
            Some(ruta) => ruta,
            None => {
                log_error!("{}: empty route", what);
                return Err(Error::InvalidRoute);
            }
        };
        let path = format!("archivos_adjuntos/{}", urlencoding::encode(&ruta));
        let req = self.request(Method::GET, &path, what).await?;
        let resp = self.send(req, what).await?;
        let bytes = resp.bytes().await.map_err(|e| {
            log_error!("{}: {}", what, e);
            Error::from(e)
        })?;
        Ok(bytes.to_vec())
    }
    pub async fn delete_archivo(&self, id: IDType) -> Result<()> {
        let what = "delete_archivo";
        let req = self.request(Method::POST, &format!("archivos_adjuntos/delete/{}", id), what).await?;
        self.send(req, what).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{tests::client, Error};

    #[tokio::test]
    async fn download_normalizes_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/archivos_adjuntos/2024%2Finforme%20final.pdf")
            .with_body(b"%PDF")
            .create_async().await;
        let api = client(&server, Some("tok"));
        let bytes = api.download_archivo("uploads\\2024\\informe final.pdf").await.unwrap();
        assert_eq!(bytes, b"%PDF");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_route_sends_nothing() {
        let server = mockito::Server::new_async().await;
        let api = client(&server, Some("tok"));
        assert!(matches!(api.download_archivo("  ").await, Err(Error::InvalidRoute)));
    }

    #[tokio::test]
    async fn delete_by_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/archivos_adjuntos/delete/9").create_async().await;
        let api = client(&server, Some("tok"));
        api.delete_archivo(9).await.unwrap();
        mock.assert_async().await;
    }
}
