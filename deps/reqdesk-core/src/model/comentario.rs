use serde::{Deserialize, Serialize};

use super::{ArchivoAdjunto, Legajo};

/// Commentaire d'un ticket (`GET /comentarios/{codigo}`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Comentario {
    pub requerimiento_codigo: String,
    pub usuario_emisor_id: Option<Legajo>,
    pub username: Option<String>,
    pub asunto: String,
    pub descripcion: String,
    pub fecha_hora: Option<String>,
    pub archivos_adjuntos: Vec<ArchivoAdjunto>,
}

/// Partie JSON `comentario` de `POST /comentarios/create`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComentarioPayload {
    pub requerimiento_codigo: String,
    pub usuario_emisor_id: Option<Legajo>,
    pub asunto: String,
    pub descripcion: String,
    pub fecha_hora: String,
}
