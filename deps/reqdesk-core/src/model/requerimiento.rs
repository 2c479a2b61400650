use serde::{Deserialize, Serialize};

use super::{ArchivoAdjunto, IDType, Legajo};

/// Ticket tel que renvoyé par `GET /requerimiento`.
///
/// Les champs d'affichage (`*Descripcion`, `*Nombre`, `nombreCompleto*`) sont calculés
/// par le backend et peuvent manquer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Requerimiento {
    pub id: Option<IDType>,
    pub codigo: String,
    pub fecha_hora_alta: Option<String>,
    pub asunto: String,
    pub descripcion: String,
    pub tipo_requerimiento_id: Option<IDType>,
    pub tipo_requerimiento_descripcion: Option<String>,
    pub categoria_requerimiento_id: Option<IDType>,
    pub categoria_requerimiento_descripcion: Option<String>,
    pub estado_requerimiento_id: Option<IDType>,
    pub estado_requerimiento_nombre: Option<String>,
    pub prioridad_requerimiento_id: Option<IDType>,
    pub prioridad_requerimiento_nombre: Option<String>,
    pub emisor_legajo: Option<Legajo>,
    pub nombre_completo_emisor: Option<String>,
    pub destinatario_id: Option<Legajo>,
    pub nombre_completo_destinatario: Option<String>,
    pub archivos_adjuntos: Vec<ArchivoAdjunto>,
    pub requerimientos_relacionados: Vec<RequerimientoResumen>,
}

/// Vue réduite d'un ticket lié
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RequerimientoResumen {
    pub codigo: String,
    pub asunto: Option<String>,
    pub descripcion: Option<String>,
}

impl Requerimiento {
    pub fn related_codigos(&self) -> Vec<String> {
        self.requerimientos_relacionados.iter().map(|r| r.codigo.clone()).collect()
    }
    pub fn resumen(&self) -> RequerimientoResumen {
        RequerimientoResumen {
            codigo: self.codigo.clone(),
            asunto: Some(self.asunto.clone()),
            descripcion: Some(self.descripcion.clone()),
        }
    }
}

/// Corps JSON envoyé dans la partie `requerimiento` des requêtes multipart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequerimientoPayload {
    pub codigo: String,
    /// Uniquement à la création
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_hora_alta: Option<String>,
    pub asunto: String,
    pub descripcion: String,
    pub tipo_requerimiento_id: IDType,
    pub categoria_requerimiento_id: IDType,
    pub estado_requerimiento_id: IDType,
    pub prioridad_requerimiento_id: IDType,
    pub emisor_legajo: Option<Legajo>,
    pub destinatario_id: Option<Legajo>,
    pub requerimientos_relacionados_codigos: Vec<String>,
}
