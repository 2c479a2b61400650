use serde::{Deserialize, Serialize};

use super::{Cargo, Departamento, IDType, Legajo};

/// Utilisateur tel que renvoyé par `GET /usuarios`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Usuario {
    pub legajo: Legajo,
    pub nombre: String,
    pub apellido: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub cargo: Option<Cargo>,
    #[serde(default)]
    pub departamento: Option<Departamento>,
}

impl Usuario {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// Corps de `auth/register` et de `usuarios/update/{legajo}`.
///
/// `clave` est envoyé à la création, et en édition seulement si elle change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UsuarioPayload {
    pub nombre: String,
    pub apellido: String,
    pub username: String,
    pub email: String,
    pub cargo_id: IDType,
    pub departamento_id: IDType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clave: Option<String>,
}
