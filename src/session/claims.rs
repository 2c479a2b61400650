use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use reqdesk_core::model::Legajo;

/// Informations de l'utilisateur portées par le jeton.
///
/// Le jeton n'est pas vérifié ici, c'est au backend de le faire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claims {
    /// Username de l'utilisateur connecté
    pub sub: Option<String>,
    pub legajo: Option<Legajo>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    /// Expiration, en secondes depuis epoch
    pub exp: Option<i64>,
}

impl Claims {
    /// Lit la partie centrale d'un JWT. `None` si le jeton n'a pas cette forme.
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let raw = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&raw).ok()
    }
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.exp.map_or(false, |exp| exp <= now.timestamp())
    }
}
