use serde::{Deserialize, Serialize};

use super::IDType;

/// Pièce jointe stockée côté serveur.
///
/// Le backend ne stocke que le chemin du fichier (`ruta`), relatif à son dossier `uploads`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivoAdjunto {
    pub id: IDType,
    #[serde(default)]
    pub nombre_original: String,
    #[serde(default)]
    pub ruta: String,
}

impl ArchivoAdjunto {
    /// Chemin de téléchargement: sans préfixe `uploads/`, avec des slashs.
    pub fn download_path(&self) -> Option<String> {
        normalize_ruta(&self.ruta)
    }
}

/// Normalise une route de fichier renvoyée par le backend.
///
/// `uploads\\2024\\doc.pdf` devient `2024/doc.pdf`. Retourne `None` pour une route vide.
pub fn normalize_ruta(ruta: &str) -> Option<String> {
    let ruta = ruta.trim();
    let stripped = match ruta.strip_prefix("uploads") {
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => rest.trim_start_matches(['/', '\\']),
        _ => ruta,
    };
    let normalized = stripped.replace('\\', "/").trim().to_string();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Nom de fichier local pour une route: le dernier segment.
pub fn file_name_of(ruta: &str) -> String {
    normalize_ruta(ruta)
        .and_then(|r| r.rsplit('/').next().map(str::to_string))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "archivo_descargado".to_string())
}
