//! Préparation des pièces jointes avant envoi.

use std::{fmt, path::Path};

use crate::model::{ArchivoAdjunto, IDType};

/// Nombre maximum de fichiers par ticket ou commentaire
pub const MAX_ATTACHMENTS: usize = 5;

/// Formats acceptés: PDF, Word et Excel
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

pub const MSG_INVALID_TYPE: &str = "Solo se permiten archivos Word, PDF o Excel.";
pub const MSG_TOO_MANY: &str = "Máximo 5 archivos permitidos.";
pub const MSG_DUPLICATES: &str = "Algunos archivos ya fueron agregados.";

/// Type MIME déduit de l'extension du fichier
pub fn mime_from_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => ALLOWED_MIME_TYPES[0],
        Some("doc") => ALLOWED_MIME_TYPES[1],
        Some("docx") => ALLOWED_MIME_TYPES[2],
        Some("xls") => ALLOWED_MIME_TYPES[3],
        Some("xlsx") => ALLOWED_MIME_TYPES[4],
        _ => "application/octet-stream",
    }
}

/// Fichier local en attente d'envoi
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub content: Vec<u8>,
}

impl StagedFile {
    pub fn new<S: Into<String>>(name: S, content: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_from_name(&name).to_string();
        Self { name, mime, content }
    }
    pub fn with_mime<S: Into<String>, M: Into<String>>(name: S, mime: M, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            content,
        }
    }
    pub fn is_allowed(&self) -> bool {
        ALLOWED_MIME_TYPES.contains(&self.mime.as_str())
    }
}

/// Refus d'un lot de fichiers. Le lot entier est alors ignoré.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// Noms des fichiers au format refusé
    InvalidType(Vec<String>),
    /// Le lot ferait dépasser la limite
    TooMany { limit: usize, requested: usize },
}

impl StageError {
    pub fn message(&self) -> &'static str {
        match self {
            StageError::InvalidType(_) => MSG_INVALID_TYPE,
            StageError::TooMany { .. } => MSG_TOO_MANY,
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Résultat d'un lot accepté
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staged {
    pub added: usize,
    /// Fichiers ignorés car déjà présents (même nom)
    pub duplicates: usize,
}

/// Liste des fichiers à envoyer, en tenant compte de ceux déjà présents sur le serveur.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentStager {
    staged: Vec<StagedFile>,
    existing: Vec<ArchivoAdjunto>,
}

impl AttachmentStager {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_existing(existing: Vec<ArchivoAdjunto>) -> Self {
        Self {
            staged: Vec::new(),
            existing,
        }
    }
    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }
    pub fn existing(&self) -> &[ArchivoAdjunto] {
        &self.existing
    }
    pub fn total(&self) -> usize {
        self.staged.len() + self.existing.len()
    }
    /// Ajoute un lot de fichiers.
    ///
    /// Les contrôles se font dans cet ordre: format, nombre total, doublons.
    pub fn stage(&mut self, files: Vec<StagedFile>) -> Result<Staged, StageError> {
        let invalid = files.iter().filter(|f| !f.is_allowed()).map(|f| f.name.clone()).collect::<Vec<_>>();
        if !invalid.is_empty() {
            return Err(StageError::InvalidType(invalid));
        }
        let requested = files.len() + self.total();
        if requested > MAX_ATTACHMENTS {
            return Err(StageError::TooMany { limit: MAX_ATTACHMENTS, requested });
        }
        let before = files.len();
        let mut added = 0;
        for file in files {
            let known = self.staged.iter().any(|f| f.name == file.name)
                || self.existing.iter().any(|a| a.nombre_original == file.name);
            if !known {
                self.staged.push(file);
                added += 1;
            }
        }
        Ok(Staged {
            added,
            duplicates: before - added,
        })
    }
    pub fn unstage(&mut self, index: usize) -> Option<StagedFile> {
        if index < self.staged.len() {
            Some(self.staged.remove(index))
        } else {
            None
        }
    }
    /// Oublie une pièce jointe supprimée sur le serveur
    pub fn forget_existing(&mut self, id: IDType) -> bool {
        let before = self.existing.len();
        self.existing.retain(|a| a.id != id);
        before != self.existing.len()
    }
    pub fn take(&mut self) -> Vec<StagedFile> {
        std::mem::take(&mut self.staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> StagedFile {
        StagedFile::new(name, b"%PDF".to_vec())
    }

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_from_name("INFORME.PDF"), "application/pdf");
        assert_eq!(mime_from_name("a.xlsx"), ALLOWED_MIME_TYPES[4]);
        assert_eq!(mime_from_name("a.png"), "application/octet-stream");
        assert!(!StagedFile::new("foto.png", vec![]).is_allowed());
    }

    #[test]
    fn sixth_file_is_rejected() {
        let mut stager = AttachmentStager::new();
        let batch = (1..=5).map(|i| pdf(&format!("{}.pdf", i))).collect();
        assert_eq!(stager.stage(batch), Ok(Staged { added: 5, duplicates: 0 }));
        let err = stager.stage(vec![pdf("6.pdf")]).unwrap_err();
        assert_eq!(err, StageError::TooMany { limit: 5, requested: 6 });
        assert_eq!(err.to_string(), "Máximo 5 archivos permitidos.");
        assert_eq!(stager.staged().len(), 5);
    }

    #[test]
    fn invalid_type_rejects_whole_batch() {
        let mut stager = AttachmentStager::new();
        let err = stager.stage(vec![pdf("a.pdf"), StagedFile::new("b.exe", vec![])]).unwrap_err();
        assert_eq!(err, StageError::InvalidType(vec!["b.exe".into()]));
        assert!(stager.staged().is_empty());
    }

    #[test]
    fn duplicates_are_skipped() {
        let existing = ArchivoAdjunto { id: 1, nombre_original: "viejo.pdf".into(), ruta: "uploads/viejo.pdf".into() };
        let mut stager = AttachmentStager::with_existing(vec![existing]);
        stager.stage(vec![pdf("a.pdf")]).unwrap();
        let staged = stager.stage(vec![pdf("a.pdf"), pdf("viejo.pdf"), pdf("b.pdf")]).unwrap();
        assert_eq!(staged, Staged { added: 1, duplicates: 2 });
        assert_eq!(stager.total(), 3);
    }

    #[test]
    fn existing_files_count_toward_limit() {
        let existing = (1..=4)
            .map(|id| ArchivoAdjunto { id, nombre_original: format!("{}.pdf", id), ruta: String::new() })
            .collect();
        let mut stager = AttachmentStager::with_existing(existing);
        assert!(stager.stage(vec![pdf("x.pdf"), pdf("y.pdf")]).is_err());
        assert!(stager.forget_existing(2));
        assert!(stager.stage(vec![pdf("x.pdf"), pdf("y.pdf")]).is_ok());
        assert_eq!(stager.unstage(0).map(|f| f.name), Some("x.pdf".to_string()));
        assert!(stager.unstage(5).is_none());
    }
}
