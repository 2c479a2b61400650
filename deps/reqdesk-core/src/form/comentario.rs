use std::time::Instant;

use chrono::{DateTime, Utc};

use super::{
    attachments::{AttachmentStager, StageError, Staged, StagedFile, MSG_DUPLICATES},
    Field, FieldErrors,
};
use crate::model::{ComentarioPayload, Legajo};

/// Commentaire à ajouter à un ticket
#[derive(Debug, Clone)]
pub struct ComentarioForm {
    requerimiento_codigo: String,
    usuario_emisor_id: Option<Legajo>,
    asunto: String,
    descripcion: String,
    archivos: AttachmentStager,
    errors: FieldErrors,
}

impl ComentarioForm {
    pub fn new<S: Into<String>>(requerimiento_codigo: S, usuario_emisor_id: Option<Legajo>) -> Self {
        Self {
            requerimiento_codigo: requerimiento_codigo.into(),
            usuario_emisor_id,
            asunto: String::new(),
            descripcion: String::new(),
            archivos: AttachmentStager::new(),
            errors: FieldErrors::new(),
        }
    }
    pub fn requerimiento_codigo(&self) -> &str {
        &self.requerimiento_codigo
    }
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }
    pub fn staged_files(&self) -> &[StagedFile] {
        self.archivos.staged()
    }
    pub fn set_asunto<S: Into<String>>(&mut self, asunto: S) {
        self.asunto = asunto.into();
        self.errors.clear(Field::Asunto);
    }
    pub fn set_descripcion<S: Into<String>>(&mut self, descripcion: S) {
        self.descripcion = descripcion.into();
        self.errors.clear(Field::Descripcion);
    }
    pub fn stage_files(&mut self, files: Vec<StagedFile>, now: Instant) -> Result<Staged, StageError> {
        let staged = self.archivos.stage(files).map_err(|e| {
            self.errors.set_transient(Field::ArchivosAdjuntos, e.message(), now);
            e
        })?;
        if staged.duplicates > 0 {
            self.errors.set_transient(Field::ArchivosAdjuntos, MSG_DUPLICATES, now);
        }
        Ok(staged)
    }
    pub fn unstage_file(&mut self, index: usize) -> Option<StagedFile> {
        self.archivos.unstage(index)
    }

    pub fn validate(&mut self, now: Instant) -> bool {
        self.errors.prune(now);
        if self.asunto.trim().is_empty() {
            self.errors.set(Field::Asunto, "El asunto es obligatorio.");
        }
        if self.descripcion.trim().is_empty() {
            self.errors.set(Field::Descripcion, "La descripción es obligatoria.");
        }
        self.errors.is_empty(now)
    }

    /// Corps JSON et fichiers du commentaire. Le formulaire est vidé en cas de succès.
    pub fn submit_at(&mut self, now: Instant, fecha: DateTime<Utc>) -> Result<(ComentarioPayload, Vec<StagedFile>), FieldErrors> {
        if !self.validate(now) {
            return Err(self.errors.clone());
        }
        let payload = ComentarioPayload {
            requerimiento_codigo: self.requerimiento_codigo.clone(),
            usuario_emisor_id: self.usuario_emisor_id,
            asunto: std::mem::take(&mut self.asunto),
            descripcion: std::mem::take(&mut self.descripcion),
            fecha_hora: fecha.to_rfc3339(),
        };
        Ok((payload, self.archivos.take()))
    }
    pub fn submit(&mut self) -> Result<(ComentarioPayload, Vec<StagedFile>), FieldErrors> {
        self.submit_at(Instant::now(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asunto_and_descripcion_are_required() {
        let now = Instant::now();
        let mut form = ComentarioForm::new("INC-2024-0000000007", Some(12));
        form.set_asunto("  ");
        let errors = form.submit_at(now, Utc::now()).unwrap_err();
        assert!(errors.has(Field::Asunto, now));
        assert!(errors.has(Field::Descripcion, now));
    }

    #[test]
    fn submission_resets_the_form() {
        let now = Instant::now();
        let mut form = ComentarioForm::new("INC-2024-0000000007", Some(12));
        form.set_asunto("Avance");
        form.set_descripcion("Se cambió el tóner");
        form.stage_files(vec![StagedFile::new("acta.docx", vec![1, 2])], now).unwrap();
        let (payload, archivos) = form.submit_at(now, Utc::now()).unwrap();
        assert_eq!(payload.requerimiento_codigo, "INC-2024-0000000007");
        assert_eq!(payload.usuario_emisor_id, Some(12));
        assert_eq!(archivos[0].mime, "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
        assert!(form.staged_files().is_empty());
        assert!(form.submit_at(now, Utc::now()).is_err());
    }
}
