//! Formulaire de création et d'édition d'un requerimiento.

use std::{fmt, time::Instant};

use chrono::{DateTime, Utc};

use super::{
    attachments::{AttachmentStager, StageError, Staged, StagedFile, MSG_DUPLICATES},
    char_len, Catalogos, Field, FieldErrors,
};
use crate::{
    codigo::{Codigo, CodigoError},
    model::{
        catalogo::find_tipo, ArchivoAdjunto, CategoriaRequerimiento, Estado, EstadoNombre, IDType, Legajo,
        Requerimiento, RequerimientoPayload,
    },
    sequence::{CodeAssigner, PendingCode, SequenceSource, Step},
};

pub const MAX_ASUNTO: usize = 50;
pub const MAX_DESCRIPCION: usize = 5000;

pub const MSG_ASUNTO_TOO_LONG: &str = "El asunto no puede exceder los 50 caracteres.";
pub const MSG_DESCRIPCION_TOO_LONG: &str = "La descripción no puede exceder los 5000 caracteres.";
pub const MSG_ASIGNADO_SIN_DESTINATARIO: &str = "Debe seleccionar un destinatario antes de asignar.";
pub const MSG_ABIERTO_CON_DESTINATARIO: &str = "No puede cambiar a 'Abierto' mientras hay un destinatario seleccionado.";
pub const MSG_QUITAR_DESTINATARIO: &str = "No puede quitar el destinatario de un requerimiento asignado.";
pub const MSG_CATEGORIA_AJENA: &str = "La categoría no pertenece al tipo seleccionado.";
pub const MSG_ESTADO_DESCONOCIDO: &str = "Estado desconocido.";
pub const MSG_PRIORIDAD_DESCONOCIDA: &str = "Prioridad desconocida.";
pub const MSG_VINCULO_PROPIO: &str = "Un requerimiento no puede vincularse consigo mismo.";
pub const MSG_VINCULO_REPETIDO: &str = "El requerimiento ya está vinculado.";

/// Impossible d'ouvrir un ticket en édition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    InvalidCodigo(CodigoError),
    MissingTipo,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidCodigo(e) => write!(f, "{}", e),
            EditError::MissingTipo => f.write_str("Le requerimiento n'a pas de type"),
        }
    }
}

impl std::error::Error for EditError {}

impl From<CodigoError> for EditError {
    fn from(e: CodigoError) -> Self {
        EditError::InvalidCodigo(e)
    }
}

/// Données prêtes à être envoyées au backend
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub payload: RequerimientoPayload,
    pub archivos: Vec<StagedFile>,
    /// Code sous lequel le ticket est connu du backend (édition uniquement)
    pub codigo_original: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RequerimientoForm {
    catalogos: Catalogos,
    codigo: CodeAssigner,
    codigo_original: Option<String>,
    emisor_legajo: Option<Legajo>,
    categoria: Option<IDType>,
    estado: Option<IDType>,
    prioridad: Option<IDType>,
    destinatario: Option<Legajo>,
    asunto: String,
    descripcion: String,
    relacionados: Vec<String>,
    archivos: AttachmentStager,
    errors: FieldErrors,
}

impl RequerimientoForm {
    /// Formulaire vide. L'émetteur est l'utilisateur connecté.
    pub fn create(catalogos: Catalogos, emisor_legajo: Option<Legajo>) -> Self {
        Self {
            catalogos,
            codigo: CodeAssigner::for_create(),
            codigo_original: None,
            emisor_legajo,
            categoria: None,
            estado: None,
            prioridad: None,
            destinatario: None,
            asunto: String::new(),
            descripcion: String::new(),
            relacionados: Vec::new(),
            archivos: AttachmentStager::new(),
            errors: FieldErrors::new(),
        }
    }

    /// Formulaire pré-rempli avec un ticket existant.
    pub fn edit(catalogos: Catalogos, req: &Requerimiento) -> Result<Self, EditError> {
        let tipo = req.tipo_requerimiento_id.ok_or(EditError::MissingTipo)?;
        let codigo = Codigo::parse(&req.codigo)?;
        Ok(Self {
            catalogos,
            codigo: CodeAssigner::for_edit(tipo, codigo),
            codigo_original: Some(req.codigo.clone()),
            emisor_legajo: req.emisor_legajo,
            categoria: req.categoria_requerimiento_id,
            estado: req.estado_requerimiento_id,
            prioridad: req.prioridad_requerimiento_id,
            destinatario: req.destinatario_id,
            asunto: req.asunto.clone(),
            descripcion: req.descripcion.clone(),
            relacionados: req.related_codigos(),
            archivos: AttachmentStager::with_existing(req.archivos_adjuntos.clone()),
            errors: FieldErrors::new(),
        })
    }

    pub fn is_edit(&self) -> bool {
        self.codigo.is_edit()
    }
    pub fn codigo(&self) -> Option<&Codigo> {
        self.codigo.codigo()
    }
    pub fn tipo(&self) -> Option<IDType> {
        self.codigo.selected_tipo()
    }
    pub fn categoria(&self) -> Option<IDType> {
        self.categoria
    }
    pub fn estado(&self) -> Option<IDType> {
        self.estado
    }
    pub fn prioridad(&self) -> Option<IDType> {
        self.prioridad
    }
    pub fn destinatario(&self) -> Option<Legajo> {
        self.destinatario
    }
    pub fn asunto(&self) -> &str {
        &self.asunto
    }
    pub fn descripcion(&self) -> &str {
        &self.descripcion
    }
    pub fn relacionados(&self) -> &[String] {
        &self.relacionados
    }
    pub fn staged_files(&self) -> &[StagedFile] {
        self.archivos.staged()
    }
    pub fn existing_files(&self) -> &[ArchivoAdjunto] {
        self.archivos.existing()
    }
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }
    pub fn catalogos(&self) -> &Catalogos {
        &self.catalogos
    }

    /// Catégories proposées: celles du type sélectionné, aucune sans type.
    pub fn categorias(&self) -> &[CategoriaRequerimiento] {
        self.tipo()
            .and_then(|id| find_tipo(&self.catalogos.tipos, id))
            .map(|t| t.categorias.as_slice())
            .unwrap_or(&[])
    }

    fn estado_kind(&self, id: IDType) -> Option<EstadoNombre> {
        find_estado(&self.catalogos.estados, id).and_then(Estado::kind)
    }
    fn is_asignado(&self) -> bool {
        self.estado.and_then(|id| self.estado_kind(id)) == Some(EstadoNombre::Asignado)
    }

    /// Début d'un changement de type: la catégorie est remise à zéro.
    pub fn begin_tipo(&mut self, tipo: Option<IDType>) -> Step {
        self.categoria = None;
        self.errors.clear(Field::Tipo);
        self.errors.clear(Field::Categoria);
        self.codigo.begin(tipo, &self.catalogos.tipos)
    }
    /// Fin d'un changement de type, avec le numéro obtenu du backend.
    pub fn complete_tipo(&mut self, pending: PendingCode, sequence: Option<u64>, year: i32) -> Option<&Codigo> {
        let codigo = self.codigo.complete(pending, sequence, year);
        if codigo.is_some() {
            self.errors.clear(Field::Codigo);
        }
        codigo
    }
    /// Reprendre le type déjà sélectionné, avec son code, ne change rien.
    pub async fn select_tipo_in_year<S>(&mut self, tipo: Option<IDType>, source: &S, year: i32) -> Option<&Codigo>
    where
        S: SequenceSource + ?Sized,
    {
        if tipo.is_some() && tipo == self.tipo() && self.codigo.codigo().is_some() {
            return self.codigo.codigo();
        }
        match self.begin_tipo(tipo) {
            Step::Cleared => None,
            Step::Restored(_) => {
                self.errors.clear(Field::Codigo);
                self.codigo.codigo()
            }
            Step::Fetch(pending) => {
                let sequence = source.next_sequence(pending.tipo_id()).await;
                self.complete_tipo(pending, sequence, year)
            }
        }
    }
    pub async fn select_tipo<S>(&mut self, tipo: Option<IDType>, source: &S) -> Option<&Codigo>
    where
        S: SequenceSource + ?Sized,
    {
        use chrono::Datelike;
        let year = chrono::Local::now().year();
        self.select_tipo_in_year(tipo, source, year).await
    }

    /// Refuse une catégorie qui n'appartient pas au type sélectionné.
    pub fn select_categoria(&mut self, categoria: Option<IDType>, now: Instant) -> bool {
        match categoria {
            Some(id) if !self.categorias().iter().any(|c| c.id == id) => {
                self.errors.set_transient(Field::Categoria, MSG_CATEGORIA_AJENA, now);
                false
            }
            _ => {
                self.categoria = categoria;
                self.errors.clear(Field::Categoria);
                true
            }
        }
    }

    pub fn select_prioridad(&mut self, prioridad: Option<IDType>, now: Instant) -> bool {
        match prioridad {
            Some(id) if !self.catalogos.prioridades.iter().any(|p| p.id == id) => {
                self.errors.set_transient(Field::Prioridad, MSG_PRIORIDAD_DESCONOCIDA, now);
                false
            }
            _ => {
                self.prioridad = prioridad;
                self.errors.clear(Field::Prioridad);
                true
            }
        }
    }

    /// Change l'état en respectant le couplage avec le destinataire.
    ///
    /// `Asignado` sans destinataire est refusé et l'état repasse à `Abierto`.
    /// `Abierto` depuis `Asignado` avec un destinataire est refusé sans rien changer.
    pub fn select_estado(&mut self, estado: Option<IDType>, now: Instant) -> bool {
        let id = match estado {
            Some(id) => id,
            None => {
                self.estado = None;
                return true;
            }
        };
        let kind = match find_estado(&self.catalogos.estados, id) {
            Some(e) => e.kind(),
            None => {
                self.errors.set_transient(Field::Estado, MSG_ESTADO_DESCONOCIDO, now);
                return false;
            }
        };
        match kind {
            Some(EstadoNombre::Asignado) if self.destinatario.is_none() => {
                self.errors.set_transient(Field::Estado, MSG_ASIGNADO_SIN_DESTINATARIO, now);
                if let Some(abierto) = EstadoNombre::Abierto.id_in(&self.catalogos.estados) {
                    self.estado = Some(abierto);
                }
                false
            }
            Some(EstadoNombre::Abierto) if self.is_asignado() && self.destinatario.is_some() => {
                self.errors.set_transient(Field::Estado, MSG_ABIERTO_CON_DESTINATARIO, now);
                false
            }
            _ => {
                self.estado = Some(id);
                self.errors.clear(Field::Estado);
                true
            }
        }
    }

    /// Choisir un destinataire fait passer le ticket à `Asignado`.
    /// Le retirer d'un ticket `Asignado` est refusé.
    pub fn select_destinatario(&mut self, destinatario: Option<Legajo>, now: Instant) -> bool {
        match destinatario {
            Some(legajo) => {
                self.destinatario = Some(legajo);
                if let Some(asignado) = EstadoNombre::Asignado.id_in(&self.catalogos.estados) {
                    self.estado = Some(asignado);
                }
                self.errors.clear(Field::Estado);
                self.errors.clear(Field::Destinatario);
                true
            }
            None if self.is_asignado() => {
                self.errors.set_transient(Field::Destinatario, MSG_QUITAR_DESTINATARIO, now);
                false
            }
            None => {
                self.destinatario = None;
                self.errors.clear(Field::Destinatario);
                true
            }
        }
    }

    /// Retire le destinataire et change l'état d'un seul coup, vers tout état autre que `Asignado`.
    pub fn release(&mut self, estado: IDType, now: Instant) -> bool {
        match find_estado(&self.catalogos.estados, estado).map(Estado::kind) {
            None => {
                self.errors.set_transient(Field::Estado, MSG_ESTADO_DESCONOCIDO, now);
                false
            }
            Some(Some(EstadoNombre::Asignado)) => {
                self.errors.set_transient(Field::Destinatario, MSG_QUITAR_DESTINATARIO, now);
                false
            }
            Some(_) => {
                self.destinatario = None;
                self.estado = Some(estado);
                self.errors.clear(Field::Estado);
                self.errors.clear(Field::Destinatario);
                true
            }
        }
    }

    pub fn set_asunto<S: Into<String>>(&mut self, asunto: S) -> bool {
        let asunto = asunto.into();
        if char_len(&asunto) > MAX_ASUNTO {
            self.errors.set(Field::Asunto, MSG_ASUNTO_TOO_LONG);
            return false;
        }
        self.asunto = asunto;
        self.errors.clear(Field::Asunto);
        true
    }

    pub fn set_descripcion<S: Into<String>>(&mut self, descripcion: S) -> bool {
        let descripcion = descripcion.into();
        if char_len(&descripcion) > MAX_DESCRIPCION {
            self.errors.set(Field::Descripcion, MSG_DESCRIPCION_TOO_LONG);
            return false;
        }
        self.descripcion = descripcion;
        self.errors.clear(Field::Descripcion);
        true
    }

    /// Lie un autre ticket. Le lien n'est pas orienté et aucun cycle n'est recherché.
    pub fn link<S: Into<String>>(&mut self, codigo: S, now: Instant) -> bool {
        let codigo = codigo.into().trim().to_string();
        let own = self.codigo_original.as_deref() == Some(codigo.as_str())
            || self.codigo().map(Codigo::as_str) == Some(codigo.as_str());
        if own {
            self.errors.set_transient(Field::Relacionados, MSG_VINCULO_PROPIO, now);
            return false;
        }
        if self.relacionados.contains(&codigo) {
            self.errors.set_transient(Field::Relacionados, MSG_VINCULO_REPETIDO, now);
            return false;
        }
        self.relacionados.push(codigo);
        true
    }
    pub fn unlink(&mut self, codigo: &str) -> bool {
        let before = self.relacionados.len();
        self.relacionados.retain(|c| c != codigo);
        before != self.relacionados.len()
    }

    /// Ajoute des fichiers. Les doublons laissent un avertissement transitoire.
    pub fn stage_files(&mut self, files: Vec<StagedFile>, now: Instant) -> Result<Staged, StageError> {
        match self.archivos.stage(files) {
            Ok(staged) => {
                if staged.duplicates > 0 {
                    self.errors.set_transient(Field::ArchivosAdjuntos, MSG_DUPLICATES, now);
                } else {
                    self.errors.clear(Field::ArchivosAdjuntos);
                }
                Ok(staged)
            }
            Err(e) => {
                self.errors.set_transient(Field::ArchivosAdjuntos, e.message(), now);
                Err(e)
            }
        }
    }
    pub fn unstage_file(&mut self, index: usize) -> Option<StagedFile> {
        self.archivos.unstage(index)
    }
    pub fn forget_existing_file(&mut self, id: IDType) -> bool {
        self.archivos.forget_existing(id)
    }

    /// Contrôle les champs obligatoires. Retourne `true` si aucune erreur n'est active.
    pub fn validate(&mut self, now: Instant) -> bool {
        self.errors.prune(now);
        if self.codigo().is_none() {
            self.errors.set(Field::Codigo, "El código es obligatorio.");
        }
        if self.prioridad.is_none() {
            self.errors.set(Field::Prioridad, "Debe seleccionar una prioridad.");
        }
        if self.tipo().is_none() {
            self.errors.set(Field::Tipo, "Debe seleccionar un tipo.");
        }
        if self.estado.is_none() {
            self.errors.set(Field::Estado, "Debe seleccionar un estado.");
        }
        if self.asunto.trim().is_empty() {
            self.errors.set(Field::Asunto, "El asunto es obligatorio.");
        }
        if self.descripcion.trim().is_empty() {
            self.errors.set(Field::Descripcion, "La descripción es obligatoria.");
        }
        if self.categoria.is_none() {
            self.errors.set(Field::Categoria, "Debe seleccionar una categoría.");
        }
        self.errors.is_empty(now)
    }

    /// Produit les données à envoyer. Les fichiers en attente sont transférés.
    pub fn submit_at(&mut self, now: Instant, fecha: DateTime<Utc>) -> Result<Submission, FieldErrors> {
        if !self.validate(now) {
            return Err(self.errors.clone());
        }
        let (codigo, tipo, categoria, estado, prioridad) = match (self.codigo(), self.tipo(), self.categoria, self.estado, self.prioridad) {
            (Some(c), Some(t), Some(cat), Some(e), Some(p)) => (c.to_string(), t, cat, e, p),
            _ => return Err(self.errors.clone()),
        };
        let payload = RequerimientoPayload {
            codigo,
            fecha_hora_alta: if self.is_edit() { None } else { Some(fecha.to_rfc3339()) },
            asunto: self.asunto.clone(),
            descripcion: self.descripcion.clone(),
            tipo_requerimiento_id: tipo,
            categoria_requerimiento_id: categoria,
            estado_requerimiento_id: estado,
            prioridad_requerimiento_id: prioridad,
            emisor_legajo: self.emisor_legajo,
            destinatario_id: self.destinatario,
            requerimientos_relacionados_codigos: self.relacionados.clone(),
        };
        Ok(Submission {
            payload,
            archivos: self.archivos.take(),
            codigo_original: self.codigo_original.clone(),
        })
    }
    pub fn submit(&mut self) -> Result<Submission, FieldErrors> {
        self.submit_at(Instant::now(), Utc::now())
    }
}

fn find_estado(estados: &[Estado], id: IDType) -> Option<&Estado> {
    estados.iter().find(|e| e.id == id)
}
