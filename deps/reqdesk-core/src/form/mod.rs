//! Etat des formulaires d'édition.
//!
//! Chaque formulaire garde ses valeurs, ses erreurs par champ et applique les règles
//! métier à chaque modification. Une valeur refusée n'est jamais appliquée.

pub mod attachments;
pub mod comentario;
pub mod errors;
pub mod requerimiento;
pub mod usuario;

use async_trait::async_trait;

use crate::model::{Estado, Prioridad, TipoRequerimiento};

pub use attachments::{AttachmentStager, StageError, Staged, StagedFile, MAX_ATTACHMENTS};
pub use comentario::ComentarioForm;
pub use errors::{Field, FieldErrors, TRANSIENT_ERROR_DURATION};
pub use requerimiento::{EditError, RequerimientoForm, Submission};
pub use usuario::{UsuarioForm, UsuarioSubmission};

/// Catalogues nécessaires au formulaire des requerimientos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogos {
    pub tipos: Vec<TipoRequerimiento>,
    pub estados: Vec<Estado>,
    pub prioridades: Vec<Prioridad>,
}

/// Vérification de disponibilité auprès du backend.
///
/// `Some(true)` si la valeur est libre, `None` si le backend n'a pas pu répondre.
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    async fn email_available(&self, email: &str) -> Option<bool>;
    async fn username_available(&self, username: &str) -> Option<bool>;
}

/// Nombre de caractères (et non d'octets)
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}
