//! Entités échangées avec le backend.
//!
//! Les noms de champs suivent ceux de l'API REST (camelCase pour les requerimientos,
//! snake_case pour certains champs des usuarios).

pub mod archivo;
pub mod catalogo;
pub mod comentario;
pub mod requerimiento;
pub mod usuario;

pub use archivo::ArchivoAdjunto;
pub use catalogo::{Cargo, CategoriaRequerimiento, Departamento, Estado, EstadoNombre, Prioridad, TipoRequerimiento};
pub use comentario::{Comentario, ComentarioPayload};
pub use requerimiento::{Requerimiento, RequerimientoPayload, RequerimientoResumen};
pub use usuario::{Usuario, UsuarioPayload};

/// Identifiant numérique utilisé par le backend
pub type IDType = i64;
/// Identifiant d'un utilisateur (numéro de legajo)
pub type Legajo = i64;
