use std::{
    collections::BTreeMap,
    fmt,
    time::{Duration, Instant},
};

/// Durée d'affichage d'une erreur transitoire
pub const TRANSIENT_ERROR_DURATION: Duration = Duration::from_secs(3);

/// Champs de formulaire pouvant porter une erreur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Codigo,
    Tipo,
    Categoria,
    Estado,
    Prioridad,
    Destinatario,
    Asunto,
    Descripcion,
    ArchivosAdjuntos,
    Relacionados,
    Nombre,
    Apellido,
    Username,
    Email,
    Cargo,
    Departamento,
    Clave,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Codigo => "codigo",
            Field::Tipo => "tipo",
            Field::Categoria => "categoria",
            Field::Estado => "estado",
            Field::Prioridad => "prioridad",
            Field::Destinatario => "destinatario",
            Field::Asunto => "asunto",
            Field::Descripcion => "descripcion",
            Field::ArchivosAdjuntos => "archivosAdjuntos",
            Field::Relacionados => "requerimientosRelacionados",
            Field::Nombre => "nombre",
            Field::Apellido => "apellido",
            Field::Username => "username",
            Field::Email => "email",
            Field::Cargo => "cargo_id",
            Field::Departamento => "departamento_id",
            Field::Clave => "clave",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    message: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn active(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Erreurs d'un formulaire, une par champ.
///
/// Une erreur transitoire disparaît d'elle même [`TRANSIENT_ERROR_DURATION`] après avoir
/// été levée. Les lectures prennent l'instant courant en paramètre.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Entry>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set<S: Into<String>>(&mut self, field: Field, message: S) {
        self.0.insert(field, Entry { message: message.into(), expires_at: None });
    }
    pub fn set_transient<S: Into<String>>(&mut self, field: Field, message: S, now: Instant) {
        self.0.insert(field, Entry {
            message: message.into(),
            expires_at: Some(now + TRANSIENT_ERROR_DURATION),
        });
    }
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }
    pub fn get(&self, field: Field, now: Instant) -> Option<&str> {
        self.0.get(&field).filter(|e| e.active(now)).map(|e| e.message.as_str())
    }
    pub fn has(&self, field: Field, now: Instant) -> bool {
        self.get(field, now).is_some()
    }
    pub fn is_empty(&self, now: Instant) -> bool {
        !self.0.values().any(|e| e.active(now))
    }
    /// Erreurs encore visibles, dans l'ordre des champs
    pub fn active(&self, now: Instant) -> Vec<(Field, &str)> {
        self.0
            .iter()
            .filter(|(_, e)| e.active(now))
            .map(|(f, e)| (*f, e.message.as_str()))
            .collect()
    }
    /// Retire les erreurs expirées
    pub fn prune(&mut self, now: Instant) {
        self.0.retain(|_, e| e.active(now));
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let now = Instant::now();
        let mut first = true;
        for (field, message) in self.active(now) {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_error_expires_after_three_seconds() {
        let now = Instant::now();
        let mut errors = FieldErrors::new();
        errors.set_transient(Field::Estado, "Debe seleccionar un destinatario antes de asignar.", now);
        assert!(errors.has(Field::Estado, now + Duration::from_millis(2900)));
        assert!(!errors.has(Field::Estado, now + TRANSIENT_ERROR_DURATION));
        assert!(errors.is_empty(now + Duration::from_secs(4)));
    }

    #[test]
    fn permanent_errors_stay_until_cleared() {
        let now = Instant::now();
        let mut errors = FieldErrors::new();
        errors.set(Field::Asunto, "El asunto es obligatorio.");
        errors.set_transient(Field::Estado, "x", now);
        errors.prune(now + Duration::from_secs(10));
        assert_eq!(errors.active(now + Duration::from_secs(10)), vec![(Field::Asunto, "El asunto es obligatorio.")]);
        errors.clear(Field::Asunto);
        assert!(errors.is_empty(now));
    }
}
