//! Formulaire de création et d'édition d'un utilisateur.

use std::time::Instant;

use rand::Rng;

use super::{AvailabilityCheck, Field, FieldErrors};
use crate::model::{IDType, Legajo, Usuario, UsuarioPayload};

/// Longueur du mot de passe généré à la création
pub const PASSWORD_LENGTH: usize = 12;
pub const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+";

pub const MSG_EMAIL_FORMAT: &str = "El formato del correo electrónico no es válido.";
pub const MSG_EMAIL_TAKEN: &str = "El email ya está en uso.";
pub const MSG_USERNAME_TAKEN: &str = "El username ya está en uso.";
pub const MSG_CLAVE_MISMATCH: &str = "Las claves no coinciden.";
pub const MSG_CLAVE_EMPTY: &str = "La clave no puede estar vacía.";

lazy_static::lazy_static! {
    static ref RE_EMAIL: regex::Regex = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email)
}

/// Mot de passe aléatoire de [`PASSWORD_LENGTH`] caractères pris dans [`PASSWORD_CHARSET`]
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PASSWORD_LENGTH)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

/// Données à envoyer. `legajo` est renseigné en édition.
#[derive(Debug, Clone, PartialEq)]
pub struct UsuarioSubmission {
    pub legajo: Option<Legajo>,
    pub payload: UsuarioPayload,
}

#[derive(Debug, Clone, Default)]
pub struct UsuarioForm {
    original: Option<Usuario>,
    nombre: String,
    apellido: String,
    username: String,
    email: String,
    cargo_id: Option<IDType>,
    departamento_id: Option<IDType>,
    /// Nouvelle clave et sa répétition, en édition
    clave: Option<(String, String)>,
    email_available: Option<bool>,
    username_available: Option<bool>,
    errors: FieldErrors,
}

impl UsuarioForm {
    pub fn create() -> Self {
        Self::default()
    }
    pub fn edit(usuario: &Usuario) -> Self {
        Self {
            nombre: usuario.nombre.clone(),
            apellido: usuario.apellido.clone(),
            username: usuario.username.clone(),
            email: usuario.email.clone(),
            cargo_id: usuario.cargo.as_ref().map(|c| c.id),
            departamento_id: usuario.departamento.as_ref().map(|d| d.id),
            original: Some(usuario.clone()),
            ..Self::default()
        }
    }
    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }
    pub fn email_available(&self) -> Option<bool> {
        self.email_available
    }
    pub fn username_available(&self) -> Option<bool> {
        self.username_available
    }

    pub fn set_nombre<S: Into<String>>(&mut self, nombre: S) {
        self.nombre = nombre.into();
        self.errors.clear(Field::Nombre);
    }
    pub fn set_apellido<S: Into<String>>(&mut self, apellido: S) {
        self.apellido = apellido.into();
        self.errors.clear(Field::Apellido);
    }
    /// Toute modification invalide le résultat de la vérification précédente.
    pub fn set_username<S: Into<String>>(&mut self, username: S) {
        self.username = username.into();
        self.username_available = None;
        self.errors.clear(Field::Username);
    }
    pub fn set_email<S: Into<String>>(&mut self, email: S) {
        self.email = email.into();
        self.email_available = None;
        self.errors.clear(Field::Email);
    }
    pub fn select_cargo(&mut self, cargo_id: Option<IDType>) {
        self.cargo_id = cargo_id;
        self.errors.clear(Field::Cargo);
    }
    pub fn select_departamento(&mut self, departamento_id: Option<IDType>) {
        self.departamento_id = departamento_id;
        self.errors.clear(Field::Departamento);
    }

    /// Demande un changement de clave. Les deux saisies doivent concorder.
    pub fn set_clave<S: Into<String>, R: Into<String>>(&mut self, nueva: S, repetida: R) {
        self.clave = Some((nueva.into(), repetida.into()));
        self.errors.clear(Field::Clave);
    }
    pub fn clear_clave(&mut self) {
        self.clave = None;
        self.errors.clear(Field::Clave);
    }

    fn email_unchanged(&self) -> bool {
        self.original.as_ref().map_or(false, |u| u.email == self.email.trim())
    }
    fn username_unchanged(&self) -> bool {
        self.original.as_ref().map_or(false, |u| u.username == self.username.trim())
    }

    /// Vérifie le format puis la disponibilité de l'email.
    ///
    /// Un email inchangé en édition n'est pas vérifié auprès du backend.
    pub async fn check_email<C: AvailabilityCheck + ?Sized>(&mut self, checker: &C) -> Option<bool> {
        if self.email.is_empty() {
            self.email_available = None;
            return None;
        }
        if !is_valid_email(&self.email) {
            self.errors.set(Field::Email, MSG_EMAIL_FORMAT);
            self.email_available = None;
            return None;
        }
        if self.email_unchanged() {
            self.email_available = Some(true);
            return self.email_available;
        }
        self.email_available = checker.email_available(&self.email).await;
        if self.email_available == Some(false) {
            self.errors.set(Field::Email, MSG_EMAIL_TAKEN);
        }
        self.email_available
    }

    pub async fn check_username<C: AvailabilityCheck + ?Sized>(&mut self, checker: &C) -> Option<bool> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            self.username_available = None;
            return None;
        }
        if self.username_unchanged() {
            self.username_available = Some(true);
            return self.username_available;
        }
        self.username_available = checker.username_available(&username).await;
        if self.username_available == Some(false) {
            self.errors.set(Field::Username, MSG_USERNAME_TAKEN);
        }
        self.username_available
    }

    pub fn validate(&mut self, now: Instant) -> bool {
        self.errors.prune(now);
        if self.nombre.trim().is_empty() {
            self.errors.set(Field::Nombre, "El nombre es obligatorio.");
        }
        if self.apellido.trim().is_empty() {
            self.errors.set(Field::Apellido, "El apellido es obligatorio.");
        }
        if self.username.trim().is_empty() {
            self.errors.set(Field::Username, "El username es obligatorio.");
        }
        if self.email.trim().is_empty() {
            self.errors.set(Field::Email, "El email es obligatorio.");
        } else if !is_valid_email(&self.email) {
            self.errors.set(Field::Email, MSG_EMAIL_FORMAT);
        }
        if self.cargo_id.is_none() {
            self.errors.set(Field::Cargo, "Debe seleccionar un cargo.");
        }
        if self.departamento_id.is_none() {
            self.errors.set(Field::Departamento, "Debe seleccionar un departamento.");
        }
        if let Some((nueva, repetida)) = &self.clave {
            if nueva != repetida {
                self.errors.set(Field::Clave, MSG_CLAVE_MISMATCH);
            } else if nueva.is_empty() {
                self.errors.set(Field::Clave, MSG_CLAVE_EMPTY);
            }
        }
        self.errors.is_empty(now)
    }

    /// Le mot de passe est généré à la création. En édition, il n'est envoyé que s'il change.
    pub fn submit_with<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Result<UsuarioSubmission, FieldErrors> {
        if !self.validate(now) {
            return Err(self.errors.clone());
        }
        let (cargo_id, departamento_id) = match (self.cargo_id, self.departamento_id) {
            (Some(c), Some(d)) => (c, d),
            _ => return Err(self.errors.clone()),
        };
        let legajo = self.original.as_ref().map(|u| u.legajo);
        Ok(UsuarioSubmission {
            legajo,
            payload: UsuarioPayload {
                nombre: self.nombre.trim().to_string(),
                apellido: self.apellido.trim().to_string(),
                username: self.username.trim().to_string(),
                email: self.email.trim().to_string(),
                cargo_id,
                departamento_id,
                clave: match legajo {
                    None => Some(generate_password(rng)),
                    Some(_) => self.clave.as_ref().map(|(nueva, _)| nueva.clone()),
                },
            },
        })
    }
    pub fn submit(&mut self) -> Result<UsuarioSubmission, FieldErrors> {
        self.submit_with(Instant::now(), &mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cargo, Departamento};
    use async_trait::async_trait;
    use rand::{rngs::StdRng, SeedableRng};

    struct Taken(&'static str);

    #[async_trait]
    impl AvailabilityCheck for Taken {
        async fn email_available(&self, email: &str) -> Option<bool> {
            Some(email != self.0)
        }
        async fn username_available(&self, username: &str) -> Option<bool> {
            Some(username != self.0)
        }
    }

    fn usuario() -> Usuario {
        Usuario {
            legajo: 12,
            nombre: "Ana".into(),
            apellido: "Gómez".into(),
            username: "agomez".into(),
            email: "ana@empresa.com".into(),
            cargo: Some(Cargo { id: 1, nombre: "Analista".into() }),
            departamento: Some(Departamento { id: 2, nombre: "Sistemas".into() }),
        }
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ana@empresa.com"));
        assert!(!is_valid_email("ana@empresa"));
        assert!(!is_valid_email("ana gomez@empresa.com"));
        assert!(!is_valid_email("@empresa.com"));
    }

    #[test]
    fn password_uses_charset() {
        let mut rng = StdRng::seed_from_u64(7);
        let password = generate_password(&mut rng);
        assert_eq!(password.chars().count(), PASSWORD_LENGTH);
        assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
    }

    #[test]
    fn create_requires_all_fields() {
        let now = Instant::now();
        let mut form = UsuarioForm::create();
        form.set_email("no-es-un-mail");
        let errors = form.submit_with(now, &mut rand::thread_rng()).unwrap_err();
        assert_eq!(errors.get(Field::Email, now), Some(MSG_EMAIL_FORMAT));
        assert_eq!(errors.get(Field::Cargo, now), Some("Debe seleccionar un cargo."));
        assert_eq!(errors.active(now).len(), 6);
    }

    #[test]
    fn create_generates_password() {
        let mut form = UsuarioForm::create();
        form.set_nombre("Luis");
        form.set_apellido("Pérez");
        form.set_username("lperez");
        form.set_email("luis@empresa.com");
        form.select_cargo(Some(1));
        form.select_departamento(Some(2));
        let sub = form.submit().unwrap();
        assert_eq!(sub.legajo, None);
        assert_eq!(sub.payload.clave.map(|c| c.len()), Some(PASSWORD_LENGTH));
    }

    #[tokio::test]
    async fn availability_checks() {
        let checker = Taken("ocupado@empresa.com");
        let mut form = UsuarioForm::create();
        form.set_email("ocupado@empresa.com");
        assert_eq!(form.check_email(&checker).await, Some(false));
        assert!(form.errors().has(Field::Email, Instant::now()));
        form.set_email("libre@empresa.com");
        assert_eq!(form.check_email(&checker).await, Some(true));
        assert!(form.errors().is_empty(Instant::now()));
        form.set_email("mal");
        assert_eq!(form.check_email(&checker).await, None);
    }

    #[tokio::test]
    async fn edit_skips_unchanged_values() {
        let checker = Taken("agomez");
        let mut form = UsuarioForm::edit(&usuario());
        assert_eq!(form.check_username(&checker).await, Some(true));
        let sub = form.submit().unwrap();
        assert_eq!(sub.legajo, Some(12));
        assert_eq!(sub.payload.clave, None);
        assert_eq!(sub.payload.cargo_id, 1);
    }

    #[tokio::test]
    async fn username_is_trimmed_before_comparing() {
        let checker = Taken("agomez");
        let mut form = UsuarioForm::edit(&usuario());
        form.set_username(" agomez ");
        assert_eq!(form.check_username(&checker).await, Some(true));
        assert!(form.errors().is_empty(Instant::now()));
        form.set_username(" anag ");
        assert_eq!(form.check_username(&checker).await, Some(true));
        assert_eq!(form.submit().unwrap().payload.username, "anag");
    }

    #[test]
    fn clave_must_match_and_not_be_empty() {
        let now = Instant::now();
        let mut form = UsuarioForm::edit(&usuario());
        form.set_clave("secreta1", "secreta2");
        let errors = form.submit_with(now, &mut rand::thread_rng()).unwrap_err();
        assert_eq!(errors.get(Field::Clave, now), Some(MSG_CLAVE_MISMATCH));

        form.set_clave("", "");
        let errors = form.submit_with(now, &mut rand::thread_rng()).unwrap_err();
        assert_eq!(errors.get(Field::Clave, now), Some(MSG_CLAVE_EMPTY));

        form.set_clave("secreta1", "secreta1");
        let sub = form.submit_with(now, &mut rand::thread_rng()).unwrap();
        assert_eq!(sub.payload.clave.as_deref(), Some("secreta1"));

        form.clear_clave();
        assert_eq!(form.submit_with(now, &mut rand::thread_rng()).unwrap().payload.clave, None);
    }
}
