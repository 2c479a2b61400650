use std::fmt;
use reqwest::StatusCode;

/// Echec d'un appel au backend. Un `Err` signifie que l'opération n'a pas eu lieu.
#[derive(Debug)]
pub enum Error {
    /// Aucune session ouverte, la requête n'a pas été envoyée
    MissingToken,
    /// Erreur de transport (connexion, délai dépassé...)
    Http(reqwest::Error),
    /// Réponse hors 2xx, avec le corps renvoyé
    Status(StatusCode, String),
    /// Réponse 2xx mais pas celle attendue (201 à la création)
    Unexpected(StatusCode),
    Decode(serde_json::Error),
    Io(std::io::Error),
    /// Route de pièce jointe vide
    InvalidRoute,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingToken => f.write_str("No session token, please login first"),
            Error::Http(e) => write!(f, "Request failed: {}", e),
            Error::Status(status, body) if body.is_empty() => write!(f, "Backend answered {}", status),
            Error::Status(status, body) => write!(f, "Backend answered {}: {}", status, body),
            Error::Unexpected(status) => write!(f, "Unexpected response from backend: {}", status),
            Error::Decode(e) => write!(f, "Unable to decode response: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidRoute => f.write_str("Attachment route is empty"),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e)
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status(s, _) | Error::Unexpected(s) => Some(*s),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
