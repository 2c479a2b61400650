//! Session de l'utilisateur connecté.
//!
//! Le jeton est lu par les passerelles au moment de chaque requête: un changement de jeton
//! est pris en compte dès l'appel suivant. Les abonnés sont prévenus de chaque changement.

pub(crate) mod claims;
mod storage;

use std::{fmt, path::Path};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use crate::log_info;

pub use claims::Claims;
use storage::Data;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "Session file error: {}", e),
            Error::Serde(e) => write!(f, "Session file is invalid: {}", e),
        }
    }
}

impl std::error::Error for Error {}

/// Contenu du fichier de session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

pub struct Session {
    data: Data<SessionData>,
    notify: watch::Sender<Option<String>>,
}

impl Session {
    fn with_data(data: Data<SessionData>, token: Option<String>) -> Self {
        let (notify, _) = watch::channel(token);
        Self { data, notify }
    }
    /// Session persistée dans le fichier donné.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut data = Data::<SessionData>::from_file_or_default(path)?;
        let token = data.get_mut().token.clone();
        Ok(Self::with_data(data, token))
    }
    pub fn in_memory(token: Option<String>) -> Self {
        Self::with_data(Data::in_memory(SessionData { token: token.clone() }), token)
    }

    pub async fn token(&self) -> Option<String> {
        self.data.read().await.token.clone()
    }
    pub async fn set_token<S: Into<String>>(&self, token: S) {
        let token = token.into();
        {
            let mut data = self.data.write().await;
            data.token = Some(token.clone());
        }
        log_info!("Session opened");
        self.notify.send_replace(Some(token));
    }
    pub async fn clear(&self) {
        {
            let mut data = self.data.write().await;
            data.token = None;
        }
        log_info!("Session closed");
        self.notify.send_replace(None);
    }
    /// Suit les changements de jeton. La valeur courante est disponible immédiatement.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.notify.subscribe()
    }
    /// Utilisateur courant d'après le jeton
    pub async fn claims(&self) -> Option<Claims> {
        self.token().await.as_deref().and_then(Claims::decode)
    }
}
