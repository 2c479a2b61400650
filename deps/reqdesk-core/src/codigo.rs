//! Code des requerimientos.
//!
//! Un code a la forme `<prefixe>-<année>-<séquence>` où le préfixe est le code du type
//! de ticket et la séquence est complétée par des zéros sur 10 chiffres.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nombre de chiffres de la partie séquentielle
pub const SEQUENCE_WIDTH: usize = 10;

lazy_static::lazy_static! {
    static ref RE_CODIGO: regex::Regex = regex::Regex::new(r"^([A-Za-z0-9]+)-(\d{4})-(\d{10})$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodigoError {
    /// Préfixe vide ou avec des caractères non alphanumériques
    BadPrefix(String),
    /// L'année ne tient pas sur 4 chiffres
    BadYear(i32),
    /// La séquence dépasse 10 chiffres
    SequenceOverflow(u64),
    /// Chaîne qui ne respecte pas le format
    BadFormat(String),
}

impl fmt::Display for CodigoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodigoError::BadPrefix(p) => write!(f, "Préfixe de type invalide: '{}'", p),
            CodigoError::BadYear(y) => write!(f, "Année invalide: {}", y),
            CodigoError::SequenceOverflow(s) => write!(f, "Séquence trop grande: {}", s),
            CodigoError::BadFormat(c) => write!(f, "Code de requerimiento invalide: '{}'", c),
        }
    }
}

impl std::error::Error for CodigoError {}

/// Code d'un requerimiento, toujours valide une fois construit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Codigo(String);

impl Codigo {
    /// Compose le code d'un ticket.
    ///
    /// ```
    /// # use reqdesk_core::Codigo;
    /// let codigo = Codigo::compose("INC", 2024, 7).unwrap();
    /// assert_eq!(codigo.as_str(), "INC-2024-0000000007");
    /// ```
    pub fn compose(prefix: &str, year: i32, sequence: u64) -> Result<Self, CodigoError> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CodigoError::BadPrefix(prefix.to_string()));
        }
        if !(0..=9999).contains(&year) {
            return Err(CodigoError::BadYear(year));
        }
        if sequence > 9_999_999_999 {
            return Err(CodigoError::SequenceOverflow(sequence));
        }
        Ok(Self(format!("{}-{:04}-{:0width$}", prefix, year, sequence, width = SEQUENCE_WIDTH)))
    }
    pub fn parse<S: AsRef<str>>(value: S) -> Result<Self, CodigoError> {
        let value = value.as_ref().trim();
        if RE_CODIGO.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CodigoError::BadFormat(value.to_string()))
        }
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn prefix(&self) -> &str {
        self.parts().0
    }
    pub fn year(&self) -> i32 {
        self.parts().1.parse().unwrap_or_default()
    }
    pub fn sequence(&self) -> u64 {
        self.parts().2.parse().unwrap_or_default()
    }
    fn parts(&self) -> (&str, &str, &str) {
        // Le format est garanti par le constructeur: préfixe sans tiret, puis 4 et 10 chiffres.
        let mut it = self.0.rsplitn(3, '-');
        let sequence = it.next().unwrap_or_default();
        let year = it.next().unwrap_or_default();
        let prefix = it.next().unwrap_or_default();
        (prefix, year, sequence)
    }
}

impl TryFrom<String> for Codigo {
    type Error = CodigoError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Codigo::parse(value)
    }
}

impl From<Codigo> for String {
    fn from(codigo: Codigo) -> Self {
        codigo.0
    }
}

impl fmt::Display for Codigo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Codigo {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_pads_sequence() {
        let codigo = Codigo::compose("INC", 2024, 7).unwrap();
        assert_eq!(codigo.as_str(), "INC-2024-0000000007");
        assert_eq!(codigo.prefix(), "INC");
        assert_eq!(codigo.year(), 2024);
        assert_eq!(codigo.sequence(), 7);
        assert!(RE_CODIGO.is_match(codigo.as_str()));
    }

    #[test]
    fn compose_rejects_bad_parts() {
        assert_eq!(Codigo::compose("", 2024, 1), Err(CodigoError::BadPrefix("".into())));
        assert_eq!(Codigo::compose("IN-C", 2024, 1), Err(CodigoError::BadPrefix("IN-C".into())));
        assert_eq!(Codigo::compose("INC", 12024, 1), Err(CodigoError::BadYear(12024)));
        assert_eq!(Codigo::compose("INC", 2024, 10_000_000_000), Err(CodigoError::SequenceOverflow(10_000_000_000)));
        assert!(Codigo::compose("INC", 2024, 9_999_999_999).is_ok());
    }

    #[test]
    fn parse_checks_format() {
        assert!(Codigo::parse("REQ2-2023-0000000123").is_ok());
        assert!(Codigo::parse("INC-2024-7").is_err());
        assert!(Codigo::parse("INC-24-0000000007").is_err());
        assert!(Codigo::parse("-2024-0000000007").is_err());
    }

    #[test]
    fn serde_goes_through_validation() {
        let codigo: Codigo = serde_json::from_str(r#""INC-2024-0000000007""#).unwrap();
        assert_eq!(codigo.sequence(), 7);
        assert!(serde_json::from_str::<Codigo>(r#""nope""#).is_err());
    }
}
