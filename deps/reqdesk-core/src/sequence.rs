//! Attribution du code d'un requerimiento.
//!
//! Le code est dérivé du type sélectionné dans le formulaire: à chaque changement de type,
//! le backend est interrogé pour obtenir le prochain numéro libre de ce type (et non le
//! dernier utilisé) et le code est recomposé avec l'année courante.
//!
//! En édition, le type et le code d'origine sont mémorisés à l'ouverture du formulaire.
//! Revenir au type d'origine restaure le code d'origine sans consommer de numéro, quel que
//! soit le nombre de types sélectionnés entre temps. Un type intermédiaire demande toujours
//! un nouveau numéro.
//!
//! Le numéro n'est pas réservé: deux formulaires ouverts sur le même type peuvent obtenir
//! le même numéro. L'unicité relève du serveur.

use async_trait::async_trait;
use chrono::Datelike;

use crate::{
    codigo::Codigo,
    model::{catalogo::find_tipo, IDType, TipoRequerimiento},
};

/// Fournisseur du prochain numéro de séquence d'un type de ticket.
///
/// `None` signifie que le numéro n'a pas pu être obtenu. L'implémentation se charge de
/// journaliser la cause.
#[async_trait]
pub trait SequenceSource: Send + Sync {
    async fn next_sequence(&self, tipo_id: IDType) -> Option<u64>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Create,
    Edit {
        original_tipo: IDType,
        original_codigo: Codigo,
    },
}

/// Demande de numéro en cours pour un type donné
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCode {
    generation: u64,
    tipo_id: IDType,
    prefix: String,
}

impl PendingCode {
    pub fn tipo_id(&self) -> IDType {
        self.tipo_id
    }
}

/// Action à mener suite à un changement de type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Aucun type (ou type inconnu): le code est vidé
    Cleared,
    /// Retour au type d'origine: le code d'origine est remis en place
    Restored(Codigo),
    /// Un numéro doit être demandé au backend
    Fetch(PendingCode),
}

/// Garde le code d'un formulaire synchronisé avec le type sélectionné.
#[derive(Debug, Clone)]
pub struct CodeAssigner {
    mode: Mode,
    current: Option<Codigo>,
    selected: Option<IDType>,
    generation: u64,
}

impl CodeAssigner {
    /// Formulaire de création: aucun code tant qu'aucun type n'est choisi.
    pub fn for_create() -> Self {
        Self {
            mode: Mode::Create,
            current: None,
            selected: None,
            generation: 0,
        }
    }
    /// Formulaire d'édition d'un ticket existant.
    pub fn for_edit(original_tipo: IDType, original_codigo: Codigo) -> Self {
        Self {
            current: Some(original_codigo.clone()),
            selected: Some(original_tipo),
            mode: Mode::Edit {
                original_tipo,
                original_codigo,
            },
            generation: 0,
        }
    }
    pub fn codigo(&self) -> Option<&Codigo> {
        self.current.as_ref()
    }
    pub fn selected_tipo(&self) -> Option<IDType> {
        self.selected
    }
    pub fn is_edit(&self) -> bool {
        matches!(self.mode, Mode::Edit { .. })
    }

    /// Première moitié d'un changement de type.
    ///
    /// Le code courant est retiré dès qu'un nouveau numéro est nécessaire, pour qu'un
    /// formulaire soumis pendant la requête échoue sur "code obligatoire" plutôt que
    /// d'envoyer le code d'un autre type.
    pub fn begin(&mut self, tipo: Option<IDType>, tipos: &[TipoRequerimiento]) -> Step {
        self.generation += 1;
        self.selected = tipo;
        let tipo_id = match tipo {
            Some(id) => id,
            None => {
                self.current = None;
                return Step::Cleared;
            }
        };
        if let Mode::Edit { original_tipo, original_codigo } = &self.mode {
            if *original_tipo == tipo_id {
                self.current = Some(original_codigo.clone());
                return Step::Restored(original_codigo.clone());
            }
        }
        self.current = None;
        match find_tipo(tipos, tipo_id) {
            Some(tipo) => Step::Fetch(PendingCode {
                generation: self.generation,
                tipo_id,
                prefix: tipo.codigo.clone(),
            }),
            None => {
                log::warn!("Type de requerimiento {} absent du catalogue, code non généré", tipo_id);
                Step::Cleared
            }
        }
    }

    /// Seconde moitié: applique le numéro obtenu.
    ///
    /// Un résultat arrivé après un autre changement de type est ignoré.
    pub fn complete(&mut self, pending: PendingCode, sequence: Option<u64>, year: i32) -> Option<&Codigo> {
        if pending.generation != self.generation {
            log::info!("Numéro du type {} ignoré: le type a changé entre temps", pending.tipo_id);
            return self.current.as_ref();
        }
        self.current = match sequence {
            Some(sequence) => match Codigo::compose(&pending.prefix, year, sequence) {
                Ok(codigo) => Some(codigo),
                Err(e) => {
                    log::error!("Erreur lors de la génération du code: {}", e);
                    None
                }
            },
            None => {
                log::error!("Impossible d'obtenir le prochain numéro du type {}", pending.tipo_id);
                None
            }
        };
        self.current.as_ref()
    }

    /// Change le type et attend le nouveau code, avec l'année passée en paramètre.
    pub async fn select_tipo_in_year<S>(&mut self, tipo: Option<IDType>, tipos: &[TipoRequerimiento], source: &S, year: i32) -> Option<&Codigo>
    where
        S: SequenceSource + ?Sized,
    {
        match self.begin(tipo, tipos) {
            Step::Cleared | Step::Restored(_) => self.current.as_ref(),
            Step::Fetch(pending) => {
                let sequence = source.next_sequence(pending.tipo_id).await;
                self.complete(pending, sequence, year)
            }
        }
    }

    /// Change le type et attend le nouveau code pour l'année courante.
    pub async fn select_tipo<S>(&mut self, tipo: Option<IDType>, tipos: &[TipoRequerimiento], source: &S) -> Option<&Codigo>
    where
        S: SequenceSource + ?Sized,
    {
        let year = chrono::Local::now().year();
        self.select_tipo_in_year(tipo, tipos, source, year).await
    }
}
