use std::fmt;

use serde::{Deserialize, Serialize};

use super::IDType;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Cargo {
    pub id: IDType,
    pub nombre: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Departamento {
    pub id: IDType,
    pub nombre: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Prioridad {
    pub id: IDType,
    pub nombre: String,
}

/// Etat d'un requerimiento tel que renvoyé par `estado_requerimiento`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Estado {
    pub id: IDType,
    pub nombre: String,
}

impl Estado {
    /// Etat connu correspondant au nom, `None` pour un nom inconnu.
    pub fn kind(&self) -> Option<EstadoNombre> {
        EstadoNombre::from_name(&self.nombre)
    }
}

/// Les états fixes d'un requerimiento.
///
/// Le backend les identifie par un id numérique, seul le nom est stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstadoNombre {
    Abierto,
    Asignado,
    Resuelto,
    Reabierto,
    Cerrado,
}

impl EstadoNombre {
    pub const ALL: [EstadoNombre; 5] = [
        EstadoNombre::Abierto,
        EstadoNombre::Asignado,
        EstadoNombre::Resuelto,
        EstadoNombre::Reabierto,
        EstadoNombre::Cerrado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoNombre::Abierto => "Abierto",
            EstadoNombre::Asignado => "Asignado",
            EstadoNombre::Resuelto => "Resuelto",
            EstadoNombre::Reabierto => "Reabierto",
            EstadoNombre::Cerrado => "Cerrado",
        }
    }
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name.trim())
    }
    /// Cherche l'id de cet état dans le catalogue chargé depuis le backend.
    pub fn id_in(&self, estados: &[Estado]) -> Option<IDType> {
        estados.iter().find(|e| e.kind() == Some(*self)).map(|e| e.id)
    }
}

impl fmt::Display for EstadoNombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategoriaRequerimiento {
    pub id: IDType,
    pub descripcion: String,
}

/// Type de requerimiento.
///
/// Le champ `codigo` est le préfixe utilisé pour construire le code des tickets
/// de ce type (`INC` dans `INC-2024-0000000007`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TipoRequerimiento {
    pub id: IDType,
    pub codigo: String,
    pub descripcion: String,
    #[serde(default)]
    pub categorias: Vec<CategoriaRequerimiento>,
}

impl TipoRequerimiento {
    pub fn owns_categoria(&self, categoria_id: IDType) -> bool {
        self.categorias.iter().any(|c| c.id == categoria_id)
    }
}

/// Retrouve un type par son id
pub fn find_tipo(tipos: &[TipoRequerimiento], id: IDType) -> Option<&TipoRequerimiento> {
    tipos.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estado_lookup_by_name() {
        let estados = vec![
            Estado { id: 1, nombre: "Abierto".into() },
            Estado { id: 2, nombre: "Asignado".into() },
        ];
        assert_eq!(EstadoNombre::Asignado.id_in(&estados), Some(2));
        assert_eq!(EstadoNombre::Cerrado.id_in(&estados), None);
        assert_eq!(estados[0].kind(), Some(EstadoNombre::Abierto));
        assert_eq!(EstadoNombre::from_name("Inexistente"), None);
    }

    #[test]
    fn tipo_deserializes_without_categories() {
        let tipo: TipoRequerimiento =
            serde_json::from_str(r#"{"id":3,"codigo":"INC","descripcion":"Incidente"}"#).unwrap();
        assert!(tipo.categorias.is_empty());
        assert!(!tipo.owns_categoria(1));
    }
}
