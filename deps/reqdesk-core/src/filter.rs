//! Filtres des listes de requerimientos et d'utilisateurs, et droit de commenter.

use crate::model::{CategoriaRequerimiento, EstadoNombre, Legajo, Requerimiento, TipoRequerimiento, Usuario};

/// Filtres cumulatifs. Un filtre vide laisse tout passer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequerimientoFilter {
    /// Sous-chaîne de la date de création (`2024-03` par exemple)
    pub fecha: Option<String>,
    /// Description du type
    pub tipo: Option<String>,
    /// Description de la catégorie
    pub categoria: Option<String>,
    /// Nom de l'état
    pub estado: Option<String>,
    /// Recherche libre, en minuscules
    pub buscar: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Vrai si un des textes contient la recherche, sans tenir compte de la casse.
fn contains_any(buscar: &Option<String>, textos: &[&str]) -> bool {
    match buscar {
        None => true,
        Some(b) => textos.iter().any(|t| t.to_lowercase().contains(b.as_str())),
    }
}

fn lowercase(value: String) -> Option<String> {
    non_empty(Some(value.to_lowercase()))
}

impl RequerimientoFilter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn fecha<S: Into<String>>(mut self, fecha: S) -> Self {
        self.fecha = non_empty(Some(fecha.into()));
        self
    }
    /// Changer de type réinitialise la catégorie.
    pub fn tipo<S: Into<String>>(mut self, tipo: S) -> Self {
        self.set_tipo(Some(tipo.into()));
        self
    }
    pub fn categoria<S: Into<String>>(mut self, categoria: S) -> Self {
        self.categoria = non_empty(Some(categoria.into()));
        self
    }
    pub fn estado<S: Into<String>>(mut self, estado: S) -> Self {
        self.estado = non_empty(Some(estado.into()));
        self
    }
    /// Cherche dans le code, l'asunto, ou les deux séparés d'un espace.
    pub fn buscar<S: Into<String>>(mut self, buscar: S) -> Self {
        self.buscar = lowercase(buscar.into());
        self
    }
    pub fn set_tipo(&mut self, tipo: Option<String>) {
        self.tipo = non_empty(tipo);
        self.categoria = None;
    }

    pub fn matches(&self, req: &Requerimiento) -> bool {
        fn same(filter: &Option<String>, value: &Option<String>) -> bool {
            match filter {
                None => true,
                Some(f) => value.as_deref() == Some(f.as_str()),
            }
        }
        let fecha_ok = match &self.fecha {
            None => true,
            Some(f) => req.fecha_hora_alta.as_deref().map_or(false, |d| d.contains(f.as_str())),
        };
        let completo = format!("{} {}", req.codigo, req.asunto);
        fecha_ok
            && contains_any(&self.buscar, &[req.codigo.as_str(), req.asunto.as_str(), completo.as_str()])
            && same(&self.tipo, &req.tipo_requerimiento_descripcion)
            && same(&self.categoria, &req.categoria_requerimiento_descripcion)
            && same(&self.estado, &req.estado_requerimiento_nombre)
    }

    pub fn apply<'a>(&self, reqs: &'a [Requerimiento]) -> Vec<&'a Requerimiento> {
        reqs.iter().filter(|r| self.matches(r)).collect()
    }

    /// Catégories proposées pour le filtre: celles du type filtré, aucune sinon.
    pub fn categorias<'a>(&self, tipos: &'a [TipoRequerimiento]) -> &'a [CategoriaRequerimiento] {
        self.tipo
            .as_ref()
            .and_then(|desc| tipos.iter().find(|t| &t.descripcion == desc))
            .map(|t| t.categorias.as_slice())
            .unwrap_or(&[])
    }
}

/// Recherche libre dans la liste des utilisateurs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsuarioFilter {
    pub buscar: Option<String>,
}

impl UsuarioFilter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Cherche dans le legajo, le nom, le prénom, ou le nom complet.
    pub fn buscar<S: Into<String>>(mut self, buscar: S) -> Self {
        self.buscar = lowercase(buscar.into());
        self
    }
    pub fn matches(&self, usuario: &Usuario) -> bool {
        let legajo = usuario.legajo.to_string();
        let completo = usuario.nombre_completo();
        contains_any(&self.buscar, &[legajo.as_str(), usuario.nombre.as_str(), usuario.apellido.as_str(), completo.as_str()])
    }
    pub fn apply<'a>(&self, usuarios: &'a [Usuario]) -> Vec<&'a Usuario> {
        usuarios.iter().filter(|u| self.matches(u)).collect()
    }
}

/// L'utilisateur peut commenter s'il est émetteur ou destinataire, ou si le ticket est assigné.
pub fn can_comment(req: &Requerimiento, legajo: Option<Legajo>) -> bool {
    let involved = legajo.map_or(false, |l| req.emisor_legajo == Some(l) || req.destinatario_id == Some(l));
    involved || req.estado_requerimiento_nombre.as_deref().and_then(EstadoNombre::from_name) == Some(EstadoNombre::Asignado)
}
