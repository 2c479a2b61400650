//! Dépôts en cache, un par ressource.
//!
//! Les écritures passent par les passerelles et ne modifient jamais la liste locale:
//! une écriture réussie marque seulement le dépôt comme périmé. [`Repository::cached`]
//! renvoie l'ancienne liste jusqu'au prochain rafraîchissement, [`Repository::list`]
//! recharge si besoin.

mod cache;
mod catalogo;
mod comentario;
mod requerimiento;
mod usuario;

use async_trait::async_trait;
use crate::api;

pub use cache::Cache;
pub use catalogo::{CargoStore, CategoriaStore, DepartamentoStore, EstadoStore, PrioridadStore, TipoStore};
pub use comentario::ComentarioStore;
pub use requerimiento::RequerimientoStore;
pub use usuario::UsuarioStore;

#[async_trait]
pub trait Repository: Send + Sync {
    type Item: Clone + Send + Sync;
    /// Recharge toute la liste depuis le backend
    async fn refresh(&self) -> api::Result<Vec<Self::Item>>;
    /// Dernière liste obtenue, sans appel réseau
    async fn cached(&self) -> Vec<Self::Item>;
    /// Liste en cache, rechargée si elle est périmée
    async fn list(&self) -> api::Result<Vec<Self::Item>>;
    /// Force le rechargement au prochain [`Repository::list`]
    async fn invalidate(&self);
}

/// Ensemble des dépôts de l'application
pub struct Stores {
    pub usuarios: UsuarioStore,
    pub requerimientos: RequerimientoStore,
    pub comentarios: ComentarioStore,
    pub cargos: CargoStore,
    pub departamentos: DepartamentoStore,
    pub estados: EstadoStore,
    pub prioridades: PrioridadStore,
    pub tipos: TipoStore,
    pub categorias: CategoriaStore,
}

impl Stores {
    pub fn new(api: api::Client) -> Self {
        Self {
            usuarios: UsuarioStore::new(api.clone()),
            requerimientos: RequerimientoStore::new(api.clone()),
            comentarios: ComentarioStore::new(api.clone()),
            cargos: CargoStore::new(api.clone()),
            departamentos: DepartamentoStore::new(api.clone()),
            estados: EstadoStore::new(api.clone()),
            prioridades: PrioridadStore::new(api.clone()),
            tipos: TipoStore::new(api.clone()),
            categorias: CategoriaStore::new(api),
        }
    }
    /// Marque tous les dépôts comme périmés, par exemple quand l'utilisateur change.
    pub async fn invalidate_all(&self) {
        self.usuarios.invalidate().await;
        self.requerimientos.invalidate().await;
        self.comentarios.invalidate().await;
        self.cargos.invalidate().await;
        self.departamentos.invalidate().await;
        self.estados.invalidate().await;
        self.prioridades.invalidate().await;
        self.tipos.invalidate().await;
        self.categorias.invalidate().await;
    }
}
