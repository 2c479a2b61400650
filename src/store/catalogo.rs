//! Catalogues en lecture seule.

use async_trait::async_trait;
use reqdesk_core::model::{Cargo, CategoriaRequerimiento, Departamento, Estado, Prioridad, TipoRequerimiento};
use crate::api;

use super::{Cache, Repository};

macro_rules! catalog_store {
    ($(#[$doc:meta])* $name:ident, $item:ty, $fetch:ident) => {
        $(#[$doc])*
        pub struct $name {
            api: api::Client,
            cache: Cache<$item>,
        }
        impl $name {
            pub fn new(api: api::Client) -> Self {
                Self { api, cache: Cache::new(stringify!($name)) }
            }
        }
        #[async_trait]
        impl Repository for $name {
            type Item = $item;
            async fn refresh(&self) -> api::Result<Vec<$item>> {
                self.cache.refresh_with(self.api.$fetch()).await
            }
            async fn cached(&self) -> Vec<$item> {
                self.cache.cached().await
            }
            async fn list(&self) -> api::Result<Vec<$item>> {
                self.cache.list_with(self.api.$fetch()).await
            }
            async fn invalidate(&self) {
                self.cache.invalidate().await
            }
        }
    };
}

catalog_store!(CargoStore, Cargo, get_cargos);
catalog_store!(DepartamentoStore, Departamento, get_departamentos);
catalog_store!(EstadoStore, Estado, get_estados);
catalog_store!(PrioridadStore, Prioridad, get_prioridades);
catalog_store!(
    /// Types de ticket, avec leurs catégories
    TipoStore, TipoRequerimiento, get_tipos
);
catalog_store!(CategoriaStore, CategoriaRequerimiento, get_categorias);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client;

    #[tokio::test]
    async fn list_fetches_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/cargos")
            .with_body(r#"[{"id": 1, "nombre": "Analista"}]"#)
            .expect(1)
            .create_async().await;
        let store = CargoStore::new(client(&server, Some("tok")));
        assert!(store.cached().await.is_empty());
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.list().await.unwrap()[0].nombre, "Analista");
        mock.assert_async().await;
    }
}
