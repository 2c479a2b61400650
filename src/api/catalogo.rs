use reqdesk_core::model::{Cargo, CategoriaRequerimiento, Departamento, Estado, Prioridad, TipoRequerimiento};

use super::{Client, Result};

impl Client {
    pub async fn get_cargos(&self) -> Result<Vec<Cargo>> {
        self.get_json("cargos", "get_cargos").await
    }
    pub async fn get_departamentos(&self) -> Result<Vec<Departamento>> {
        self.get_json("departamentos", "get_departamentos").await
    }
    pub async fn get_estados(&self) -> Result<Vec<Estado>> {
        self.get_json("estado_requerimiento", "get_estados").await
    }
    pub async fn get_prioridades(&self) -> Result<Vec<Prioridad>> {
        self.get_json("prioridad_requerimiento", "get_prioridades").await
    }
    pub async fn get_tipos(&self) -> Result<Vec<TipoRequerimiento>> {
        self.get_json("tipo_requerimiento", "get_tipos").await
    }
    pub async fn get_categorias(&self) -> Result<Vec<CategoriaRequerimiento>> {
        self.get_json("categoria_requerimiento", "get_categorias").await
    }
}
