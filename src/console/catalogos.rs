use crate::store::Repository;

use super::{command_parser::ParseError, Console, Error, Result};

fn lines<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return "Catálogo vacío".to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

pub(super) async fn execute(console: &Console, name: &str) -> Result<String> {
    let stores = &console.stores;
    Ok(match name {
        "cargos" => lines(&stores.cargos.list().await?, |c| format!("{} | {}", c.id, c.nombre)),
        "departamentos" => lines(&stores.departamentos.list().await?, |d| format!("{} | {}", d.id, d.nombre)),
        "estados" => lines(&stores.estados.list().await?, |e| format!("{} | {}", e.id, e.nombre)),
        "prioridades" => lines(&stores.prioridades.list().await?, |p| format!("{} | {}", p.id, p.nombre)),
        "categorias" => lines(&stores.categorias.list().await?, |c| format!("{} | {}", c.id, c.descripcion)),
        "tipos" => lines(&stores.tipos.list().await?, |t| {
            let mut line = format!("{} | {} | {}", t.id, t.codigo, t.descripcion);
            for categoria in &t.categorias {
                line.push_str(&format!("\n    {} | {}", categoria.id, categoria.descripcion));
            }
            line
        }),
        _ => return Err(Error::Parse(ParseError::PartiallyNotMatched(name).to_string())),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use crate::console::tests::console;

    #[tokio::test]
    async fn tipos_list_their_categories() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/tipo_requerimiento")
            .with_body(r#"[{"id": 1, "codigo": "INC", "descripcion": "Incidente",
                "categorias": [{"id": 10, "descripcion": "Hardware"}]}]"#)
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        assert_eq!(
            console.execute("catalogos tipos").await.unwrap(),
            "1 | INC | Incidente\n    10 | Hardware"
        );
    }

    #[tokio::test]
    async fn empty_catalog() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/cargos").with_body("[]").create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        assert_eq!(console.execute("catalogos cargos").await.unwrap(), "Catálogo vacío");
    }
}
