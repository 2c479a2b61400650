use reqdesk_core::{filter::UsuarioFilter, form::UsuarioForm};
use crate::{log_info, store::Repository};

use super::{command_parser::{matching, ParseError}, id_param, or_dash, parse_id, required, Console, Error, Result};

pub(super) async fn execute(console: &Console, name: &str, command: &matching::Command<'_>) -> Result<String> {
    match name {
        "list" => list(console, command).await,
        "create" => create(console, command).await,
        "update" => update(console, command).await,
        "delete" => delete(console, command).await,
        _ => Err(Error::Parse(ParseError::PartiallyNotMatched(name).to_string())),
    }
}

async fn list(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let mut filter = UsuarioFilter::new();
    if let Some(buscar) = command.value("buscar") {
        filter = filter.buscar(buscar);
    }
    let usuarios = console.stores.usuarios.list().await?;
    let found = filter.apply(&usuarios);
    if found.is_empty() {
        return Ok("Ningún usuario".to_string());
    }
    Ok(found.into_iter()
        .map(|u| format!(
            "{} | {} | {} | {} | {} | {}",
            u.legajo,
            u.nombre_completo(),
            u.username,
            u.email,
            or_dash(&u.cargo.as_ref().map(|c| c.nombre.clone())),
            or_dash(&u.departamento.as_ref().map(|d| d.nombre.clone())),
        ))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Reporte les paramètres donnés dans le formulaire puis vérifie email et username.
async fn fill(console: &Console, form: &mut UsuarioForm, command: &matching::Command<'_>) -> Result<()> {
    if let Some(nombre) = command.value("nombre") {
        form.set_nombre(nombre);
    }
    if let Some(apellido) = command.value("apellido") {
        form.set_apellido(apellido);
    }
    if let Some(username) = command.value("username") {
        form.set_username(username);
    }
    if let Some(email) = command.value("email") {
        form.set_email(email);
    }
    if let Some(cargo) = id_param(command, "cargo")? {
        form.select_cargo(Some(cargo));
    }
    if let Some(departamento) = id_param(command, "departamento")? {
        form.select_departamento(Some(departamento));
    }
    form.check_email(&console.stores.usuarios).await;
    form.check_username(&console.stores.usuarios).await;
    Ok(())
}

async fn create(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let mut form = UsuarioForm::create();
    fill(console, &mut form, command).await?;
    let submission = form.submit().map_err(Error::Form)?;
    console.stores.usuarios.create(&submission.payload).await?;
    log_info!("Usuario {} created", submission.payload.username);
    Ok(format!(
        "Usuario {} creado. Clave: {}",
        submission.payload.username,
        or_dash(&submission.payload.clave),
    ))
}

/// Un utilisateur qui change son propre username doit se reconnecter: la session est fermée.
async fn update(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let legajo = parse_id(required(command, "legajo")?)?;
    let usuario = console.stores.usuarios.find(legajo).await?
        .ok_or_else(|| Error::NotFound(format!("Usuario {}", legajo)))?;
    let mut form = UsuarioForm::edit(&usuario);
    fill(console, &mut form, command).await?;
    let (clave, repetida) = (command.value("clave"), command.value("repetir-clave"));
    if clave.is_some() || repetida.is_some() {
        form.set_clave(clave.unwrap_or_default(), repetida.unwrap_or_default());
    }
    let submission = form.submit().map_err(Error::Form)?;
    console.stores.usuarios.update(legajo, &submission.payload).await?;

    let is_self = console.claims().await
        .and_then(|c| c.sub)
        .map_or(false, |sub| sub == usuario.username);
    if is_self && submission.payload.username != usuario.username {
        console.api.session().clear().await;
        return Ok(format!("Usuario {} actualizado. Vuelva a iniciar sesión.", legajo));
    }
    Ok(format!("Usuario {} actualizado", legajo))
}

async fn delete(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let legajo = parse_id(required(command, "legajo")?)?;
    console.stores.usuarios.delete(legajo).await?;
    Ok(format!("Usuario {} eliminado", legajo))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use mockito::Matcher;
    use crate::console::{tests::console, Error};

    const ANA: &str = r#"{"legajo": 12, "nombre": "Ana", "apellido": "Gómez", "username": "agomez", "email": "ana@empresa.com", "cargo": {"id": 1, "nombre": "Analista"}, "departamento": {"id": 2, "nombre": "Sistemas"}}"#;

    #[tokio::test]
    async fn list_shows_one_line_per_user() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        assert_eq!(
            console.execute("usuarios list").await.unwrap(),
            "12 | Ana Gómez | agomez | ana@empresa.com | Analista | Sistemas"
        );
    }

    #[tokio::test]
    async fn list_searches_full_name() {
        let mut server = mockito::Server::new_async().await;
        let luis = r#"{"legajo": 40, "nombre": "Luis", "apellido": "Pérez", "username": "lperez", "email": "luis@empresa.com"}"#;
        server.mock("GET", "/usuarios").with_body(format!("[{}, {}]", ANA, luis)).create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        assert_eq!(
            console.execute(r#"usuarios list -buscar "luis pé""#).await.unwrap(),
            "40 | Luis Pérez | lperez | luis@empresa.com | - | -"
        );
        assert_eq!(console.execute("usuarios list -buscar 12").await.unwrap().split(" | ").next(), Some("12"));
        assert_eq!(console.execute("usuarios list -buscar nadie").await.unwrap(), "Ningún usuario");
    }

    #[tokio::test]
    async fn create_generates_clave() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios/validate-email/luis%40empresa.com").with_body("true").create_async().await;
        server.mock("GET", "/usuarios/validate-username/lperez").with_body("true").create_async().await;
        let register = server.mock("POST", "/auth/register")
            .match_body(Matcher::PartialJson(serde_json::json!({"username": "lperez", "cargo_id": 1})))
            .with_status(201)
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        let out = console
            .execute(r#"usuarios create -nombre Luis -apellido "Pérez" -username lperez -email luis@empresa.com -cargo 1 -departamento 2"#)
            .await
            .unwrap();
        assert!(out.starts_with("Usuario lperez creado. Clave: "));
        assert_eq!(out.rsplit(' ').next().map(str::len), Some(12));
        register.assert_async().await;
    }

    #[tokio::test]
    async fn taken_username_blocks_create() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios/validate-email/luis%40empresa.com").with_body("true").create_async().await;
        server.mock("GET", "/usuarios/validate-username/agomez").with_body("false").create_async().await;
        let register = server.mock("POST", "/auth/register").expect(0).create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        let res = console
            .execute("usuarios create -nombre Luis -apellido Perez -username agomez -email luis@empresa.com -cargo 1 -departamento 2")
            .await;
        match res {
            Err(Error::Form(errors)) => assert!(errors.to_string().contains("El username ya está en uso.")),
            other => panic!("unexpected {:?}", other),
        }
        register.assert_async().await;
    }

    #[tokio::test]
    async fn renaming_self_closes_session() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        server.mock("GET", "/usuarios/validate-username/anag").with_body("true").create_async().await;
        server.mock("PATCH", "/usuarios/update/12")
            .match_body(Matcher::PartialJson(serde_json::json!({"username": "anag", "email": "ana@empresa.com"})))
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        let out = console.execute("usuarios update -legajo 12 -username anag").await.unwrap();
        assert!(out.ends_with("Vuelva a iniciar sesión."));
        assert_eq!(console.api.session().token().await, None);
    }

    #[tokio::test]
    async fn update_sends_new_clave() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        let patch = server.mock("PATCH", "/usuarios/update/12")
            .match_body(Matcher::PartialJson(serde_json::json!({"username": "agomez", "clave": "n0va-clave"})))
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        let out = console.execute("usuarios update -legajo 12 -clave n0va-clave -repetir-clave n0va-clave").await.unwrap();
        assert_eq!(out, "Usuario 12 actualizado");
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn update_without_clave_omits_it() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        let patch = server.mock("PATCH", "/usuarios/update/12")
            .match_body(Matcher::Json(serde_json::json!({
                "nombre": "Ana María",
                "apellido": "Gómez",
                "username": "agomez",
                "email": "ana@empresa.com",
                "cargo_id": 1,
                "departamento_id": 2,
            })))
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        console.execute(r#"usuarios update -legajo 12 -nombre "Ana María""#).await.unwrap();
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn clave_mismatch_blocks_update() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body(format!("[{}]", ANA)).create_async().await;
        let patch = server.mock("PATCH", "/usuarios/update/12").expect(0).create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        match console.execute("usuarios update -legajo 12 -clave uno -repetir-clave dos").await {
            Err(Error::Form(errors)) => assert!(errors.to_string().contains("Las claves no coinciden.")),
            other => panic!("unexpected {:?}", other),
        }
        match console.execute("usuarios update -legajo 12 -clave uno").await {
            Err(Error::Form(errors)) => assert!(errors.to_string().contains("Las claves no coinciden.")),
            other => panic!("unexpected {:?}", other),
        }
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_legajo_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/usuarios").with_body("[]").create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        assert!(matches!(console.execute("usuarios update -legajo 99 -nombre X").await, Err(Error::NotFound(_))));
    }
}
