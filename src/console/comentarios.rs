use std::time::Instant;

use reqdesk_core::{filter::can_comment, form::ComentarioForm};

use super::{command_parser::{matching, ParseError}, or_dash, read_files, required, Console, Error, Result};

pub(super) async fn execute(console: &Console, name: &str, command: &matching::Command<'_>) -> Result<String> {
    match name {
        "list" => list(console, command).await,
        "create" => create(console, command).await,
        _ => Err(Error::Parse(ParseError::PartiallyNotMatched(name).to_string())),
    }
}

async fn list(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let codigo = required(command, "codigo")?;
    let comentarios = console.stores.comentarios.refresh(codigo).await?;
    if comentarios.is_empty() {
        return Ok(format!("Ningún comentario en {}", codigo));
    }
    let mut out = Vec::new();
    for comentario in &comentarios {
        out.push(format!(
            "[{}] {} - {}",
            or_dash(&comentario.fecha_hora),
            or_dash(&comentario.username),
            comentario.asunto,
        ));
        out.push(format!("  {}", comentario.descripcion));
        for archivo in &comentario.archivos_adjuntos {
            out.push(format!("  adjunto {} | {} | {}", archivo.id, archivo.nombre_original, archivo.ruta));
        }
    }
    Ok(out.join("\n"))
}

/// Seuls l'émetteur, le destinataire, ou n'importe qui sur un ticket `Asignado` peuvent commenter.
async fn create(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let now = Instant::now();
    let codigo = required(command, "codigo")?;
    let legajo = console.legajo().await;
    let req = console.stores.requerimientos.find(codigo).await?
        .ok_or_else(|| Error::NotFound(format!("Requerimiento {}", codigo)))?;
    if !can_comment(&req, legajo) {
        return Err(Error::Forbidden(format!("No puede comentar el requerimiento {}", codigo)));
    }
    let mut form = ComentarioForm::new(req.codigo.clone(), legajo);
    form.set_asunto(required(command, "asunto")?);
    form.set_descripcion(required(command, "descripcion")?);
    let paths = command.values("archivo");
    if !paths.is_empty() {
        form.stage_files(read_files(&paths).await?, now)
            .map_err(|e| Error::Invalid(e.message().to_string()))?;
    }
    let (payload, archivos) = form.submit().map_err(Error::Form)?;
    console.stores.comentarios.create(&payload, &archivos).await?;
    Ok(format!("Comentario agregado a {}", codigo))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use mockito::Matcher;
    use crate::console::{tests::console, Error};

    #[tokio::test]
    async fn list_shows_attachments() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/comentarios/INC-2024-0000000007")
            .with_body(r#"[{"username": "agomez", "asunto": "Visto", "descripcion": "Reviso mañana",
                "fechaHora": "2024-03-02T09:00:00",
                "archivosAdjuntos": [{"id": 3, "nombreOriginal": "foto.pdf", "ruta": "uploads/foto.pdf"}]}]"#)
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        assert_eq!(
            console.execute("comentarios list -codigo INC-2024-0000000007").await.unwrap(),
            "[2024-03-02T09:00:00] agomez - Visto\n  Reviso mañana\n  adjunto 3 | foto.pdf | uploads/foto.pdf"
        );
    }

    #[tokio::test]
    async fn emitter_can_comment() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/requerimiento")
            .with_body(r#"[{"codigo": "INC-2024-0000000007", "emisorLegajo": 12, "estadoRequerimientoNombre": "Abierto"}]"#)
            .create_async().await;
        let create = server.mock("POST", "/comentarios/create")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"filename="comentario.json""#.to_string()),
                Matcher::Regex(r#""requerimientoCodigo":"INC-2024-0000000007""#.to_string()),
                Matcher::Regex(r#""usuarioEmisorId":12"#.to_string()),
            ]))
            .with_status(201)
            .create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        let out = console
            .execute(r#"comentarios create -codigo INC-2024-0000000007 -asunto Visto -descripcion "Lo reviso""#)
            .await
            .unwrap();
        assert_eq!(out, "Comentario agregado a INC-2024-0000000007");
        create.assert_async().await;
    }

    #[tokio::test]
    async fn outsider_cannot_comment_open_ticket() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/requerimiento")
            .with_body(r#"[{"codigo": "INC-2024-0000000007", "emisorLegajo": 40, "estadoRequerimientoNombre": "Abierto"}]"#)
            .create_async().await;
        let create = server.mock("POST", "/comentarios/create").expect(0).create_async().await;
        let console = console(&server, true, PathBuf::from("."));
        let res = console.execute("comentarios create -codigo INC-2024-0000000007 -asunto a -descripcion b").await;
        assert!(matches!(res, Err(Error::Forbidden(_))));
        create.assert_async().await;
    }
}
