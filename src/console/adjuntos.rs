use reqdesk_core::model::archivo::file_name_of;
use crate::log_info;

use super::{command_parser::{matching, ParseError}, parse_id, required, Console, Error, Result};

pub(super) async fn execute(console: &Console, name: &str, command: &matching::Command<'_>) -> Result<String> {
    match name {
        "download" => download(console, command).await,
        "delete" => delete(console, command).await,
        _ => Err(Error::Parse(ParseError::PartiallyNotMatched(name).to_string())),
    }
}

/// Le fichier est écrit sous le dernier segment de sa route, dans le dossier de téléchargement.
async fn download(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let ruta = required(command, "ruta")?;
    let content = console.api.download_archivo(ruta).await?;
    tokio::fs::create_dir_all(&console.download_dir).await?;
    let path = console.download_dir.join(file_name_of(ruta));
    tokio::fs::write(&path, &content).await?;
    log_info!("Downloaded {} ({} bytes)", path.display(), content.len());
    Ok(format!("Descargado en {}", path.display()))
}

async fn delete(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let id = parse_id(required(command, "id")?)?;
    console.stores.requerimientos.delete_archivo(id).await?;
    Ok(format!("Adjunto {} eliminado", id))
}
