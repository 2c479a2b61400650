use std::time::Instant;

use reqdesk_core::{
    filter::{can_comment, RequerimientoFilter},
    form::{Catalogos, RequerimientoForm},
    model::{EstadoNombre, IDType, Requerimiento},
    CodeAssigner,
};
use crate::{log_info, store::Repository};

use super::{
    command_parser::{matching, ParseError},
    flag, id_param, or_dash, parse_id, read_files, required, Console, Error, Result,
};

pub(super) async fn execute(console: &Console, name: &str, command: &matching::Command<'_>) -> Result<String> {
    match name {
        "list" => list(console, command).await,
        "show" => show(console, command).await,
        "create" => create(console, command).await,
        "update" => update(console, command).await,
        "delete" => delete(console, command).await,
        "siguiente" => siguiente(console, command).await,
        _ => Err(Error::Parse(ParseError::PartiallyNotMatched(name).to_string())),
    }
}

async fn catalogos(console: &Console) -> Result<Catalogos> {
    Ok(Catalogos {
        tipos: console.stores.tipos.list().await?,
        estados: console.stores.estados.list().await?,
        prioridades: console.stores.prioridades.list().await?,
    })
}

async fn find(console: &Console, codigo: &str) -> Result<Requerimiento> {
    console.stores.requerimientos.find(codigo).await?
        .ok_or_else(|| Error::NotFound(format!("Requerimiento {}", codigo)))
}

fn summary(req: &Requerimiento) -> String {
    format!(
        "{} | {} | {} | {} | {} | {} | {}",
        req.codigo,
        or_dash(&req.fecha_hora_alta),
        or_dash(&req.tipo_requerimiento_descripcion),
        or_dash(&req.categoria_requerimiento_descripcion),
        or_dash(&req.estado_requerimiento_nombre),
        or_dash(&req.prioridad_requerimiento_nombre),
        req.asunto,
    )
}

async fn list(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let mut filter = RequerimientoFilter::new();
    if let Some(fecha) = command.value("fecha") {
        filter = filter.fecha(fecha);
    }
    if let Some(tipo) = command.value("tipo") {
        filter = filter.tipo(tipo);
    }
    if let Some(categoria) = command.value("categoria") {
        if let Some(tipo) = &filter.tipo {
            let tipos = console.stores.tipos.list().await?;
            if !filter.categorias(&tipos).iter().any(|c| c.descripcion == categoria) {
                return Err(Error::Invalid(format!("La categoría {} no pertenece al tipo {}", categoria, tipo)));
            }
        }
        filter = filter.categoria(categoria);
    }
    if let Some(estado) = command.value("estado") {
        filter = filter.estado(estado);
    }
    if let Some(buscar) = command.value("buscar") {
        filter = filter.buscar(buscar);
    }
    let requerimientos = console.stores.requerimientos.list().await?;
    let found = filter.apply(&requerimientos);
    if found.is_empty() {
        return Ok("Ningún requerimiento".to_string());
    }
    Ok(found.into_iter().map(summary).collect::<Vec<_>>().join("\n"))
}

async fn show(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let req = find(console, required(command, "codigo")?).await?;
    let mut out = vec![
        format!("{} - {}", req.codigo, req.asunto),
        format!("Fecha: {}", or_dash(&req.fecha_hora_alta)),
        format!("Tipo: {} / Categoría: {}", or_dash(&req.tipo_requerimiento_descripcion), or_dash(&req.categoria_requerimiento_descripcion)),
        format!("Estado: {} / Prioridad: {}", or_dash(&req.estado_requerimiento_nombre), or_dash(&req.prioridad_requerimiento_nombre)),
        format!("Emisor: {} ({})", or_dash(&req.nombre_completo_emisor), or_dash(&req.emisor_legajo)),
        format!("Destinatario: {} ({})", or_dash(&req.nombre_completo_destinatario), or_dash(&req.destinatario_id)),
        String::new(),
        req.descripcion.clone(),
    ];
    if !req.archivos_adjuntos.is_empty() {
        out.push("Adjuntos:".to_string());
        for archivo in &req.archivos_adjuntos {
            out.push(format!("  {} | {} | {}", archivo.id, archivo.nombre_original, archivo.ruta));
        }
    }
    if !req.requerimientos_relacionados.is_empty() {
        out.push("Vinculados:".to_string());
        for rel in &req.requerimientos_relacionados {
            out.push(format!("  {} - {}", rel.codigo, or_dash(&rel.asunto)));
        }
    }
    let comentable = can_comment(&req, console.legajo().await);
    out.push(format!("Puede comentar: {}", if comentable {"sí"} else {"no"}));
    Ok(out.join("\n"))
}

/// Ajoute les fichiers `-archivo` au formulaire
async fn stage(form: &mut RequerimientoForm, command: &matching::Command<'_>, now: Instant) -> Result<()> {
    let paths = command.values("archivo");
    if paths.is_empty() {
        return Ok(());
    }
    let files = read_files(&paths).await?;
    form.stage_files(files, now)
        .map(|_| ())
        .map_err(|e| Error::Invalid(e.message().to_string()))
}

/// Destinataire avant l'état: choisir un destinataire passe le ticket à `Asignado`.
/// Avec un état, retirer le destinataire change les deux ensemble.
fn assign(form: &mut RequerimientoForm, command: &matching::Command<'_>, now: Instant) -> Result<()> {
    let estado = id_param(command, "estado")?;
    if flag(command, "quitar-destinatario") {
        match estado {
            Some(estado) => form.release(estado, now),
            None => form.select_destinatario(None, now),
        };
        return Ok(());
    }
    if let Some(destinatario) = id_param(command, "destinatario")? {
        form.select_destinatario(Some(destinatario), now);
    }
    if let Some(estado) = estado {
        form.select_estado(Some(estado), now);
    }
    Ok(())
}

async fn create(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let now = Instant::now();
    let mut form = RequerimientoForm::create(catalogos(console).await?, console.legajo().await);
    let tipo = parse_id(required(command, "tipo")?)?;
    form.select_tipo(Some(tipo), &console.stores.requerimientos).await;
    form.select_categoria(id_param(command, "categoria")?, now);
    form.select_prioridad(id_param(command, "prioridad")?, now);
    assign(&mut form, command, now)?;
    if form.estado().is_none() {
        let abierto = EstadoNombre::Abierto.id_in(&form.catalogos().estados);
        form.select_estado(abierto, now);
    }
    form.set_asunto(required(command, "asunto")?);
    form.set_descripcion(required(command, "descripcion")?);
    for codigo in command.values("vincular") {
        form.link(codigo, now);
    }
    stage(&mut form, command, now).await?;

    let submission = form.submit().map_err(Error::Form)?;
    console.stores.requerimientos.save(&submission).await?;
    log_info!("Requerimiento {} created", submission.payload.codigo);
    Ok(format!("Requerimiento {} creado", submission.payload.codigo))
}

async fn update(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let now = Instant::now();
    let req = find(console, required(command, "codigo")?).await?;
    let mut form = RequerimientoForm::edit(catalogos(console).await?, &req)
        .map_err(|e| Error::Invalid(e.to_string()))?;
    if let Some(tipo) = id_param(command, "tipo")? {
        form.select_tipo(Some(tipo), &console.stores.requerimientos).await;
    }
    if let Some(categoria) = id_param(command, "categoria")? {
        form.select_categoria(Some(categoria), now);
    }
    if let Some(prioridad) = id_param(command, "prioridad")? {
        form.select_prioridad(Some(prioridad), now);
    }
    assign(&mut form, command, now)?;
    if let Some(asunto) = command.value("asunto") {
        form.set_asunto(asunto);
    }
    if let Some(descripcion) = command.value("descripcion") {
        form.set_descripcion(descripcion);
    }
    for codigo in command.values("desvincular") {
        form.unlink(codigo);
    }
    for codigo in command.values("vincular") {
        form.link(codigo, now);
    }
    let quitar = command.values("quitar-adjunto")
        .into_iter()
        .map(parse_id)
        .collect::<Result<Vec<IDType>>>()?;
    for id in &quitar {
        if !form.forget_existing_file(*id) {
            return Err(Error::NotFound(format!("Adjunto {}", id)));
        }
    }
    stage(&mut form, command, now).await?;

    let submission = form.submit().map_err(Error::Form)?;
    console.stores.requerimientos.save(&submission).await?;
    for id in quitar {
        console.stores.requerimientos.delete_archivo(id).await?;
    }
    Ok(format!("Requerimiento {} actualizado", submission.payload.codigo))
}

async fn delete(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let codigo = required(command, "codigo")?;
    console.stores.requerimientos.delete(codigo).await?;
    Ok(format!("Requerimiento {} eliminado", codigo))
}

/// Aperçu du code qu'aurait un nouveau ticket de ce type
async fn siguiente(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let tipo = parse_id(required(command, "tipo")?)?;
    let tipos = console.stores.tipos.list().await?;
    let mut assigner = CodeAssigner::for_create();
    match assigner.select_tipo(Some(tipo), &tipos, &console.stores.requerimientos).await {
        Some(codigo) => Ok(codigo.to_string()),
        None => Err(Error::NotFound(format!("Código para el tipo {}", tipo))),
    }
}
