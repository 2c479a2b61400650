use crate::session::Claims;

use super::{command_parser::matching, or_dash, required, Console, Result};

pub(super) async fn login(console: &Console, command: &matching::Command<'_>) -> Result<String> {
    let username = required(command, "username")?;
    let clave = required(command, "clave")?;
    let token = console.api.login(username, clave).await?;
    console.api.session().set_token(token).await;
    Ok(format!("Bienvenido {}", username))
}

pub(super) async fn logout(console: &Console) -> Result<String> {
    console.api.session().clear().await;
    Ok("Sesión cerrada".to_string())
}

pub(super) async fn whoami(console: &Console) -> Result<String> {
    if console.api.session().token().await.is_none() {
        return Ok("Sin sesión".to_string());
    }
    Ok(match console.claims().await {
        Some(claims) => describe(&claims),
        None => "Sesión abierta, usuario desconocido".to_string(),
    })
}

fn describe(claims: &Claims) -> String {
    let nombre = match (&claims.nombre, &claims.apellido) {
        (Some(n), Some(a)) => format!(" ({} {})", n, a),
        (Some(n), None) => format!(" ({})", n),
        _ => String::new(),
    };
    let expired = if claims.is_expired_at(chrono::Utc::now()) {" [expirée]"} else {""};
    format!("{}{} legajo {}{}", or_dash(&claims.sub), nombre, or_dash(&claims.legajo), expired)
}
