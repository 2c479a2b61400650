//! Console d'administration.
//!
//! Une ligne de commande (`groupe commande -parametre valeur`) est reconnue par le parseur
//! puis exécutée par le handler du groupe. Le résultat est renvoyé sous forme de texte, la
//! boucle interactive se contente de l'afficher.

pub mod command_parser;
mod help;

mod adjuntos;
mod catalogos;
mod comentarios;
mod requerimientos;
mod sesion;
mod usuarios;

use std::{fmt, io::Write, path::PathBuf};
use tokio::{io::{AsyncBufReadExt, BufReader}, sync::{watch, Mutex}};
use reqdesk_core::{
    form::{FieldErrors, StagedFile},
    model::{IDType, Legajo},
};
use crate::{api, log_info, session::Claims, store::Stores};

use command_parser::{self as cmd, matching, split_shell, Argument, Command, Group, Node, ValueType};

#[derive(Debug)]
pub enum Error {
    /// Ligne non reconnue
    Parse(String),
    /// Commande qui demande une session, sans session ouverte
    NotLoggedIn,
    Api(api::Error),
    /// Formulaire refusé
    Form(FieldErrors),
    /// Valeur refusée avant d'arriver au formulaire
    Invalid(String),
    NotFound(String),
    Forbidden(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{} (voir `help`)", e),
            Error::NotLoggedIn => f.write_str("Aucune session ouverte, utilisez `login`"),
            Error::Api(e) => write!(f, "{}", e),
            Error::Form(errors) => write!(f, "Formulaire invalide:\n{}", errors),
            Error::Invalid(e) => f.write_str(e),
            Error::NotFound(what) => write!(f, "{} introuvable", what),
            Error::Forbidden(e) => f.write_str(e),
            Error::Io(e) => write!(f, "Erreur de fichier: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<api::Error> for Error {
    fn from(e: api::Error) -> Self {
        Error::Api(e)
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
impl From<cmd::ParseError<'_>> for Error {
    fn from(e: cmd::ParseError<'_>) -> Self {
        Error::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct Console {
    api: api::Client,
    stores: Stores,
    download_dir: PathBuf,
    tree: Node,
    session_changes: Mutex<watch::Receiver<Option<String>>>,
}

impl Console {
    pub fn new(api: api::Client, stores: Stores, download_dir: PathBuf) -> Self {
        let session_changes = Mutex::new(api.session().subscribe());
        Self { api, stores, download_dir, tree: command_tree(), session_changes }
    }
    /// Exécute une ligne de commande
    pub async fn execute(&self, line: &str) -> Result<String> {
        self.execute_args(&split_shell(line)).await
    }
    /// Exécute une commande déjà découpée (arguments du programme)
    pub async fn execute_args(&self, args: &[&str]) -> Result<String> {
        let command = self.tree.try_match(args)?;
        if command.requires_session && self.api.session().token().await.is_none() {
            return Err(Error::NotLoggedIn);
        }
        self.follow_session().await;
        let groups = command.get_groups();
        match (groups.first().copied(), command.get_command()) {
            (None, "help") => self.help(&command),
            (None, "login") => sesion::login(self, &command).await,
            (None, "logout") => sesion::logout(self).await,
            (None, "whoami") => sesion::whoami(self).await,
            (Some("usuarios"), name) => usuarios::execute(self, name, &command).await,
            (Some("catalogos"), name) => catalogos::execute(self, name).await,
            (Some("requerimientos"), name) => requerimientos::execute(self, name, &command).await,
            (Some("comentarios"), name) => comentarios::execute(self, name, &command).await,
            (Some("adjuntos"), name) => adjuntos::execute(self, name, &command).await,
            _ => Err(Error::Parse(cmd::ParseError::NotMatched.to_string())),
        }
    }

    fn help(&self, command: &matching::Command<'_>) -> Result<String> {
        help::find(&self.tree, command.arguments.iter().copied())
            .map(|info| help::render(&info))
            .ok_or_else(|| Error::NotFound(format!("Aide de `{}`", command.arguments.join(" "))))
    }

    /// Boucle interactive sur l'entrée standard, jusqu'à `exit` ou la fin de l'entrée.
    pub async fn run_interactive(&self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("reqdesk> ");
            std::io::stdout().flush()?;
            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };
            let line = line.trim();
            match line {
                "" => continue,
                "exit" | "quit" => break,
                _ => match self.execute(line).await {
                    Ok(out) if out.is_empty() => (),
                    Ok(out) => println!("{}", out),
                    Err(e) => println!("{}", e),
                },
            }
        }
        log_info!("Console closed");
        Ok(())
    }

    /// Les listes en cache appartiennent à l'utilisateur précédent après un changement de jeton.
    async fn follow_session(&self) {
        let mut changes = self.session_changes.lock().await;
        if changes.has_changed().unwrap_or(false) {
            changes.borrow_and_update();
            self.stores.invalidate_all().await;
        }
    }

    /// Utilisateur courant, d'après le jeton
    async fn claims(&self) -> Option<Claims> {
        self.api.session().claims().await
    }
    async fn legajo(&self) -> Option<Legajo> {
        self.claims().await.and_then(|c| c.legajo)
    }
}

/// Valeur requise d'un paramètre. Le parseur a déjà vérifié sa présence.
fn required<'a>(command: &matching::Command<'a>, name: &str) -> Result<&'a str> {
    command.value(name).ok_or_else(|| Error::Parse(cmd::ParseError::RequiredParameters(name.to_string()).to_string()))
}

fn parse_id(value: &str) -> Result<IDType> {
    value.trim().parse().map_err(|_| Error::Invalid(format!("Identifiant invalide: {}", value)))
}

fn id_param(command: &matching::Command<'_>, name: &str) -> Result<Option<IDType>> {
    command.value(name).map(parse_id).transpose()
}

fn flag(command: &matching::Command<'_>, name: &str) -> bool {
    matches!(command.value(name), Some("true") | Some("si"))
}

/// Lit les fichiers à joindre. Le type MIME est déduit de l'extension.
async fn read_files(paths: &[&str]) -> Result<Vec<StagedFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read(path).await?;
        let name = std::path::Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        files.push(StagedFile::new(name, content));
    }
    Ok(files)
}

fn or_dash<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), T::to_string)
}

fn attachment_params(command: Command) -> Command {
    command.add_param(Argument::new("archivo")
        .set_help("Fichier à joindre (Word, PDF ou Excel)")
        .set_value_type(ValueType::Path)
        .set_multiple(true)
    )
}

/// Arbre des commandes de la console
pub fn command_tree() -> Node {
    let legajo = |help: &str| Argument::new("legajo")
        .set_help(help)
        .set_value_type(ValueType::Integer)
        .set_required(true);
    let codigo = |help: &str| Argument::new("codigo")
        .set_help(help)
        .set_required(true);
    let id = |name: &str, help: &str| Argument::new(name)
        .set_help(help)
        .set_value_type(ValueType::Integer);

    let usuarios = Group::new("usuarios")
        .set_help("Gestion des utilisateurs")
        .add_command(Command::new("list")
            .set_help("Liste les utilisateurs")
            .add_param(Argument::new("buscar").set_help("Legajo, nom, prénom ou nom complet"))
        )
        .add_command(Command::new("create")
            .set_help("Crée un utilisateur. La clave est générée.")
            .add_param(Argument::new("nombre").set_required(true))
            .add_param(Argument::new("apellido").set_required(true))
            .add_param(Argument::new("username").set_required(true))
            .add_param(Argument::new("email").set_required(true))
            .add_param(id("cargo", "Id du cargo").set_required(true))
            .add_param(id("departamento", "Id du departamento").set_required(true))
        )
        .add_command(Command::new("update")
            .set_help("Modifie un utilisateur")
            .add_param(legajo("Legajo de l'utilisateur"))
            .add_param(Argument::new("nombre"))
            .add_param(Argument::new("apellido"))
            .add_param(Argument::new("username"))
            .add_param(Argument::new("email"))
            .add_param(id("cargo", "Id du cargo"))
            .add_param(id("departamento", "Id du departamento"))
            .add_param(Argument::new("clave").set_help("Nouvelle clave"))
            .add_param(Argument::new("repetir-clave").set_help("Répétition de la nouvelle clave"))
        )
        .add_command(Command::new("delete")
            .set_help("Supprime un utilisateur")
            .add_param(legajo("Legajo de l'utilisateur"))
        );

    let catalogos = Group::new("catalogos")
        .set_help("Catalogues du backend")
        .add_command(Command::new("cargos").set_help("Liste les cargos"))
        .add_command(Command::new("departamentos").set_help("Liste les departamentos"))
        .add_command(Command::new("estados").set_help("Liste les états de ticket"))
        .add_command(Command::new("prioridades").set_help("Liste les priorités"))
        .add_command(Command::new("tipos").set_help("Liste les types de ticket et leurs catégories"))
        .add_command(Command::new("categorias").set_help("Liste les catégories"));

    let requerimientos = Group::new("requerimientos")
        .set_help("Gestion des tickets")
        .add_command(Command::new("list")
            .set_help("Liste les tickets, avec des filtres cumulatifs")
            .add_param(Argument::new("fecha").set_help("Partie de la date de création, ex: 2024-03"))
            .add_param(Argument::new("tipo").set_help("Description du type"))
            .add_param(Argument::new("categoria").set_help("Description de la catégorie, parmi celles du type"))
            .add_param(Argument::new("estado").set_help("Nom de l'état"))
            .add_param(Argument::new("buscar").set_help("Code, asunto, ou code suivi de l'asunto"))
        )
        .add_command(Command::new("show")
            .set_help("Détail d'un ticket")
            .add_param(codigo("Code du ticket"))
        )
        .add_command(attachment_params(Command::new("create")
            .set_help("Crée un ticket")
            .add_param(id("tipo", "Id du type").set_required(true))
            .add_param(id("categoria", "Id de la catégorie").set_required(true))
            .add_param(id("prioridad", "Id de la priorité").set_required(true))
            .add_param(Argument::new("asunto").set_required(true))
            .add_param(Argument::new("descripcion").set_required(true))
            .add_param(id("estado", "Id de l'état, Abierto par défaut"))
            .add_param(id("destinatario", "Legajo du destinataire, passe le ticket à Asignado"))
            .add_param(Argument::new("vincular").set_help("Code d'un ticket lié").set_multiple(true))
        ))
        .add_command(attachment_params(Command::new("update")
            .set_help("Modifie un ticket")
            .add_param(codigo("Code du ticket"))
            .add_param(id("tipo", "Id du type, change le code du ticket"))
            .add_param(id("categoria", "Id de la catégorie"))
            .add_param(id("prioridad", "Id de la priorité"))
            .add_param(Argument::new("asunto"))
            .add_param(Argument::new("descripcion"))
            .add_param(id("estado", "Id de l'état"))
            .add_param(id("destinatario", "Legajo du destinataire"))
            .add_param(Argument::new("quitar-destinatario")
                .set_help("Retire le destinataire")
                .set_value_type(ValueType::Boolean)
            )
            .add_param(Argument::new("vincular").set_help("Code d'un ticket à lier").set_multiple(true))
            .add_param(Argument::new("desvincular").set_help("Code d'un ticket à délier").set_multiple(true))
            .add_param(id("quitar-adjunto", "Id d'une pièce jointe à supprimer").set_multiple(true))
        ))
        .add_command(Command::new("delete")
            .set_help("Supprime un ticket")
            .add_param(codigo("Code du ticket"))
        )
        .add_command(Command::new("siguiente")
            .set_help("Prochain code disponible pour un type")
            .add_param(id("tipo", "Id du type").set_required(true))
        );

    let comentarios = Group::new("comentarios")
        .set_help("Commentaires d'un ticket")
        .add_command(Command::new("list")
            .set_help("Liste les commentaires d'un ticket")
            .add_param(codigo("Code du ticket"))
        )
        .add_command(attachment_params(Command::new("create")
            .set_help("Commente un ticket")
            .add_param(codigo("Code du ticket"))
            .add_param(Argument::new("asunto").set_required(true))
            .add_param(Argument::new("descripcion").set_required(true))
        ));

    let adjuntos = Group::new("adjuntos")
        .set_help("Pièces jointes")
        .add_command(Command::new("download")
            .set_help("Télécharge une pièce jointe dans le dossier de téléchargement")
            .add_param(Argument::new("ruta").set_help("Route de la pièce jointe").set_required(true))
        )
        .add_command(Command::new("delete")
            .set_help("Supprime une pièce jointe")
            .add_param(id("id", "Id de la pièce jointe").set_required(true))
        );

    Node::new()
        .add_command(Command::new("help")
            .set_help("Affiche l'aide d'un groupe ou d'une commande")
            .set_arguments("chemin")
            .set_public(true)
        )
        .add_command(Command::new("login")
            .set_help("Ouvre une session")
            .set_public(true)
            .add_param(Argument::new("username").set_required(true))
            .add_param(Argument::new("clave").set_required(true))
        )
        .add_command(Command::new("logout").set_help("Ferme la session").set_public(true))
        .add_command(Command::new("whoami").set_help("Utilisateur connecté").set_public(true))
        .add_group(usuarios)
        .add_group(catalogos)
        .add_group(requerimientos)
        .add_group(comentarios)
        .add_group(adjuntos)
}
