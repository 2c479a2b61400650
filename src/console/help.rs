//! Aide de la console.
//!
//! Parcourt l'arbre de commandes avec les mots donnés après `help` et décrit le noeud trouvé.

use super::command_parser::{self as cmd, Named};

#[derive(Debug, Default, PartialEq)]
pub struct HelpInfo {
    /// Nom du groupe ou de la commande
    pub name: String,
    /// Description du groupe ou de la commande
    pub desc: Option<String>,
    /// Une session est requise pour l'utiliser
    pub requires_session: bool,
    /// Si l'aide concerne un groupe, la liste des sous-groupes, s'il y en a
    pub groups: Option<Vec<(String, Option<String>)>>,
    /// Si l'aide concerne un groupe, la liste des sous-commande, s'il y en a
    pub commands: Option<Vec<(String, Option<String>)>>,
    /// Si l'aide concerne une commande, la liste des paramètres, s'il y en a
    pub params: Option<Vec<(String, Option<String>)>>,
}

fn entries<'a, T: Named + 'a>(list: impl Iterator<Item = &'a T>, help: impl Fn(&T) -> Option<&str>) -> Option<Vec<(String, Option<String>)>> {
    let entries: Vec<_> = list.map(|v| (v.name().to_string(), help(v).map(str::to_string))).collect();
    if entries.is_empty() {None} else {Some(entries)}
}

/// Aide générale ou aide du chemin donné. `None` si aucun groupe ni commande ne correspond.
pub fn find<'a>(root: &cmd::Node, mut words: impl Iterator<Item = &'a str>) -> Option<HelpInfo> {
    match words.next() {
        Some(name) => help_node(root, name, words),
        None => Some(HelpInfo {
            name: "reqdesk".to_string(),
            desc: Some("Administration des requerimientos".to_string()),
            groups: entries(root.groups.list(), cmd::Group::help),
            commands: entries(root.commands.list(), cmd::Command::help),
            ..Default::default()
        }),
    }
}

fn help_node<'a>(node: &cmd::Node, name: &str, words: impl Iterator<Item = &'a str>) -> Option<HelpInfo> {
    if let Some(found) = node.groups.find(name) {
        help_group(found, words)
    } else if let Some(found) = node.commands.find(name) {
        help_command(found, words)
    } else {
        None
    }
}

fn help_group<'a>(group: &cmd::Group, mut words: impl Iterator<Item = &'a str>) -> Option<HelpInfo> {
    match words.next() {
        Some(name) => help_node(group.node(), name, words),
        None => Some(HelpInfo {
            name: format!("{} (Groupe de commande)", group.name()),
            desc: group.help().map(str::to_string),
            requires_session: group.commands().list().any(|c| !c.public),
            groups: entries(group.groups().list(), cmd::Group::help),
            commands: entries(group.commands().list(), cmd::Command::help),
            ..Default::default()
        }),
    }
}

fn help_command<'a>(command: &cmd::Command, mut words: impl Iterator<Item = &'a str>) -> Option<HelpInfo> {
    if words.next().is_some() {
        return None;
    }
    let mut params = Vec::new();
    if let Some(arguments) = &command.arguments {
        params.push((format!("[{}...]", arguments), None));
    }
    for param in command.params() {
        let mut name = format!("-{} <{}>", param.name(), param.value_type().as_str());
        if param.required() {
            name.push_str(" (requis)");
        }
        if param.multiple {
            name.push_str(" (répétable)");
        }
        params.push((name, param.help().map(str::to_string)));
    }
    Some(HelpInfo {
        name: format!("{} (Commande)", command.name()),
        desc: command.help().map(str::to_string),
        requires_session: !command.public,
        params: if params.is_empty() {None} else {Some(params)},
        ..Default::default()
    })
}

/// Mise en forme texte de l'aide
pub fn render(info: &HelpInfo) -> String {
    let mut out = format!("{} - Aide\n", info.name);
    if let Some(desc) = &info.desc {
        out.push_str(desc);
        out.push('\n');
    }
    let mut section = |name: &str, list: &Option<Vec<(String, Option<String>)>>| {
        if let Some(list) = list {
            let plural = if list.len() > 1 {"s"} else {""};
            out.push_str(&format!("\n{}{}:\n", name, plural));
            for (entry, desc) in list {
                match desc {
                    Some(desc) => out.push_str(&format!("  {} : {}\n", entry, desc)),
                    None => out.push_str(&format!("  {}\n", entry)),
                }
            }
        }
    };
    section("Groupe", &info.groups);
    section("Commande", &info.commands);
    section("Paramètre", &info.params);
    if info.requires_session {
        out.push_str("\nSession requise\n");
    }
    out.pop();
    out
}
