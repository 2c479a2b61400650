//! Parseur de commande
//!
//! Déclaration des groupes, des commandes et de leurs paramètres de la console.
//!
//! Le parseur fonctionne de la même manière qu'un parseur de ligne de commande:
//! - Chaque partie de la ligne est séparée par des espaces, sauf les valeurs entre guillemets. `mot1 mot2 "mot 3"`
//! - Les groupes et les commandes sont des mots clés au début de la ligne: `group [...sous_groupes...] command`
//! - `-nom_parametre valeur` ou `-nom_parametre "valeur avec des espaces"` sont des paramètres.
//! - Les mots sans tiret sont des arguments, si la commande en accepte.
//!
//! Le parseur ne fait que reconnaître la commande, il n'exécute rien.
//!
//! # Exemple
//!
//! ```ignore
//! let usuarios = cmd::Group::new("usuarios")
//!     .set_help("Gestion des utilisateurs")
//!     .add_command(cmd::Command::new("delete")
//!         .set_help("Supprime un utilisateur")
//!         .add_param(cmd::Argument::new("legajo")
//!             .set_value_type(cmd::ValueType::Integer)
//!             .set_required(true)
//!         )
//!     );
//! ```
//! **Utilisation**: `usuarios delete -legajo 12`

use std::fmt;

/// Structures de retour d'une commande qui a match avec le parseur
pub mod matching {
    use std::collections::VecDeque;
    /// Information de paramètre de commande que le parseur a matché
    #[derive(Debug, PartialEq)]
    pub struct Parameter<'a> {
        pub name: &'a str,
        pub value: &'a str,
    }
    /// Information de commande que le parseur a matché
    #[derive(Debug, PartialEq)]
    pub struct Command<'a> {
        /// Chemin de la commande. Exemple : `["requerimientos", "show"]`
        pub path: VecDeque<&'a str>,
        /// Paramètres de la commande, dans l'ordre de la ligne
        pub params: Vec<Parameter<'a>>,
        /// Arguments sans nom
        pub arguments: Vec<&'a str>,
        /// La commande demande une session ouverte
        pub requires_session: bool,
    }
    impl<'a> Command<'a> {
        /// Retourne le nom de la commande. Exemple : `["usuarios", "list"]` -> `list`
        pub fn get_command(&self) -> &'a str {
            self.path.back().copied().unwrap_or_default()
        }
        /// Retourne la suite de groupes. Exemple : `["usuarios", "list"]` -> `["usuarios"]`
        pub fn get_groups(&self) -> Vec<&'a str> {
            self.path.iter().take(self.path.len().saturating_sub(1)).copied().collect()
        }
        pub fn get_parameter(&self, name: &str) -> Option<&Parameter<'a>> {
            self.params.iter().find(|p| p.name == name)
        }
        pub fn value(&self, name: &str) -> Option<&'a str> {
            self.get_parameter(name).map(|p| p.value)
        }
        /// Toutes les valeurs d'un paramètre répétable
        pub fn values(&self, name: &str) -> Vec<&'a str> {
            self.params.iter().filter(|p| p.name == name).map(|p| p.value).collect()
        }
    }
}

/// Objet nommé de l'arbre de commandes
pub trait Named {
    fn name(&self) -> &str;
}
/// Erreur de parsing
#[derive(Debug, PartialEq)]
pub enum ParseError<'a> {
    /// Ligne vide
    Empty,
    /// La commande n'a pas matché
    NotMatched,
    /// Un groupe a matché, mais pas la commande
    PartiallyNotMatched(&'a str),
    /// Le paramètre est inconnu
    UnknownParameter(&'a str),
    /// La valeur du paramètre est absente
    MissingParameterValue(&'a str),
    /// Le paramètre n'accepte qu'une valeur
    RepeatedParameter(&'a str),
    /// La valeur ne correspond pas au type du paramètre
    InvalidValue(&'a str, &'static str),
    /// Chemin attendu
    ExpectedPath(&'a str),
    /// Paramètres requis manquants
    RequiredParameters(String),
}
impl<'a> fmt::Display for ParseError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            ParseError::Empty => f.write_str("Commande vide"),
            ParseError::NotMatched => f.write_str("Commande inconnue"),
            ParseError::PartiallyNotMatched(v)=> write!(f, "Groupe ou commande inconnu {}", v),
            ParseError::UnknownParameter(v) => write!(f, "Paramètre {} inconnu", v),
            ParseError::MissingParameterValue(v) => write!(f, "Valeur du paramètre {} manquant", v),
            ParseError::RepeatedParameter(v) => write!(f, "Paramètre {} répété", v),
            ParseError::InvalidValue(v, t) => write!(f, "Valeur {} invalide, {} attendu", v, t),
            ParseError::RequiredParameters(v) => write!(f, "Paramètre {} requis", v),
            ParseError::ExpectedPath(v) => write!(f, "Groupe ou commande attendu après {}", v),
        }
    }
}
/// Convertit une chaine de caractère en groupe d'arguments
pub fn split_shell<'a>(txt: &'a str) -> Vec<&'a str> {
    let mut mode=false;
    txt.split(|c| {
        match (mode, c) {
            (_, '\"') => {
                mode = !mode;
                true
            }
            (false, ' ') | (false, '\t') => true,
            _ => false
        }
    })
    .filter(|s| !s.is_empty())
    .collect()
}

/// Type de valeur d'un paramètre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Boolean,
    /// Chemin de fichier local
    Path,
}
impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "texte",
            ValueType::Integer => "entier",
            ValueType::Boolean => "booléen",
            ValueType::Path => "fichier",
        }
    }
    fn accepts(&self, value: &str) -> bool {
        match self {
            ValueType::Integer => value.parse::<i64>().is_ok(),
            ValueType::Boolean => matches!(value, "true" | "false" | "si" | "no"),
            ValueType::String | ValueType::Path => true,
        }
    }
}

///Argument de commande
#[derive(Debug, Clone)]
pub struct Argument {
    /// Nom de l'argument
    pub name: String,
    /// Description de l'argument
    pub help: Option<String>,
    /// Type de valeur
    pub value_type: ValueType,
    /// L'argument requis si vrai
    pub required: bool,
    /// L'argument peut être donné plusieurs fois
    pub multiple: bool,
}
impl Named for Argument {
    fn name(&self) -> &str {
        &self.name
    }
}
impl Argument {
    pub fn new<S: Into<String>>(name: S) -> Argument {
        Argument {
            name: name.into(),
            help: None,
            value_type: ValueType::String,
            required: false,
            multiple: false,
        }
    }
    pub fn set_help<S: Into<String>>(mut self, h: S) -> Argument {
        self.help = Some(h.into());
        self
    }
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
    pub fn set_value_type(mut self, vt: ValueType) -> Argument {
        self.value_type = vt;
        self
    }
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
    pub fn set_required(mut self, req: bool) -> Argument {
        self.required = req;
        self
    }
    pub fn required(&self) -> bool {
        self.required
    }
    pub fn set_multiple(mut self, multiple: bool) -> Argument {
        self.multiple = multiple;
        self
    }
}
#[derive(Debug, Clone)]
pub struct Command {
    /// Nom de la commande
    pub name: String,
    /// Nom des arguments sans tiret, si la commande en accepte
    pub arguments: Option<String>,
    /// Description de la commande
    pub help: Option<String>,
    /// Commande utilisable sans session
    pub public: bool,
    /// Liste des paramètres de la commande
    pub params: Vec<Argument>
}
impl Named for Command {
    fn name(&self) -> &str {
        &self.name
    }
}
impl Command {
    pub fn new<S: Into<String>>(name: S) -> Command {
        Command {
            name: name.into(),
            arguments: None,
            public: false,
            help: None,
            params: Vec::new()
        }
    }
    pub fn set_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
    pub fn set_help<S: Into<String>>(mut self, h: S) -> Command {
        self.help = Some(h.into());
        self
    }
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
    pub fn add_param(mut self, param: Argument) -> Command {
        self.params.push(param);
        self
    }
    pub fn params(&self) -> &Vec<Argument> {
        &self.params
    }
    pub fn set_arguments<S: Into<String>>(mut self, arg: S) -> Command {
        self.arguments = Some(arg.into());
        self
    }

    pub fn try_match<'a>(&'a self, args: &[&'a str]) -> Result<matching::Command<'a>, ParseError<'a>> {
        if args.is_empty() {
            return Err(ParseError::Empty);
        }
        if args[0] != self.name {
            return Err(ParseError::NotMatched);
        }
        let mut params: Vec<matching::Parameter> = Vec::new();
        let mut iter_args = args.iter().skip(1).copied();
        let mut arguments: Vec<&str> = Vec::new();
        while let Some(name) = iter_args.next() {
            if !name.starts_with('-') || name.len() == 1 {
                if self.arguments.is_some() {
                    arguments.push(name);
                    continue;
                } else {
                    return Err(ParseError::UnknownParameter(name));
                }
            }
            let def = match self.params.iter().find(|cmdp| cmdp.name == name[1..]) {
                Some(def) => def,
                None => return Err(ParseError::UnknownParameter(name)),
            };
            if !def.multiple && params.iter().any(|p| p.name == def.name) {
                return Err(ParseError::RepeatedParameter(name));
            }
            match iter_args.next() {
                Some(value) if def.value_type.accepts(value) => params.push(matching::Parameter{name: &name[1..], value}),
                Some(value) => return Err(ParseError::InvalidValue(value, def.value_type.as_str())),
                None => return Err(ParseError::MissingParameterValue(name))
            }
        }
        let it_req = self.params.iter().filter(|p| p.required);
        let mut it_req_missing = it_req.filter(|p1| !params.iter().any(|p2| p1.name == p2.name));
        if let Some(param_missing) = it_req_missing.next() {
            return Err(ParseError::RequiredParameters(param_missing.name.clone()));
        }
        Ok(matching::Command{
            path: crate::vdq![args[0]],
            params,
            arguments,
            requires_session: !self.public,
        })
    }
}
#[derive(Debug, Clone)]
pub struct Group {
    /// Nom du groupe
    name: String,
    /// Description du groupe
    help: Option<String>,
    /// Liste des sous groupes et des commandes du groupe
    node: Node
}
impl Group {
    pub fn new<S: Into<String>>(name: S) -> Group {
        Group {
            name: name.into(),
            help: None,
            node: Node::new()
        }
    }
    pub fn add_group(mut self, grp: Group) -> Group {
        self.node.groups.add(grp);
        self
    }
    pub fn groups(&self) -> &Container<Group> {
        &self.node.groups
    }
    pub fn add_command(mut self, cmd: Command) -> Group {
        self.node.commands.add(cmd);
        self
    }
    pub fn commands(&self) -> &Container<Command> {
        &self.node.commands
    }
    pub fn set_help<S: Into<String>>(mut self, h: S) -> Group {
        self.help = Some(h.into());
        self
    }
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
    pub fn node(&self) -> &Node {
        &self.node
    }
    pub fn try_match<'a>(&'a self, args: &[&'a str]) -> Result<matching::Command<'a>, ParseError<'a>> {
        if args.is_empty() {
            return Err(ParseError::Empty);
        }
        if args[0] != self.name {
            return Err(ParseError::NotMatched);
        }
        if args.len() == 1 || args[1].starts_with('-') {
            return Err(ParseError::ExpectedPath(args[0]));
        }
        self.node.try_match(&args[1..])
            .map_err(|e| match e {
                ParseError::NotMatched => ParseError::PartiallyNotMatched(args[1]),
                e => e,
            })
            .map(|mut cmd| {cmd.path.push_front(args[0]); cmd})
    }
}
impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }
}
/// Noeud de l'arbre de commandes
/// Un groupe peut contenir des sous groupes et des commandes, stockées dans ces noeuds.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Liste des commandes
    pub commands: Container<Command>,
    /// Liste des sous groupes
    pub groups: Container<Group>,
}
impl Node {
    pub fn new() -> Node {
        Node {
            commands: Container::new(),
            groups: Container::new()
        }
    }
    pub fn add_group(mut self, grp: Group) -> Node {
        self.groups.add(grp);
        self
    }
    pub fn add_command(mut self, cmd: Command) -> Node {
        self.commands.add(cmd);
        self
    }
    /// Cherche la commande parmi les commandes puis les groupes de ce noeud
    pub fn try_match<'a>(&'a self, args: &[&'a str]) -> Result<matching::Command<'a>, ParseError<'a>> {
        let first = match args.first() {
            Some(first) => *first,
            None => return Err(ParseError::Empty),
        };
        match self.commands.find(first) {
            Some(cmd) => cmd.try_match(args),
            None => match self.groups.find(first) {
                Some(grp) => grp.try_match(args),
                None => Err(ParseError::NotMatched),
            },
        }
    }
}
/// Conteneur de commandes ou de groupes
#[derive(Debug, Clone)]
pub struct Container<T: Named>(Vec<T>);

impl<T: Named> Container<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    /// Les noms doivent être distincts: un doublon est une erreur de déclaration.
    pub fn add(&mut self, value: T) {
        if self.find(value.name()).is_some() {
            panic!("Container values MUST BE name distinct: {}", value.name());
        }
        self.0.push(value);
    }
    pub fn find(&self, name: &str) -> Option<&T> {
        self.0.iter().find(|v| v.name() == name)
    }
    pub fn list(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Named> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}
