use crate::{console::command_parser as cmd, vdq};
use cmd::{matching, split_shell, ParseError};

fn requerimientos() -> cmd::Group {
    cmd::Group::new("requerimientos")
        .set_help("Gestion des tickets")
        .add_command(cmd::Command::new("show")
            .add_param(cmd::Argument::new("codigo").set_required(true))
        )
        .add_command(cmd::Command::new("create")
            .add_param(cmd::Argument::new("tipo")
                .set_help("Un paramètre entier")
                .set_value_type(cmd::ValueType::Integer)
                .set_required(true)
            )
            .add_param(cmd::Argument::new("vincular").set_multiple(true))
        )
}

#[test]
fn command() {
    let cmd = cmd::Command::new("command")
        .set_help("Une commande de test")
        .add_param(
            cmd::Argument::new("param")
                .set_help("Un paramètre")
        );
    assert_eq!(cmd.try_match(&split_shell(r#"command -param "Je suis un parametre" -unknown"#)), Err(ParseError::UnknownParameter("-unknown")));
    assert_eq!(cmd.try_match(&split_shell(r#"command -param"#)), Err(ParseError::MissingParameterValue("-param")));
    assert_eq!(cmd.try_match(&split_shell(r#"command -param "Je suis un parametre""#)), Ok(matching::Command{
        path: vdq!["command"],
        params: vec![ matching::Parameter{ name: "param", value: "Je suis un parametre" } ],
        arguments: vec![],
        requires_session: true,
    }));
}

#[test]
fn group() {
    let grp = requerimientos();
    let args = split_shell("requerimientos create -tipo 1 -vincular INC-2024-0000000001 -vincular INC-2024-0000000002");
    let found = grp.try_match(&args).unwrap();
    assert_eq!(found.path, vdq!["requerimientos", "create"]);
    assert_eq!(found.get_command(), "create");
    assert_eq!(found.get_groups(), vec!["requerimientos"]);
    assert_eq!(found.value("tipo"), Some("1"));
    assert_eq!(found.values("vincular"), vec!["INC-2024-0000000001", "INC-2024-0000000002"]);

    assert_eq!(grp.try_match(&split_shell("requerimientos")), Err(ParseError::ExpectedPath("requerimientos")));
    assert_eq!(grp.try_match(&split_shell("requerimientos purge")), Err(ParseError::PartiallyNotMatched("purge")));
    assert_eq!(grp.try_match(&split_shell("usuarios list")), Err(ParseError::NotMatched));
}

#[test]
fn parameters() {
    let grp = requerimientos();
    assert_eq!(grp.try_match(&split_shell("requerimientos create")), Err(ParseError::RequiredParameters("tipo".to_string())));
    assert_eq!(grp.try_match(&split_shell("requerimientos create -tipo uno")), Err(ParseError::InvalidValue("uno", "entier")));
    assert_eq!(grp.try_match(&split_shell("requerimientos show -codigo A -codigo B")), Err(ParseError::RepeatedParameter("-codigo")));
    assert_eq!(grp.try_match(&split_shell("requerimientos show INC")), Err(ParseError::UnknownParameter("INC")));
}

#[test]
fn console_tree() {
    let tree = crate::console::command_tree();
    let args = split_shell(r#"comentarios create -codigo INC-2024-0000000007 -asunto Visto -descripcion "Lo reviso""#);
    let found = tree.try_match(&args).unwrap();
    assert_eq!(found.path, vdq!["comentarios", "create"]);
    assert!(found.requires_session);
    assert_eq!(found.value("descripcion"), Some("Lo reviso"));

    let login = tree.try_match(&split_shell("login -username agomez -clave x")).unwrap();
    assert!(!login.requires_session);
    let help = tree.try_match(&split_shell("help requerimientos create")).unwrap();
    assert_eq!(help.arguments, vec!["requerimientos", "create"]);
}

#[test]
fn split_shell_keeps_quoted_spaces() {
    let args = split_shell("command  -param \"Je suis un parametre\"\t-autre x");
    assert_eq!(args, vec!["command", "-param", "Je suis un parametre", "-autre", "x"]);
}
