mod api;
mod config;
mod console;
mod log;
mod session;
mod store;
mod util;

use std::sync::Arc;

trait ResultLog {
    type OkType;
    fn expect_log(self, msg: &str) -> Self::OkType;
}
impl<T, S: AsRef<str>> ResultLog for Result<T, S> {
    type OkType=T;
    fn expect_log(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) if msg.is_empty() => panic!("{}", e.as_ref()),
            Err(e) => panic!("{}: {}", msg, e.as_ref()),
        }
    }
}
#[cfg(test)]
mod tests;

/// Sans argument, ouvre la console interactive. Sinon, exécute la commande donnée.
///
/// `reqdesk requerimientos list -estado Abierto`
#[tokio::main]
async fn main() {
    let config = config::Config::load().map_err(|e| e.to_string()).expect_log("Could not load the configuration file");
    crate::log::init(config.log_filter()).map_err(|e| e.to_string()).expect_log("Could not install the logger");
    let session = session::Session::open(&config.session_file).map_err(|e| e.to_string()).expect_log("Could not open the session file");
    let api = api::Client::new(&config.base_url, config.request_timeout(), Arc::new(session))
        .map_err(|e| e.to_string())
        .expect_log("Could not build the HTTP client");
    let console = console::Console::new(api.clone(), store::Stores::new(api), config.download_dir.clone());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        console.run_interactive().await.map_err(|e| e.to_string()).expect_log("Console failed");
        return;
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match console.execute_args(&args).await {
        Ok(out) if out.is_empty() => (),
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
