use log::{Record, Metadata, LevelFilter, SetLoggerError};
#[macro_use]
pub mod macros {
    #[doc(alias = "log::error")]
    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => {
            ::log::error!(target:"reqdesk", $($arg)*)
        };
    }
    #[doc(alias = "log::warn")]
    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => {
            ::log::warn!(target:"reqdesk", $($arg)*)
        };
    }
    #[doc(alias = "log::info")]
    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => {
            ::log::info!(target:"reqdesk", $($arg)*)
        };
    }
}

/// Logger sur la sortie d'erreur.
///
/// Ne garde que les messages de l'application et de `reqdesk_core`, pas ceux de reqwest ou hyper.
struct SimpleLogger;

fn is_own_target(target: &str) -> bool {
    target == "reqdesk" || target.starts_with("reqdesk_core") || target.starts_with("reqdesk::")
}

impl log::Log for SimpleLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && is_own_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }
    #[inline]
    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger;

/// Niveau par défaut: tout en debug, les avertissements en release.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {LevelFilter::Trace} else {LevelFilter::Warn}
}

pub fn init(level: Option<LevelFilter>) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)
        .map(|_| log::set_max_level(level.unwrap_or_else(default_level)))
}
