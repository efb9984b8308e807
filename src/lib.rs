/*!
Front end for the "Aduni Vallejo" administration tool.

Everything heavyweight (credential checks, spreadsheet parsing, ranking
computation) lives behind a remote HTTP API; this crate only composes
role-gated views and shuttles form submissions to that API.
*/

pub mod api;
pub mod catalog;
pub mod config;
pub mod inter;
pub mod leaderboard;
pub mod panel;
pub mod session;
pub mod user;

pub fn log_level_from_env() -> simplelog::LevelFilter {
    use simplelog::LevelFilter;

    let mut level_string = match std::env::var("LOG_LEVEL") {
        Err(_) => { return LevelFilter::Warn; },
        Ok(s) => s,
    };

    level_string.make_ascii_lowercase();
    match level_string.as_str() {
        "max" => LevelFilter::max(),
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn ensure_logging() {
        use simplelog::{ColorChoice, TermLogger, TerminalMode};
        let log_cfg = simplelog::ConfigBuilder::new()
            .add_filter_allow_str("aduni")
            .build();
        let res = TermLogger::init(
            log_level_from_env(),
            log_cfg,
            TerminalMode::Stdout,
            ColorChoice::Auto
        );

        match res {
            Ok(_) => { log::info!("Test logging started."); },
            Err(_) => { log::info!("Test logging already started."); },
        }
    }
}
