/*!
Structs to hold configuration data and global variables.
*/
use std::net::SocketAddr;
use std::path::Path;

use handlebars::Handlebars;
use serde::Deserialize;

use crate::api::ApiClient;

#[derive(Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug)]
pub struct Cfg {
    pub api_base_url: String,
    pub addr: SocketAddr,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/api".to_owned(),
            addr: SocketAddr::new(
                "0.0.0.0".parse().unwrap(),
                8080
            ),
        }
    }
}

impl Cfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file: {}", &e))?;
        let cf: ConfigFile = toml::from_str(&file_contents)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.api_base_url {
            c.api_base_url = s;
        }
        if let Some(s) = cf.host {
            c.addr.set_ip(
                s.parse().map_err(|e| format!(
                    "Error parsing {:?} as IP address: {}",
                    &s, &e
                ))?
            );
        }
        if let Some(n) = cf.port {
            c.addr.set_port(n);
        }

        Ok(c)
    }
}

/**
This guy will haul around some global variables and be passed in an
`axum::Extension` to the handlers who need him.

Nothing in here is mutable after startup; the only per-user state is the
session cookie.
*/
#[derive(Debug)]
pub struct Glob {
    pub api: ApiClient,
    pub templates: Handlebars<'static>,
    pub addr: SocketAddr,
}

/// Loads system configuration and registers the view templates. A missing
/// config file isn't fatal; the defaults point at a local API instance.
pub fn load_configuration<P: AsRef<Path>>(path: P) -> Result<Glob, String> {
    let path = path.as_ref();
    let cfg = if path.exists() {
        Cfg::from_file(path)?
    } else {
        log::warn!(
            "Config file {} not found; using default configuration.",
            path.display()
        );
        Cfg::default()
    };
    log::info!("Configuration:\n{:#?}", &cfg);

    let mut templates = Handlebars::new();
    #[cfg(debug_assertions)]
    templates.set_dev_mode(true);
    templates.register_templates_directory(".html", "templates/")
        .map_err(|e| format!("Error registering template directory: {}", &e))?;

    let glob = Glob {
        api: ApiClient::new(&cfg.api_base_url),
        templates,
        addr: cfg.addr,
    };

    Ok(glob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn file_values_override_defaults() {
        ensure_logging();

        let dir = std::env::temp_dir();
        let path = dir.join("aduni_cfg_test.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://api.aduni.example/api/\"\nport = 9090\n"
        ).unwrap();

        let cfg = Cfg::from_file(&path).unwrap();
        assert_eq!(cfg.api_base_url, "https://api.aduni.example/api/");
        assert_eq!(cfg.addr.port(), 9090);
        // Unset fields keep their defaults.
        assert_eq!(cfg.addr.ip().to_string(), "0.0.0.0");

        std::fs::remove_file(&path).unwrap();
    }
}
