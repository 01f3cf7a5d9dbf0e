//! Configuration loading for the moviegraph binary.
//!
//! Store settings are read from (later sources win):
//! 1. Defaults
//! 2. Config file (`moviegraph.toml`, `[neo4j]` section)
//! 3. Environment variables (`MOVIEGRAPH__NEO4J__URI`, ...)
//! 4. The driver-conventional `NEO4J_URI`, `NEO4J_USERNAME`, `NEO4J_PASSWORD`

use moviegraph_graph::GraphConfig;

/// Load store settings using `file_prefix` as the config file name.
pub fn load_graph_config(file_prefix: &str) -> Result<GraphConfig, config::ConfigError> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("MOVIEGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut graph_config = match cfg.get::<GraphConfig>("neo4j") {
        Ok(c) => c,
        Err(config::ConfigError::NotFound(_)) => GraphConfig::default(),
        Err(e) => return Err(e),
    };
    apply_driver_env(&mut graph_config, |key| std::env::var(key).ok());
    Ok(graph_config)
}

/// Overlay the `NEO4J_*` variables onto `config`.
pub fn apply_driver_env<F>(config: &mut GraphConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup("NEO4J_URI") {
        config.uri = uri;
    }
    if let Some(user) = lookup("NEO4J_USERNAME") {
        config.user = user;
    }
    if let Some(password) = lookup("NEO4J_PASSWORD") {
        config.password = password;
    }
}
