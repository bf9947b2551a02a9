use calltime_store::config::{read_config_map, write_config_map};
use calltime_store::{Config, StorePaths};
use clap::Subcommand;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. api_base_url, user_id, year, source)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, paths: &StorePaths) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(paths, &key, &value),
        ConfigCmd::Get { key } => get(paths, &key),
        ConfigCmd::List => list(paths),
    }
}

// ── Command Implementations ──

/// Parse a string value into an appropriate JSON value (bool/number/string).
fn parse_value(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                serde_json::Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                serde_json::Value::String(s.to_string())
            }
        }
    }
}

/// Keys `Config` understands.
fn known_keys() -> Vec<String> {
    match serde_json::to_value(Config::default()) {
        Ok(serde_json::Value::Object(fields)) => fields.into_iter().map(|(k, _)| k).collect(),
        _ => Vec::new(),
    }
}

fn is_valid(map: &serde_json::Map<String, serde_json::Value>) -> bool {
    serde_json::from_value::<Config>(serde_json::Value::Object(map.clone())).is_ok()
}

/// Insert `key`, falling back to a plain string when the inferred type does not fit
/// (e.g. a numeric `user_id`).
fn assign(
    map: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    let known = known_keys();
    if !known.iter().any(|k| k == key) {
        anyhow::bail!("unknown config key '{key}' (expected one of: {})", known.join(", "));
    }
    let previous = map.insert(key.to_string(), parse_value(value));
    if is_valid(map) {
        return Ok(());
    }
    map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    if is_valid(map) {
        return Ok(());
    }
    match previous {
        Some(old) => map.insert(key.to_string(), old),
        None => map.remove(key),
    };
    anyhow::bail!("invalid value for {key}: {value}")
}

/// `calltime config set <key> <value>`
pub fn set(paths: &StorePaths, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = read_config_map(&paths.config_json)?;
    assign(&mut config, key, value)?;
    write_config_map(&paths.config_json, &config)?;
    tracing::info!(key, "config updated");
    println!("{key} = {value}");
    Ok(())
}

/// `calltime config get <key>`
pub fn get(paths: &StorePaths, key: &str) -> anyhow::Result<()> {
    let config = read_config_map(&paths.config_json)?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `calltime config list`
pub fn list(paths: &StorePaths) -> anyhow::Result<()> {
    let config = read_config_map(&paths.config_json)?;
    if config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in &config {
            println!("{k} = {v}");
        }
    }
    Ok(())
}
