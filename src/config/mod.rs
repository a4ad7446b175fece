mod schema;

pub use schema::{Config, Settings};

use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::conditions::{parse_condition, Condition};
use crate::rules::Rule;

const CONFIG_ENV_VAR: &str = "RCOND_CONFIG";

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    // ~/.rcond/config.json
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".rcond").join("config.json"))
}

/// resolve the config path: explicit override, then env var, then default location
pub fn get_config_path_with_override(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

/// load the config, falling back to an empty one when the file does not exist
pub fn load_with_override(override_path: Option<&Path>) -> Result<Config> {
    let path = get_config_path_with_override(override_path)?;

    if !path.exists() {
        log::info!("no rule file at {}, using empty config", path.display());
        return Ok(Config::default());
    }

    load_from(&path)
}

/// load a config file (JSON5, plain JSON accepted)
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = json5::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    log::debug!("loaded {} rule(s) from {}", config.rules.len(), path.display());
    Ok(config)
}

pub fn save_with_override(config: &Config, override_path: Option<&Path>) -> Result<PathBuf> {
    let path = get_config_path_with_override(override_path)?;

    // ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(path)
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let json: JsonValue = match json5::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    let rules = match json.get("rules") {
        None => &[][..],
        Some(JsonValue::Array(rules)) => rules.as_slice(),
        Some(_) => {
            errors.push("rules: must be an array".to_string());
            &[][..]
        }
    };

    let mut seen = HashSet::new();

    for (i, rule) in rules.iter().enumerate() {
        let prefix = format!("rules[{}]", i);

        // validate name
        match rule.get("name").and_then(JsonValue::as_str) {
            Some("") => errors.push(format!("{}: 'name' must not be empty", prefix)),
            Some(name) => {
                if !seen.insert(name) {
                    errors.push(format!("{}: duplicate rule name '{}'", prefix, name));
                }
            }
            None => errors.push(format!("{}: missing 'name'", prefix)),
        }

        // validate condition
        match rule.get("when") {
            Some(when) => {
                if let Err(e) = parse_condition(when) {
                    let path = if e.path.is_empty() {
                        format!("{}.when", prefix)
                    } else {
                        format!("{}.when.{}", prefix, e.path)
                    };
                    errors.push(format!("{}: {}", path, e.kind));
                }
            }
            None => errors.push(format!("{}: missing 'when'", prefix)),
        }

        if let Some(category) = rule.get("category") {
            if !category.is_string() {
                errors.push(format!("{}: 'category' must be a string", prefix));
            }
        }
    }

    if let Some(settings) = json.get("settings") {
        if let Err(e) = serde_json::from_value::<Settings>(settings.clone()) {
            errors.push(format!("settings: {}", e));
        }
    }

    Ok(errors)
}

/// generates a config with example rules
pub fn default_with_examples() -> Result<Config> {
    let examples = [
        (
            "groceries",
            r#"{ "placeTypeCategory": "food" }"#,
            Some("groceries"),
        ),
        (
            "large card payment",
            r#"{ "$and": [
                { "amount": [">", 100] },
                { "currency": "EUR" },
                { "$or": [{ "paymentMethod": "DEBIT" }, { "paymentMethod": "CREDIT" }] }
            ] }"#,
            None,
        ),
        (
            "weekend evening",
            r#"{ "$and": [
                { "date": ["weekday", ">=", "sat"] },
                { "time": ["after", "18:00"] }
            ] }"#,
            Some("leisure"),
        ),
        (
            "not a bakery",
            r#"{ "$not": { "header": ["bakery", true] } }"#,
            None,
        ),
    ];

    let mut rules = Vec::new();
    for (name, spec, category) in examples {
        let when = spec
            .parse::<Condition>()
            .with_context(|| format!("invalid example rule '{}'", name))?;
        let mut rule = Rule::new(name, when);
        rule.category = category.map(str::to_string);
        rules.push(rule);
    }

    Ok(Config {
        rules,
        settings: Settings::default(),
    })
}
