use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub items: ItemsConfig,
    #[serde(default)]
    pub moves: MovesConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. `0` waits forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("dex-index/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ItemsConfig {
    #[serde(default = "default_id_start")]
    pub id_start: u32,
    #[serde(default = "default_item_id_end")]
    pub id_end: u32,
    #[serde(default = "default_item_generations")]
    pub target_generations: Vec<String>,
    #[serde(default = "default_item_flavor_groups")]
    pub flavor_version_groups: Vec<String>,
    #[serde(default = "default_version_group")]
    pub machine_version_group: String,
    #[serde(default = "default_held_version")]
    pub held_version: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_item_output")]
    pub output: PathBuf,
    #[serde(default = "default_persist_every")]
    pub persist_every: usize,
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            id_start: default_id_start(),
            id_end: default_item_id_end(),
            target_generations: default_item_generations(),
            flavor_version_groups: default_item_flavor_groups(),
            machine_version_group: default_version_group(),
            held_version: default_held_version(),
            language: default_language(),
            output: default_item_output(),
            persist_every: default_persist_every(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MovesConfig {
    #[serde(default = "default_id_start")]
    pub id_start: u32,
    #[serde(default = "default_move_id_end")]
    pub id_end: u32,
    #[serde(default = "default_move_generations")]
    pub target_generations: Vec<String>,
    #[serde(default = "default_move_flavor_groups")]
    pub flavor_version_groups: Vec<String>,
    #[serde(default = "default_version_group")]
    pub machine_version_group: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_move_output")]
    pub output: PathBuf,
    #[serde(default = "default_persist_every")]
    pub persist_every: usize,
}

impl Default for MovesConfig {
    fn default() -> Self {
        Self {
            id_start: default_id_start(),
            id_end: default_move_id_end(),
            target_generations: default_move_generations(),
            flavor_version_groups: default_move_flavor_groups(),
            machine_version_group: default_version_group(),
            language: default_language(),
            output: default_move_output(),
            persist_every: default_persist_every(),
        }
    }
}

fn default_id_start() -> u32 {
    1
}
fn default_item_id_end() -> u32 {
    569
}
fn default_move_id_end() -> u32 {
    825
}
fn default_item_generations() -> Vec<String> {
    vec!["generation-iii".to_string()]
}
fn default_move_generations() -> Vec<String> {
    vec![
        "generation-i".to_string(),
        "generation-ii".to_string(),
        "generation-iii".to_string(),
    ]
}
fn default_item_flavor_groups() -> Vec<String> {
    vec![
        "ruby-sapphire".to_string(),
        "emerald".to_string(),
        "firered-leafgreen".to_string(),
    ]
}
fn default_move_flavor_groups() -> Vec<String> {
    vec!["ruby-sapphire".to_string(), "emerald".to_string()]
}
fn default_version_group() -> String {
    "ruby-sapphire".to_string()
}
fn default_held_version() -> String {
    "ruby".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_item_output() -> PathBuf {
    PathBuf::from("item_index.json")
}
fn default_move_output() -> PathBuf {
    PathBuf::from("move_index.json")
}
fn default_persist_every() -> usize {
    1
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    let base = &config.source.base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("source.base_url must start with http:// or https://, got '{}'", base);
    }

    validate_pipeline(
        "items",
        config.items.id_start,
        config.items.id_end,
        &config.items.target_generations,
        &config.items.flavor_version_groups,
        config.items.persist_every,
    )?;
    validate_pipeline(
        "moves",
        config.moves.id_start,
        config.moves.id_end,
        &config.moves.target_generations,
        &config.moves.flavor_version_groups,
        config.moves.persist_every,
    )?;

    Ok(())
}

fn validate_pipeline(
    section: &str,
    id_start: u32,
    id_end: u32,
    generations: &[String],
    flavor_groups: &[String],
    persist_every: usize,
) -> Result<()> {
    if id_start == 0 {
        anyhow::bail!("{}.id_start must be >= 1", section);
    }
    if id_start > id_end {
        anyhow::bail!(
            "{}.id_start ({}) must be <= {}.id_end ({})",
            section,
            id_start,
            section,
            id_end
        );
    }
    if generations.is_empty() {
        anyhow::bail!("{}.target_generations must not be empty", section);
    }
    if flavor_groups.is_empty() {
        anyhow::bail!("{}.flavor_version_groups must not be empty", section);
    }
    if persist_every == 0 {
        anyhow::bail!("{}.persist_every must be >= 1", section);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_str)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.source.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.items.id_end, 569);
        assert_eq!(config.moves.id_end, 825);
        assert_eq!(config.items.target_generations, vec!["generation-iii"]);
        assert_eq!(config.moves.target_generations.len(), 3);
        assert_eq!(config.items.flavor_version_groups[0], "ruby-sapphire");
        assert_eq!(config.items.held_version, "ruby");
        assert_eq!(config.moves.output, PathBuf::from("move_index.json"));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = parse(
            r#"
[items]
id_start = 300
id_end = 310
output = "out/items.json"
"#,
        )
        .unwrap();
        assert_eq!(config.items.id_start, 300);
        assert_eq!(config.items.output, PathBuf::from("out/items.json"));
        assert_eq!(config.items.machine_version_group, "ruby-sapphire");
        assert_eq!(config.moves.id_start, 1);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = parse("[moves]\nid_start = 10\nid_end = 2\n").unwrap_err();
        assert!(err.to_string().contains("moves.id_start"));
    }

    #[test]
    fn rejects_empty_generations() {
        let err = parse("[items]\ntarget_generations = []\n").unwrap_err();
        assert!(err.to_string().contains("target_generations"));
    }

    #[test]
    fn rejects_zero_persist_every() {
        assert!(parse("[items]\npersist_every = 0\n").is_err());
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(parse("[source]\nbase_url = \"ftp://pokeapi.co\"\n").is_err());
    }

    #[test]
    fn minimal_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::minimal()).unwrap();
        let back = parse(&text).unwrap();
        assert_eq!(back.items.id_end, 569);
    }
}
