mod schema;

pub use schema::{Config, FilterConfig, PathsConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/note-ingest/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("note-ingest"))
}

/// Get the default config file path (~/.config/note-ingest/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/note-ingest/config.yaml) when it exists and built-in defaults otherwise
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => match get_config_path() {
            Some(default) if default.exists() => default,
            _ => return Ok(Config::default()),
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_full_config_parse() {
        let file = write_config(
            r#"
paths:
  notes: data/notes.tsv
  output: out/scored.tsv
filters:
  filter_not_misleading_notes: false
  log_filter_stats: false
scoring:
  min_ratings_per_note: 3
"#,
        );
        let config = load_config(Some(file.path().to_path_buf())).unwrap();

        let paths = config.paths();
        assert_eq!(paths.notes, Some(PathBuf::from("data/notes.tsv")));
        assert_eq!(paths.output, Some(PathBuf::from("out/scored.tsv")));
        assert!(paths.ratings.is_none());

        let filters = config.filters();
        assert_eq!(filters.filter_not_misleading_notes, Some(false));
        assert!(filters.not_misleading_ui_launch_millis.is_none());

        assert_eq!(config.scoring().min_rating_counts().per_note, 3);
        assert_eq!(config.scoring().min_rating_counts().per_rater, 10);
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let config = Config::default();
        assert_eq!(config.filters(), FilterConfig::default());
        assert_eq!(config.paths(), PathsConfig::default());
        assert_eq!(config.scoring().min_ratings_per_note, Some(5));
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(dir.path().join("absent.yaml")));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let file = write_config("queries: []\n");
        assert!(load_config(Some(file.path().to_path_buf())).is_err());
    }
}
