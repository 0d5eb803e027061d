use super::Directories;
use crate::Result;
use crate::overlay::{CommitPolicy, Easing, OverlayMetrics};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub appearance: AppearanceConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    /// Ordered index descriptors, kept raw so each one can be validated with
    /// its position. Hosts may read extra keys (such as `display`) from them.
    #[serde(default)]
    pub indices: Vec<Value>,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write the default config to `dirs.config_file` unless a file is
    /// already there. Returns whether a file was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created or the
    /// file cannot be written.
    pub fn init(dirs: &Directories) -> Result<bool> {
        dirs.ensure_exists()?;
        if dirs.config_file.exists() {
            return Ok(false);
        }

        Self::default().save(&dirs.config_file)?;
        tracing::info!("Wrote default config to {}", dirs.config_file.display());
        Ok(true)
    }
}

/// Where searches go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum BackendConfig {
    /// In-process fuzzy search over a JSON dataset
    Local {
        /// Defaults to `dataset.json` in the config directory
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dataset: Option<PathBuf>,

        /// Simulated latency per batch
        #[serde(default)]
        latency_ms: u64,
    },
    /// Hosted Algolia application
    Algolia { app_id: String, api_key: String },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Local {
            dataset: None,
            latency_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_cancel_text")]
    pub cancel_text: String,

    #[serde(default = "default_cancel_button_color")]
    pub cancel_button_color: String,

    #[serde(default = "default_results_background")]
    pub results_background: String,

    #[serde(default)]
    pub input_style: InputStyle,

    #[serde(default)]
    pub container_style: ContainerStyle,

    /// Trailing spacer under the results, in host units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_height: Option<f32>,

    /// Label shown beside the input while the overlay is closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_component: Option<String>,

    /// Section title template, `{title}` is replaced by the descriptor title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_results_text: Option<String>,
}

fn default_placeholder() -> String {
    "Search".to_string()
}
fn default_cancel_text() -> String {
    "Cancel".to_string()
}
fn default_cancel_button_color() -> String {
    "#4E595D".to_string()
}
fn default_results_background() -> String {
    "#FFFFFF".to_string()
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            cancel_text: default_cancel_text(),
            cancel_button_color: default_cancel_button_color(),
            results_background: default_results_background(),
            input_style: InputStyle::default(),
            container_style: ContainerStyle::default(),
            footer_height: None,
            side_component: None,
            title_format: None,
            no_results_text: None,
        }
    }
}

/// Hex color overrides for the input box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

/// Hex color overrides for the bar holding the input and cancel control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    #[serde(default = "default_surface_ms")]
    pub surface_ms: u64,

    #[serde(default = "default_cancel_step_ms")]
    pub cancel_step_ms: u64,

    /// Revealed width of the cancel control. Hosts may size it to the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_width: Option<f32>,

    #[serde(default)]
    pub easing: Easing,

    #[serde(default)]
    pub commit: CommitPolicy,
}

fn default_surface_ms() -> u64 {
    500
}
fn default_cancel_step_ms() -> u64 {
    200
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            surface_ms: default_surface_ms(),
            cancel_step_ms: default_cancel_step_ms(),
            cancel_width: None,
            easing: Easing::default(),
            commit: CommitPolicy::default(),
        }
    }
}

impl AnimationConfig {
    /// Overlay metrics with these timings. Geometry not set here keeps the
    /// defaults.
    #[must_use]
    pub fn to_metrics(&self) -> OverlayMetrics {
        let defaults = OverlayMetrics::default();
        OverlayMetrics {
            surface_duration: Duration::from_millis(self.surface_ms),
            cancel_step_duration: Duration::from_millis(self.cancel_step_ms),
            cancel_width: self.cancel_width.unwrap_or(defaults.cancel_width),
            easing: self.easing,
            commit: self.commit,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, BackendConfig::default());
        assert_eq!(config.appearance.placeholder, "Search");
        assert_eq!(config.appearance.cancel_text, "Cancel");
        assert_eq!(config.appearance.cancel_button_color, "#4E595D");
        assert_eq!(config.animation.surface_ms, 500);
        assert!(config.indices.is_empty());
    }

    #[test]
    fn test_config_load_nonexistent_returns_default() {
        let config = Config::load(Path::new("/nonexistent/path/config.json")).unwrap();
        assert_eq!(config.appearance.cancel_text, "Cancel");
    }

    #[test]
    fn test_config_load_valid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"appearance": {"placeholder": "Find posts"}, "indices": [{"index": "posts", "title": "Posts"}]}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.appearance.placeholder, "Find posts");
        assert_eq!(config.appearance.cancel_text, "Cancel");
        assert_eq!(config.indices.len(), 1);
    }

    #[test]
    fn test_config_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "not valid json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = Config::default();
        config.appearance.side_component = Some("Filters".to_string());
        config.animation.commit = CommitPolicy::OnSettle;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.appearance.side_component.as_deref(), Some("Filters"));
        assert_eq!(loaded.animation.commit, CommitPolicy::OnSettle);
    }

    #[test]
    fn test_backend_local_deserialize() {
        let backend: BackendConfig =
            serde_json::from_value(json!({"kind": "local", "dataset": "/srv/data.json", "latencyMs": 250}))
                .unwrap();
        assert_eq!(
            backend,
            BackendConfig::Local {
                dataset: Some(PathBuf::from("/srv/data.json")),
                latency_ms: 250,
            }
        );
    }

    #[test]
    fn test_backend_algolia_deserialize() {
        let backend: BackendConfig =
            serde_json::from_value(json!({"kind": "algolia", "appId": "APP", "apiKey": "KEY"}))
                .unwrap();
        assert_eq!(
            backend,
            BackendConfig::Algolia {
                app_id: "APP".to_string(),
                api_key: "KEY".to_string(),
            }
        );
    }

    #[test]
    fn test_backend_algolia_requires_credentials() {
        let result = serde_json::from_value::<BackendConfig>(json!({"kind": "algolia"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_animation_to_metrics() {
        let animation: AnimationConfig = serde_json::from_value(json!({
            "surfaceMs": 300,
            "cancelWidth": 8.0,
            "easing": "linear",
            "commit": "onSettle"
        }))
        .unwrap();

        let metrics = animation.to_metrics();
        assert_eq!(metrics.surface_duration, Duration::from_millis(300));
        assert_eq!(metrics.cancel_step_duration, Duration::from_millis(200));
        assert!((metrics.cancel_width - 8.0).abs() < f32::EPSILON);
        assert_eq!(metrics.easing, Easing::Linear);
        assert_eq!(metrics.commit, CommitPolicy::OnSettle);
        assert!((metrics.input_bar_height - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_input_style_deserialize() {
        let appearance: AppearanceConfig = serde_json::from_value(json!({
            "inputStyle": {"fg": "#000000", "border": "#FF0000"},
            "containerStyle": {"bg": "#EEEEEE"}
        }))
        .unwrap();
        assert_eq!(appearance.input_style.fg.as_deref(), Some("#000000"));
        assert_eq!(appearance.input_style.bg, None);
        assert_eq!(appearance.container_style.bg.as_deref(), Some("#EEEEEE"));
    }

    #[test]
    fn test_config_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.animation, AnimationConfig::default());
        assert_eq!(config.appearance, AppearanceConfig::default());
    }
}
