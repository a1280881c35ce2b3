//! Upload widget configuration and the application settings file.
//!
//! `UploadConfig` is the validated option set a widget is constructed with.
//! `AppConfig` is what the binary loads at startup: logging level, driver
//! timing and the list of upload profiles the host page offers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Size limits are given in megabytes and compared in bytes.
pub const BYTES_PER_MB: u64 = 1_048_576;

pub const DEFAULT_ACCEPTED_FILE_TYPES: &str = ".pdf,.doc,.docx,.ppt,.pptx";
pub const DEFAULT_MAX_FILE_SIZE_MB: f64 = 10.0;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;
pub const DEFAULT_MAX_STEP: f32 = 30.0;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable naming a JSON settings file.
pub const CONFIG_ENV_VAR: &str = "MATERIAL_UPLOADER_CONFIG";

const CONTEXT_FILE_TYPES: [&str; 6] = [".pdf", ".doc", ".docx", ".ppt", ".pptx", ".txt"];
const COURSE_MATERIAL_TYPES: [&str; 7] = [".pdf", ".doc", ".docx", ".ppt", ".pptx", ".txt", ".md"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no accepted file types configured")]
    NoAcceptedTypes,
    #[error("invalid file type entry `{0}`")]
    InvalidExtension(String),
    #[error("maximum file size must be a positive number of megabytes, got {0}")]
    InvalidMaxSize(f64),
    #[error("tick interval must be greater than zero")]
    InvalidTickInterval,
    #[error("progress step must be a positive number, got {0}")]
    InvalidMaxStep(f32),
    #[error("at least one upload profile is required")]
    NoProfiles,
    #[error("profile `{name}` is invalid")]
    Profile {
        name: String,
        #[source]
        source: Box<ConfigError>,
    },
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    accepted_extensions: Vec<String>,
    max_size_mb: f64,
    allow_multiple: bool,
    disabled: bool,
}

impl UploadConfig {
    /// Builds a configuration from an HTML-style accept list such as
    /// `".pdf,.doc,.docx"`.
    pub fn new(
        accepted_file_types: &str,
        max_size_mb: f64,
        allow_multiple: bool,
        disabled: bool,
    ) -> Result<Self, ConfigError> {
        let accepted_extensions = parse_accept_list(accepted_file_types)?;
        if !max_size_mb.is_finite() || max_size_mb <= 0.0 {
            return Err(ConfigError::InvalidMaxSize(max_size_mb));
        }

        Ok(Self {
            accepted_extensions,
            max_size_mb,
            allow_multiple,
            disabled,
        })
    }

    /// Syllabus, references and course documents feeding question generation.
    pub fn context_files() -> Self {
        Self::from_known(&CONTEXT_FILE_TYPES, 50.0, true)
    }

    /// A single study material attached by faculty.
    pub fn course_material() -> Self {
        Self::from_known(&COURSE_MATERIAL_TYPES, 10.0, false)
    }

    fn from_known(extensions: &[&str], max_size_mb: f64, allow_multiple: bool) -> Self {
        Self {
            accepted_extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
            max_size_mb,
            allow_multiple,
            disabled: false,
        }
    }

    pub fn accepted_extensions(&self) -> &[String] {
        &self.accepted_extensions
    }

    /// `extension` must already be normalized (lowercase, leading dot).
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.accepted_extensions.iter().any(|ext| ext == extension)
    }

    pub fn max_size_mb(&self) -> f64 {
        self.max_size_mb
    }

    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * BYTES_PER_MB as f64).floor() as u64
    }

    pub fn allow_multiple(&self) -> bool {
        self.allow_multiple
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Display form, e.g. `PDF, DOC, DOCX`.
    pub fn supported_formats_label(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_uppercase())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Extensions without the leading dot, as the native file dialog wants them.
    pub fn picker_extensions(&self) -> Vec<&str> {
        self.accepted_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.'))
            .collect()
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::from_known(&[".pdf", ".doc", ".docx", ".ppt", ".pptx"], DEFAULT_MAX_FILE_SIZE_MB, true)
    }
}

fn parse_accept_list(accepted_file_types: &str) -> Result<Vec<String>, ConfigError> {
    let mut extensions: Vec<String> = Vec::new();

    for entry in accepted_file_types.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if entry == "." || entry.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidExtension(entry.to_string()));
        }

        let lowered = entry.to_lowercase();
        let normalized = if lowered.starts_with('.') {
            lowered
        } else {
            format!(".{}", lowered)
        };

        if !extensions.contains(&normalized) {
            extensions.push(normalized);
        }
    }

    if extensions.is_empty() {
        return Err(ConfigError::NoAcceptedTypes);
    }
    Ok(extensions)
}

/// One upload profile as written in the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub name: String,
    pub description: String,
    pub accepted_file_types: String,
    pub max_file_size_mb: f64,
    pub multiple: bool,
    pub disabled: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            name: "Upload".to_string(),
            description: String::new(),
            accepted_file_types: DEFAULT_ACCEPTED_FILE_TYPES.to_string(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            multiple: true,
            disabled: false,
        }
    }
}

/// A named widget configuration the host page can switch between.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProfile {
    pub name: String,
    pub description: String,
    pub upload: UploadConfig,
}

impl TryFrom<ProfileSettings> for UploadProfile {
    type Error = ConfigError;

    fn try_from(settings: ProfileSettings) -> Result<Self, Self::Error> {
        let upload = UploadConfig::new(
            &settings.accepted_file_types,
            settings.max_file_size_mb,
            settings.multiple,
            settings.disabled,
        )
        .map_err(|source| ConfigError::Profile {
            name: settings.name.clone(),
            source: Box::new(source),
        })?;

        Ok(Self {
            name: settings.name,
            description: settings.description,
            upload,
        })
    }
}

pub fn default_profiles() -> Vec<UploadProfile> {
    vec![
        UploadProfile {
            name: "RAG Context Files".to_string(),
            description: "Syllabus, reference materials and course documents used for question generation"
                .to_string(),
            upload: UploadConfig::context_files(),
        },
        UploadProfile {
            name: "Course Material".to_string(),
            description: "Lecture notes, references and presentations shared with students".to_string(),
            upload: UploadConfig::course_material(),
        },
    ]
}

/// Settings file layout. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub log_level: Option<String>,
    pub tick_interval_ms: Option<u64>,
    pub max_step: Option<f32>,
    pub profiles: Option<Vec<ProfileSettings>>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub tick_interval: Duration,
    pub max_step: f32,
    pub profiles: Vec<UploadProfile>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            max_step: DEFAULT_MAX_STEP,
            profiles: default_profiles(),
        }
    }
}

impl AppConfig {
    pub fn from_settings(settings: AppSettings) -> Result<Self, ConfigError> {
        let tick_interval_ms = settings.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS);
        if tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }

        let max_step = settings.max_step.unwrap_or(DEFAULT_MAX_STEP);
        if !max_step.is_finite() || max_step <= 0.0 {
            return Err(ConfigError::InvalidMaxStep(max_step));
        }

        let profiles = match settings.profiles {
            Some(profiles) => {
                if profiles.is_empty() {
                    return Err(ConfigError::NoProfiles);
                }
                profiles
                    .into_iter()
                    .map(UploadProfile::try_from)
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => default_profiles(),
        };

        Ok(Self {
            log_level: settings
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            tick_interval: Duration::from_millis(tick_interval_ms),
            max_step,
            profiles,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: AppSettings = serde_json::from_str(json)?;
        Self::from_settings(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
