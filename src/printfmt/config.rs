use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PRINT_STYLE: &str = "Standard";

/// Configuration for printfmt, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintConfig {
    /// Export standard print formats to the app tree when they change
    #[serde(default)]
    pub developer_mode: bool,

    /// Stylesheet used when a request names none and no stored default exists
    #[serde(default = "default_print_style")]
    pub print_style: String,

    /// Root of the module tree holding `print_format/<name>/<name>.html` files
    #[serde(default = "default_app_root")]
    pub app_root: PathBuf,

    /// Directories searched for named templates before the built-ins
    #[serde(default = "default_template_dirs")]
    pub template_dirs: Vec<PathBuf>,
}

fn default_print_style() -> String {
    DEFAULT_PRINT_STYLE.to_string()
}

fn default_app_root() -> PathBuf {
    PathBuf::from("apps")
}

fn default_template_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("templates")]
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            developer_mode: false,
            print_style: default_print_style(),
            app_root: default_app_root(),
            template_dirs: default_template_dirs(),
        }
    }
}

impl PrintConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: PrintConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Resolve relative paths against `base` (usually the home directory)
    pub fn resolve_paths<P: AsRef<Path>>(mut self, base: P) -> Self {
        let base = base.as_ref();
        if self.app_root.is_relative() {
            self.app_root = base.join(&self.app_root);
        }
        self.template_dirs = self
            .template_dirs
            .into_iter()
            .map(|dir| if dir.is_relative() { base.join(dir) } else { dir })
            .collect();
        self
    }

    pub fn with_developer_mode(mut self, enabled: bool) -> Self {
        self.developer_mode = enabled;
        self
    }

    pub fn with_app_root<P: Into<PathBuf>>(mut self, app_root: P) -> Self {
        self.app_root = app_root.into();
        self
    }
}
