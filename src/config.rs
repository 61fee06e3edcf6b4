use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.yaml";
const MAX_RESULTS: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// How many results the CLI prints. 0 prints everything.
    #[serde(default = "max_results")]
    pub max_results: usize,

    /// Command used to open a bookmark; the url is appended as the last argument.
    #[serde(default = "browser_command")]
    pub browser_command: Vec<String>,

    /// Browser profile root holding `profiles.ini`. Defaults to `~/.mozilla/firefox`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_root: Option<PathBuf>,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            browser_command: browser_command(),
            profile_root: None,
            base_path: PathBuf::new(),
        }
    }
}

fn max_results() -> usize {
    MAX_RESULTS
}

fn browser_command() -> Vec<String> {
    vec!["firefox".to_string(), "--new-tab".to_string()]
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if self.browser_command.iter().all(|arg| arg.trim().is_empty()) {
            bail!("browser_command must name a program");
        }
        Ok(())
    }

    pub fn load_with(base_path: &Path) -> anyhow::Result<Self> {
        let config_path = base_path.join(CONFIG_FILE_NAME);

        // create new if does not exist
        if !config_path.exists() {
            std::fs::create_dir_all(base_path)
                .with_context(|| format!("failed to create {}", base_path.display()))?;
            let config = Self {
                base_path: base_path.to_path_buf(),
                ..Default::default()
            };
            config.save()?;
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let mut config: Self = serde_yml::from_str(&config_str)
            .with_context(|| format!("{} is malformed", config_path.display()))?;

        config.base_path = base_path.to_path_buf();
        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = self.base_path.join(CONFIG_FILE_NAME);
        let temp_path = self.base_path.join(format!("{CONFIG_FILE_NAME}-tmp"));

        std::fs::write(&temp_path, serde_yml::to_string(&self)?)?;
        std::fs::rename(&temp_path, &config_path)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(())
    }

    /// The default base directory, `$FOXMARKS_BASE_PATH` or `~/.config/foxmarks`.
    pub fn default_base_path() -> anyhow::Result<PathBuf> {
        if let Some(base_path) = non_empty_var("FOXMARKS_BASE_PATH") {
            return Ok(PathBuf::from(base_path));
        }

        let home = homedir::my_home()
            .context("could not determine home directory")?
            .context("home directory path is empty")?;
        Ok(home.join(".config").join("foxmarks"))
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
