use anyhow::{bail, Context};

pub trait Launcher: Send + Sync {
    fn launch(&self, url: &str) -> anyhow::Result<()>;
}

/// Opens urls with a configured command, e.g. `firefox --new-tab <url>`.
#[derive(Debug, Clone)]
pub struct BrowserLauncher {
    command: Vec<String>,
}

impl BrowserLauncher {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Launcher for BrowserLauncher {
    fn launch(&self, url: &str) -> anyhow::Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            bail!("no browser command configured");
        };

        log::info!("opening {url} with {program}");
        std::process::Command::new(program)
            .args(args)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to start {program}"))?;

        Ok(())
    }
}
