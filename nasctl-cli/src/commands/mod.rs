//! Command handlers, one module per subcommand group

pub mod accounts;
pub mod auth;
pub mod backup;
pub mod nfs;
pub mod services;
pub mod smb;
pub mod storage;
pub mod syslib;
pub mod system;
pub mod tasks;

use crate::output::OutputFormat;
use anyhow::{anyhow, bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use nasctl_console::{
    ApiClient, Collection, Editable, FormDialog, ListPanel, NasApi, SubmitOutcome,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Everything a handler needs
pub struct Context {
    pub client: Arc<ApiClient>,
    pub api: NasApi,
    pub format: OutputFormat,
    /// Skip confirmation prompts
    pub assume_yes: bool,
}

impl Context {
    pub fn new(client: Arc<ApiClient>, format: OutputFormat, assume_yes: bool) -> Self {
        let api = NasApi::new(client.clone());
        Self {
            client,
            api,
            format,
            assume_yes,
        }
    }

    /// Ask before a destructive action
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    /// Run `fut` behind a spinner on table output
    pub async fn with_spinner<T, F>(&self, message: &str, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        if self.format.is_machine() {
            return fut.await;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = fut.await;
        spinner.finish_and_clear();
        result
    }

    /// Mount a panel for `service`, failing with the panel's message
    pub async fn mount<C: Collection>(&self, service: C) -> Result<ListPanel<C>> {
        let mut panel = ListPanel::new(Arc::new(service));
        let loaded = self
            .with_spinner(&format!("Loading {}...", C::NAME.replace('_', " ")), panel.mount())
            .await;
        if !loaded {
            bail!(panel_error(&panel));
        }
        Ok(panel)
    }
}

pub fn panel_error<C: Collection>(panel: &ListPanel<C>) -> String {
    panel
        .error()
        .unwrap_or("Request failed")
        .to_string()
}

/// Submit an open dialog, mapping every non-saved outcome to an error
pub async fn submit<S: Editable>(
    dialog: &mut FormDialog<S>,
    panel: &mut ListPanel<S>,
) -> Result<()> {
    match dialog.submit(panel).await {
        SubmitOutcome::Saved => Ok(()),
        SubmitOutcome::Invalid(message) | SubmitOutcome::Rejected(message) => {
            Err(anyhow!(message))
        }
        SubmitOutcome::NotOpen => Err(anyhow!("No form is open")),
    }
}

/// Look up an item the panel already holds
pub fn require_item<'a, C: Collection>(panel: &'a ListPanel<C>, key: &C::Key) -> Result<&'a C::Item> {
    panel
        .find(key)
        .ok_or_else(|| anyhow!("{} '{}' not found", singular(C::NAME), key))
}

/// `nfs_exports` -> `nfs export`
fn singular(name: &str) -> String {
    let spaced = name.replace('_', " ");
    spaced.strip_suffix('s').unwrap_or(&spaced).to_string()
}

/// Split `a,b, c` into trimmed, non-empty parts
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("nfs_exports"), "nfs export");
        assert_eq!(singular("users"), "user");
    }
}
