//! Create/edit dialogs for shares, exports and other editable records
//!
//! A dialog holds a draft while it is open. Submitting sends the whole
//! draft; on success the dialog closes and the owning panel refreshes once.
//! On failure the server's message is kept inline and the dialog stays open.

use crate::error::{ConsoleError, Result};
use crate::panels::{Collection, ListPanel};
use async_trait::async_trait;
use nasctl_common::sharing::CreateNfsExportRequest;
use nasctl_common::{ExportOptions, NfsExport, SambaShare};
use std::sync::Arc;
use tracing::{debug, warn};

/// A collection whose items can be created and edited from a form
#[async_trait]
pub trait Editable: Collection {
    type Draft: Default + Clone + Send + Sync;

    fn draft_from(item: &Self::Item) -> Self::Draft;

    /// Presence checks only; the backend owns every other rule
    fn validate(draft: &Self::Draft) -> std::result::Result<(), String>;

    async fn create(&self, draft: &Self::Draft) -> Result<()>;

    async fn update(&self, key: &Self::Key, draft: &Self::Draft) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<K> {
    Create,
    Edit(K),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Local presence check failed, nothing was sent
    Invalid(String),
    /// The backend refused; carries its message
    Rejected(String),
    NotOpen,
}

pub struct FormDialog<S: Editable> {
    service: Arc<S>,
    mode: Option<FormMode<S::Key>>,
    draft: S::Draft,
    error: Option<String>,
    submitting: bool,
}

impl<S: Editable> FormDialog<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            mode: None,
            draft: S::Draft::default(),
            error: None,
            submitting: false,
        }
    }

    /// Open the dialog, seeding the draft from `initial` or from defaults
    pub fn open(&mut self, mode: FormMode<S::Key>, initial: Option<&S::Item>) {
        self.draft = initial.map(S::draft_from).unwrap_or_default();
        self.error = None;
        self.submitting = false;
        self.mode = Some(mode);
    }

    pub fn open_create(&mut self) {
        self.open(FormMode::Create, None);
    }

    pub fn open_edit(&mut self, item: &S::Item) {
        self.open(FormMode::Edit(S::key_of(item)), Some(item));
    }

    /// Discard the draft and close
    pub fn cancel(&mut self) {
        self.mode = None;
        self.draft = S::Draft::default();
        self.error = None;
        self.submitting = false;
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<&FormMode<S::Key>> {
        self.mode.as_ref()
    }

    pub fn draft(&self) -> &S::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut S::Draft {
        &mut self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Send the draft. Concurrent submits are not guarded against.
    pub async fn submit(&mut self, panel: &mut ListPanel<S>) -> SubmitOutcome {
        let mode = match self.mode.clone() {
            Some(mode) => mode,
            None => return SubmitOutcome::NotOpen,
        };

        if let Err(message) = S::validate(&self.draft) {
            self.error = Some(message.clone());
            return SubmitOutcome::Invalid(message);
        }

        self.submitting = true;
        self.error = None;
        let result = match mode {
            FormMode::Create => self.service.create(&self.draft).await,
            FormMode::Edit(ref key) => self.service.update(key, &self.draft).await,
        };
        self.submitting = false;

        match result {
            Ok(()) => {
                debug!(collection = S::NAME, "Form saved");
                self.cancel();
                panel.refresh().await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                let message = err.user_message();
                warn!(collection = S::NAME, error = %message, "Form submit rejected");
                if let ConsoleError::Removed(_) = err {
                    // the edited record is gone; the draft can only be created now
                    self.mode = Some(FormMode::Create);
                    panel.refresh().await;
                }
                self.error = Some(message.clone());
                SubmitOutcome::Rejected(message)
            }
        }
    }
}

pub(crate) fn require(value: &str, message: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

fn remove_value(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|v| v != value);
    list.len() != before
}

/// NFS export being edited
#[derive(Debug, Clone, PartialEq)]
pub struct NfsDraft {
    pub path: String,
    pub clients: Vec<String>,
    pub options: ExportOptions,
}

impl Default for NfsDraft {
    fn default() -> Self {
        Self {
            path: String::new(),
            clients: Vec::new(),
            options: ExportOptions::nfs_defaults(),
        }
    }
}

impl NfsDraft {
    /// Returns false for blanks and duplicates
    pub fn add_client(&mut self, client: &str) -> bool {
        push_unique(&mut self.clients, client)
    }

    pub fn remove_client(&mut self, client: &str) -> bool {
        remove_value(&mut self.clients, client)
    }

    /// Malformed tokens leave the options untouched
    pub fn toggle_option(&mut self, option: &str) -> std::result::Result<(), String> {
        self.options = self.options.toggled(option).map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        require(&self.path, "Path is required")?;
        if self.clients.is_empty() {
            return Err("At least one client is required".to_string());
        }
        if !self.options.is_consistent() {
            return Err(format!("Conflicting export options: {}", self.options));
        }
        Ok(())
    }

    pub fn to_export(&self) -> NfsExport {
        NfsExport {
            path: self.path.trim().to_string(),
            clients: self.clients.clone(),
            options: self.options.clone(),
        }
    }

    pub fn request(&self) -> CreateNfsExportRequest {
        CreateNfsExportRequest::from(&self.to_export())
    }
}

impl From<&NfsExport> for NfsDraft {
    fn from(export: &NfsExport) -> Self {
        Self {
            path: export.path.clone(),
            clients: export.clients.clone(),
            options: export.options.clone(),
        }
    }
}

/// Samba share being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SambaDraft {
    pub name: String,
    pub path: String,
    pub comment: String,
    pub valid_users: Vec<String>,
    pub valid_groups: Vec<String>,
    pub read_only: bool,
    pub browseable: bool,
    pub guest_ok: bool,
    pub recycle_bin: bool,
}

impl Default for SambaDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            comment: String::new(),
            valid_users: Vec::new(),
            valid_groups: Vec::new(),
            read_only: false,
            browseable: true,
            guest_ok: false,
            recycle_bin: false,
        }
    }
}

impl SambaDraft {
    pub fn add_user(&mut self, user: &str) -> bool {
        push_unique(&mut self.valid_users, user)
    }

    pub fn remove_user(&mut self, user: &str) -> bool {
        remove_value(&mut self.valid_users, user)
    }

    pub fn add_group(&mut self, group: &str) -> bool {
        push_unique(&mut self.valid_groups, group.trim_start_matches('@'))
    }

    pub fn remove_group(&mut self, group: &str) -> bool {
        remove_value(&mut self.valid_groups, group.trim_start_matches('@'))
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        require(&self.name, "Share name is required")?;
        require(&self.path, "Path is required")
    }

    pub fn to_share(&self) -> SambaShare {
        let comment = self.comment.trim();
        SambaShare {
            name: self.name.trim().to_string(),
            path: self.path.trim().to_string(),
            comment: (!comment.is_empty()).then(|| comment.to_string()),
            valid_users: self.valid_users.clone(),
            valid_groups: self.valid_groups.clone(),
            read_only: self.read_only,
            browseable: self.browseable,
            guest_ok: self.guest_ok,
            recycle_bin: self.recycle_bin,
        }
    }
}

impl From<&SambaShare> for SambaDraft {
    fn from(share: &SambaShare) -> Self {
        Self {
            name: share.name.clone(),
            path: share.path.clone(),
            comment: share.comment.clone().unwrap_or_default(),
            valid_users: share.valid_users.clone(),
            valid_groups: share.valid_groups.clone(),
            read_only: share.read_only,
            browseable: share.browseable,
            guest_ok: share.guest_ok,
            recycle_bin: share.recycle_bin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfs_draft_defaults() {
        let draft = NfsDraft::default();
        assert!(draft.path.is_empty());
        assert!(draft.clients.is_empty());
        assert_eq!(draft.options.to_string(), "rw,sync,no_subtree_check");
    }

    #[test]
    fn test_nfs_draft_clients() {
        let mut draft = NfsDraft::default();
        assert!(draft.add_client("192.168.1.0/24"));
        assert!(!draft.add_client(" 192.168.1.0/24 "));
        assert!(!draft.add_client("  "));
        assert!(draft.add_client("*.lan"));
        assert_eq!(draft.clients, vec!["192.168.1.0/24", "*.lan"]);

        assert!(draft.remove_client("*.lan"));
        assert!(!draft.remove_client("*.lan"));
    }

    #[test]
    fn test_nfs_draft_validation() {
        let mut draft = NfsDraft::default();
        assert_eq!(draft.validate(), Err("Path is required".to_string()));

        draft.path = "/srv/media".to_string();
        assert_eq!(draft.validate(), Err("At least one client is required".to_string()));

        draft.add_client("10.0.0.0/8");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_nfs_draft_toggle_and_request() {
        let mut draft = NfsDraft {
            path: "/srv/media ".to_string(),
            ..Default::default()
        };
        draft.add_client("host");
        draft.toggle_option("ro").unwrap();
        draft.toggle_option("ro").unwrap();

        let req = draft.request();
        assert_eq!(req.path, "/srv/media");
        assert!(req.read_only);
        assert_eq!(req.options, vec!["sync", "no_subtree_check", "ro"]);
    }

    #[test]
    fn test_nfs_draft_rejects_malformed_option() {
        let mut draft = NfsDraft {
            path: "/srv/media".to_string(),
            clients: vec!["host".to_string()],
            ..Default::default()
        };
        assert!(draft.toggle_option("ro,async").is_err());
        assert!(draft.toggle_option(" ro").is_ok());
        assert_eq!(draft.options.to_string(), "sync,no_subtree_check,ro");
        assert!(draft.validate().is_ok());

        draft.options = ExportOptions::from(vec!["rw".to_string(), "ro x".to_string()]);
        assert_eq!(
            draft.validate(),
            Err("Conflicting export options: rw,ro x".to_string())
        );
    }

    #[test]
    fn test_samba_draft_defaults() {
        let draft = SambaDraft::default();
        assert!(draft.browseable);
        assert!(!draft.read_only);
        assert!(!draft.guest_ok);
        assert!(draft.valid_users.is_empty());
        assert_eq!(draft.validate(), Err("Share name is required".to_string()));
    }

    #[test]
    fn test_samba_draft_lists() {
        let mut draft = SambaDraft::default();
        assert!(draft.add_user("alice"));
        assert!(!draft.add_user("alice"));
        assert!(draft.add_group("@staff"));
        assert!(!draft.add_group("staff"));
        assert!(draft.remove_group("@staff"));
        assert!(draft.valid_groups.is_empty());
        assert!(draft.remove_user("alice"));
    }

    #[test]
    fn test_samba_draft_round_trip_through_share() {
        let mut share = SambaShare::new("media", "/srv/media");
        share.comment = Some("Family".to_string());
        share.guest_ok = true;

        let mut draft = SambaDraft::from(&share);
        assert_eq!(draft.to_share(), share);

        draft.comment = "   ".to_string();
        assert_eq!(draft.to_share().comment, None);
    }
}
