//! NFS exports and Samba shares

use crate::de::{empty_as_none, null_as_default};
use crate::export_options::ExportOptions;
use serde::{Deserialize, Serialize};

/// An NFS export. `path` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfsExport {
    pub path: String,
    /// IP, CIDR, hostname or `*`
    #[serde(default, deserialize_with = "null_as_default")]
    pub clients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: ExportOptions,
}

impl NfsExport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            clients: Vec::new(),
            options: ExportOptions::nfs_defaults(),
        }
    }

    pub fn read_only(&self) -> bool {
        self.options.contains("ro")
    }

    /// The `/etc/exports` line for this export
    pub fn export_line(&self) -> String {
        let mut line = self.path.clone();
        let opts = self.options.to_string();

        let clients: Vec<&str> = if self.clients.is_empty() {
            vec!["*"]
        } else {
            self.clients.iter().map(String::as_str).collect()
        };

        for client in clients {
            line.push(' ');
            line.push_str(client);
            if !opts.is_empty() {
                line.push('(');
                line.push_str(&opts);
                line.push(')');
            }
        }

        line
    }
}

/// Body of `POST /syslib/nfs/exports`
#[derive(Debug, Clone, Serialize)]
pub struct CreateNfsExportRequest {
    pub path: String,
    pub clients: Vec<String>,
    pub options: Vec<String>,
    pub read_only: bool,
    pub sync: bool,
    pub no_root_squash: bool,
    pub subtree: bool,
}

impl From<&NfsExport> for CreateNfsExportRequest {
    fn from(export: &NfsExport) -> Self {
        let options = &export.options;
        Self {
            path: export.path.clone(),
            clients: export.clients.clone(),
            options: options.as_slice().to_vec(),
            read_only: options.contains("ro"),
            sync: !options.contains("async"),
            no_root_squash: options.contains("no_root_squash"),
            subtree: options.contains("subtree_check"),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A Samba share section. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SambaShare {
    pub name: String,
    pub path: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid_users: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid_groups: Vec<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_true")]
    pub browseable: bool,
    #[serde(default)]
    pub guest_ok: bool,
    #[serde(default)]
    pub recycle_bin: bool,
}

impl SambaShare {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            comment: None,
            valid_users: Vec::new(),
            valid_groups: Vec::new(),
            read_only: false,
            browseable: true,
            guest_ok: false,
            recycle_bin: false,
        }
    }

    /// Users followed by `@group` entries, blanks skipped
    pub fn valid_user_entries(&self) -> Vec<String> {
        let users = self
            .valid_users
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let groups = self
            .valid_groups
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(|g| format!("@{}", g));
        users.chain(groups).collect()
    }

    /// The `smb.conf` section for this share
    pub fn smb_section(&self) -> String {
        let mut section = String::new();

        section.push_str(&format!("[{}]\n", self.name));
        section.push_str(&format!("   path = {}\n", self.path));

        if let Some(ref comment) = self.comment {
            section.push_str(&format!("   comment = {}\n", comment));
        }

        section.push_str(&format!("   browseable = {}\n", yes_no(self.browseable)));
        section.push_str(&format!("   read only = {}\n", yes_no(self.read_only)));
        section.push_str(&format!("   guest ok = {}\n", yes_no(self.guest_ok)));

        let entries = self.valid_user_entries();
        if !entries.is_empty() {
            section.push_str(&format!("   valid users = {}\n", entries.join(" ")));
        }

        if self.recycle_bin {
            section.push_str("   vfs objects = recycle\n");
            section.push_str("   recycle:repository = .recycle\n");
            section.push_str("   recycle:keeptree = yes\n");
            section.push_str("   recycle:versions = yes\n");
        }

        section
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Samba or NFS daemon state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_line_per_client() {
        let export = NfsExport {
            path: "/srv/media".to_string(),
            clients: vec!["192.168.1.0/24".to_string(), "backup.lan".to_string()],
            options: ExportOptions::nfs_defaults(),
        };

        assert_eq!(
            export.export_line(),
            "/srv/media 192.168.1.0/24(rw,sync,no_subtree_check) backup.lan(rw,sync,no_subtree_check)"
        );
    }

    #[test]
    fn test_export_line_without_clients_uses_wildcard() {
        let mut export = NfsExport::new("/srv/public");
        export.options = export.options.toggled("ro").unwrap();
        assert_eq!(export.export_line(), "/srv/public *(sync,no_subtree_check,ro)");
        assert!(export.read_only());
    }

    #[test]
    fn test_export_line_without_options() {
        let export = NfsExport {
            path: "/srv/x".to_string(),
            clients: vec!["host".to_string()],
            options: ExportOptions::new(),
        };
        assert_eq!(export.export_line(), "/srv/x host");
    }

    #[test]
    fn test_create_request_flags_follow_options() {
        let mut export = NfsExport::new("/srv/data");
        export.options = export
            .options
            .toggled("ro")
            .and_then(|o| o.toggled("async"))
            .and_then(|o| o.toggled("no_root_squash"))
            .unwrap();

        let req = CreateNfsExportRequest::from(&export);
        assert!(req.read_only);
        assert!(!req.sync);
        assert!(req.no_root_squash);
        assert!(!req.subtree);
        assert_eq!(req.options, vec!["no_subtree_check", "ro", "async", "no_root_squash"]);
    }

    #[test]
    fn test_nfs_export_from_backend_json() {
        let json = r#"{
            "path": "/srv/media",
            "clients": ["10.0.0.0/8"],
            "options": ["ro","sync","no_subtree_check"],
            "read_only": true,
            "sync": true,
            "no_root_squash": false,
            "subtree": false
        }"#;
        let export: NfsExport = serde_json::from_str(json).unwrap();
        assert_eq!(export.clients, vec!["10.0.0.0/8"]);
        assert!(export.read_only());
    }

    #[test]
    fn test_smb_section() {
        let mut share = SambaShare::new("media", "/srv/media");
        share.comment = Some("Family media".to_string());
        share.valid_users = vec!["alice".to_string(), " ".to_string(), "bob".to_string()];
        share.valid_groups = vec!["staff".to_string()];

        let expected = "[media]\n\
                        \x20  path = /srv/media\n\
                        \x20  comment = Family media\n\
                        \x20  browseable = yes\n\
                        \x20  read only = no\n\
                        \x20  guest ok = no\n\
                        \x20  valid users = alice bob @staff\n";
        assert_eq!(share.smb_section(), expected);
    }

    #[test]
    fn test_smb_section_recycle_bin() {
        let mut share = SambaShare::new("scratch", "/srv/scratch");
        share.recycle_bin = true;
        share.read_only = true;

        let section = share.smb_section();
        assert!(!section.contains("comment"));
        assert!(!section.contains("valid users"));
        assert!(section.contains("   read only = yes\n"));
        assert!(section.ends_with("   recycle:versions = yes\n"));
    }

    #[test]
    fn test_samba_share_defaults_when_fields_missing() {
        let share: SambaShare =
            serde_json::from_str(r#"{"name":"x","path":"/x"}"#).unwrap();
        assert!(share.browseable);
        assert!(!share.read_only);
        assert!(!share.guest_ok);
    }
}
