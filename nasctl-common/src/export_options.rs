//! NFS export option set
//!
//! Options are free-form `/etc/exports` tokens (`rw`, `no_subtree_check`,
//! `anonuid=1000`, ...). A few of them come in mutually exclusive groups:
//! selecting one member of a group replaces whichever member was selected
//! before, like a radio button. Every other token toggles on and off.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mutually exclusive option groups
pub const EXCLUSION_GROUPS: &[&[&str]] = &[
    &["rw", "ro"],
    &["sync", "async"],
    &["root_squash", "no_root_squash", "all_squash"],
];

/// Options the backend applies to a new export
const NFS_DEFAULTS: &[&str] = &["rw", "sync", "no_subtree_check"];

/// The exclusion group `option` belongs to, if any
pub fn group_of(option: &str) -> Option<&'static [&'static str]> {
    EXCLUSION_GROUPS
        .iter()
        .copied()
        .find(|group| group.contains(&option))
}

/// Check one option token and return it trimmed.
///
/// A token is a single `/etc/exports` word: not blank, no commas, no
/// whitespace and no parentheses.
pub fn check_token(option: &str) -> Result<&str> {
    let token = option.trim();
    if token.is_empty()
        || token
            .chars()
            .any(|c| c == ',' || c == '(' || c == ')' || c.is_whitespace())
    {
        return Err(Error::InvalidOption(option.to_string()));
    }
    Ok(token)
}

/// Toggle `option` in `options`, returning the new set.
///
/// Grouped options clear their group and are then inserted, so selecting
/// the option that is already active leaves the set as it was. Ungrouped
/// options are removed when present and appended when absent. Malformed
/// tokens are rejected and `options` is left alone.
pub fn toggle(options: &ExportOptions, option: &str) -> Result<ExportOptions> {
    let option = check_token(option)?;
    let mut tokens = options.0.clone();

    match group_of(option) {
        Some(group) => {
            tokens.retain(|t| !group.contains(&t.as_str()));
            tokens.push(option.to_string());
        }
        None => {
            if let Some(pos) = tokens.iter().position(|t| t == option) {
                tokens.remove(pos);
            } else {
                tokens.push(option.to_string());
            }
        }
    }

    Ok(ExportOptions(tokens))
}

/// Ordered set of export option tokens.
///
/// Order is insertion order and is what gets rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExportOptions(Vec<String>);

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `rw,sync,no_subtree_check`
    pub fn nfs_defaults() -> Self {
        Self::from_tokens(NFS_DEFAULTS.iter().copied())
    }

    /// Build from raw tokens.
    ///
    /// Comma separated entries are split, blank tokens and repeated
    /// ungrouped tokens are dropped. When two members of one group appear,
    /// the later one wins.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<String> = Vec::new();
        for entry in tokens {
            for token in entry.as_ref().split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                match group_of(token) {
                    Some(group) => {
                        set.retain(|t| !group.contains(&t.as_str()));
                        set.push(token.to_string());
                    }
                    None if !set.iter().any(|t| t == token) => set.push(token.to_string()),
                    None => {}
                }
            }
        }
        Self(set)
    }

    /// Parse the comma separated form used inside `client(...)`
    pub fn parse(s: &str) -> Result<Self> {
        for token in s.split(',') {
            if !token.trim().is_empty() {
                check_token(token).map_err(|_| Error::InvalidOption(token.trim().to_string()))?;
            }
        }
        Ok(Self::from_tokens(s.split(',')))
    }

    pub fn toggled(&self, option: &str) -> Result<Self> {
        toggle(self, option)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|t| t == option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every token is well formed and at most one member of every
    /// exclusion group is present
    pub fn is_consistent(&self) -> bool {
        self.0.iter().all(|t| check_token(t) == Ok(t.as_str()))
            && EXCLUSION_GROUPS
                .iter()
                .all(|group| self.0.iter().filter(|t| group.contains(&t.as_str())).count() <= 1)
    }
}

impl From<Vec<String>> for ExportOptions {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<ExportOptions> for Vec<String> {
    fn from(options: ExportOptions) -> Self {
        options.0
    }
}

impl FromStr for ExportOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(tokens: &[&str]) -> ExportOptions {
        ExportOptions::from_tokens(tokens.iter().copied())
    }

    fn sorted(options: &ExportOptions) -> Vec<&str> {
        let mut v: Vec<&str> = options.iter().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_toggle_ro_replaces_rw() {
        let before = opts(&["rw", "sync", "no_subtree_check"]);
        let after = toggle(&before, "ro").unwrap();

        assert_eq!(sorted(&after), vec!["no_subtree_check", "ro", "sync"]);
        assert_eq!(after.to_string(), "sync,no_subtree_check,ro");
        // input untouched
        assert_eq!(before.to_string(), "rw,sync,no_subtree_check");
    }

    #[test]
    fn test_grouped_toggle_leaves_one_member() {
        let start = opts(&["rw", "async", "all_squash", "insecure"]);
        for group in EXCLUSION_GROUPS {
            for option in group.iter() {
                let after = toggle(&start, option).unwrap();
                let present: Vec<&str> = group
                    .iter()
                    .copied()
                    .filter(|member| after.contains(member))
                    .collect();
                assert_eq!(present, vec![*option], "group {:?}", group);
                assert!(after.is_consistent());
                assert!(after.contains("insecure"));
            }
        }
    }

    #[test]
    fn test_selecting_active_exclusive_option_is_noop() {
        let start = opts(&["ro"]);
        let after = toggle(&start, "ro").unwrap();
        assert_eq!(after, start);

        // an exclusive option cannot be switched off by clicking it
        let start = opts(&["sync", "no_subtree_check"]);
        assert!(toggle(&start, "sync").unwrap().contains("sync"));
    }

    #[test]
    fn test_ungrouped_toggle_is_involution() {
        let start = opts(&["rw", "sync", "no_subtree_check"]);
        for option in ["insecure", "no_subtree_check", "crossmnt", "anonuid=1000"] {
            let twice = toggle(&toggle(&start, option).unwrap(), option).unwrap();
            assert_eq!(sorted(&twice), sorted(&start), "option {}", option);
        }
    }

    #[test]
    fn test_ungrouped_toggle_adds_and_removes() {
        let start = opts(&["rw"]);
        let added = start.toggled("insecure").unwrap();
        assert!(added.contains("insecure"));
        let removed = added.toggled("insecure").unwrap();
        assert!(!removed.contains("insecure"));
        assert_eq!(removed, start);
    }

    #[test]
    fn test_group_of() {
        assert_eq!(group_of("ro"), Some(&["rw", "ro"][..]));
        assert_eq!(
            group_of("all_squash"),
            Some(&["root_squash", "no_root_squash", "all_squash"][..])
        );
        assert_eq!(group_of("no_subtree_check"), None);
    }

    #[test]
    fn test_parse_normalizes() {
        let parsed = ExportOptions::parse("rw, sync,,no_subtree_check,ro,sync").unwrap();
        assert_eq!(parsed.to_string(), "no_subtree_check,ro,sync");
        assert!(parsed.is_consistent());
    }

    #[test]
    fn test_parse_rejects_client_syntax() {
        assert_eq!(
            ExportOptions::parse("rw,sync)"),
            Err(Error::InvalidOption("sync)".to_string()))
        );
        assert!("rw no_subtree_check".parse::<ExportOptions>().is_err());
    }

    #[test]
    fn test_defaults() {
        let defaults = ExportOptions::nfs_defaults();
        assert_eq!(defaults.to_string(), "rw,sync,no_subtree_check");
        assert_eq!(defaults.len(), 3);
    }

    #[test]
    fn test_deserialize_collapses_per_client_duplicates() {
        // the backend repeats options once per client
        let json = r#"["rw","sync","no_subtree_check","rw","sync","no_subtree_check"]"#;
        let options: ExportOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.to_string(), "rw,sync,no_subtree_check");

        let back = serde_json::to_string(&options).unwrap();
        assert_eq!(back, r#"["rw","sync","no_subtree_check"]"#);
    }

    #[test]
    fn test_is_consistent_on_raw_vec() {
        let raw = ExportOptions(vec!["rw".to_string(), "ro".to_string()]);
        assert!(!raw.is_consistent());
        assert!(ExportOptions::new().is_consistent());
    }

    #[test]
    fn test_toggle_rejects_malformed_tokens() {
        let defaults = ExportOptions::nfs_defaults();
        for bad in ["ro,async", "ro async", "ro)", "(ro", "", "   ", "rw,ro"] {
            assert_eq!(
                toggle(&defaults, bad),
                Err(Error::InvalidOption(bad.to_string())),
                "token {:?}",
                bad
            );
        }
        assert_eq!(defaults.to_string(), "rw,sync,no_subtree_check");
    }

    #[test]
    fn test_toggle_trims_before_grouping() {
        let after = toggle(&ExportOptions::nfs_defaults(), " ro ").unwrap();
        assert_eq!(after.to_string(), "sync,no_subtree_check,ro");
        assert!(!after.contains("rw"));
    }

    #[test]
    fn test_consistency_matches_rendered_form() {
        let mut options = ExportOptions::nfs_defaults();
        for option in ["ro", "async", "insecure", "no_root_squash", "rw", "insecure"] {
            options = options.toggled(option).unwrap();
            let reparsed = ExportOptions::parse(&options.to_string()).unwrap();
            assert_eq!(reparsed, options);
            assert!(options.is_consistent());
        }

        // a token hiding a comma renders as two grouped tokens
        let raw = ExportOptions(vec!["rw".to_string(), "ro,async".to_string()]);
        assert!(!raw.is_consistent());
        let raw = ExportOptions(vec![" ro".to_string()]);
        assert!(!raw.is_consistent());
    }

    #[test]
    fn test_from_tokens_splits_commas() {
        let options = ExportOptions::from(vec!["rw,sync".to_string(), "ro".to_string()]);
        assert_eq!(options.to_string(), "sync,ro");
        assert!(options.is_consistent());
    }
}
