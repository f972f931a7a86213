//! Gas Town convoy context.
//!
//! A convoy run exports its identity through `GT_*` environment variables.
//! This module reads them and formats the report used by `gtsh convoy info`.

use serde::{Deserialize, Serialize};

pub const ENV_CONVOY_ID: &str = "GT_CONVOY_ID";
pub const ENV_RIG: &str = "GT_RIG";
pub const ENV_ROLE: &str = "GT_ROLE";
pub const ENV_WORK_DIR: &str = "GT_WORK_DIR";
pub const ENV_AGENT: &str = "GT_AGENT";

/// Convoy identity as seen from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoyContext {
    pub convoy_id: Option<String>,
    pub rig: Option<String>,
    pub role: Option<String>,
    pub work_dir: Option<String>,
    pub agent: Option<String>,
}

impl ConvoyContext {
    /// Reads the convoy context from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the convoy context through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            convoy_id: lookup(ENV_CONVOY_ID),
            rig: lookup(ENV_RIG),
            role: lookup(ENV_ROLE),
            work_dir: lookup(ENV_WORK_DIR),
            agent: lookup(ENV_AGENT),
        }
    }

    /// True when running inside a convoy (a convoy id or a rig is set).
    pub fn is_in_convoy(&self) -> bool {
        self.convoy_id.is_some() || self.rig.is_some()
    }

    /// Human-readable report lines.
    pub fn report_lines(&self) -> Vec<String> {
        if !self.is_in_convoy() {
            return vec![
                "Not running within a Gas Town convoy.".to_string(),
                String::new(),
                "To use convoy features, run via Gas Town:".to_string(),
                "  gt convoy create <name>".to_string(),
                "  gt sling <bead-id> <rig>".to_string(),
            ];
        }

        let mut lines = vec!["Convoy Information:".to_string(), String::new()];
        let fields = [
            ("Convoy ID:", &self.convoy_id),
            ("Rig:", &self.rig),
            ("Role:", &self.role),
            ("Agent:", &self.agent),
            ("Work Dir:", &self.work_dir),
        ];
        for (label, value) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                lines.push(format!("  {label:<10} {value}"));
            }
        }
        lines
    }

    /// One-line summary for the interactive banner, if in a convoy.
    pub fn banner(&self) -> Option<String> {
        if !self.is_in_convoy() {
            return None;
        }
        let mut parts = Vec::new();
        if let Some(id) = &self.convoy_id {
            parts.push(format!("convoy {id}"));
        }
        if let Some(rig) = &self.rig {
            parts.push(format!("rig {rig}"));
        }
        if let Some(role) = &self.role {
            parts.push(format!("role {role}"));
        }
        Some(parts.join(" · "))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn context_from(pairs: &[(&str, &str)]) -> ConvoyContext {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConvoyContext::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_is_not_in_convoy() {
        let ctx = context_from(&[]);
        assert!(!ctx.is_in_convoy());
        assert_eq!(ctx.report_lines()[0], "Not running within a Gas Town convoy.");
        assert!(ctx.banner().is_none());
    }

    #[test]
    fn test_rig_alone_counts_as_convoy() {
        let ctx = context_from(&[(ENV_RIG, "alpha")]);
        assert!(ctx.is_in_convoy());
    }

    #[test]
    fn test_role_alone_is_not_a_convoy() {
        let ctx = context_from(&[(ENV_ROLE, "polecat")]);
        assert!(!ctx.is_in_convoy());
    }

    #[test]
    fn test_report_lists_only_set_fields() {
        let ctx = context_from(&[(ENV_CONVOY_ID, "cv-42"), (ENV_AGENT, "kimi")]);
        let lines = ctx.report_lines();

        assert_eq!(lines[0], "Convoy Information:");
        assert!(lines.contains(&"  Convoy ID: cv-42".to_string()));
        assert!(lines.contains(&"  Agent:     kimi".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Rig:")));
    }

    #[test]
    fn test_json_has_all_keys() {
        let ctx = context_from(&[(ENV_CONVOY_ID, "cv-1")]);
        let json = serde_json::to_value(&ctx).unwrap();

        assert_eq!(json["convoy_id"], "cv-1");
        for key in ["rig", "role", "work_dir", "agent"] {
            assert!(json[key].is_null(), "{key} should be null");
        }
    }

    #[test]
    fn test_banner_joins_identity() {
        let ctx = context_from(&[(ENV_CONVOY_ID, "cv-7"), (ENV_RIG, "beta")]);
        assert_eq!(ctx.banner().as_deref(), Some("convoy cv-7 · rig beta"));
    }
}
