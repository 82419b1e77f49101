//! Built-in path policies.
//!
//! A rule's file must be named by a fully qualified path. What that means
//! depends on the platform, so the check is a capability the host injects
//! rather than something read from global state.

use tracing::warn;

use authz_rule_contracts::error::{RuleError, RuleResult};

use crate::traits::PathPolicy;

/// POSIX: the path must start with `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixPathPolicy;

impl PathPolicy for PosixPathPolicy {
    fn check(&self, path: &str) -> RuleResult<()> {
        if path.starts_with('/') {
            Ok(())
        } else {
            reject(path)
        }
    }
}

/// Windows: a drive path (`C:/...`) or a UNC share (`//server/share...`).
///
/// Only forward slashes are recognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPathPolicy;

impl WindowsPathPolicy {
    fn is_drive_path(path: &str) -> bool {
        let mut chars = path.chars();
        chars.next().is_some() && chars.as_str().starts_with(":/")
    }

    fn is_unc_path(path: &str) -> bool {
        let Some(rest) = path.strip_prefix("//") else {
            return false;
        };
        let mut parts = rest.splitn(3, '/');
        let server = parts.next().unwrap_or_default();
        let share = parts.next().unwrap_or_default();
        !server.is_empty() && !share.is_empty()
    }
}

impl PathPolicy for WindowsPathPolicy {
    fn check(&self, path: &str) -> RuleResult<()> {
        if Self::is_drive_path(path) || Self::is_unc_path(path) {
            Ok(())
        } else {
            reject(path)
        }
    }
}

/// The policy matching the platform this binary was built for.
#[derive(Debug, Clone, Copy)]
pub enum HostPathPolicy {
    Posix(PosixPathPolicy),
    Windows(WindowsPathPolicy),
}

impl HostPathPolicy {
    pub fn detect() -> Self {
        if cfg!(windows) {
            HostPathPolicy::Windows(WindowsPathPolicy)
        } else {
            HostPathPolicy::Posix(PosixPathPolicy)
        }
    }
}

impl PathPolicy for HostPathPolicy {
    fn check(&self, path: &str) -> RuleResult<()> {
        match self {
            HostPathPolicy::Posix(policy) => policy.check(path),
            HostPathPolicy::Windows(policy) => policy.check(path),
        }
    }
}

fn reject(path: &str) -> RuleResult<()> {
    warn!(path, "rule path is not fully qualified");
    Err(RuleError::PathSyntax {
        path: path.to_string(),
    })
}
