//! Server registry
//!
//! The immutable set of servers the dashboard can address, loaded once at
//! startup.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;

use rcondeck_utils::{DeckError, Result};

/// One configured server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    /// Unique display name
    pub name: String,
    /// RCON address (host:port)
    pub address: String,
    /// RCON password
    pub secret: String,
    /// Container identifier for lifecycle actions
    pub container: Option<String>,
}

impl ServerDescriptor {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        secret: impl Into<String>,
        container: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            secret: secret.into(),
            container: container.filter(|c| !c.is_empty()),
        }
    }

    /// One-line description used when no status message is showing
    pub fn describe(&self) -> String {
        let mut line = format!("Active: {} ({})", self.name, self.address);
        if let Some(container) = &self.container {
            let _ = write!(line, " | Container: {}", container);
        }
        line
    }
}

/// Read-only list of servers in configuration order
#[derive(Debug, Clone)]
pub struct ServerRegistry {
    servers: Vec<Arc<ServerDescriptor>>,
}

impl ServerRegistry {
    /// Build the registry, rejecting an empty list and duplicate names
    pub fn load(servers: Vec<ServerDescriptor>) -> Result<Self> {
        if servers.is_empty() {
            return Err(DeckError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for server in &servers {
            if !seen.insert(server.name.as_str()) {
                return Err(DeckError::config(format!(
                    "duplicate server name '{}'",
                    server.name
                )));
            }
        }

        Ok(Self {
            servers: servers.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<ServerDescriptor>> {
        self.servers.iter().find(|s| s.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<ServerDescriptor>> {
        self.servers.get(index)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ServerDescriptor>> {
        self.servers.iter()
    }

    /// Human-readable listing printed by `--check`
    pub fn summary(&self) -> String {
        let mut out = format!("{} server(s) configured\n", self.len());
        for server in &self.servers {
            let _ = write!(out, "  {:<20} {}", server.name, server.address);
            if let Some(container) = &server.container {
                let _ = write!(out, "  [container: {}]", container);
            }
            out.push('\n');
        }
        out
    }
}
