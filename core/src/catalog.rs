//! Catalog of pre-registered remote Lit tools
//!
//! Agent wallet tools are Lit Actions pinned to IPFS. Each tool is published
//! per Lit network, so a lookup needs both the logical tool name and the
//! network.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Logical name of the ERC-20 transfer tool
pub const ERC20_TRANSFER_TOOL: &str = "ERC20Transfer";

/// A remote program registered on a Lit network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTool {
    /// Logical tool name
    pub name: String,
    /// Lit network the program is published for
    pub network: String,
    /// IPFS CID of the Lit Action code
    pub ipfs_cid: String,
    /// Human readable description
    #[serde(default)]
    pub description: Option<String>,
}

impl RemoteTool {
    /// Create a tool entry without description
    pub fn new(
        name: impl Into<String>,
        network: impl Into<String>,
        ipfs_cid: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            network: network.into(),
            ipfs_cid: ipfs_cid.into(),
            description: None,
        }
    }
}

/// Lookup table of remote tools
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<RemoteTool>,
}

impl ToolCatalog {
    /// Build a catalog from configured entries
    pub fn new(tools: Vec<RemoteTool>) -> Self {
        Self { tools }
    }

    /// Find a tool by name on a network
    pub fn get_tool_by_name(&self, name: &str, network: &str) -> Option<&RemoteTool> {
        self.tools
            .iter()
            .find(|tool| tool.name == name && tool.network == network)
    }

    /// Find a tool or fail with a validation error
    pub fn require(&self, name: &str, network: &str) -> Result<&RemoteTool> {
        self.get_tool_by_name(name, network)
            .ok_or_else(|| Error::ToolNotFound {
                name: name.to_string(),
                network: network.to_string(),
            })
    }

    /// Distinct tool names across all networks, sorted
    pub fn available_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|tool| tool.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}
