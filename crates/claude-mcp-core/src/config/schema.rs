//! Schema for `claude_desktop_config.json`.
//!
//! Only the parts this tool edits are typed. Everything else is kept as raw
//! JSON so that a load/save cycle re-emits it unchanged:
//! - top-level keys other than `mcpServers` live in [`DesktopConfig::extra`],
//!   and `mcpServers` is written back at the position it was read from
//! - server entries are stored raw and decoded on demand via [`DesktopConfig::server`]
//! - unknown keys inside a decoded entry live in [`ServerEntry::extra`]
//!
//! Numbers keep their source text (`arbitrary_precision`), so integers
//! beyond 64 bits and decimals like `1.10` are not rewritten.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SERVERS_KEY: &str = "mcpServers";

/// Root of the desktop client's configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct DesktopConfig {
    /// Server entries keyed by name, kept as raw JSON
    pub mcp_servers: Map<String, Value>,

    /// Unrecognized top-level keys
    pub extra: Map<String, Value>,

    /// Number of `extra` keys that preceded `mcpServers` in the source file
    servers_position: Option<usize>,
}

impl TryFrom<Map<String, Value>> for DesktopConfig {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let servers_position = map.keys().position(|key| key == SERVERS_KEY);
        let mcp_servers = match map.shift_remove(SERVERS_KEY) {
            Some(Value::Object(servers)) => servers,
            None | Some(Value::Null) => Map::new(),
            Some(other) => {
                return Err(format!("`{SERVERS_KEY}` must be an object, found {other}"));
            }
        };

        Ok(Self {
            mcp_servers,
            extra: map,
            servers_position,
        })
    }
}

impl From<DesktopConfig> for Map<String, Value> {
    fn from(config: DesktopConfig) -> Self {
        let position = config
            .servers_position
            .unwrap_or(0)
            .min(config.extra.len());
        let mut servers = Some(Value::Object(config.mcp_servers));

        let mut map = Map::with_capacity(config.extra.len() + 1);
        for (i, (key, value)) in config.extra.into_iter().enumerate() {
            if i == position
                && let Some(servers) = servers.take()
            {
                map.insert(SERVERS_KEY.to_string(), servers);
            }
            map.insert(key, value);
        }
        if let Some(servers) = servers {
            map.insert(SERVERS_KEY.to_string(), servers);
        }
        map
    }
}

/// A single MCP server launch entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Launcher executable, e.g. `npx`
    #[serde(default)]
    pub command: String,

    /// Launcher arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Unrecognized per-entry keys such as `env`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerEntry {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            extra: Map::new(),
        }
    }
}

impl DesktopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_server(&self, name: &str) -> bool {
        self.mcp_servers.contains_key(name)
    }

    pub fn server_names(&self) -> impl Iterator<Item = &str> {
        self.mcp_servers.keys().map(String::as_str)
    }

    /// Decode a server entry. Returns `Ok(None)` when the entry is absent.
    pub fn server(&self, name: &str) -> Result<Option<ServerEntry>, serde_json::Error> {
        self.mcp_servers
            .get(name)
            .map(|value| ServerEntry::deserialize(value))
            .transpose()
    }

    /// Insert or replace a server entry. An existing entry keeps its position
    /// in the file.
    pub fn set_server(&mut self, name: &str, entry: &ServerEntry) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(entry)?;
        self.mcp_servers.insert(name.to_string(), value);
        Ok(())
    }
}
