use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::RosterError;

/// Display name used for anyone not on the roster.
pub const DEFAULT_DISGUISE_NAME: &str = "Civilian";

/// Icon used for anyone not on the roster.
pub const DEFAULT_DISGUISE_ICON: &str = "http://i.imgur.com/CyIgnqi.png";

/// One record of the roster file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub username: String,
    #[serde(rename = "assassin_name")]
    pub disguise_name: String,
    pub icon_url: String,
}

/// The identity a relayed message is posted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disguise {
    pub name: String,
    pub icon_url: String,
}

impl Disguise {
    fn civilian() -> Self {
        Self {
            name: DEFAULT_DISGUISE_NAME.to_string(),
            icon_url: DEFAULT_DISGUISE_ICON.to_string(),
        }
    }
}

/// Immutable username -> disguise mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct Roster {
    disguises: HashMap<String, Disguise>,
    civilian: Disguise,
}

impl Roster {
    /// Read a JSON array of roster entries from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<RosterEntry> =
            serde_json::from_str(&raw).map_err(|source| RosterError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let roster = Self::from_entries(entries)?;
        info!(path = %path.display(), entries = roster.len(), "Loaded roster");
        Ok(roster)
    }

    /// Build a roster from parsed entries. Usernames must be non-empty and unique.
    pub fn from_entries(
        entries: impl IntoIterator<Item = RosterEntry>,
    ) -> Result<Self, RosterError> {
        let mut disguises = HashMap::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if entry.username.trim().is_empty() {
                return Err(RosterError::BlankUsername { index });
            }
            debug!(username = %entry.username, "Roster entry");
            match disguises.entry(entry.username) {
                Entry::Occupied(occupied) => {
                    return Err(RosterError::DuplicateUsername(occupied.key().clone()));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(Disguise {
                        name: entry.disguise_name,
                        icon_url: entry.icon_url,
                    });
                }
            }
        }

        Ok(Self {
            disguises,
            civilian: Disguise::civilian(),
        })
    }

    /// Disguise for `username`, or the Civilian disguise if they are not listed.
    pub fn resolve(&self, username: &str) -> &Disguise {
        self.disguises.get(username).unwrap_or(&self.civilian)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.disguises.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.disguises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disguises.is_empty()
    }
}
