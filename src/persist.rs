//! Session state kept between runs: interface language and the signed-in
//! user. Lists, loading flags and errors are never written here.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::Language;
use crate::permissions::Capabilities;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Snapshot of the user a token was issued to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub token: String,
    pub user: AuthUser,
}

/// Everything that survives a restart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub auth: Option<AuthSnapshot>,
}

impl PersistedState {
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    /// What the persisted user may do; nothing when signed out.
    pub fn capabilities(&self) -> Capabilities {
        self.auth
            .as_ref()
            .map(|auth| Capabilities::from(&auth.user))
            .unwrap_or_default()
    }

    pub fn sign_out(&mut self) {
        self.auth = None;
    }
}

impl From<&AuthUser> for Capabilities {
    fn from(user: &AuthUser) -> Self {
        Capabilities::new(user.is_super_admin, user.permissions.iter().cloned())
    }
}

/// JSON file holding a [`PersistedState`].
#[derive(Clone, Debug)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored state; a missing file yields the defaults and keys
    /// the state does not know are ignored.
    pub fn load(&self) -> PersistResult<PersistedState> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No state file at {}", self.path.display());
                Ok(PersistedState::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Writes `state`, creating parent directories as needed.
    pub fn save(&self, state: &PersistedState) -> PersistResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, text)?;
        log::debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Loads, applies `change` and saves.
    pub fn update(&self, change: impl FnOnce(&mut PersistedState)) -> PersistResult<PersistedState> {
        let mut state = self.load()?;
        change(&mut state);
        self.save(&state)?;
        Ok(state)
    }
}
