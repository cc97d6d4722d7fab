//! Explicit app session: authenticated flag plus the user profile.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MarketError;
use crate::store::KeyValueStore;

/// Storage key holding the serialized profile.
pub const PROFILE_KEY: &str = "userProfile";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmInfo {
    pub name: String,
    #[serde(default)]
    pub reg: String,
    /// Free-text crop list, e.g. `Ginger, Cocoa`.
    #[serde(default)]
    pub crops: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub farm: FarmInfo,
}

/// Lives as long as the app. Views query it instead of global flags.
pub struct Session {
    authenticated: bool,
    profile: Option<UserProfile>,
    store: Rc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Session {
            authenticated: false,
            profile: None,
            store,
        }
    }

    /// Authenticate and load the stored profile.
    ///
    /// With nothing usable stored, `fallback` becomes the profile and is
    /// written back so the next login finds it.
    pub fn login(&mut self, fallback: UserProfile) {
        let profile = match self.load_profile() {
            Some(profile) => profile,
            None => {
                if let Err(e) = self.write_profile(&fallback) {
                    warn!("could not persist profile: {}", e);
                }
                fallback
            }
        };
        info!(user = %profile.name, "logged in");
        self.profile = Some(profile);
        self.authenticated = true;
    }

    /// Drop authentication. The stored profile is kept for the next login.
    pub fn logout(&mut self) {
        if self.authenticated {
            info!("logged out");
        }
        self.authenticated = false;
        self.profile = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Replace and persist the profile.
    pub fn save_profile(&mut self, profile: UserProfile) -> Result<(), MarketError> {
        self.write_profile(&profile)?;
        self.profile = Some(profile);
        Ok(())
    }

    fn load_profile(&self) -> Option<UserProfile> {
        let bytes = match self.store.get(PROFILE_KEY) {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!("profile storage unreadable: {}", e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("ignoring malformed stored profile: {}", e);
                None
            }
        }
    }

    fn write_profile(&self, profile: &UserProfile) -> Result<(), MarketError> {
        let bytes = serde_json::to_vec(profile).map_err(|source| MarketError::Encode {
            what: "user profile",
            source,
        })?;
        self.store.set(PROFILE_KEY, &bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.authenticated)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            title: "Farmer".to_string(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn login_persists_fallback_on_first_run() {
        let mem = MemoryStore::new();
        let mut session = Session::new(Rc::new(mem.clone()));
        assert!(!session.is_authenticated());

        session.login(profile("AJAYI OLALEKAN"));
        assert!(session.is_authenticated());
        assert_eq!(session.profile().unwrap().name, "AJAYI OLALEKAN");
        assert_eq!(mem.write_count(), 1);
    }

    #[test]
    fn stored_profile_wins_over_fallback() {
        let mem = MemoryStore::new();
        let mut session = Session::new(Rc::new(mem.clone()));
        session.save_profile(profile("Stored")).unwrap();

        session.login(profile("Fallback"));
        assert_eq!(session.profile().unwrap().name, "Stored");
    }

    #[test]
    fn corrupt_profile_falls_back() {
        let mem = MemoryStore::new();
        mem.insert_raw(PROFILE_KEY, "not json");
        let mut session = Session::new(Rc::new(mem));
        session.login(profile("Fallback"));
        assert_eq!(session.profile().unwrap().name, "Fallback");
    }

    #[test]
    fn logout_clears_state() {
        let mut session = Session::new(Rc::new(MemoryStore::new()));
        session.login(profile("A"));
        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.profile().is_none());
    }
}
