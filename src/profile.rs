use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use anyhow::{Result, anyhow};

/// The one persisted record in the app. Written wholesale on login and on
/// every profile save; removed on logout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
}

impl UserProfile {
    /// First name for greetings ("Alex Morgan" -> "Alex").
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Parse an age entered as free text. Junk input becomes `None` so a bad
/// edit can never corrupt the stored profile.
pub fn parse_age(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(Self {
            dir: config_dir.join("healthguard"),
        })
    }

    /// Store rooted at an arbitrary directory (used by tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("profile.json")
    }

    /// Load the stored profile, if any. Unreadable or malformed files are
    /// treated as absent so a corrupt record only costs a fresh login.
    pub fn load(&self) -> Option<UserProfile> {
        let content = fs::read_to_string(self.path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(profile)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_profile() -> UserProfile {
        UserProfile {
            id: "123".to_string(),
            name: "Alex Morgan".to_string(),
            email: "a@b.com".to_string(),
            avatar_seed: Some("123".to_string()),
            age: Some(34),
            blood_type: Some("O+".to_string()),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::with_dir(tmp.path());

        let profile = sample_profile();
        store.save(&profile).unwrap();

        // Fresh store over the same directory simulates an app reload.
        let reloaded = ProfileStore::with_dir(tmp.path());
        assert_eq!(reloaded.load(), Some(profile));
    }

    #[test]
    fn load_missing_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::with_dir(tmp.path());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn load_malformed_returns_none() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("profile.json"), "{not json").unwrap();
        let store = ProfileStore::with_dir(tmp.path());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_removes_profile() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::with_dir(tmp.path());
        store.save(&sample_profile()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        // Clearing again is fine
        store.clear().unwrap();
    }

    #[test]
    fn age_parses_numbers_only() {
        assert_eq!(parse_age("34"), Some(34));
        assert_eq!(parse_age(" 34 "), Some(34));
        assert_eq!(parse_age("invalid"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("-3"), None);
        assert_eq!(parse_age("3.5"), None);
    }

    #[test]
    fn first_name_splits_full_name() {
        let mut profile = sample_profile();
        assert_eq!(profile.first_name(), "Alex");
        profile.name = "Cher".to_string();
        assert_eq!(profile.first_name(), "Cher");
    }
}
