mod bill;
mod profile;
mod settings;

pub use bill::{load_bill, BillFile, ItemEntry, LoadedBill, ShopSection};
pub use profile::{NewProfile, ProfileStore, ProfileUpdate, SavedShopProfile};
pub use settings::{Defaults, DeliverySettings, PdfSettings, PrintSettings, Settings};

use crate::error::{BillError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.toml";
pub const PROFILES_FILE: &str = "profiles.toml";
pub const SAMPLE_BILL_FILE: &str = "bill.toml";

/// Get the config directory path (XDG config dir, or ~/.gstbill)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "gstbill") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        BillError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".gstbill"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn load_or_default<T: DeserializeOwned + Default>(path: PathBuf) -> Result<T> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "not found, using defaults");
        return Ok(T::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| BillError::ConfigParse { path, source: e })
}

/// Load config.toml; a missing file means all defaults
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    load_or_default(config_dir.join(CONFIG_FILE))
}

/// Load profiles.toml (empty store if missing)
pub fn load_profiles(config_dir: &Path) -> Result<ProfileStore> {
    let mut store: ProfileStore = load_or_default(config_dir.join(PROFILES_FILE))?;
    store.normalize();
    Ok(store)
}

/// Save profiles.toml
pub fn save_profiles(config_dir: &Path, store: &ProfileStore) -> Result<()> {
    let path = config_dir.join(PROFILES_FILE);
    let content = toml::to_string_pretty(store).map_err(|e| BillError::ConfigWrite {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Create the config directory with template files
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if config_dir.exists() {
        return Err(BillError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    fs::write(config_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    fs::write(config_dir.join(PROFILES_FILE), PROFILES_TEMPLATE)?;
    fs::write(config_dir.join(SAMPLE_BILL_FILE), BILL_TEMPLATE)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[defaults]
template = "classic"   # classic, modern, simple, itemized
theme = "blue"         # blue, green, orange, purple

[pdf]
paper_size = "a4"          # a4, a5, letter
orientation = "portrait"   # portrait, landscape
font_size = "medium"       # small, medium, large
# output_dir = "~/Documents/bills"   # default: <config dir>/output

[delivery]
# Devices matching a mobile user agent get the share sheet
# user_agent = "Mozilla/5.0 (Linux; Android 14)"
# share_command = ["kdeconnect-cli", "--share"]

[print]
# command = ["lp"]        # the printable page path is appended
settle_delay_ms = 250
"#;

/// Template content for profiles.toml
pub const PROFILES_TEMPLATE: &str = r#"# Saved shop profiles. Manage them with:
#
#   gstbill profile add --name "My Shop" --address "..." --gstin "..." --default
#   gstbill profile list
"#;

/// Template content for the sample bill.toml
pub const BILL_TEMPLATE: &str = r#"# Sample bill. Remove [shop] to use your default shop profile,
# or set profile = "<id>" to pick one.

[shop]
name = "Sharma General Store"
address = "12 Station Road, Nagpur 440001"
gstin = "27AAPFU0939F1ZV"

[customer]
name = "Ravi Kumar"
contact = "+91 98765 43210"    # optional
address = "Flat 4B, Civil Lines, Nagpur"   # optional

[[items]]
name = "Basmati Rice 5kg"
quantity = 2
price = 450.00
gst = 5        # one of 0, 5, 12, 18, 28 (default 18)

[[items]]
name = "Sunflower Oil 1L"
quantity = 3
price = 160.00
gst = 5

[[items]]
name = "Detergent Powder 1kg"
quantity = 1
price = 120.00
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_templates_parse() {
        let settings: Settings = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(settings.defaults.theme, "blue");
        let store: ProfileStore = toml::from_str(PROFILES_TEMPLATE).unwrap();
        assert!(store.list().is_empty());
        let bill: BillFile = toml::from_str(BILL_TEMPLATE).unwrap();
        assert_eq!(bill.items.len(), 3);
        assert_eq!(bill.items[2].gst, 18.0);
    }

    #[test]
    fn test_init_then_load() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("cfg");
        init_config_dir(&dir).unwrap();
        assert!(dir.join(SAMPLE_BILL_FILE).exists());
        assert!(load_settings(&dir).is_ok());
        assert!(matches!(
            init_config_dir(&dir),
            Err(BillError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_missing_files_default() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_settings(tmp.path()).unwrap().defaults.template, "classic");
        assert!(load_profiles(tmp.path()).unwrap().list().is_empty());
    }

    #[test]
    fn test_load_profiles_keeps_one_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(PROFILES_FILE),
            r#"
default = "1"

[[profile]]
id = "1"
name = "Sharma General Store"
created_at = "2026-10-15T10:00:00Z"
is_default = true

[[profile]]
id = "2"
name = "Gupta Stores"
created_at = "2026-10-15T10:05:00Z"
is_default = true
"#,
        )
        .unwrap();

        let store = load_profiles(tmp.path()).unwrap();
        let flagged: Vec<_> = store.list().iter().filter(|p| p.is_default).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, "1");
        assert_eq!(store.default_profile().unwrap().id, "1");
    }

    #[test]
    fn test_parse_error_names_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[defaults\n").unwrap();
        let err = load_settings(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/abs/path"), PathBuf::from("/abs/path"));
    }
}
