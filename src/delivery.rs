//! Handing a finished PDF to the user: a direct save on desktop, a share
//! sheet with a saved-file fallback on mobile-class clients.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::error::Result;
use crate::pdf::PdfFile;

const MOBILE_MARKERS: [&str; 7] = [
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

pub const SHARE_TITLE: &str = "Invoice PDF";
pub const SHARE_TEXT: &str = "Generated invoice from gstbill";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Desktop,
    Mobile,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }
}

/// How a file ended up with the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Saved(PathBuf),
    Shared(PathBuf),
}

impl Delivered {
    pub fn path(&self) -> &Path {
        match self {
            Delivered::Saved(p) | Delivered::Shared(p) => p,
        }
    }
}

pub trait Deliver {
    fn deliver(&self, file: &PdfFile) -> Result<Delivered>;
}

/// Writes the PDF into a directory.
#[derive(Debug, Clone)]
pub struct DirectDownload {
    dir: PathBuf,
}

impl DirectDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn save(&self, file: &PdfFile) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(&file.filename);
        let partial = self.dir.join(format!("{}.part", file.filename));

        if let Err(e) = fs::write(&partial, &file.bytes).and_then(|_| fs::rename(&partial, &target)) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        tracing::info!(path = %target.display(), "saved pdf");
        Ok(target)
    }
}

impl Deliver for DirectDownload {
    fn deliver(&self, file: &PdfFile) -> Result<Delivered> {
        self.save(file).map(Delivered::Saved)
    }
}

#[derive(Error, Debug)]
pub enum ShareError {
    /// No share mechanism on this platform
    #[error("sharing unavailable")]
    Unavailable,
    /// The user dismissed the share sheet
    #[error("share declined")]
    Declined,
    #[error("share failed: {0}")]
    Failed(String),
}

/// A native share sheet that accepts a file attachment.
pub trait ShareSheet {
    fn share(&self, file: &Path, title: &str, text: &str) -> std::result::Result<(), ShareError>;
}

/// Shares by running an external program with the file path appended,
/// e.g. `kdeconnect-cli --share`.
#[derive(Debug, Clone, Default)]
pub struct CommandShare {
    command: Vec<String>,
}

impl CommandShare {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl ShareSheet for CommandShare {
    fn share(&self, file: &Path, _title: &str, _text: &str) -> std::result::Result<(), ShareError> {
        let (program, args) = self.command.split_first().ok_or(ShareError::Unavailable)?;

        let status = Command::new(program)
            .args(args)
            .arg(file)
            .status()
            .map_err(|e| ShareError::Failed(e.to_string()))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(1) => Err(ShareError::Declined),
            _ => Err(ShareError::Failed(format!("{} exited with {}", program, status))),
        }
    }
}

/// Offers the saved PDF to a share sheet. Any share failure is logged and
/// the saved copy is returned instead; only a failed save is an error.
pub struct NativeShare<S> {
    sheet: S,
    fallback: DirectDownload,
}

impl<S: ShareSheet> NativeShare<S> {
    pub fn new(sheet: S, fallback: DirectDownload) -> Self {
        Self { sheet, fallback }
    }
}

impl<S: ShareSheet> Deliver for NativeShare<S> {
    fn deliver(&self, file: &PdfFile) -> Result<Delivered> {
        let path = self.fallback.save(file)?;
        match self.sheet.share(&path, SHARE_TITLE, SHARE_TEXT) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "shared pdf");
                Ok(Delivered::Shared(path))
            }
            Err(e) => {
                tracing::warn!(error = %e, "falling back to direct download");
                Ok(Delivered::Saved(path))
            }
        }
    }
}

/// The delivery behaviour for a platform, chosen once at the boundary.
pub enum DeliveryStrategy<S> {
    Download(DirectDownload),
    Share(NativeShare<S>),
}

impl<S: ShareSheet> DeliveryStrategy<S> {
    pub fn select(platform: Platform, sheet: S, dir: impl Into<PathBuf>) -> Self {
        let download = DirectDownload::new(dir);
        match platform {
            Platform::Desktop => DeliveryStrategy::Download(download),
            Platform::Mobile => DeliveryStrategy::Share(NativeShare::new(sheet, download)),
        }
    }
}

impl<S: ShareSheet> Deliver for DeliveryStrategy<S> {
    fn deliver(&self, file: &PdfFile) -> Result<Delivered> {
        match self {
            DeliveryStrategy::Download(download) => download.deliver(file),
            DeliveryStrategy::Share(share) => share.deliver(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct FakeSheet {
        outcome: fn() -> std::result::Result<(), ShareError>,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeSheet {
        fn new(outcome: fn() -> std::result::Result<(), ShareError>) -> Self {
            Self {
                outcome,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ShareSheet for &FakeSheet {
        fn share(&self, file: &Path, title: &str, _text: &str) -> std::result::Result<(), ShareError> {
            assert_eq!(title, SHARE_TITLE);
            self.calls.borrow_mut().push(file.to_path_buf());
            (self.outcome)()
        }
    }

    fn pdf() -> PdfFile {
        PdfFile {
            filename: "Invoice_INV261015001_2026-10-15T09-00-00.pdf".to_string(),
            bytes: b"%PDF-1.5 test".to_vec(),
        }
    }

    #[test]
    fn test_user_agent_detection() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/120.0 Mobile Safari/537.36";
        let desktop = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/121.0";
        assert_eq!(Platform::from_user_agent(iphone), Platform::Mobile);
        assert_eq!(Platform::from_user_agent(android), Platform::Mobile);
        assert_eq!(Platform::from_user_agent("Opera Mini/8.0"), Platform::Mobile);
        assert_eq!(Platform::from_user_agent(desktop), Platform::Desktop);
        assert_eq!(Platform::from_user_agent(""), Platform::Desktop);
    }

    #[test]
    fn test_direct_download_writes_file() {
        let dir = TempDir::new().unwrap();
        let delivered = DirectDownload::new(dir.path()).deliver(&pdf()).unwrap();
        assert!(matches!(delivered, Delivered::Saved(_)));
        assert_eq!(fs::read(delivered.path()).unwrap(), pdf().bytes);
        assert!(!dir.path().join(format!("{}.part", pdf().filename)).exists());
    }

    #[test]
    fn test_share_success() {
        let dir = TempDir::new().unwrap();
        let sheet = FakeSheet::new(|| Ok(()));
        let delivered = NativeShare::new(&sheet, DirectDownload::new(dir.path()))
            .deliver(&pdf())
            .unwrap();
        assert!(matches!(delivered, Delivered::Shared(_)));
        assert_eq!(sheet.calls.borrow().len(), 1);
    }

    #[test]
    fn test_declined_share_falls_back_to_download() {
        let dir = TempDir::new().unwrap();
        let sheet = FakeSheet::new(|| Err(ShareError::Declined));
        let delivered = NativeShare::new(&sheet, DirectDownload::new(dir.path()))
            .deliver(&pdf())
            .unwrap();
        assert!(matches!(delivered, Delivered::Saved(_)));
        assert!(delivered.path().exists());
    }

    #[test]
    fn test_failed_share_falls_back_to_download() {
        let dir = TempDir::new().unwrap();
        let sheet = FakeSheet::new(|| Err(ShareError::Failed("boom".to_string())));
        let delivered = NativeShare::new(&sheet, DirectDownload::new(dir.path()))
            .deliver(&pdf())
            .unwrap();
        assert_eq!(delivered, Delivered::Saved(dir.path().join(pdf().filename)));
    }

    #[test]
    fn test_share_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ShareError::Failed("no device".to_string()));
        assert_eq!(err.to_string(), "share failed: no device");
        assert_eq!(ShareError::Declined.to_string(), "share declined");
        assert_eq!(ShareError::Unavailable.to_string(), "sharing unavailable");
    }

    #[test]
    fn test_unconfigured_command_share_is_unavailable() {
        let err = CommandShare::default()
            .share(Path::new("x.pdf"), SHARE_TITLE, SHARE_TEXT)
            .unwrap_err();
        assert!(matches!(err, ShareError::Unavailable));
    }

    #[test]
    fn test_desktop_never_shares() {
        let dir = TempDir::new().unwrap();
        let strategy = DeliveryStrategy::select(Platform::Desktop, CommandShare::default(), dir.path());
        assert!(matches!(strategy, DeliveryStrategy::Download(_)));
        let delivered = strategy.deliver(&pdf()).unwrap();
        assert!(matches!(delivered, Delivered::Saved(_)));
    }

    #[test]
    fn test_mobile_without_share_command_still_saves() {
        let dir = TempDir::new().unwrap();
        let strategy = DeliveryStrategy::select(Platform::Mobile, CommandShare::default(), dir.path());
        let delivered = strategy.deliver(&pdf()).unwrap();
        assert!(matches!(delivered, Delivered::Saved(_)));
        assert!(delivered.path().exists());
    }
}
