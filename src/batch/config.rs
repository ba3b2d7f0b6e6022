//! Batch configuration.
//!
//! A run is described by a YAML manifest. Every field has a default, so an
//! empty manifest (or none at all) describes the conventional layout:
//! shared photos in `Photos/`, personal photos in `Personal_photos/`, decks
//! written to `Donor PowerPoints` on the desktop.
//!
//! ```yaml
//! output_folder: Donor PowerPoints
//! shared_photos: [Construction1.jpg, Construction2.jpg]
//! recipients: [Jack, Joan]
//! target_resolution: { width: 1152, height: 648 }
//! canvas: { width: 16, height: 9 }
//! ```
use crate::batch::folder::{self, ExistingFolder};
use crate::batch::normalize::Resolution;
use crate::common::unit::{DEFAULT_DPI, inches_to_emu, px_to_emu};
use crate::common::{Error, Result};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Slide size of every generated deck, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// Canvas size `(cx, cy)` in EMUs.
    pub fn emu(&self) -> (i64, i64) {
        (inches_to_emu(self.width), inches_to_emu(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 9.0,
        }
    }
}

/// Configuration of one batch run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base location of the output folder; the desktop when unset
    pub output_root: Option<PathBuf>,
    pub output_folder: String,
    pub fail_if_output_exists: bool,
    pub shared_photos_dir: PathBuf,
    /// File names inside `shared_photos_dir`, in slide order; listed from
    /// the directory when empty
    pub shared_photos: Vec<String>,
    pub personal_photos_dir: PathBuf,
    pub photo_extension: String,
    /// Recipient names; taken from `personal_photos_dir` when empty
    pub recipients: Vec<String>,
    pub base_artifact: PathBuf,
    pub target_resolution: Resolution,
    pub canvas: Canvas,
    pub normalize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: None,
            output_folder: "Donor PowerPoints".to_string(),
            fail_if_output_exists: false,
            shared_photos_dir: PathBuf::from("Photos"),
            shared_photos: Vec::new(),
            personal_photos_dir: PathBuf::from("Personal_photos"),
            photo_extension: "jpg".to_string(),
            recipients: Vec::new(),
            base_artifact: PathBuf::from("base.pptx"),
            target_resolution: Resolution::default(),
            canvas: Canvas::default(),
            normalize: true,
        }
    }
}

impl Config {
    /// Load a manifest from disk.
    ///
    /// Relative paths in the manifest are resolved against the manifest's
    /// own directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config.resolve_relative_to(dir);
        }
        Ok(config)
    }

    /// Parse a manifest from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(text).map_err(|e| Error::Config(format!("invalid manifest: {}", e)))
    }

    /// Make every relative path absolute with respect to `dir`.
    pub fn resolve_relative_to(&mut self, dir: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        resolve(&mut self.shared_photos_dir);
        resolve(&mut self.personal_photos_dir);
        resolve(&mut self.base_artifact);
        if let Some(root) = self.output_root.as_mut() {
            resolve(root);
        }
    }

    /// Folder collision policy derived from `fail_if_output_exists`.
    pub fn folder_policy(&self) -> ExistingFolder {
        if self.fail_if_output_exists {
            ExistingFolder::Fail
        } else {
            ExistingFolder::Reuse
        }
    }

    /// Base location of the output folder.
    pub fn output_root(&self) -> Result<PathBuf> {
        match &self.output_root {
            Some(root) => Ok(root.clone()),
            None => folder::default_output_root().ok_or_else(|| {
                Error::Config("cannot determine the desktop or home directory".to_string())
            }),
        }
    }

    /// Folder the recipient decks are written to.
    pub fn output_dir(&self) -> Result<PathBuf> {
        Ok(self.output_root()?.join(&self.output_folder))
    }

    /// Shared photos in slide order.
    pub fn shared_photo_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.shared_photos.is_empty() {
            return Ok(self
                .shared_photos
                .iter()
                .map(|name| self.shared_photos_dir.join(name))
                .collect());
        }
        list_photos(&self.shared_photos_dir, &self.photo_extension)
    }

    /// Recipients in processing order.
    pub fn recipient_names(&self) -> Result<Vec<String>> {
        let names = if self.recipients.is_empty() {
            list_photos(&self.personal_photos_dir, &self.photo_extension)?
                .iter()
                .filter_map(|p| p.file_stem())
                .map(|stem| stem.to_string_lossy().into_owned())
                .collect()
        } else {
            self.recipients.clone()
        };
        validate_recipients(&names)?;
        Ok(names)
    }

    /// Check the configuration before anything touches the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.output_folder.trim().is_empty() {
            return Err(Error::Config("output_folder must not be empty".to_string()));
        }
        if self.photo_extension.is_empty() || self.photo_extension.contains(['/', '\\', '.']) {
            return Err(Error::Config(format!(
                "invalid photo_extension '{}'",
                self.photo_extension
            )));
        }
        if self.target_resolution.width == 0 || self.target_resolution.height == 0 {
            return Err(Error::Config(format!(
                "target_resolution must be non-zero, got {}",
                self.target_resolution
            )));
        }
        let (cx, cy) = self.canvas.emu();
        if cx <= 0 || cy <= 0 {
            return Err(Error::Config("canvas must have a positive size".to_string()));
        }
        // Normalized photos are placed at native size, so they must fill the canvas
        let native = (
            px_to_emu(self.target_resolution.width, DEFAULT_DPI),
            px_to_emu(self.target_resolution.height, DEFAULT_DPI),
        );
        if self.normalize && native != (cx, cy) {
            return Err(Error::Config(format!(
                "target_resolution {} does not cover the {}x{}in canvas at {} dpi",
                self.target_resolution, self.canvas.width, self.canvas.height, DEFAULT_DPI
            )));
        }
        validate_recipients(&self.recipients)?;

        let output_dir = absolute(&self.output_dir()?)?;
        if absolute(&self.base_artifact)?.starts_with(&output_dir) {
            return Err(Error::Config(format!(
                "base_artifact {} must not be inside the output folder {}",
                self.base_artifact.display(),
                output_dir.display()
            )));
        }
        Ok(())
    }
}

/// Check recipient names: non-empty, usable as a file name, and unique
/// ignoring case.
pub fn validate_recipients(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            return Err(Error::Config("recipient name must not be empty".to_string()));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Config(format!("invalid recipient name '{}'", name)));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(Error::Config(format!("duplicate recipient '{}'", name)));
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| Error::Config(format!("cannot resolve {}: {}", path.display(), e)))
}

/// Files in `dir` with extension `ext` (ignoring case), in natural order.
pub fn list_photos(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::AssetNotFound(dir.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;

    let mut photos = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches_ext = path
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext));
        if matches_ext && path.is_file() {
            photos.push(path);
        }
    }

    photos.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(photos)
}

/// Compare strings so that embedded numbers order by value:
/// `Construction2` < `Construction10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut ra, mut rb) = (a, b);
    loop {
        match (ra.is_empty(), rb.is_empty()) {
            (true, true) => return a.cmp(b),
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {},
        }

        let (ca, ta) = split_chunk(ra);
        let (cb, tb) = split_chunk(rb);
        let ord = match (is_digits(ca), is_digits(cb)) {
            (true, true) => {
                let na = ca.trim_start_matches('0');
                let nb = cb.trim_start_matches('0');
                na.len().cmp(&nb.len()).then_with(|| na.cmp(nb))
            },
            _ => ca.cmp(cb),
        };
        if ord != Ordering::Equal {
            return ord;
        }
        ra = ta;
        rb = tb;
    }
}

/// Split off the leading run of digits or non-digits.
fn split_chunk(s: &str) -> (&str, &str) {
    let digits = s.starts_with(|c: char| c.is_ascii_digit());
    let end = s
        .find(|c: char| c.is_ascii_digit() != digits)
        .unwrap_or(s.len());
    s.split_at(end)
}

fn is_digits(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output_folder, "Donor PowerPoints");
        assert_eq!(config.target_resolution, Resolution::new(1152, 648));
        assert_eq!(config.canvas.emu(), (14_630_400, 8_229_600));
        assert_eq!(config.folder_policy(), ExistingFolder::Reuse);
        assert!(config.normalize);
    }

    #[test]
    fn test_parse_manifest() {
        let yaml = r#"
output_root: /tmp/decks
fail_if_output_exists: true
shared_photos: [c1.jpg, c2.jpg]
recipients: [Alice, Bob]
target_resolution:
  width: 800
  height: 450
normalize: false
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.output_root, Some(PathBuf::from("/tmp/decks")));
        assert_eq!(config.folder_policy(), ExistingFolder::Fail);
        assert_eq!(config.recipients, vec!["Alice", "Bob"]);
        assert_eq!(config.target_resolution, Resolution::new(800, 450));
        assert!(!config.normalize);
        assert_eq!(config.photo_extension, "jpg");
        assert_eq!(
            config.shared_photo_paths().unwrap(),
            vec![PathBuf::from("Photos/c1.jpg"), PathBuf::from("Photos/c2.jpg")]
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Config::from_yaml_str("recipientz: [Alice]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("deck.yaml");
        std::fs::write(&manifest, "output_root: out\nbase_artifact: build/base.pptx\n").unwrap();

        let config = Config::load(&manifest).unwrap();
        assert_eq!(config.shared_photos_dir, dir.path().join("Photos"));
        assert_eq!(config.base_artifact, dir.path().join("build/base.pptx"));
        assert_eq!(config.output_root, Some(dir.path().join("out")));
        assert_eq!(config.output_dir().unwrap(), dir.path().join("out/Donor PowerPoints"));
    }

    #[test]
    fn test_recipient_validation() {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(validate_recipients(&names(&["Alice", "Bob"])).is_ok());
        assert!(validate_recipients(&names(&["Alice", "alice"])).is_err());
        assert!(validate_recipients(&names(&[""])).is_err());
        assert!(validate_recipients(&names(&["../Alice"])).is_err());
    }

    #[test]
    fn test_resolution_must_match_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            output_root: Some(dir.path().to_path_buf()),
            base_artifact: dir.path().join("base.pptx"),
            target_resolution: Resolution::new(1920, 1080),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("1920x1080"));

        // Photos left as they are may have any size
        config.normalize = false;
        assert!(config.validate().is_ok());

        config.normalize = true;
        config.target_resolution = Resolution::new(1440, 720);
        config.canvas = Canvas { width: 20.0, height: 10.0 };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_inside_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            output_root: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        config.base_artifact = dir.path().join("Donor PowerPoints").join("base.pptx");
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);

        config.base_artifact = dir.path().join("base.pptx");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_listing_is_natural_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Construction10.jpg", "Construction2.JPG", "Construction1.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let config = Config {
            shared_photos_dir: dir.path().to_path_buf(),
            personal_photos_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let names: Vec<String> = config
            .shared_photo_paths()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Construction1.jpg", "Construction2.JPG", "Construction10.jpg"]);
        assert_eq!(
            config.recipient_names().unwrap(),
            vec!["Construction1", "Construction2", "Construction10"]
        );
    }

    #[test]
    fn test_missing_listing_dir() {
        let err = list_photos(Path::new("/definitely/not/here"), "jpg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AssetNotFound);
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("Construction2", "Construction10"), Ordering::Less);
        assert_eq!(natural_cmp("a", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("img007", "img7"), Ordering::Less);
        assert_eq!(natural_cmp("b", "a10"), Ordering::Greater);
    }

    proptest! {
        #[test]
        fn prop_numbers_order_by_value(a in 0u32..100_000, b in 0u32..100_000) {
            let left = format!("Construction{}.jpg", a);
            let right = format!("Construction{}.jpg", b);
            prop_assert_eq!(natural_cmp(&left, &right), a.cmp(&b));
        }

        #[test]
        fn prop_natural_cmp_is_antisymmetric(a in "[a-c0-9]{0,8}", b in "[a-c0-9]{0,8}") {
            prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        }
    }
}
