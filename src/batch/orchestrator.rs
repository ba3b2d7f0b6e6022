//! Batch orchestration.
//!
//! A run provisions the output folder, normalizes every shared photo and
//! then every personal photo, builds the base deck once, and derives one
//! deck per recipient in order. The first failure aborts the run; whatever
//! was already written stays in place.
use crate::batch::base::build_base_deck;
use crate::batch::config::{Config, validate_recipients};
use crate::batch::folder::ensure_output_folder;
use crate::batch::normalize::{Resolution, normalize};
use crate::batch::recipient::{DeckLayout, derive_for_recipient};
use crate::common::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub base_artifact: PathBuf,
    /// Slides in the base deck
    pub base_slides: usize,
    /// Number of images rewritten by the normalizer
    pub normalized: usize,
    /// Derived decks, in recipient order
    pub decks: Vec<PathBuf>,
}

/// Run the whole batch.
pub fn run(config: &Config) -> Result<BatchReport> {
    config.validate()?;
    let output_dir = ensure_output_folder(
        &config.output_root()?,
        &config.output_folder,
        config.folder_policy(),
    )?;
    info!(path = %output_dir.display(), "output folder ready");

    let shared = config.shared_photo_paths()?;
    let recipients = config.recipient_names()?;
    let layout = DeckLayout::from_config(config);

    let mut normalized = 0;
    if config.normalize {
        normalized += normalize_shared(&shared, config.target_resolution)?;
        normalized += normalize_personal(&recipients, &layout, config.target_resolution)?;
        info!(count = normalized, target = %config.target_resolution, "normalized photos");
    }

    let base = build_base_deck(&shared, config.canvas, &config.base_artifact)?;
    let base_slides = base.presentation()?.slide_count()?;

    let decks = derive_all(&recipients, &layout, &output_dir)?;

    Ok(BatchReport {
        output_dir,
        base_artifact: config.base_artifact.clone(),
        base_slides,
        normalized,
        decks,
    })
}

/// Normalize the shared photos (when configured) and build the base deck.
///
/// Returns the path of the base artifact.
pub fn build(config: &Config) -> Result<PathBuf> {
    config.validate()?;
    let shared = config.shared_photo_paths()?;
    if config.normalize {
        normalize_shared(&shared, config.target_resolution)?;
    }
    build_base_deck(&shared, config.canvas, &config.base_artifact)?;
    Ok(config.base_artifact.clone())
}

/// Derive decks from an existing base artifact.
///
/// `recipients` overrides the configured recipients when non-empty.
pub fn derive(config: &Config, recipients: &[String]) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let recipients = if recipients.is_empty() {
        config.recipient_names()?
    } else {
        validate_recipients(recipients)?;
        recipients.to_vec()
    };
    let output_dir = ensure_output_folder(
        &config.output_root()?,
        &config.output_folder,
        config.folder_policy(),
    )?;
    derive_all(&recipients, &DeckLayout::from_config(config), &output_dir)
}

fn normalize_shared(photos: &[PathBuf], target: Resolution) -> Result<usize> {
    for path in photos {
        normalize(path, target)?;
    }
    Ok(photos.len())
}

/// Normalize each recipient's photo. A missing photo is left for the
/// deriver to report against its recipient.
fn normalize_personal(recipients: &[String], layout: &DeckLayout, target: Resolution) -> Result<usize> {
    let mut count = 0;
    for name in recipients {
        let photo = layout.personal_photo(name);
        if !photo.exists() {
            warn!(recipient = %name, path = %photo.display(), "personal photo missing");
            continue;
        }
        normalize(&photo, target).map_err(|e| e.for_recipient(name))?;
        count += 1;
    }
    Ok(count)
}

fn derive_all(recipients: &[String], layout: &DeckLayout, output_dir: &Path) -> Result<Vec<PathBuf>> {
    recipients
        .iter()
        .map(|name| derive_for_recipient(name, layout, output_dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Error, ErrorKind};
    use crate::ooxml::pptx::Package;

    fn photo(path: &Path, width: u32, height: u32) {
        image::RgbImage::from_pixel(width, height, image::Rgb([40, 80, 120]))
            .save(path)
            .unwrap();
    }

    /// Lay out `Photos/`, `Personal_photos/` and an output root in a scratch
    /// directory and return a config pointing at them.
    fn workspace(dir: &Path, recipients_with_photos: &[&str]) -> Config {
        let shared = dir.join("Photos");
        let personal = dir.join("Personal_photos");
        std::fs::create_dir(&shared).unwrap();
        std::fs::create_dir(&personal).unwrap();
        photo(&shared.join("c1.jpg"), 640, 480);
        photo(&shared.join("c2.jpg"), 300, 900);
        for name in recipients_with_photos {
            photo(&personal.join(format!("{}.jpg", name)), 500, 500);
        }

        Config {
            output_root: Some(dir.join("Desktop")),
            shared_photos_dir: shared,
            shared_photos: vec!["c1.jpg".to_string(), "c2.jpg".to_string()],
            personal_photos_dir: personal,
            recipients: vec!["Alice".to_string(), "Bob".to_string()],
            base_artifact: dir.join("base.pptx"),
            ..Config::default()
        }
    }

    fn slide_count(path: &Path) -> usize {
        Package::open(path)
            .unwrap()
            .presentation()
            .unwrap()
            .slide_count()
            .unwrap()
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = workspace(dir.path(), &["Alice", "Bob"]);

        let report = run(&config).unwrap();
        let output = dir.path().join("Desktop").join("Donor PowerPoints");

        assert_eq!(report.output_dir, output);
        assert_eq!(report.base_slides, 2);
        assert_eq!(report.normalized, 4);
        assert_eq!(report.decks, vec![output.join("Alice.pptx"), output.join("Bob.pptx")]);

        assert_eq!(slide_count(&config.base_artifact), 2);
        assert_eq!(slide_count(&output.join("Alice.pptx")), 3);
        assert_eq!(slide_count(&output.join("Bob.pptx")), 3);
        assert!(!output.join("base.pptx").exists());

        // Normalized photos cover the canvas exactly
        let pkg = Package::open(output.join("Bob.pptx")).unwrap();
        for slide in pkg.presentation().unwrap().slides().unwrap() {
            assert_eq!(slide.pictures[0].extent, (14_630_400, 8_229_600));
        }
    }

    #[test]
    fn test_missing_personal_photo() {
        let dir = tempfile::tempdir().unwrap();
        let config = workspace(dir.path(), &["Alice"]);

        let err = run(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AssetNotFound);
        assert!(matches!(err, Error::Recipient { ref name, .. } if name == "Bob"));

        let output = dir.path().join("Desktop").join("Donor PowerPoints");
        assert!(output.join("Alice.pptx").exists());
        assert!(!output.join("Bob.pptx").exists());
        assert!(config.base_artifact.exists());
    }

    #[test]
    fn test_run_twice_reuses_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = workspace(dir.path(), &["Alice", "Bob"]);
        run(&config).unwrap();
        let report = run(&config).unwrap();
        assert_eq!(slide_count(&report.decks[0]), 3);
    }

    #[test]
    fn test_strict_folder_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = workspace(dir.path(), &["Alice", "Bob"]);
        config.fail_if_output_exists = true;
        run(&config).unwrap();
        assert_eq!(run(&config).unwrap_err().kind(), ErrorKind::DirectoryExists);
    }

    #[test]
    fn test_build_then_derive() {
        let dir = tempfile::tempdir().unwrap();
        let config = workspace(dir.path(), &["Alice", "Bob"]);

        assert_eq!(
            derive(&config, &[]).unwrap_err().kind(),
            ErrorKind::BaseNotBuilt
        );

        let base = build(&config).unwrap();
        assert_eq!(slide_count(&base), 2);

        let decks = derive(&config, &["Bob".to_string()]).unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(slide_count(&decks[0]), 3);
    }

    #[test]
    fn test_directory_listing_when_manifest_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = workspace(dir.path(), &["Zoe", "Adam"]);
        config.shared_photos.clear();
        config.recipients.clear();
        config.normalize = false;

        let report = run(&config).unwrap();
        let names: Vec<_> = report
            .decks
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Adam.pptx", "Zoe.pptx"]);
        assert_eq!(report.normalized, 0);
    }
}
