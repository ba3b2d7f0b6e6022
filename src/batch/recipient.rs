//! Per-recipient deck derivation.
use crate::batch::base::append_photo_slide;
use crate::batch::config::Config;
use crate::common::{Error, Result};
use crate::ooxml::pptx::Package;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the deriver finds its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLayout {
    /// The persisted base deck
    pub base_artifact: PathBuf,
    pub personal_photos_dir: PathBuf,
    pub photo_extension: String,
}

impl DeckLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_artifact: config.base_artifact.clone(),
            personal_photos_dir: config.personal_photos_dir.clone(),
            photo_extension: config.photo_extension.clone(),
        }
    }

    /// `<personal_photos_dir>/<recipient>.<photo_extension>`
    pub fn personal_photo(&self, recipient: &str) -> PathBuf {
        self.personal_photos_dir
            .join(format!("{}.{}", recipient, self.photo_extension))
    }
}

/// Derive `recipient`'s deck: the base deck plus one trailing slide with the
/// recipient's photo, saved as `output_dir/<recipient>.pptx`.
///
/// The base is reloaded from disk on every call. An existing deck for the
/// same recipient is overwritten. Errors carry the recipient's name.
pub fn derive_for_recipient(recipient: &str, layout: &DeckLayout, output_dir: &Path) -> Result<PathBuf> {
    derive(recipient, layout, output_dir).map_err(|e| e.for_recipient(recipient))
}

fn derive(recipient: &str, layout: &DeckLayout, output_dir: &Path) -> Result<PathBuf> {
    if !layout.base_artifact.is_file() {
        return Err(Error::BaseNotBuilt(layout.base_artifact.clone()));
    }
    let photo = layout.personal_photo(recipient);
    if !photo.is_file() {
        return Err(Error::AssetNotFound(photo));
    }

    let mut package = Package::open(&layout.base_artifact)?;
    let canvas = {
        let pres = package.presentation()?;
        (
            pres.slide_width()?.unwrap_or_default(),
            pres.slide_height()?.unwrap_or_default(),
        )
    };
    append_photo_slide(&mut package, &photo, canvas)?;

    let deck = output_dir.join(format!("{}.pptx", recipient));
    package.save(&deck).map_err(|e| Error::write(&deck, e))?;
    info!(recipient, path = %deck.display(), "derived deck");
    Ok(deck)
}
