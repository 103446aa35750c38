use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::*;
use font::{FactoryError, FontFactory};

/// Configuration for a [`FileFontFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactoryConfig {
    /// Directories searched for .tfm files, in order.
    pub search_paths: Vec<PathBuf>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            search_paths: vec![PathBuf::from(".")],
        }
    }
}

/// A font factory that loads .tfm files from the file system.
///
/// Each file is decoded once; loading the same font at another size reuses the decoded file.
#[derive(Debug, Default)]
pub struct FileFontFactory {
    config: FactoryConfig,
    cache: HashMap<PathBuf, Rc<Font>>,
}

impl FileFontFactory {
    pub fn new(config: FactoryConfig) -> FileFontFactory {
        FileFontFactory {
            config,
            cache: Default::default(),
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    fn find(&self, name: &str) -> Result<PathBuf, FactoryError> {
        let mut file_name = PathBuf::from(name);
        if file_name.extension().is_none() {
            file_name.set_extension(<Font as font::Format>::DEFAULT_FILE_EXTENSION);
        }
        let searched: Vec<PathBuf> = self
            .config
            .search_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .collect();
        match searched.iter().find(|path| path.is_file()) {
            Some(path) => Ok(path.clone()),
            None => Err(FactoryError::NotFound {
                name: name.to_string(),
                searched,
            }),
        }
    }

    fn load(&mut self, path: &Path) -> Result<Rc<Font>, FactoryError> {
        if let Some(font) = self.cache.get(path) {
            return Ok(font.clone());
        }
        log::debug!("loading font file {}", path.display());
        let (font, warnings) = Font::from_path(path)?;
        if !warnings.is_empty() {
            log::info!(
                "font file {} loaded with {} warnings",
                path.display(),
                warnings.len()
            );
        }
        let font = Rc::new(font);
        self.cache.insert(path.to_path_buf(), font.clone());
        Ok(font)
    }
}

/// Sizes must be positive and less than 2048pt. TeX.2021.1259
fn check_size(name: &str, size: Scaled) -> Result<Scaled, FactoryError> {
    if size.0 <= 0 || size.0 >= (2048 << 16) {
        return Err(FactoryError::InvalidSize {
            name: name.to_string(),
            size,
        });
    }
    Ok(size)
}

impl FontFactory for FileFontFactory {
    fn get_instance(
        &mut self,
        name: &str,
        size: Option<Scaled>,
    ) -> Result<Box<dyn font::Font>, FactoryError> {
        let size = size.map(|size| check_size(name, size)).transpose()?;
        let path = self.find(name)?;
        let font = self.load(&path)?;
        Ok(Box::new(ScaledFont::new(name, font, size)))
    }
}
