//! Run configuration loaded from TOML
//!
//! Every section is optional; missing keys fall back to the built-in
//! defaults, and command-line flags override whatever the file sets.
//!
//! ```toml
//! [output]
//! format = "svg"
//! output_dir = "figures"
//!
//! [eddy]
//! r_max = 50.0
//! size_limit = { kind = "constant", length = 2.0 }
//! model = { model = "sound", spread = 3.0 }
//!
//! [perlin]
//! alpha = 240
//! beta = 140
//! tile = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::export::ExportConfig;
use crate::profile::{EddyConfig, UniformCellsConfig};
use crate::texture::PerlinTexture;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurbidConfig {
    pub output: ExportConfig,
    pub eddy: EddyConfig,
    pub uniform: UniformCellsConfig,

    /// Without a `[perlin]` section this is the tiled 240 x 140 texture
    /// repeating twice; keys inside the section default to [`PerlinTexture::default`].
    pub perlin: PerlinTexture,
}

impl Default for TurbidConfig {
    fn default() -> Self {
        Self {
            output: ExportConfig::default(),
            eddy: EddyConfig::default(),
            uniform: UniformCellsConfig::default(),
            perlin: PerlinTexture::tiled(240, 140, 2),
        }
    }
}

impl TurbidConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded run configuration");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use crate::profile::{AmplitudeModel, SizeLimit};
    use std::io::Write;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(TurbidConfig::parse("").unwrap(), TurbidConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = TurbidConfig::parse(
            r#"
            [output]
            format = "svg"
            width = 1024

            [eddy]
            r_max = 50.0
            seed = 7
            size_limit = { kind = "constant", length = 2.0 }
            model = { model = "sound", spread = 1.5 }

            [perlin]
            alpha = 240
            beta = 140
            tile = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.output.format, ExportFormat::Svg);
        assert_eq!(config.output.width, 1024);
        assert_eq!(config.output.height, ExportConfig::default().height);

        assert_eq!(config.eddy.r_max, 50.0);
        assert_eq!(config.eddy.r_min, 0.0);
        assert_eq!(config.eddy.seed, Some(7));
        assert_eq!(config.eddy.size_limit, SizeLimit::constant(2.0));
        assert_eq!(config.eddy.model, AmplitudeModel::Sound { spread: 1.5 });

        assert_eq!(config.perlin.tile, Some(2));
        assert_eq!(config.perlin.octaves, 3);
        assert_eq!(config.uniform, UniformCellsConfig::default());
    }

    #[test]
    fn test_default_perlin_is_tiled() {
        let config = TurbidConfig::default();
        assert_eq!((config.perlin.alpha, config.perlin.beta), (240, 140));
        assert_eq!(config.perlin.tile, Some(2));

        let config = TurbidConfig::parse("[perlin]\nseed = 4\n").unwrap();
        assert_eq!(config.perlin.tile, None);
        assert_eq!(config.perlin.alpha, 120);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(TurbidConfig::parse("[plot]\nwidth = 3\n").is_err());
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        assert!(TurbidConfig::parse("[eddy]\nmodel = { model = \"laminar\" }\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[uniform]\neddy_length = 4.0").unwrap();

        let config = TurbidConfig::load(file.path()).unwrap();
        assert_eq!(config.uniform.eddy_length, 4.0);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            TurbidConfig::load("/nonexistent/turbid.toml"),
            Err(ConfigError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"gif\"").unwrap();
        assert!(matches!(
            TurbidConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
