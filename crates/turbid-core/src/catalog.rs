//! The generators turbid can run, described from the run configuration.
//!
//! Each [`GeneratorKind`] names a CLI subcommand, the `[section]` of the TOML
//! file that configures it and the prefix of the files it writes. A
//! [`GeneratorSummary`] pairs a kind with the settings it would run with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TurbidConfig;

/// What a generator produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Velocity against radius
    Profile,
    /// 2D noise grid
    Texture,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Eddy,
    Uniform,
    Perlin,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [
        GeneratorKind::Eddy,
        GeneratorKind::Uniform,
        GeneratorKind::Perlin,
    ];

    /// Subcommand, config section and file prefix
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorKind::Eddy => "eddy",
            GeneratorKind::Uniform => "uniform",
            GeneratorKind::Perlin => "perlin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GeneratorKind::Eddy => "Velocity profile of randomly sized eddies with alternating sign",
            GeneratorKind::Uniform => "Velocity profile of equal-sized cells",
            GeneratorKind::Perlin => "Fractal Perlin noise texture, optionally tileable",
        }
    }

    pub fn output(&self) -> OutputKind {
        match self {
            GeneratorKind::Eddy | GeneratorKind::Uniform => OutputKind::Profile,
            GeneratorKind::Perlin => OutputKind::Texture,
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generator together with the settings it would run with
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratorSummary {
    pub name: &'static str,
    pub description: &'static str,
    pub output: OutputKind,

    /// The generator's configuration section, as JSON
    pub settings: serde_json::Value,
}

impl TurbidConfig {
    /// The configured settings of one generator
    pub fn settings(&self, kind: GeneratorKind) -> Result<serde_json::Value, serde_json::Error> {
        match kind {
            GeneratorKind::Eddy => serde_json::to_value(&self.eddy),
            GeneratorKind::Uniform => serde_json::to_value(&self.uniform),
            GeneratorKind::Perlin => serde_json::to_value(&self.perlin),
        }
    }

    /// Every generator with its configured settings, in subcommand order
    pub fn summaries(&self) -> Result<Vec<GeneratorSummary>, serde_json::Error> {
        GeneratorKind::ALL
            .into_iter()
            .map(|kind| {
                Ok(GeneratorSummary {
                    name: kind.name(),
                    description: kind.description(),
                    output: kind.output(),
                    settings: self.settings(kind)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summaries_follow_subcommand_order() {
        let summaries = TurbidConfig::default().summaries().unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["eddy", "uniform", "perlin"]);
        assert_eq!(summaries[0].output, OutputKind::Profile);
        assert_eq!(summaries[2].output, OutputKind::Texture);
    }

    #[test]
    fn test_settings_reflect_loaded_config() {
        let config = TurbidConfig::parse(
            r#"
            [eddy]
            r_max = 50.0
            model = { model = "sound", spread = 1.5 }

            [perlin]
            alpha = 64
            "#,
        )
        .unwrap();

        let eddy = config.settings(GeneratorKind::Eddy).unwrap();
        assert_eq!(eddy["r_max"], 50.0);
        assert_eq!(eddy["model"]["model"], "sound");

        let perlin = config.settings(GeneratorKind::Perlin).unwrap();
        assert_eq!(perlin["alpha"], 64);
        assert_eq!(perlin["tile"], serde_json::Value::Null);
    }

    #[test]
    fn test_settings_round_trip_into_config() {
        let config = TurbidConfig::default();
        let uniform = config.settings(GeneratorKind::Uniform).unwrap();
        let back: crate::profile::UniformCellsConfig = serde_json::from_value(uniform).unwrap();
        assert_eq!(back, config.uniform);
    }

    #[test]
    fn test_kind_serializes_as_name() {
        for kind in GeneratorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
