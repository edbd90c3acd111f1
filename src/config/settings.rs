use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::Weekday;
use crate::foundation::error::{StripeError, StripeResult};
use crate::render::layout::{MAX_OFFSET, out_of_range_offset};
use crate::render::resample::Interpolation;

/// JSON-facing shape of `settings.json`.
#[derive(Debug, Clone, serde::Deserialize)]
struct SettingsDef {
    images: BTreeMap<String, PathBuf>,
    #[serde(default)]
    offsets: Vec<i32>,
    #[serde(default)]
    interpolation: i64,
    #[serde(default)]
    watermark: bool,
    #[serde(default)]
    quantization: bool,
}

/// Validated, immutable run configuration.
///
/// Constructed once (from JSON or directly) and passed by reference into the
/// pipeline entry points. Paths may be relative; they are resolved against a
/// root chosen by the caller, see [`crate::InputPaths::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Source animation per weekday, indexed by [`Weekday::index`].
    pub sources: [PathBuf; 7],
    /// Horizontal pixel offset per weekday, indexed by [`Weekday::index`].
    pub offsets: [i32; 7],
    /// Resampling filter for every panel.
    pub interpolation: Interpolation,
    /// Build a shared reduced palette instead of using the system palette.
    pub quantize: bool,
    /// Accepted for compatibility with existing settings files; never drawn.
    pub watermark: bool,
}

impl Settings {
    /// Parse settings from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StripeResult<Self> {
        let def: SettingsDef = serde_json::from_reader(r)
            .map_err(|e| StripeError::config_malformed(format!("parse settings JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(s: &str) -> StripeResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse settings from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StripeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StripeError::config_missing(format!("open settings '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Source path for `day` as written in the settings.
    pub fn source(&self, day: Weekday) -> &Path {
        &self.sources[day.index()]
    }

    /// Configured offset for `day`.
    pub fn offset(&self, day: Weekday) -> i32 {
        self.offsets[day.index()]
    }

    fn from_def(mut def: SettingsDef) -> StripeResult<Self> {
        let mut sources: [PathBuf; 7] = Default::default();
        for day in Weekday::ALL {
            sources[day.index()] = def.images.remove(day.name()).ok_or_else(|| {
                StripeError::config_malformed(format!("images.{day} is required"))
            })?;
        }
        for unknown in def.images.keys() {
            tracing::warn!(key = %unknown, "ignoring unknown entry in settings images");
        }

        let offsets: [i32; 7] = def.offsets.as_slice().try_into().map_err(|_| {
            StripeError::config_malformed(format!(
                "offsets must list exactly 7 values (Mon..Sun), got {}",
                def.offsets.len()
            ))
        })?;
        if let Some(k) = out_of_range_offset(&offsets) {
            return Err(StripeError::config_malformed(format!(
                "offsets[{k}] = {} is outside -{MAX_OFFSET}..={MAX_OFFSET}",
                offsets[k]
            )));
        }

        Ok(Self {
            sources,
            offsets,
            interpolation: Interpolation::from_selector(def.interpolation),
            quantize: def.quantization,
            watermark: def.watermark,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
