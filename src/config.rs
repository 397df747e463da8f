use std::path::Path;

use anyhow::Context;

use crate::{
    assets::color::ColorDef,
    foundation::error::{BoothError, BoothResult},
};

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SNAPBOOTH_";

/// Booth-wide settings.
///
/// Values come from (lowest to highest precedence) built-in defaults, an optional JSON file and
/// `SNAPBOOTH_*` environment variables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BoothConfig {
    /// Capture buffer capacity for one session.
    pub photos_per_session: usize,
    /// Canvas fill for templates without a `backgroundColor`.
    pub default_background: ColorDef,
    /// JPEG export quality, `1..=100`.
    pub jpeg_quality: u8,
    /// Worker threads for decoding. `None` lets rayon decide.
    pub decode_threads: Option<usize>,
}

impl Default for BoothConfig {
    fn default() -> Self {
        let c = 5.0 / 255.0;
        Self {
            photos_per_session: 3,
            default_background: ColorDef::rgba(c, c, c, 1.0),
            jpeg_quality: 95,
            decode_threads: None,
        }
    }
}

impl BoothConfig {
    /// Parse configuration JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> BoothResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read configuration JSON from disk.
    pub fn from_path(path: impl AsRef<Path>) -> BoothResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Defaults or `path`, then process environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> BoothResult<Self> {
        let base = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::default(),
        };
        let cfg = base.with_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `SNAPBOOTH_*` overrides resolved through `lookup`.
    ///
    /// Recognized keys: `SNAPBOOTH_PHOTOS_PER_SESSION`, `SNAPBOOTH_DEFAULT_BACKGROUND`,
    /// `SNAPBOOTH_JPEG_QUALITY`, `SNAPBOOTH_DECODE_THREADS`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> BoothResult<Self> {
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        };

        if let Some((key, v)) = get("PHOTOS_PER_SESSION") {
            self.photos_per_session = parse_num(&key, &v)?;
        }
        if let Some((key, v)) = get("DEFAULT_BACKGROUND") {
            self.default_background = v
                .parse()
                .map_err(|e| BoothError::validation(format!("{key}: {e}")))?;
        }
        if let Some((key, v)) = get("JPEG_QUALITY") {
            self.jpeg_quality = parse_num(&key, &v)?;
        }
        if let Some((key, v)) = get("DECODE_THREADS") {
            self.decode_threads = Some(parse_num(&key, &v)?);
        }

        tracing::debug!(config = ?self, "configuration resolved");
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> BoothResult<()> {
        if self.photos_per_session == 0 {
            return Err(BoothError::validation("photosPerSession must be >= 1"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BoothError::validation("jpegQuality must be in 1..=100"));
        }
        if self.decode_threads == Some(0) {
            return Err(BoothError::validation(
                "decodeThreads must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> BoothResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| BoothError::validation(format!("{key}='{value}': {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
