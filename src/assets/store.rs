use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    assets::decode::{decode_image, looks_like_svg, rasterize_svg},
    foundation::core::Canvas,
    foundation::error::{BoothError, BoothResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build from premultiplied RGBA8 bytes, checking the buffer length.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> BoothResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoothError::decode("image dimensions must be > 0"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(BoothError::decode("prepared image byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build an image filled with one straight-alpha RGBA8 color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> BoothResult<Self> {
        let px = crate::foundation::core::Rgba8Premul::from_straight_rgba(
            rgba[0], rgba[1], rgba[2], rgba[3],
        )
        .to_array();
        Self::from_premul_rgba8(width, height, px.repeat(width as usize * height as usize))
    }
}

/// Opaque handle to an encoded or already decoded image.
///
/// Handles are cheap to clone; decoding happens lazily through an [`ImageDecoder`].
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// File path; relative paths resolve against the decoder's root.
    Path(PathBuf),
    /// Encoded bytes held in memory (e.g. straight from a camera capture).
    Bytes(Arc<[u8]>),
    /// Already decoded pixels.
    Prepared(PreparedImage),
}

impl ImageSource {
    /// Wrap encoded bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Short human-readable label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
            Self::Prepared(img) => format!("<decoded {}x{}>", img.width, img.height),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<PreparedImage> for ImageSource {
    fn from(img: PreparedImage) -> Self {
        Self::Prepared(img)
    }
}

/// Decode capability used by the compositing pipeline.
///
/// `raster_size` is a hint for resolution-independent sources (SVG overlays are rasterized at
/// exactly that size); raster sources ignore it.
pub trait ImageDecoder: Send + Sync {
    /// Decode `source` into premultiplied RGBA8.
    fn decode(&self, source: &ImageSource, raster_size: Option<Canvas>)
    -> BoothResult<PreparedImage>;
}

/// Filesystem-backed decoder: raster formats via `image`, SVG via `usvg`/`resvg`.
#[derive(Clone, Debug)]
pub struct FsImageDecoder {
    root: PathBuf,
}

impl FsImageDecoder {
    /// Create a decoder resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}

impl Default for FsImageDecoder {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ImageDecoder for FsImageDecoder {
    fn decode(
        &self,
        source: &ImageSource,
        raster_size: Option<Canvas>,
    ) -> BoothResult<PreparedImage> {
        let bytes: Arc<[u8]> = match source {
            ImageSource::Prepared(img) => return Ok(img.clone()),
            ImageSource::Bytes(b) => b.clone(),
            ImageSource::Path(p) => {
                let path = self.resolve(p);
                std::fs::read(&path)
                    .with_context(|| format!("read image '{}'", path.display()))?
                    .into()
            }
        };

        if looks_like_svg(&bytes) {
            let Some(size) = raster_size else {
                return Err(BoothError::decode(
                    "svg sources need a raster size (only overlays may be svg)",
                ));
            };
            return rasterize_svg(&bytes, size.width, size.height);
        }
        decode_image(&bytes)
    }
}

/// Result of decoding every image a composite depends on.
///
/// A `None` entry means that image failed to decode; the compositor skips whatever depends on
/// it.
#[derive(Clone, Debug, Default)]
pub struct DecodedInputs {
    /// Decoded overlay, if one was requested and decoded successfully.
    pub overlay: Option<PreparedImage>,
    /// Decoded photos, index-aligned with the capture buffer.
    pub photos: Vec<Option<PreparedImage>>,
}

impl DecodedInputs {
    /// Number of photos that decoded successfully.
    pub fn decoded_photo_count(&self) -> usize {
        self.photos.iter().filter(|p| p.is_some()).count()
    }
}

/// Decode the overlay and all photos concurrently and wait for every result.
///
/// Completion order is irrelevant: results are index-aligned with `photos`. Failures are logged
/// and recorded as `None` rather than aborting.
pub fn decode_inputs(
    decoder: &dyn ImageDecoder,
    overlay: Option<&ImageSource>,
    photos: &[ImageSource],
    canvas: Canvas,
) -> DecodedInputs {
    let (overlay, photos) = rayon::join(
        || {
            overlay.and_then(|src| match decoder.decode(src, Some(canvas)) {
                Ok(img) => Some(img),
                Err(err) => {
                    tracing::warn!(source = %src.describe(), error = %err, "overlay decode failed; drawing without it");
                    None
                }
            })
        },
        || {
            photos
                .par_iter()
                .enumerate()
                .map(|(idx, src)| match decoder.decode(src, None) {
                    Ok(img) => Some(img),
                    Err(err) => {
                        tracing::warn!(photo = idx, source = %src.describe(), error = %err, "photo decode failed; dependent slots are skipped");
                        None
                    }
                })
                .collect::<Vec<_>>()
        },
    );

    DecodedInputs { overlay, photos }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
