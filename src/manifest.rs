//! Dimension probing and manifest entries.

use std::path::{Path, PathBuf};

use crate::foundation::error::ProbeError;
use crate::model::{AssetVariant, ORIGINAL_TYPE};

/// Extensions of formats without intrinsic pixel dimensions.
///
/// Raster formats the `image` crate cannot decode with its default features (AVIF, HEIC) are not
/// listed here: they are probed, fail, and come back as a `0x0` entry with a warning.
pub const DIMENSIONLESS_EXTENSIONS: &[&str] = &["pdf", "ps", "eps", "ai"];

/// Whether files with extension `ext` are skipped by dimension probing.
pub fn is_dimensionless(ext: Option<&str>) -> bool {
    ext.is_some_and(|e| {
        DIMENSIONLESS_EXTENSIONS
            .iter()
            .any(|d| d.eq_ignore_ascii_case(e))
    })
}

/// Read `(width, height)` of a raster or SVG file from its header.
pub async fn probe_dimensions(path: &Path) -> Result<(u32, u32), ProbeError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || probe_dimensions_blocking(&path))
        .await
        .map_err(|e| ProbeError::Join(e.to_string()))?
}

fn probe_dimensions_blocking(path: &Path) -> Result<(u32, u32), ProbeError> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let bytes = std::fs::read(path)?;
        let tree = usvg::Tree::from_data(&bytes, &usvg::Options::default())
            .map_err(|e| ProbeError::Svg(e.to_string()))?;
        let size = tree.size();
        return Ok((size.width().ceil() as u32, size.height().ceil() as u32));
    }
    // Content sniffing wins over the extension; the extension is kept when sniffing fails.
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Probe `path` and describe it as a `kind` entry.
///
/// Probe failures degrade to `0x0` with a warning.
pub async fn probe_entry(kind: &str, path: PathBuf) -> AssetVariant {
    let (width, height) = match probe_dimensions(&path).await {
        Ok(dims) => dims,
        Err(e) => {
            tracing::warn!(path = %path.display(), kind, error = %e, "dimension probe failed");
            (0, 0)
        }
    };
    AssetVariant {
        kind: kind.to_string(),
        path,
        width,
        height,
    }
}

/// Describe the committed original, skipping the probe for dimensionless formats.
pub async fn original_entry(path: PathBuf, ext: Option<&str>) -> AssetVariant {
    if is_dimensionless(ext) {
        tracing::debug!(path = %path.display(), "original is dimensionless; probe skipped");
        return AssetVariant {
            kind: ORIGINAL_TYPE.to_string(),
            path,
            width: 0,
            height: 0,
        };
    }
    probe_entry(ORIGINAL_TYPE, path).await
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn write_png(path: &Path, w: u32, h: u32) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(path, &buf).unwrap();
    }

    #[test]
    fn dimensionless_extensions() {
        assert!(is_dimensionless(Some("pdf")));
        assert!(is_dimensionless(Some("PDF")));
        assert!(!is_dimensionless(Some("jpg")));
        assert!(!is_dimensionless(None));
    }

    #[tokio::test]
    async fn probes_raster_header() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("a.png");
        write_png(&p, 7, 3);
        assert_eq!(probe_dimensions(&p).await.unwrap(), (7, 3));
    }

    #[tokio::test]
    async fn probes_by_content_when_extension_lies() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("actually_png.jpg");
        write_png(&p, 5, 9);
        assert_eq!(probe_dimensions(&p).await.unwrap(), (5, 9));
    }

    #[tokio::test]
    async fn probes_svg_size() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("v.svg");
        std::fs::write(
            &p,
            br#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20.5"></svg>"#,
        )
        .unwrap();
        assert_eq!(probe_dimensions(&p).await.unwrap(), (40, 21));
    }

    #[tokio::test]
    async fn failed_probe_degrades_to_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("broken.jpg");
        std::fs::write(&p, b"not an image").unwrap();
        let entry = probe_entry("thumb", p.clone()).await;
        assert_eq!((entry.width, entry.height), (0, 0));
        assert_eq!(entry.path, p);

        let missing = probe_entry("thumb", tmp.path().join("missing.png")).await;
        assert_eq!((missing.width, missing.height), (0, 0));
    }

    #[tokio::test]
    async fn dimensionless_original_skips_probe() {
        let entry = original_entry(PathBuf::from("/nowhere/example.pdf"), Some("pdf")).await;
        assert!(entry.is_original());
        assert_eq!((entry.width, entry.height), (0, 0));
    }
}
