use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::{Rgb, RgbImage};
use log::{info, warn};

use crate::error::{Error, Result};

/// Create `folder` and its parents. An existing folder is fine.
pub fn ensure_folder(folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(folder).map_err(|e| Error::io(folder, e))?;
    info!("save folder: {}", folder.display());
    Ok(folder.to_path_buf())
}

// ---------------------------------------------------------------------------
// Collision-free destination
// ---------------------------------------------------------------------------

/// Path to write to without touching an existing file: `path` itself when
/// free, else `stem_YYYYmmdd_HHMM.ext`, else that with `_1`, `_2`, … added.
pub fn resolve_destination(path: &Path, now: DateTime<Local>) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stamp = now.format("%Y%m%d_%H%M");

    let mut candidate = path.with_file_name(format!("{stem}_{stamp}{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = path.with_file_name(format!("{stem}_{stamp}_{n}{ext}"));
        n += 1;
    }

    warn!(
        "{} exists, writing {} instead",
        path.display(),
        candidate.display()
    );
    candidate
}

// ---------------------------------------------------------------------------
// Tight cropping + PNG encode
// ---------------------------------------------------------------------------

/// Bounding box `(x, y, w, h)` of pixels differing from `background`,
/// grown by `pad` and clamped to the image. A blank image keeps its size.
pub fn tight_bbox(img: &RgbImage, background: Rgb<u8>, pad: u32) -> (u32, u32, u32, u32) {
    let (w, h) = img.dimensions();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, px) in img.enumerate_pixels() {
        if *px == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bounds {
        None => (0, 0, w, h),
        Some((x0, y0, x1, y1)) => {
            let left = x0.saturating_sub(pad);
            let top = y0.saturating_sub(pad);
            let right = (x1 + pad).min(w - 1);
            let bottom = (y1 + pad).min(h - 1);
            (left, top, right - left + 1, bottom - top + 1)
        }
    }
}

/// Crop to content plus `pad` and encode as PNG at `path`.
pub fn save_cropped_png(img: &RgbImage, path: &Path, pad: u32) -> Result<()> {
    let (x, y, w, h) = tight_bbox(img, Rgb([255, 255, 255]), pad);
    let cropped = image::imageops::crop_imm(img, x, y, w, h).to_image();
    cropped.save(path)?;
    info!("wrote {} ({w}×{h} px)", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_free_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        assert_eq!(resolve_destination(&path, fixed_now()), path);
    }

    #[test]
    fn test_existing_file_gets_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        std::fs::write(&path, b"old").unwrap();

        let resolved = resolve_destination(&path, fixed_now());
        assert_ne!(resolved, path);
        assert_eq!(resolved, dir.path().join("plot_20240309_1405.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn test_timestamp_collision_adds_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        std::fs::write(&path, b"a").unwrap();
        std::fs::write(dir.path().join("plot_20240309_1405.png"), b"b").unwrap();

        let resolved = resolve_destination(&path, fixed_now());
        assert_eq!(resolved, dir.path().join("plot_20240309_1405_1.png"));
    }

    #[test]
    fn test_ensure_folder_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("a").join("b");
        ensure_folder(&folder).unwrap();
        ensure_folder(&folder).unwrap();
        assert!(folder.is_dir());
    }

    #[test]
    fn test_tight_bbox_with_padding() {
        let white = Rgb([255, 255, 255]);
        let mut img = RgbImage::from_pixel(100, 80, white);
        img.put_pixel(20, 30, Rgb([0, 0, 0]));
        img.put_pixel(60, 40, Rgb([255, 0, 0]));

        assert_eq!(tight_bbox(&img, white, 0), (20, 30, 41, 11));
        assert_eq!(tight_bbox(&img, white, 5), (15, 25, 51, 21));
        assert_eq!(tight_bbox(&img, white, 500), (0, 0, 100, 80));
    }

    #[test]
    fn test_blank_image_keeps_size() {
        let white = Rgb([255, 255, 255]);
        let img = RgbImage::from_pixel(10, 10, white);
        assert_eq!(tight_bbox(&img, white, 2), (0, 0, 10, 10));
    }

    #[test]
    fn test_save_cropped_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut img = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        img.put_pixel(10, 10, Rgb([0, 0, 0]));
        save_cropped_png(&img, &path, 2).unwrap();

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (5, 5));
    }
}
