//! Image post-processing and output checks for file export.

use std::io;
use std::path::{Path, PathBuf};

use macroquad::texture::Image;

use crate::{Result, VizError};

/// Transparent pixels kept around the content after a tight crop.
pub const TIGHT_PADDING: u16 = 8;

/// Checks that `path` names a PNG file in an existing directory.
///
/// Nothing is created or written.
pub fn prepare_output(path: &Path) -> Result<PathBuf> {
    if path.file_name().is_none() {
        return Err(VizError::InvalidOption(format!(
            "{} does not name a file",
            path.display()
        )));
    }
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return Err(VizError::InvalidOption(format!(
            "{} must have a .png extension",
            path.display()
        )));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let metadata = std::fs::metadata(parent)?;
    if !metadata.is_dir() {
        return Err(VizError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", parent.display()),
        )));
    }

    Ok(path.to_path_buf())
}

/// Writes an image read back from a render target as a tightly cropped PNG.
///
/// `gl_image` rows are bottom-up, as GL returns them; they are flipped once
/// here so the top of the screen is the top of the file. Returns the size of
/// the written image.
pub fn write_figure(gl_image: &Image, path: &Path) -> Result<(u16, u16)> {
    let path = prepare_output(path)?;
    let cropped = tight_crop(&flip_vertically(gl_image), TIGHT_PADDING);

    image::save_buffer(
        &path,
        &cropped.bytes,
        cropped.width as u32,
        cropped.height as u32,
        image::ColorType::Rgba8,
    )?;
    Ok((cropped.width, cropped.height))
}

/// Reverses the row order of an RGBA image.
///
/// Render target textures are read back bottom-up.
pub fn flip_vertically(image: &Image) -> Image {
    let row = image.width as usize * 4;
    let bytes = image
        .bytes
        .chunks_exact(row.max(1))
        .rev()
        .flatten()
        .copied()
        .collect();

    Image {
        bytes,
        width: image.width,
        height: image.height,
    }
}

/// Smallest `(x0, y0, x1, y1)` rectangle (inclusive) holding every pixel
/// with non-zero alpha, or `None` if the image is fully transparent.
pub fn opaque_bounds(image: &Image) -> Option<(u16, u16, u16, u16)> {
    let width = image.width as usize;
    let mut bounds: Option<(u16, u16, u16, u16)> = None;

    for (i, px) in image.bytes.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = (i % width) as u16;
        let y = (i / width) as u16;
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    bounds
}

/// Crops away transparent margins, keeping `padding` pixels on each side
/// where the image allows. Fully transparent images are returned unchanged.
pub fn tight_crop(image: &Image, padding: u16) -> Image {
    let Some((x0, y0, x1, y1)) = opaque_bounds(image) else {
        return image.clone();
    };

    let x0 = x0.saturating_sub(padding);
    let y0 = y0.saturating_sub(padding);
    let x1 = x1.saturating_add(padding).min(image.width - 1);
    let y1 = y1.saturating_add(padding).min(image.height - 1);

    let width = x1 - x0 + 1;
    let height = y1 - y0 + 1;
    let src_row = image.width as usize * 4;

    let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
    for y in y0..=y1 {
        let start = y as usize * src_row + x0 as usize * 4;
        bytes.extend_from_slice(&image.bytes[start..start + width as usize * 4]);
    }

    Image {
        bytes,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A transparent image with opaque pixels at the given coordinates.
    fn image_with(width: u16, height: u16, opaque: &[(u16, u16)]) -> Image {
        let mut bytes = vec![0u8; width as usize * height as usize * 4];
        for &(x, y) in opaque {
            let i = (y as usize * width as usize + x as usize) * 4;
            bytes[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        }
        Image {
            bytes,
            width,
            height,
        }
    }

    #[test]
    fn flip_reverses_rows() {
        let image = image_with(2, 3, &[(1, 0)]);
        let flipped = flip_vertically(&image);

        assert_eq!(opaque_bounds(&flipped), Some((1, 2, 1, 2)));
        assert_eq!(flipped.bytes.len(), image.bytes.len());
    }

    #[test]
    fn opaque_bounds_cover_all_content() {
        let image = image_with(10, 10, &[(2, 3), (7, 5), (4, 8)]);
        assert_eq!(opaque_bounds(&image), Some((2, 3, 7, 8)));
        assert_eq!(opaque_bounds(&image_with(4, 4, &[])), None);
    }

    #[test]
    fn tight_crop_keeps_padding() {
        let image = image_with(20, 20, &[(5, 6), (9, 10)]);
        let cropped = tight_crop(&image, 2);

        assert_eq!((cropped.width, cropped.height), (9, 9));
        assert_eq!(opaque_bounds(&cropped), Some((2, 2, 6, 6)));
    }

    #[test]
    fn tight_crop_clamps_padding_at_edges() {
        let image = image_with(6, 4, &[(0, 0), (5, 1)]);
        let cropped = tight_crop(&image, 8);

        assert_eq!((cropped.width, cropped.height), (6, 4));
        assert_eq!(cropped.bytes, image.bytes);
    }

    #[test]
    fn transparent_image_is_left_alone() {
        let image = image_with(3, 3, &[]);
        let cropped = tight_crop(&image, 1);
        assert_eq!((cropped.width, cropped.height), (3, 3));
    }

    fn temp_png(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kd-viz-{}-{}.png", name, std::process::id()))
    }

    #[test]
    fn output_in_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("kd-viz-no-such-dir")
            .join("nested")
            .join("tree.png");
        assert!(matches!(prepare_output(&path), Err(VizError::Io(_))));
    }

    #[test]
    fn output_in_existing_directory_is_accepted() {
        let path = temp_png("accepted");
        assert_eq!(prepare_output(&path).unwrap(), path);
    }

    #[test]
    fn bare_file_name_uses_current_directory() {
        assert_eq!(prepare_output(Path::new("tree.PNG")).unwrap(), Path::new("tree.PNG"));
    }

    #[test]
    fn output_without_png_extension_is_rejected() {
        let dir = std::env::temp_dir();
        for name in ["tree", "tree.jpg", "tree.png.txt"] {
            assert!(
                matches!(prepare_output(&dir.join(name)), Err(VizError::InvalidOption(_))),
                "{} accepted",
                name
            );
        }
    }

    #[test]
    fn written_figure_keeps_screen_orientation() {
        // GL order: memory row 0 is the bottom of the screen
        let mut gl_image = image_with(4, 3, &[(0, 2), (1, 2), (2, 2), (3, 2)]);
        gl_image.bytes[..4].copy_from_slice(&[0, 0, 255, 255]);

        let path = temp_png("orientation");
        let size = write_figure(&gl_image, &path).unwrap();
        assert_eq!(size, (4, 3));

        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(decoded.dimensions(), (4, 3));
        // Top row of the file is the top row of the screen
        for x in 0..4 {
            assert_eq!(decoded.get_pixel(x, 0).0, [255, 0, 0, 255]);
        }
        assert_eq!(decoded.get_pixel(0, 2).0, [0, 0, 255, 255]);
        assert_eq!(decoded.get_pixel(1, 2).0[3], 0);
    }

    #[test]
    fn written_figure_is_cropped() {
        let gl_image = image_with(40, 30, &[(20, 15)]);
        let path = temp_png("cropped");
        let size = write_figure(&gl_image, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let side = 2 * TIGHT_PADDING + 1;
        assert_eq!(size, (side, side));
    }

    #[test]
    fn bad_output_paths_return_errors() {
        let gl_image = image_with(2, 2, &[(0, 0)]);

        let no_extension = std::env::temp_dir().join(format!("kd-viz-noext-{}", std::process::id()));
        assert!(matches!(write_figure(&gl_image, &no_extension), Err(VizError::InvalidOption(_))));
        assert!(!no_extension.exists());

        let missing_dir = std::env::temp_dir().join("kd-viz-no-such-dir").join("tree.png");
        assert!(matches!(write_figure(&gl_image, &missing_dir), Err(VizError::Io(_))));
    }
}
