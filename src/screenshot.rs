//! Frame capture to date-named PNG files.
//!
//! Filenames follow `<name>-YYYYMMDD<suffix>.png` where the suffix is empty
//! for the first shot of the day, then `a`..`z`, then `aa`..`zz`. The scheme
//! sorts by time in a file manager even when file metadata is lost.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("all screenshot names for this day are taken")]
    NamesExhausted,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

// "" + a..z + aa..zz
const MAX_SUFFIXES: usize = 1 + 26 + 26 * 26;

fn suffix(i: usize) -> String {
    match i {
        0 => String::new(),
        1..=26 => ((b'a' + (i - 1) as u8) as char).to_string(),
        _ => {
            let n = i - 27;
            let hi = (b'a' + (n / 26) as u8) as char;
            let lo = (b'a' + (n % 26) as u8) as char;
            format!("{hi}{lo}")
        }
    }
}

/// Pick the first free `<name>-YYYYMMDD<suffix>.png` according to `exists`.
pub fn dated_file_name(
    name: &str,
    date: NaiveDate,
    exists: impl Fn(&str) -> bool,
) -> Result<String, ScreenshotError> {
    let stamp = date.format("%Y%m%d");
    for i in 0..MAX_SUFFIXES {
        let candidate = format!("{name}-{stamp}{}.png", suffix(i));
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }
    Err(ScreenshotError::NamesExhausted)
}

/// Write `image` into `dir` under today's first free dated name.
pub fn save(dir: &Path, name: &str, image: image::RgbaImage) -> Result<PathBuf, ScreenshotError> {
    std::fs::create_dir_all(dir)?;
    let today = chrono::Local::now().date_naive();
    let file_name = dated_file_name(name, today, |candidate| dir.join(candidate).exists())?;
    let path = dir.join(file_name);
    image.save(&path)?;
    info!("saved screenshot at {}", path.display());
    Ok(path)
}

/// Read the rendered frame back from the GPU as an RGBA image.
///
/// The texture must have been created with `COPY_SRC` usage. Rows are padded
/// to the 256-byte alignment wgpu requires for buffer copies and stripped
/// again on the way out; BGRA surface formats are swizzled to RGBA.
pub fn read_frame(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> image::RgbaImage {
    let width = texture.width();
    let height = texture.height();
    let bytes_per_row = width * 4;
    let padded_bytes_per_row = bytes_per_row.div_ceil(256) * 256;

    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("screenshot_readback"),
        size: (padded_bytes_per_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("screenshot_encoder"),
    });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    slice.map_async(wgpu::MapMode::Read, |result| {
        result.expect("failed to map screenshot buffer");
    });
    let _ = device.poll(wgpu::PollType::Wait);

    let swap_bgra = matches!(
        texture.format(),
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    );

    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((bytes_per_row * height) as usize);
    for row in 0..height {
        let start = (row * padded_bytes_per_row) as usize;
        let end = start + bytes_per_row as usize;
        pixels.extend_from_slice(&data[start..end]);
    }
    drop(data);
    readback.unmap();

    if swap_bgra {
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }

    image::RgbaImage::from_raw(width, height, pixels)
        .expect("screenshot buffer size mismatch")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()
    }

    #[test]
    fn test_first_shot_of_the_day_has_no_suffix() {
        let name = dated_file_name("overland", day(), |_| false).unwrap();
        assert_eq!(name, "overland-20260804.png");
    }

    #[test]
    fn test_suffixes_count_up_alphabetically() {
        let taken = ["overland-20260804.png", "overland-20260804a.png"];
        let name = dated_file_name("overland", day(), |c| taken.contains(&c)).unwrap();
        assert_eq!(name, "overland-20260804b.png");
    }

    #[test]
    fn test_two_letter_suffixes_after_z() {
        // Everything through the single letters is taken.
        let name = dated_file_name("overland", day(), |c| {
            c.len() <= "overland-20260804z.png".len()
        })
        .unwrap();
        assert_eq!(name, "overland-20260804aa.png");
    }

    #[test]
    fn test_exhausted_names_error() {
        let err = dated_file_name("overland", day(), |_| true).unwrap_err();
        assert!(matches!(err, ScreenshotError::NamesExhausted));
    }

    #[test]
    fn test_suffix_sequence() {
        assert_eq!(suffix(0), "");
        assert_eq!(suffix(1), "a");
        assert_eq!(suffix(26), "z");
        assert_eq!(suffix(27), "aa");
        assert_eq!(suffix(28), "ab");
        assert_eq!(suffix(52), "az");
        assert_eq!(suffix(53), "ba");
        assert_eq!(suffix(MAX_SUFFIXES - 1), "zz");
    }
}
