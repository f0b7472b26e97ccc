//! Server-side processing for uploaded review photos
//!
//! Uploaded bytes are decoded, resized, re-encoded as lossless WebP, and
//! written below the configured storage root. The returned public URL is what
//! gets persisted on the photo row.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use fast_image_resize::images::Image;
use fast_image_resize::{IntoImageView, Resizer};
use image::codecs::webp::WebPEncoder;
use image::{ColorType, ImageEncoder, ImageReader};
use uuid::Uuid;

use crate::{Config, Error};

/// Process and store a single review photo, returning its public URL
pub fn store_review_photo(
	bytes: &Bytes,
	config: &Config,
) -> Result<String, Error> {
	let (image, color_type) = resize_image(bytes)?;

	let (abs_filepath, rel_filepath) =
		generate_photo_filepaths(&config.file_storage_path)?;

	save_image_file(&abs_filepath, &image, color_type)?;

	let url = config.static_url.join(&rel_filepath.to_string_lossy())?;

	Ok(url.to_string())
}

/// Save an image to a file
fn save_image_file(
	path: &Path,
	image: &Image<'static>,
	color_type: ColorType,
) -> Result<(), Error> {
	let mut file = BufWriter::new(File::create(path)?);

	WebPEncoder::new_lossless(&mut file).write_image(
		image.buffer(),
		image.width(),
		image.height(),
		color_type.into(),
	)?;

	file.flush()?;

	Ok(())
}

/// Resize an image to 1024x1024 (as close as possible while preserving aspect
/// ratio)
///
/// # Panics
/// Panics if the decoder can't infer the images pixel type
#[inline]
fn resize_image(bytes: &Bytes) -> Result<(Image<'static>, ColorType), Error> {
	let image_reader =
		ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;

	let src_image = image_reader.decode()?;

	// Set width to 1024 but scale height to preserve aspect ratio
	#[allow(clippy::cast_precision_loss)]
	let src_ratio = src_image.height() as f32 / src_image.width() as f32;
	#[allow(clippy::cast_possible_truncation)]
	#[allow(clippy::cast_sign_loss)]
	let dst_height = (1024.0 * src_ratio) as u32;
	let dst_width = 1024;

	let mut dst_image =
		Image::new(dst_width, dst_height, src_image.pixel_type().unwrap());

	let mut resizer = Resizer::new();
	resizer.resize(&src_image, &mut dst_image, None)?;

	Ok((dst_image, src_image.color()))
}

/// Generate both an absolute and relative filepath for a new photo
///
/// The absolute path is used for writing to disk, the relative path is used
/// by the API
///
/// # Panics
/// Panics if some wandering cosmic ray decides to mess up the file path
/// generation
#[inline]
fn generate_photo_filepaths(
	storage_root: &Path,
) -> Result<(PathBuf, PathBuf), Error> {
	let photo_uuid = Uuid::new_v4().to_string();
	let rel_filepath =
		PathBuf::from("review").join(photo_uuid).with_extension("webp");

	let abs_filepath = storage_root.join(&rel_filepath);

	// Ensure all parent directories exist
	let prefix = abs_filepath.parent().unwrap();
	std::fs::create_dir_all(prefix)?;

	Ok((abs_filepath, rel_filepath))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filepaths_land_below_the_storage_root() {
		let root = std::env::temp_dir().join("gomongol-image-test");

		let (abs, rel) = generate_photo_filepaths(&root).unwrap();

		assert!(abs.starts_with(&root));
		assert!(rel.starts_with("review"));
		assert_eq!(rel.extension().unwrap(), "webp");
		assert!(abs.parent().unwrap().is_dir());
	}

	#[test]
	fn resize_preserves_aspect_ratio() {
		// 64x32 source, encoded as an in-memory PNG
		let src = image::DynamicImage::new_rgba8(64, 32);
		let mut bytes = Vec::new();
		src.write_to(
			&mut Cursor::new(&mut bytes),
			image::ImageFormat::Png,
		)
		.unwrap();

		let (resized, _) = resize_image(&Bytes::from(bytes)).unwrap();

		assert_eq!(resized.width(), 1024);
		assert_eq!(resized.height(), 512);
	}
}
