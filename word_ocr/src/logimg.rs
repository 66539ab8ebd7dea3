//! Support for logging image files to a specified directory using the same
//! log levels as the `log` framework.

use lazy_static::lazy_static;
use log::warn;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::pixmap::Pixmap;

/// Get the path to which we are supposed to log images.
pub fn log_image_dir() -> Option<&'static Path> {
    lazy_static! {
        static ref PATH: Option<PathBuf> = {
            env::var_os("RUST_LOG_IMAGE_DIR").map(PathBuf::from)
        };
    }
    PATH.as_deref()
}

/// Allocate a number used to keep the images from different words apart.
pub fn next_image_id() -> usize {
    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Write an image to the specified path. Debug images are a convenience,
/// so failures are logged and otherwise ignored.
pub fn write_pixmap(path: &Path, pixmap: &Pixmap) {
    if pixmap.is_empty() {
        return;
    }
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("unable to create {}: {}", parent.display(), err);
            return;
        }
    }
    if let Err(err) = pixmap.to_image().save(path) {
        warn!("unable to log image {}: {}", path.display(), err);
    }
}

/// If `lvl` would normally be logged by the `log` framework, and
/// `RUST_LOG_IMAGE_DIR` is set, then use `$($path_arg)+` as a format
/// pattern to construct a file name, and write out the image.
macro_rules! log_pixmap {
    ($lvl:expr, $image:expr, $($path_arg:tt)+) => ({
        if log::log_enabled!($lvl) {
            if let Some(dir) = $crate::logimg::log_image_dir() {
                let file_path = dir.join(format!($($path_arg)+));
                log::log!($lvl, "image: {}", file_path.display());
                $crate::logimg::write_pixmap(&file_path, $image);
            }
        }
    })
}

/// See `log_pixmap!`.  Uses the log level `log::Level::Debug`.
macro_rules! debug_pixmap {
    ($image:expr, $($path_arg:tt)+) => ({
        log_pixmap!(log::Level::Debug, $image, $($path_arg)+);
    })
}

/// See `log_pixmap!`.  Uses the log level `log::Level::Trace`.
macro_rules! trace_pixmap {
    ($image:expr, $($path_arg:tt)+) => ({
        log_pixmap!(log::Level::Trace, $image, $($path_arg)+);
    })
}

#[test]
fn image_ids_are_distinct() {
    let a = next_image_id();
    let b = next_image_id();
    assert_ne!(a, b);
}

#[test]
fn unwritable_log_path_is_not_fatal() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // The parent "directory" is a regular file, so this can't be created.
    let path = file.path().join("word").join("0000.png");
    write_pixmap(&path, &Pixmap::blank(2, 2));
    assert!(!path.exists());
}

#[test]
fn writes_nested_log_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("word").join("0000.png");
    write_pixmap(&path, &Pixmap::blank(2, 2));
    assert!(path.exists());
}
