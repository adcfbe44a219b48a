// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished raster to disk as a PNG.

use image::png::PNGEncoder;
use image::ColorType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use error::OutputError;
use grid::BYTES_PER_PIXEL;

/// Encodes an interleaved RGB raster, row-major with no padding, as a
/// lossless PNG at `path`.
pub fn write_png(path: &Path, raster: &[u8], width: usize, height: usize) -> Result<(), OutputError> {
    let expected = width * height * BYTES_PER_PIXEL;
    if raster.len() != expected {
        return Err(OutputError::Size {
            len: raster.len(),
            width,
            height,
            expected,
        });
    }

    let name = path.display().to_string();
    let output = File::create(path).map_err(|cause| OutputError::Open {
        path: name.clone(),
        cause,
    })?;
    let encoder = PNGEncoder::new(BufWriter::new(output));
    encoder
        .encode(raster, width as u32, height as u32, ColorType::RGB(8))
        .map_err(|cause| OutputError::Write { path: name, cause })?;
    debug!("wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile;

    #[test]
    fn writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let raster: Vec<u8> = (0..2 * 3 * 3).map(|i| i as u8).collect();
        write_png(&path, &raster, 3, 2).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn open_failures_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        match write_png(&path, &[0; 3], 1, 1) {
            Err(OutputError::Open { .. }) => {}
            other => panic!("expected an open error, got {:?}", other),
        }
    }

    #[test]
    fn short_rasters_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        match write_png(&path, &[0; 5], 1, 2) {
            Err(OutputError::Size { expected: 6, .. }) => {}
            other => panic!("expected a size error, got {:?}", other),
        }
        assert!(!path.exists());
    }
}
