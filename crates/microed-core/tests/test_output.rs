use std::path::Path;

use approx::assert_relative_eq;
use ndarray::Array2;

use microed_core::error::MicroedError;
use microed_core::frame::{Frame, FrameSequence};
use microed_core::io::mrc::{MrcMode, MrcReader};
use microed_core::io::tiff_stack::load_tiff_stack;
use microed_core::io::{load_sequence, save_sequence, FileCodec, InputSource, OutputFormat};

fn ramp_sequence(frames: usize, width: usize, height: usize) -> FrameSequence {
    let frames = (0..frames)
        .map(|i| {
            let data = Array2::from_shape_fn((height, width), |(row, col)| {
                (i * 1000 + row * width + col) as f32 * 0.5
            });
            Frame::new(data, 32)
        })
        .collect();
    FrameSequence::new(frames).unwrap()
}

#[test]
fn test_format_from_suffix() {
    assert_eq!(
        OutputFormat::from_path(Path::new("out/result.mrc")).unwrap(),
        OutputFormat::Mrc
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("result.tif")).unwrap(),
        OutputFormat::Tiff
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("result.tiff")).unwrap(),
        OutputFormat::Tiff
    );
}

#[test]
fn test_unsupported_suffix_rejected() {
    for name in ["result.png", "result.MRC", "result.TIF", "result", "result.mrc.bak"] {
        let err = OutputFormat::from_path(Path::new(name)).unwrap_err();
        assert!(
            matches!(err, MicroedError::UnsupportedOutputFormat(ref p) if p == Path::new(name)),
            "{name}: {err}"
        );
    }
}

#[test]
fn test_unsupported_output_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.png");
    let err = save_sequence(&ramp_sequence(2, 8, 4), &path).unwrap_err();
    assert!(matches!(err, MicroedError::UnsupportedOutputFormat(_)));
    assert!(!path.exists());
}

#[test]
fn test_mrc_stack_header_and_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.mrc");
    let sequence = ramp_sequence(3, 8, 4);

    let format = save_sequence(&sequence, &path).unwrap();
    assert_eq!(format, OutputFormat::Mrc);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 1024 + 3 * 8 * 4 * 4);
    assert_eq!(&bytes[208..212], b"MAP ");
    assert_eq!(&bytes[212..214], &[0x44, 0x44]);
    assert_eq!(
        i32::from_le_bytes([bytes[108], bytes[109], bytes[110], bytes[111]]),
        20140
    );

    let reader = MrcReader::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 3);
    assert_eq!(reader.header.nx, 8);
    assert_eq!(reader.header.ny, 4);
    assert_eq!(reader.header.mode, MrcMode::Float32);
    assert_relative_eq!(reader.header.dmin, 0.0);
    assert_relative_eq!(reader.header.dmax, (2000 + 31) as f32 * 0.5);
    assert!(!reader.header.labels.is_empty());

    for (i, original) in sequence.iter().enumerate() {
        let frame = reader.read_frame(i).unwrap();
        assert_eq!(frame.data, original.data, "section {i}");
    }
}

#[test]
fn test_tiff_stack_one_page_per_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.tiff");
    let sequence = ramp_sequence(4, 6, 5);

    assert_eq!(save_sequence(&sequence, &path).unwrap(), OutputFormat::Tiff);

    let pages = load_tiff_stack(&path).unwrap();
    assert_eq!(pages.len(), 4);
    for (page, original) in pages.iter().zip(sequence.iter()) {
        assert_eq!(page.width(), 6);
        assert_eq!(page.height(), 5);
        assert_eq!(page.data, original.data);
    }
}

#[test]
fn test_mrc_reader_rejects_short_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.mrc");
    std::fs::write(&path, [0u8; 100]).unwrap();
    assert!(matches!(
        MrcReader::open(&path),
        Err(MicroedError::InvalidMrc(_))
    ));
}

/// Bare 1024-byte header declaring `nx x ny x nz` float32 sections and no data.
fn header_only(nx: i32, ny: i32, nz: i32) -> Vec<u8> {
    let mut bytes = vec![0u8; 1024];
    for (i, value) in [nx, ny, nz, 2].iter().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
    }
    bytes[208..212].copy_from_slice(b"MAP ");
    bytes[212..216].copy_from_slice(&[0x44, 0x44, 0, 0]);
    bytes
}

#[test]
fn test_mrc_reader_rejects_oversized_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.mrc");
    std::fs::write(&path, header_only(65536, 65536, 1 << 30)).unwrap();

    assert!(matches!(
        MrcReader::open(&path),
        Err(MicroedError::InvalidMrc(_))
    ));
    let err = load_sequence(&InputSource::Stack(path), &FileCodec).unwrap_err();
    assert!(matches!(err, MicroedError::Decode { .. }), "{err}");
}

#[test]
fn test_mrc_reader_rejects_missing_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.mrc");
    std::fs::write(&path, header_only(16, 16, 3)).unwrap();

    assert!(matches!(
        MrcReader::open(&path),
        Err(MicroedError::InvalidMrc(_))
    ));
}
