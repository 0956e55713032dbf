use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::consts::MRC_HEADER_SIZE;
use crate::error::{MicroedError, Result};
use crate::frame::{Frame, FrameSequence};
use crate::io::mrc::{MrcHeader, MrcMode, MRC_MACHST_LE, MRC_MAP_TAG};

/// Writes a float32 MRC stack at the raw byte level.
pub struct MrcWriter {
    writer: BufWriter<File>,
    header: MrcHeader,
    frames_written: u32,
}

impl MrcWriter {
    /// Create a new MRC file and write the header.
    pub fn create(path: &Path, header: &MrcHeader) -> Result<Self> {
        if header.mode != MrcMode::Float32 {
            return Err(MicroedError::InvalidMrc(
                "only float32 stacks can be written".into(),
            ));
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Append one section; its size must match the header.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.width() != self.header.nx as usize || frame.height() != self.header.ny as usize {
            return Err(MicroedError::DimensionMismatch {
                width: self.header.nx as usize,
                height: self.header.ny as usize,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }
        for &v in frame.data.iter() {
            self.writer.write_f32::<LittleEndian>(v)?;
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        debug_assert_eq!(self.frames_written, self.header.nz);
        self.writer.flush()?;
        Ok(())
    }
}

/// Write every frame of `sequence` as one float32 MRC stack.
pub fn save_mrc_stack(sequence: &FrameSequence, path: &Path) -> Result<()> {
    let mut header = MrcHeader::for_stack(
        sequence.width() as u32,
        sequence.height() as u32,
        sequence.len() as u32,
    );
    fill_statistics(&mut header, sequence);
    header.labels.push("microed: drift-corrected series".into());

    let mut writer = MrcWriter::create(path, &header)?;
    for frame in sequence {
        writer.write_frame(frame)?;
    }
    writer.finalize()
}

fn fill_statistics(header: &mut MrcHeader, sequence: &FrameSequence) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;

    for frame in sequence {
        for &v in frame.data.iter() {
            let v = v as f64;
            min = min.min(v);
            max = max.max(v);
            sum += v;
            sum_sq += v * v;
            count += 1;
        }
    }

    if count == 0 {
        return;
    }
    let mean = sum / count as f64;
    header.dmin = min as f32;
    header.dmax = max as f32;
    header.dmean = mean as f32;
    header.rms = (sum_sq / count as f64 - mean * mean).max(0.0).sqrt() as f32;
}

fn write_header(w: &mut impl Write, header: &MrcHeader) -> Result<()> {
    // NX, NY, NZ, MODE
    w.write_i32::<LittleEndian>(header.nx as i32)?;
    w.write_i32::<LittleEndian>(header.ny as i32)?;
    w.write_i32::<LittleEndian>(header.nz as i32)?;
    w.write_i32::<LittleEndian>(header.mode.code())?;
    // NXSTART, NYSTART, NZSTART
    for _ in 0..3 {
        w.write_i32::<LittleEndian>(0)?;
    }
    // MX, MY, MZ
    w.write_i32::<LittleEndian>(header.nx as i32)?;
    w.write_i32::<LittleEndian>(header.ny as i32)?;
    w.write_i32::<LittleEndian>(header.nz as i32)?;
    // CELLA
    for &c in &header.cell {
        w.write_f32::<LittleEndian>(c)?;
    }
    // CELLB
    for _ in 0..3 {
        w.write_f32::<LittleEndian>(90.0)?;
    }
    // MAPC, MAPR, MAPS
    for axis in 1..=3 {
        w.write_i32::<LittleEndian>(axis)?;
    }
    w.write_f32::<LittleEndian>(header.dmin)?;
    w.write_f32::<LittleEndian>(header.dmax)?;
    w.write_f32::<LittleEndian>(header.dmean)?;
    // ISPG: 0 marks an image stack
    w.write_i32::<LittleEndian>(0)?;
    // NSYMBT
    w.write_i32::<LittleEndian>(header.extended_header_size as i32)?;
    // EXTRA (100 bytes), with NVERSION at byte 108
    w.write_all(&[0u8; 12])?;
    w.write_i32::<LittleEndian>(20140)?;
    w.write_all(&[0u8; 84])?;
    // ORIGIN
    for _ in 0..3 {
        w.write_f32::<LittleEndian>(0.0)?;
    }
    w.write_all(MRC_MAP_TAG)?;
    w.write_all(&MRC_MACHST_LE)?;
    w.write_f32::<LittleEndian>(header.rms)?;

    let labels: Vec<&String> = header.labels.iter().take(10).collect();
    w.write_i32::<LittleEndian>(labels.len() as i32)?;
    for i in 0..10 {
        let text = labels.get(i).map(|s| s.as_str()).unwrap_or("");
        write_fixed_string(w, text, 80)?;
    }

    debug_assert_eq!(224 + 10 * 80, MRC_HEADER_SIZE);
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    // Pad with zeros
    for _ in to_write..len {
        w.write_all(&[0u8])?;
    }
    Ok(())
}
