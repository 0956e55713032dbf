use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::consts::{MRC_HEADER_SIZE, MRC_MODE_FLOAT32};
use crate::error::{MicroedError, Result};
use crate::frame::{Frame, FrameMetadata, SourceInfo};

pub(crate) const MRC_MAP_TAG: &[u8; 4] = b"MAP ";
/// Machine stamp for little-endian data.
pub(crate) const MRC_MACHST_LE: [u8; 4] = [0x44, 0x44, 0x00, 0x00];
const MRC_MACHST_BE: [u8; 4] = [0x11, 0x11, 0x00, 0x00];

/// Pixel data modes understood by the reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MrcMode {
    Int8,
    Int16,
    Float32,
    Uint16,
}

impl MrcMode {
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Self::Int8),
            1 => Ok(Self::Int16),
            MRC_MODE_FLOAT32 => Ok(Self::Float32),
            6 => Ok(Self::Uint16),
            other => Err(MicroedError::InvalidMrc(format!(
                "unsupported data mode {}",
                other
            ))),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Int8 => 0,
            Self::Int16 => 1,
            Self::Float32 => MRC_MODE_FLOAT32,
            Self::Uint16 => 6,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Float32 => 4,
        }
    }

    pub fn bit_depth(&self) -> u8 {
        (self.bytes_per_pixel() * 8) as u8
    }
}

/// The fields of the 1024-byte MRC2014 header this crate reads and writes.
#[derive(Clone, Debug)]
pub struct MrcHeader {
    pub nx: u32,
    pub ny: u32,
    pub nz: u32,
    pub mode: MrcMode,
    /// Cell dimensions in Angstrom; pixel size = cell / sampling.
    pub cell: [f32; 3],
    pub dmin: f32,
    pub dmax: f32,
    pub dmean: f32,
    pub rms: f32,
    /// Size of the extended header that follows the main header.
    pub extended_header_size: u32,
    pub labels: Vec<String>,
}

impl MrcHeader {
    /// Header for a float32 stack of `nz` images of `nx` x `ny` pixels.
    pub fn for_stack(nx: u32, ny: u32, nz: u32) -> Self {
        Self {
            nx,
            ny,
            nz,
            mode: MrcMode::Float32,
            cell: [nx as f32, ny as f32, nz as f32],
            dmin: 0.0,
            dmax: 0.0,
            dmean: 0.0,
            rms: 0.0,
            extended_header_size: 0,
            labels: Vec::new(),
        }
    }

    /// Total bytes per section.
    pub fn frame_byte_size(&self) -> Result<usize> {
        (self.nx as usize)
            .checked_mul(self.ny as usize)
            .and_then(|pixels| pixels.checked_mul(self.mode.bytes_per_pixel()))
            .ok_or_else(|| {
                MicroedError::InvalidMrc(format!(
                    "section size {}x{} overflows",
                    self.nx, self.ny
                ))
            })
    }

    /// Byte offset of section `index`; `index == nz` gives the end of the data.
    pub fn section_offset(&self, index: usize) -> Result<usize> {
        self.frame_byte_size()?
            .checked_mul(index)
            .and_then(|bytes| bytes.checked_add(self.data_offset()))
            .ok_or_else(|| {
                MicroedError::InvalidMrc(format!("offset of section {} overflows", index))
            })
    }

    /// Offset of the first pixel byte.
    pub fn data_offset(&self) -> usize {
        MRC_HEADER_SIZE + self.extended_header_size as usize
    }
}

/// Memory-mapped MRC stack reader.
pub struct MrcReader {
    mmap: Mmap,
    pub header: MrcHeader,
}

impl MrcReader {
    /// Open an MRC file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < MRC_HEADER_SIZE {
            return Err(MicroedError::InvalidMrc(
                "file too small for MRC header".into(),
            ));
        }

        let header = parse_header(&mmap[..MRC_HEADER_SIZE])?;

        let expected = header.section_offset(header.nz as usize)?;
        if mmap.len() < expected {
            return Err(MicroedError::InvalidMrc(format!(
                "file truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.nz as usize
    }

    /// Read one section of the stack as a frame.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let count = self.frame_count();
        if index >= count {
            return Err(MicroedError::InvalidMrc(format!(
                "section {} out of range (total: {})",
                index, count
            )));
        }
        let size = self.header.frame_byte_size()?;
        let offset = self.header.section_offset(index)?;
        let raw = self.mmap.get(offset..offset + size).ok_or_else(|| {
            MicroedError::InvalidMrc(format!("section {} lies past the end of the file", index))
        })?;

        let data = decode_section(
            raw,
            self.header.ny as usize,
            self.header.nx as usize,
            self.header.mode,
        );
        let mut frame = Frame::new(data, self.header.mode.bit_depth());
        frame.metadata = FrameMetadata {
            frame_index: index,
            ..FrameMetadata::default()
        };
        Ok(frame)
    }

    /// Iterator over all sections.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }

    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.nx,
            height: self.header.ny,
            bit_depth: self.header.mode.bit_depth(),
        }
    }
}

fn parse_header(buf: &[u8]) -> Result<MrcHeader> {
    let machst = &buf[212..216];
    if machst == MRC_MACHST_BE {
        return Err(MicroedError::InvalidMrc(
            "big-endian MRC files are not supported".into(),
        ));
    }

    let mut cursor = Cursor::new(buf);
    let nx = cursor.read_i32::<LittleEndian>()?;
    let ny = cursor.read_i32::<LittleEndian>()?;
    let nz = cursor.read_i32::<LittleEndian>()?;
    let mode = MrcMode::from_code(cursor.read_i32::<LittleEndian>()?)?;

    if nx <= 0 || ny <= 0 || nz < 0 {
        return Err(MicroedError::InvalidMrc(format!(
            "invalid dimensions {}x{}x{}",
            nx, ny, nz
        )));
    }

    // Cell dimensions start at word 10.
    cursor.set_position(40);
    let mut cell = [0f32; 3];
    for c in &mut cell {
        *c = cursor.read_f32::<LittleEndian>()?;
    }

    cursor.set_position(76);
    let dmin = cursor.read_f32::<LittleEndian>()?;
    let dmax = cursor.read_f32::<LittleEndian>()?;
    let dmean = cursor.read_f32::<LittleEndian>()?;
    let _ispg = cursor.read_i32::<LittleEndian>()?;
    let nsymbt = cursor.read_i32::<LittleEndian>()?;

    cursor.set_position(216);
    let rms = cursor.read_f32::<LittleEndian>()?;
    let nlabl = cursor.read_i32::<LittleEndian>()?.clamp(0, 10) as usize;
    let labels = (0..nlabl)
        .map(|i| read_fixed_string(&buf[224 + i * 80..224 + (i + 1) * 80]))
        .collect();

    Ok(MrcHeader {
        nx: nx as u32,
        ny: ny as u32,
        nz: nz as u32,
        mode,
        cell,
        dmin,
        dmax,
        dmean,
        rms,
        extended_header_size: nsymbt.max(0) as u32,
        labels,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn decode_section(raw: &[u8], height: usize, width: usize, mode: MrcMode) -> Array2<f32> {
    let bpp = mode.bytes_per_pixel();
    let mut data = Array2::<f32>::zeros((height, width));

    for row in 0..height {
        for col in 0..width {
            let idx = (row * width + col) * bpp;
            let bytes = &raw[idx..idx + bpp];
            data[[row, col]] = match mode {
                MrcMode::Int8 => bytes[0] as i8 as f32,
                MrcMode::Int16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32,
                MrcMode::Uint16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f32,
                MrcMode::Float32 => {
                    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
                }
            };
        }
    }

    data
}
