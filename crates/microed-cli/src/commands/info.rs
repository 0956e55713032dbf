use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use microed_core::io::mrc::MrcReader;
use microed_core::io::{FileCodec, FrameDecoder};

#[derive(Args)]
pub struct InfoArgs {
    /// Stack file (.mrc or .tif)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let is_mrc = args
        .file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mrc") || e.eq_ignore_ascii_case("mrcs"));

    if is_mrc {
        let reader = MrcReader::open(&args.file)?;
        let info = reader.source_info(&args.file);
        println!("File:        {}", info.filename.display());
        println!("Frames:      {}", info.total_frames);
        println!("Dimensions:  {}x{}", info.width, info.height);
        println!("Bit depth:   {}", info.bit_depth);
        println!("Mode:        {:?}", reader.header.mode);
        println!(
            "Range:       {} .. {} (mean {})",
            reader.header.dmin, reader.header.dmax, reader.header.dmean
        );
        for label in &reader.header.labels {
            println!("Label:       {}", label);
        }
        return Ok(());
    }

    let frames = FileCodec.decode_stack(&args.file)?;
    let Some(first) = frames.first() else {
        anyhow::bail!("{} contains no frames", args.file.display());
    };
    println!("File:        {}", args.file.display());
    println!("Frames:      {}", frames.len());
    println!("Dimensions:  {}x{}", first.width(), first.height());
    println!("Bit depth:   {}", first.original_bit_depth);

    Ok(())
}
