use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use time::OffsetDateTime;
use time::macros::format_description;

use pagescan::{
    DocumentDetector, ImageSequenceSource, PageAssembler, ScanConfig, ScanSession, TickOutcome,
};

#[derive(Parser)]
#[command(name = "pagescan")]
#[command(about = "Detect, flatten and collect document pages from camera frames")]
struct Cli {
    /// Input frames, processed in order (one captured page per frame)
    #[arg(value_name = "IMAGE", required = true)]
    frames: Vec<PathBuf>,

    /// Directory for the captured page images
    #[arg(short, long, value_name = "DIR", default_value = "pages")]
    out_dir: PathBuf,

    /// Also assemble the captured pages into a PDF at this path
    #[arg(long, value_name = "FILE")]
    pdf: Option<PathBuf>,

    /// Detection settings file (JSON); absent fields use defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save intermediate detection stages to this directory
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    // Load the frame sequence up front.
    let mut frames = Vec::with_capacity(args.frames.len());
    for path in &args.frames {
        if args.verbose {
            println!("Loading frame: {:?}", path);
        }
        let img = ImageReader::open(path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode {:?}: {}", path, e))?;
        frames.push(img);
    }

    // Dump per-stage intermediates before the frames move into the session.
    if let Some(debug_dir) = &args.debug_out {
        std::fs::create_dir_all(debug_dir)?;
        let detector = DocumentDetector::new(config.clone());
        for (i, frame) in frames.iter().enumerate() {
            let trace = detector.detect_traced(frame);
            trace
                .smoothed
                .save(debug_dir.join(format!("{:02}-smoothed.png", i + 1)))?;
            trace
                .edges
                .save(debug_dir.join(format!("{:02}-edges.png", i + 1)))?;
            if args.verbose {
                println!(
                    "  Debug: frame {} has {} contours",
                    i + 1,
                    trace.contour_count
                );
            }
        }
    }

    std::fs::create_dir_all(&args.out_dir)?;

    let total = frames.len();
    let mut session = ScanSession::new(ImageSequenceSource::new(frames), config);
    session.start_detection()?;

    for i in 0..total {
        match session.tick() {
            TickOutcome::Found => {
                if args.verbose {
                    println!("Frame {}: document boundary found", i + 1);
                }
            }
            TickOutcome::Cleared => {
                if args.verbose {
                    println!("Frame {}: no boundary, using center crop", i + 1);
                }
            }
            TickOutcome::Halted => anyhow::bail!("detection halted on frame {}", i + 1),
            TickOutcome::Skipped => anyhow::bail!("detection is not running"),
        }

        let page = session.capture()?;
        if args.verbose {
            println!(
                "  Captured page {} ({}x{}, {})",
                page.index + 1,
                page.image.width(),
                page.image.height(),
                if page.rectified {
                    "rectified"
                } else {
                    "fallback crop"
                }
            );
        }
        session.source_mut().advance();
    }

    let pages = session.finish();

    for page in pages {
        let name = format!("page-{:02}.png", page.index + 1);
        page.image.save(args.out_dir.join(&name))?;
    }
    println!("Saved {} pages to {:?}", pages.len(), args.out_dir);

    if let Some(pdf_path) = &args.pdf {
        let date_format = format_description!("[year]-[month]-[day]");
        let date = OffsetDateTime::now_utc().format(&date_format)?;
        let assembler = PageAssembler::new(format!("Scanned document {}", date));
        assembler.write_to_file(pages, pdf_path)?;
        println!("Wrote PDF: {:?}", pdf_path);
    }

    Ok(())
}
