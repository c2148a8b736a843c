mod logger;

use anyhow::{Context, Result, bail};
use booklet_epub::{CoverImage, DEFAULT_COMPRESSION_LEVEL, media_type_for_extension};
use booklet_impose::{
    ImpositionOptions, ImpositionStatistics, ProgressUpdate, SheetLayout, SignatureSize,
};
use clap::{Parser, Subcommand};
use logger::CliLogger;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(name = "booklet", about = "Booklet imposition and EPUB cover tools", version)]
struct Cli {
    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reorder PDF pages into printable booklet signatures
    Impose {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (default: <input stem>_booklet.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Logical pages per sheet side: 2 or 4
        #[arg(long)]
        layout: Option<usize>,

        /// Pages per signature: 4, 8, 16 or 32
        #[arg(long)]
        signature: Option<usize>,

        /// Stamp running page numbers before imposing
        #[arg(long)]
        page_numbers: bool,

        /// JSON options file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Concatenate PDFs in the order given
    Merge {
        /// Input PDF files (at least two)
        #[arg(short, long, required = true, num_args = 2..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace the cover image of an EPUB
    ReplaceCover {
        /// Input EPUB file
        #[arg(short, long)]
        input: PathBuf,

        /// New cover image
        #[arg(long)]
        image: PathBuf,

        /// Image media type (inferred from the image extension if omitted)
        #[arg(long)]
        media_type: Option<String>,

        /// Deflate level 0-9
        #[arg(long, default_value_t = DEFAULT_COMPRESSION_LEVEL)]
        compression_level: i64,

        /// Output EPUB file (default: <input stem>_cover.epub)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show imposition statistics without writing output
    Stats {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Logical pages per sheet side: 2 or 4
        #[arg(long, default_value_t = 2)]
        layout: usize,

        /// Pages per signature: 4, 8, 16 or 32
        #[arg(long, default_value_t = 16)]
        signature: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(CliLogger::level_for(cli.verbose, cli.quiet)).init()?;

    match cli.command {
        Commands::Impose {
            input,
            output,
            layout,
            signature,
            page_numbers,
            config,
        } => {
            let mut options = match config {
                Some(path) => ImpositionOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ImpositionOptions::default(),
            };
            if let Some(layout) = layout {
                options.layout = SheetLayout::try_from(layout)?;
            }
            if let Some(signature) = signature {
                options.signature_size = SignatureSize::try_from(signature)?;
            }
            options.page_numbers |= page_numbers;

            let output = output.unwrap_or_else(|| sibling_with_suffix(&input, "_booklet", "pdf"));
            let bytes = read_input(&input).await?;

            let (reporter, progress) = progress_logger();
            let imposed = booklet_impose::impose_pdf_bytes(bytes, &options, reporter).await;
            progress.await?;
            let imposed = imposed?;

            write_output(&output, &imposed.bytes).await?;
            print_statistics(&imposed.statistics);
            println!("Imposed → {}", output.display());
        }

        Commands::Merge { input, output } => {
            let mut inputs = Vec::with_capacity(input.len());
            for path in &input {
                inputs.push(read_input(path).await?);
            }

            let (reporter, progress) = progress_logger();
            let merged = booklet_impose::merge_pdf_bytes(inputs, reporter).await;
            progress.await?;
            let merged = merged?;

            write_output(&output, &merged).await?;
            println!("Merged {} files → {}", input.len(), output.display());
        }

        Commands::ReplaceCover {
            input,
            image,
            media_type,
            compression_level,
            output,
        } => {
            let media_type = match media_type {
                Some(media_type) => media_type,
                None => infer_media_type(&image)?.to_string(),
            };
            let cover = CoverImage::new(read_input(&image).await?, media_type);
            let bytes = read_input(&input).await?;

            let output = output.unwrap_or_else(|| sibling_with_suffix(&input, "_cover", "epub"));
            let updated = booklet_epub::replace_cover_async(bytes, cover, compression_level).await?;

            write_output(&output, &updated).await?;
            println!("Cover replaced → {}", output.display());
        }

        Commands::Stats {
            input,
            layout,
            signature,
        } => {
            let options = ImpositionOptions::new(
                SheetLayout::try_from(layout)?,
                SignatureSize::try_from(signature)?,
            );
            let document = booklet_impose::load_pdf(&input)
                .await
                .with_context(|| format!("Failed to load {}", input.display()))?;
            let pages = booklet_impose::page_count(&document);

            let stats = booklet_impose::calculate_statistics(pages, &options)?;
            print_statistics(&stats);
            match SignatureSize::suggest(pages) {
                Some(size) => println!("  Suggested signature: {} pages", size.pages()),
                None => println!("  Suggested signature: none (fewer than 4 pages)"),
            }
        }
    }

    Ok(())
}

/// Progress reporter whose updates are logged until the operation drops it
fn progress_logger() -> (mpsc::UnboundedSender<ProgressUpdate>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressUpdate>();
    let handle = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            log::info!("[{:>3}%] {}", update.percent, update.message);
        }
    });
    (tx, handle)
}

fn print_statistics(stats: &ImpositionStatistics) {
    println!("Imposition Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);
    println!("  Padded pages: {}", stats.padded_pages);
    println!("  Signatures: {}", stats.signatures);
    println!(
        "  Output pages: {} ({} per page)",
        stats.output_pages, stats.pages_per_output_page
    );
}

fn infer_media_type(image: &Path) -> Result<&'static str> {
    let extension = image
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    match media_type_for_extension(extension) {
        Some(media_type) => Ok(media_type),
        None => bail!(
            "Cannot infer media type of {}; pass --media-type",
            image.display()
        ),
    }
}

/// `<dir>/<stem><suffix>.<extension>` next to `input`
fn sibling_with_suffix(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to a `.part` sibling and rename it into place
async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    if let Err(err) = tokio::fs::write(&partial, bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(err).with_context(|| format!("Failed to write {}", partial.display()));
    }
    tokio::fs::rename(&partial, path)
        .await
        .with_context(|| format!("Failed to move output into {}", path.display()))?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
