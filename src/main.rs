use std::path::{Path, PathBuf};

use clap::Parser;

use transcript_pdf::{
    Bitmap, BitmapFormat, CaptureError, CaptureHandle, CaptureOptions, ChartCapture, ContentBlock,
    DocConfig, Error, Exporter,
};

/// Render a JSON block list (styled text, tables, chart references) to a
/// paginated PDF report.
#[derive(Parser)]
#[command(name = "transcript-pdf", version)]
struct Args {
    /// Block list, as a JSON array of {kind, id, ...} objects
    input: PathBuf,

    /// Output PDF path
    output: PathBuf,

    /// Directory holding pre-rendered chart bitmaps named <handle>.png or
    /// <handle>.jpg; chart blocks whose handle has no file are skipped
    #[arg(long)]
    charts: Option<PathBuf>,
}

/// File-backed capture: a chart handle resolves to a bitmap on disk. Files
/// are already rendered, so the settle delays are zeroed in the CLI config.
struct FileCapture {
    dir: Option<PathBuf>,
}

impl FileCapture {
    fn locate(&self, handle: &CaptureHandle) -> Option<(PathBuf, BitmapFormat)> {
        let dir = self.dir.as_deref()?;
        for (ext, format) in [
            ("png", BitmapFormat::Png),
            ("jpg", BitmapFormat::Jpeg),
            ("jpeg", BitmapFormat::Jpeg),
        ] {
            let path = dir.join(format!("{}.{ext}", handle.0));
            if path.is_file() {
                return Some((path, format));
            }
        }
        None
    }
}

impl ChartCapture for FileCapture {
    async fn render_to_bitmap(
        &mut self,
        handle: &CaptureHandle,
        _options: &CaptureOptions,
    ) -> Result<Bitmap, CaptureError> {
        let Some((path, format)) = self.locate(handle) else {
            return Err(CaptureError::NotMounted);
        };
        let data = std::fs::read(&path)
            .map_err(|e| CaptureError::Failed(format!("{}: {e}", path.display())))?;
        let (pixel_width, pixel_height) = image::ImageReader::new(std::io::Cursor::new(&data))
            .with_guessed_format()
            .map_err(|e| CaptureError::Failed(e.to_string()))?
            .into_dimensions()
            .map_err(|e| CaptureError::Failed(format!("{}: {e}", path.display())))?;
        Ok(Bitmap {
            data,
            format,
            pixel_width,
            pixel_height,
        })
    }
}

fn load_blocks(path: &Path) -> Result<Vec<ContentBlock>, Error> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(Error::Input)
}

fn run(args: &Args) -> Result<(), Error> {
    let blocks = load_blocks(&args.input)?;

    let config = DocConfig {
        settle_initial_ms: 0,
        settle_per_chart_ms: 0,
        ..DocConfig::default()
    };
    let exporter = Exporter::new(config);
    let mut capture = FileCapture {
        dir: args.charts.clone(),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(Error::Io)?;
    let bytes = rt.block_on(exporter.export_pdf(&blocks, &mut capture))?;

    std::fs::write(&args.output, &bytes)?;
    log::info!("wrote {} ({} bytes)", args.output.display(), bytes.len());
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
