use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use makbuz_ocr::{OcrError, OcrSpaceClient};
use makbuz_summarize::GeminiClient;

mod config;
mod pipeline;

use config::Config;
use pipeline::{ScanError, ScanPipeline};

/// Scan a single receipt image: downscale it, read it with OCR.space and
/// summarize the recognized text into structured JSON with a generative
/// model.
#[derive(Parser)]
#[command(name = "makbuz", version, about)]
struct Cli {
    /// Path to the receipt image
    #[arg(default_value = "receipt.jpg")]
    image: PathBuf,
    /// Where to write the downscaled upload copy
    #[arg(long, default_value = "resized_image.jpg")]
    resized: PathBuf,
    /// OCR language code passed to OCR.space
    #[arg(long, default_value = "tur")]
    language: String,
    /// Generative model used for summarization
    #[arg(long, default_value = "gemini-2.0-flash")]
    model: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Credentials are checked before the image or the network is touched.
    let config = match Config::from_env(cli.image, cli.resized, cli.language, cli.model) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let recognizer = OcrSpaceClient::new(
        config.ocr_endpoint.clone(),
        config.ocr_api_key.clone(),
        config.language.clone(),
    );
    let summarizer = GeminiClient::new(
        config.gemini_endpoint.clone(),
        config.gemini_api_key.clone(),
        config.model.clone(),
    );
    let pipeline = ScanPipeline::new(recognizer, summarizer, config.resized_path.clone());

    match pipeline.run(&config.image_path).await {
        Ok(report) => {
            info!(
                market = %report.summary.market,
                total = %report.summary.total,
                items = report.summary.items.len(),
                "receipt summarized"
            );
            println!("{}", report.raw_summary);
            ExitCode::SUCCESS
        }
        // The OCR service answered, just not with a result. There is
        // nothing to summarize and nothing further to do.
        Err(ScanError::Ocr(OcrError::Status { status, body })) => {
            error!(status, body = %body, "OCR service error; no summary produced");
            ExitCode::SUCCESS
        }
        Err(ScanError::Summary { raw, source }) => {
            // The answer is still shown verbatim; the exit code records that
            // it did not match the requested schema.
            println!("{raw}");
            error!("{source}");
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
