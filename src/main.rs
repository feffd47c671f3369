use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocrdex::embeddings::EmbeddingService;
use ocrdex::models::{Document, Metadata};
use ocrdex::ocr::OcrEngine;
use ocrdex::services::index::{IndexConfig, VectorIndex};
use ocrdex::services::reader::{ImageOcrReader, ReaderConfig};

const PREVIEW_CHARS: usize = 200;

#[derive(Parser)]
#[command(name = "ocrdex")]
#[command(about = "Turn scanned images into documents and query them")]
#[command(version)]
struct Cli {
    /// OCR language code (overrides OCR_LANGUAGE)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Tesseract page segmentation mode, 0-13 (overrides OCR_PAGE_SEG_MODE)
    #[arg(long, global = true)]
    psm: Option<u8>,

    /// OCR backend
    #[arg(long, global = true, value_enum, default_value_t = EngineKind::TesseractCli)]
    engine: EngineKind,

    /// Extra metadata attached to every document, as key=value
    #[arg(long = "extra", global = true, value_parser = parse_key_value)]
    extra: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR individual image files
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the documents as JSON
        #[arg(long)]
        json: bool,
    },
    /// OCR every supported image in a directory
    Scan {
        dir: PathBuf,

        #[arg(short, long)]
        recursive: bool,
    },
    /// OCR a directory, index it and print the chunks closest to a question
    Query {
        dir: PathBuf,

        question: String,

        /// Number of chunks to return (overrides INDEX_TOP_K)
        #[arg(long)]
        top_k: Option<usize>,

        #[arg(short, long)]
        recursive: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineKind {
    /// The `tesseract` command line tool
    TesseractCli,
    /// libtesseract, linked in (requires the `ocr` feature)
    Tesseract,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocrdex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let reader = build_reader(&cli)?;
    let extra = extra_metadata(&cli.extra);
    let extra = (!extra.is_empty()).then_some(&extra);

    match cli.command {
        Commands::Extract { files, json } => {
            let docs = reader.load_data(&files, extra).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&docs)?);
            } else {
                for doc in &docs {
                    print_document(doc);
                }
            }
        }
        Commands::Scan { dir, recursive } => {
            let docs = reader.load_data_from_dir(&dir, recursive, extra).await?;
            println!("{} documents from {}", docs.len(), dir.display());
            for doc in &docs {
                println!(
                    "  {:<40} blocks: {:>4}  avg conf: {:.4}  chars: {}",
                    doc.metadata_str("file_name").unwrap_or("?"),
                    doc.metadata_u64("num_text_blocks").unwrap_or(0),
                    doc.metadata_f64("avg_confidence").unwrap_or(0.0),
                    doc.text.chars().count()
                );
            }
        }
        Commands::Query {
            dir,
            question,
            top_k,
            recursive,
        } => {
            let docs = reader.load_data_from_dir(&dir, recursive, extra).await?;

            let mut config = IndexConfig::from_env();
            if let Some(k) = top_k {
                config = config.with_top_k(k);
            }
            config.validate()?;

            let embeddings = EmbeddingService::from_env()?;
            let index = VectorIndex::from_documents(&docs, embeddings, config).await?;
            info!("Index holds {} chunks", index.len());

            let hits = index.query_default(&question).await?;
            if hits.is_empty() {
                println!("No matching text found in {}", dir.display());
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "[{}] score {:.4}  {} (chunk {}/{})",
                    rank + 1,
                    hit.score,
                    hit.chunk.source().unwrap_or("?"),
                    hit.chunk.chunk_index + 1,
                    hit.chunk.chunk_total
                );
                println!("{}\n", hit.chunk.text);
            }
        }
    }

    Ok(())
}

fn build_reader(cli: &Cli) -> Result<ImageOcrReader> {
    let mut config = ReaderConfig::from_env();
    if let Some(ref lang) = cli.lang {
        config = config.with_language(lang);
    }
    if let Some(psm) = cli.psm {
        config = config.with_page_seg_mode(psm);
    }
    config.validate().context("Invalid OCR configuration")?;

    let engine: Arc<dyn OcrEngine> = match cli.engine {
        EngineKind::TesseractCli => Arc::new(config.build_cli_engine()),
        EngineKind::Tesseract => linked_engine(&config)?,
    };

    Ok(ImageOcrReader::new(engine, config))
}

#[cfg(feature = "ocr")]
fn linked_engine(config: &ReaderConfig) -> Result<Arc<dyn OcrEngine>> {
    use ocrdex::ocr::TesseractEngine;

    Ok(Arc::new(
        TesseractEngine::new()
            .with_language(&config.language)
            .with_page_seg_mode(config.effective_page_seg_mode()),
    ))
}

#[cfg(not(feature = "ocr"))]
fn linked_engine(_config: &ReaderConfig) -> Result<Arc<dyn OcrEngine>> {
    anyhow::bail!("The `tesseract` engine requires building with `--features ocr`")
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Values that parse as JSON (numbers, booleans) keep their type.
fn extra_metadata(pairs: &[(String, String)]) -> Metadata {
    pairs
        .iter()
        .map(|(key, value)| {
            let parsed = serde_json::from_str::<Value>(value)
                .ok()
                .filter(|v| !v.is_null() && !v.is_object() && !v.is_array())
                .unwrap_or_else(|| Value::String(value.clone()));
            (key.clone(), parsed)
        })
        .collect()
}

fn print_document(doc: &Document) {
    println!(
        "==> {} ({} blocks, avg conf {:.4}, engine {})",
        doc.metadata_str("file_name").unwrap_or("?"),
        doc.metadata_u64("num_text_blocks").unwrap_or(0),
        doc.metadata_f64("avg_confidence").unwrap_or(0.0),
        doc.metadata_str("ocr_engine").unwrap_or("?")
    );
    println!("{}\n", doc.preview(PREVIEW_CHARS));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("source=batch-7").unwrap(),
            ("source".to_string(), "batch-7".to_string())
        );
        assert_eq!(
            parse_key_value("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_extra_metadata_types() {
        let meta = extra_metadata(&[
            ("page".to_string(), "3".to_string()),
            ("verified".to_string(), "true".to_string()),
            ("source".to_string(), "scanner".to_string()),
            ("note".to_string(), "null".to_string()),
            ("tags".to_string(), "[1,2]".to_string()),
        ]);

        assert_eq!(meta["page"], Value::from(3));
        assert_eq!(meta["verified"], Value::Bool(true));
        assert_eq!(meta["source"], Value::from("scanner"));
        assert_eq!(meta["note"], Value::from("null"));
        assert_eq!(meta["tags"], Value::from("[1,2]"));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "ocrdex", "scan", "./scans", "--recursive", "--lang", "deu", "--extra", "batch=4",
        ])
        .unwrap();

        assert_eq!(cli.lang.as_deref(), Some("deu"));
        assert_eq!(cli.extra.len(), 1);
        assert!(matches!(cli.command, Commands::Scan { recursive: true, .. }));
    }
}
