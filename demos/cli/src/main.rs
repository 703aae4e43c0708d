use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use base64::{engine::general_purpose, Engine as _};
use clap::{Parser, Subcommand, ValueEnum};
use digest_core::{ClassificationPolicy, TransformConfig, TransformedBundle};
use digest_fhir::{analyze_bundle, extract_attachments, transform_bundle_value, ExtractedAttachment};
use serde_json::Value;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "digest",
    about = "Normalize and classify FHIR bundle JSON files."
)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize resources and classify each bundle.
    Transform {
        /// Bundle files or directories of `*.json` files.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// JSON file with a transform configuration.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the classification policy from the config.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Print the full transformed bundle instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Print entry counts, resource types and attachment presence.
    Analyze {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Move embedded attachments out of the bundle into separate files.
    Extract {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Directory receiving the lightened bundles and attachment files.
        #[arg(long)]
        out_dir: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    ProfileFirst,
    StructuralHeuristic,
}

impl From<PolicyArg> for ClassificationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::ProfileFirst => ClassificationPolicy::ProfileFirst,
            PolicyArg::StructuralHeuristic => ClassificationPolicy::StructuralHeuristic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let (paths, failed) = match cli.command {
        Command::Transform {
            paths,
            config,
            policy,
            json,
        } => {
            let config = load_config(config.as_deref(), policy)?;
            let files = expand_paths(&paths)?;
            let failed = run_batch(&files, |path, bundle| {
                let transformed = transform_bundle_value(bundle, &config)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&transformed)?);
                } else {
                    print_summary(path, &transformed);
                }
                Ok(())
            });
            (files, failed)
        }
        Command::Analyze { paths } => {
            let files = expand_paths(&paths)?;
            let failed = run_batch(&files, |path, bundle| {
                let summary = analyze_bundle(bundle);
                println!("\nAnalyzing bundle: {}", file_label(path));
                println!("Bundle type: {}", summary.bundle_type);
                println!("Number of entries: {}", summary.entry_count);
                println!(
                    "Resource types present: {}",
                    summary.resource_types.into_iter().collect::<Vec<_>>().join(", ")
                );
                println!("Contains attachments: {}", summary.has_attachments);
                Ok(())
            });
            (files, failed)
        }
        Command::Extract { paths, out_dir } => {
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("Could not create {}", out_dir.display()))?;
            let files = expand_paths(&paths)?;
            let failed = run_batch(&files, |path, bundle| write_extracted(path, bundle, &out_dir));
            (files, failed)
        }
    };

    info!(files = paths.len(), failed, "batch finished");
    if failed > 0 {
        bail!("{failed} of {} files failed", paths.len());
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let directive = if verbose { "digest=debug" } else { "digest=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>, policy: Option<PolicyArg>) -> anyhow::Result<TransformConfig> {
    let mut config = match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Could not read config {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => TransformConfig::default(),
    };
    if let Some(policy) = policy {
        config.policy = policy.into();
    }
    debug!(policy = ?config.policy, profiles = config.profiles.len(), "configuration loaded");
    Ok(config)
}

/// Files stay as given; directories contribute their `*.json` files in name order.
fn expand_paths(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(path)
            .with_context(|| format!("Could not list {}", path.display()))?
        {
            let candidate = entry?.path();
            if candidate.extension().is_some_and(|ext| ext == "json") {
                found.push(candidate);
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

/// Run `handle` on every file. Failures are logged and counted, never fatal to the batch.
fn run_batch<F>(files: &[PathBuf], mut handle: F) -> usize
where
    F: FnMut(&Path, &Value) -> anyhow::Result<()>,
{
    let mut failed = 0;
    for path in files {
        let outcome = read_bundle(path).and_then(|bundle| handle(path, &bundle));
        if let Err(err) = outcome {
            error!(file = %path.display(), "{err:#}");
            failed += 1;
        }
    }
    failed
}

fn read_bundle(path: &Path) -> anyhow::Result<Value> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Could not read file {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(path: &Path, transformed: &TransformedBundle) {
    println!(
        "{}: {} ({} records)",
        file_label(path),
        transformed.bundle_type,
        transformed.total()
    );
    for (kind, records) in &transformed.resources {
        println!("  {}: {}", kind.as_str(), records.len());
    }
}

fn write_extracted(path: &Path, bundle: &Value, out_dir: &Path) -> anyhow::Result<()> {
    let extracted = extract_attachments(bundle);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());

    let lightened = out_dir.join(format!("{stem}.lightened.json"));
    fs::write(&lightened, serde_json::to_string_pretty(&extracted.bundle)?)
        .with_context(|| format!("Could not write {}", lightened.display()))?;

    for attachment in &extracted.attachments {
        let target = out_dir.join(format!(
            "{}.{}",
            attachment.ref_id,
            file_extension(&attachment.content_type)
        ));
        fs::write(&target, decode_payload(attachment))
            .with_context(|| format!("Could not write {}", target.display()))?;
    }

    info!(
        file = %file_label(path),
        attachments = extracted.attachments.len(),
        "extracted attachments"
    );
    Ok(())
}

/// Base64 payloads are decoded; anything else is written as received.
fn decode_payload(attachment: &ExtractedAttachment) -> Vec<u8> {
    general_purpose::STANDARD
        .decode(attachment.data.trim())
        .unwrap_or_else(|err| {
            debug!(ref_id = %attachment.ref_id, %err, "payload is not base64, writing raw text");
            attachment.data.clone().into_bytes()
        })
}

fn file_extension(content_type: &str) -> &'static str {
    match content_type {
        "application/pdf" => "pdf",
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "text/plain" => "txt",
        "application/json" | "application/fhir+json" => "json",
        _ => "bin",
    }
}
