//! joinery CLI - BTLx export for timber assemblies
//!
//! Reads an assembly of beams and joints (JSON), derives the fabrication
//! processes and writes them as a BTLx document.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use joinery_btlx::{BtlxSettings, Document};
use joinery_model::Assembly;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "joinery")]
#[command(about = "Export timber joinery to BTLx", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a BTLx document for an assembly
    Export {
        /// Assembly file (.json)
        input: PathBuf,
        /// Output file (.btlx)
        output: PathBuf,
        /// Export settings (.toml)
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Keep blanks at their recorded size instead of extending them to the cuts
        #[arg(long)]
        no_extensions: bool,
        /// Exit with an error when any process could not be derived
        #[arg(long)]
        strict: bool,
    },
    /// Display information about an assembly
    Info {
        /// Assembly file (.json)
        file: PathBuf,
        /// Export settings (.toml)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            settings,
            no_extensions,
            strict,
        } => {
            export_file(&input, &output, settings.as_deref(), !no_extensions, strict)?;
        }
        Commands::Info { file, settings } => {
            show_info(&file, settings.as_deref())?;
        }
    }

    Ok(())
}

fn load_assembly(path: &Path) -> Result<Assembly> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn load_settings(path: Option<&Path>) -> Result<BtlxSettings> {
    let Some(path) = path else {
        return Ok(BtlxSettings::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(BtlxSettings::from_toml_str(&text)?)
}

fn resolve_extensions(assembly: &mut Assembly, settings: &BtlxSettings) {
    for (joint, err) in assembly.resolve_blank_extensions(&settings.tolerance) {
        warn!(joint, %err, "blank extension not applied");
    }
}

fn export_file(input: &Path, output: &Path, settings: Option<&Path>, extend: bool, strict: bool) -> Result<()> {
    let mut assembly = load_assembly(input)?;
    let mut settings = load_settings(settings)?;
    if settings.file_name.is_empty() {
        settings.file_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    if extend {
        resolve_extensions(&mut assembly, &settings);
    }
    let document = Document::build(&assembly, &settings)?;

    let messages = document.messages();
    for message in &messages {
        eprintln!("{message}");
    }
    if strict && !messages.is_empty() {
        bail!("{} process(es) could not be derived", messages.len());
    }

    let file = fs::File::create(output).with_context(|| format!("creating {}", output.display()))?;
    document.write_to(BufWriter::new(file))?;
    info!(
        path = %output.display(),
        parts = document.parts().len(),
        processes = document.process_count(),
        "wrote BTLx"
    );
    Ok(())
}

fn show_info(file: &Path, settings: Option<&Path>) -> Result<()> {
    let mut assembly = load_assembly(file)?;
    let settings = load_settings(settings)?;

    println!("joinery assembly: {}", file.display());
    println!("  Beams: {}", assembly.beams.len());
    println!("  Joints: {}", assembly.joints.len());

    if !assembly.joints.is_empty() {
        println!("\nJoints:");
        for (i, joint) in assembly.joints.iter().enumerate() {
            let members = joint
                .members()
                .iter()
                .map(|(role, beam)| format!("{role}={beam}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {}: {} ({})", i, joint.kind(), members);
        }
    }

    if assembly.is_empty() {
        return Ok(());
    }
    resolve_extensions(&mut assembly, &settings);
    let document = Document::build(&assembly, &settings)?;

    println!("\nParts:");
    for part in document.parts() {
        let types = part
            .processes
            .iter()
            .map(|p| p.process_type())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {}: {:.3} x {:.3} x {:.3}  [{}]",
            part.single_member_number(),
            part.reference.blank_length,
            part.reference.width,
            part.reference.height,
            types
        );
    }

    let messages = document.messages();
    if !messages.is_empty() {
        println!("\nDiagnostics:");
        for message in messages {
            println!("  {message}");
        }
    }
    Ok(())
}
