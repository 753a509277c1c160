use std::path::PathBuf;
use std::process;

use clap::Parser;

use jsonschema_proto_gen::codegen::{assemble, SchemaParser};
use jsonschema_proto_gen::error::{Error, Result};

/// Generate a Protocol Buffer definition from a JSON Schema document.
///
/// Reads a schema whose named types live under the top-level `definitions`
/// map and writes an equivalent proto3 file: one message or enum per
/// reachable definition, in a package of your choosing.
#[derive(Parser)]
#[command(name = "jsonschema-proto-gen", version, about)]
struct Cli {
    /// Input JSON Schema file.
    #[arg(long, default_value = "test.json")]
    input: PathBuf,

    /// Output .proto file.
    #[arg(long, default_value = "test.proto")]
    output: PathBuf,

    /// Proto package name for the generated file.
    #[arg(long, default_value = "test", env = "PROTO_PACKAGE")]
    package: String,

    /// Suppress non-error output.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let schema_bytes = std::fs::read(&cli.input).map_err(|e| Error::Read {
        path: cli.input.clone(),
        source: e,
    })?;

    let parser = SchemaParser::new(&schema_bytes)?;
    if !cli.quiet {
        eprintln!(
            "Loaded {} with {} definitions",
            cli.input.display(),
            parser.schema().definitions.len()
        );
    }

    let (fragments, stats) = parser.parse_with_stats(&cli.package)?;
    let proto = assemble(&fragments);

    std::fs::write(&cli.output, proto).map_err(|e| Error::Write {
        path: cli.output.clone(),
        source: e,
    })?;

    if !cli.quiet {
        eprintln!(
            "Generated {} messages, {} enums into {}",
            stats.messages_emitted,
            stats.enums_emitted,
            cli.output.display()
        );
        if stats.complex_arrays_skipped > 0 {
            eprintln!(
                "Skipped {} array-of-objects properties (not translated)",
                stats.complex_arrays_skipped
            );
        }
        eprintln!("Done.");
    }

    Ok(())
}
