use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colltrie::mapping::load_mapping;
use colltrie::output::print_segments;
use colltrie::scan::{ScanReport, scan};
use colltrie::trie::{Tables, codegen};
use colltrie::utils::AppConfig;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "colltrie")]
#[command(about = "Build, inspect and query compact collation tries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log diagnostics to stderr (honours RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (default: <config dir>/colltrie/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a table file from a codepoint → value mapping
    Build {
        /// Mapping file (`<hex>[..<hex>] <value>` per line)
        mapping: PathBuf,

        /// Table file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Also emit the tables as Rust source to this file
        #[arg(long)]
        rust: Option<PathBuf>,

        /// Prefix for the generated statics
        #[arg(long, default_value = "collation")]
        name: String,
    },
    /// Look up every codepoint of the given text
    Lookup {
        /// Table file
        table: PathBuf,

        /// Text to look up (joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        /// Treat the text as hex bytes, e.g. "e2 82 ac" or "e282ac"
        #[arg(long)]
        hex: bool,
    },
    /// Classify the bytes of a file in parallel
    Scan {
        /// Table file
        table: PathBuf,

        /// File to scan
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 1 if the file has malformed or truncated bytes
        #[arg(long)]
        strict: bool,
    },
    /// Show table statistics
    Stats {
        /// Table file
        table: PathBuf,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Emit a table file as Rust source
    Codegen {
        /// Table file
        table: PathBuf,

        /// Prefix for the generated statics
        #[arg(long, default_value = "collation")]
        name: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Values per row (default from config)
        #[arg(long)]
        per_line: Option<usize>,
    },
}

fn init_tracing(cli: &Cli) {
    // Quiet by default so lookup/stats output stays clean; --verbose turns
    // on info and lets RUST_LOG refine it.
    let filter = if cli.verbose && !cli.quiet {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(!cli.no_color)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    if std::env::var_os("NO_COLOR").is_some() {
        cli.no_color = true;
    }
    init_tracing(&cli);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let color = config.color && !cli.no_color;

    match cli.command {
        Commands::Build {
            mapping,
            output,
            rust,
            name,
        } => {
            let builder = load_mapping(&mapping)
                .with_context(|| format!("Failed to load mapping {}", mapping.display()))?;
            let tables = builder.build().context("Failed to build tables")?;
            tables.save(&output)?;
            info!(entries = builder.len(), "built {}", output.display());

            if let Some(rust) = rust {
                write_codegen(&tables, &name, config.codegen_per_line, Some(&rust))?;
            }

            let stats = tables.stats();
            println!(
                "Wrote {} ({} index blocks, {} value blocks, {} mapped codepoints)",
                output.display(),
                stats.index_blocks,
                stats.value_blocks,
                stats.mapped_codepoints
            );
        }
        Commands::Lookup { table, text, hex } => {
            let tables = open_tables(&table)?;
            let input = if hex {
                parse_hex(&text.join(""))?
            } else {
                text.join(" ").into_bytes()
            };
            let segments: Vec<_> = tables.trie().segments(&input).collect();
            print_segments(&input, &segments, color)?;
        }
        Commands::Scan {
            table,
            file,
            json,
            strict,
        } => {
            let tables = open_tables(&table)?;
            let handle = File::open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            // SAFETY: the map is only read for the duration of the scan
            let data = unsafe { Mmap::map(&handle)? };

            let options = config.scan_options(!cli.quiet && !json);
            let report = scan(tables.trie(), &data, &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&file, &report);
            }
            if strict && !report.is_clean() {
                std::process::exit(1);
            }
        }
        Commands::Stats { table, json } => {
            let tables = open_tables(&table)?;
            let stats = tables.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Table Statistics");
                println!("================");
                println!();
                println!("Table file:         {}", table.display());
                println!("Index entries:      {} ({} blocks)", stats.index_entries, stats.index_blocks);
                println!("Value entries:      {} ({} blocks)", stats.value_entries, stats.value_blocks);
                println!("Distinct values:    {}", stats.distinct_values);
                println!("Mapped codepoints:  {}", stats.mapped_codepoints);
                println!("File size:          {} bytes", stats.file_bytes);
            }
        }
        Commands::Codegen {
            table,
            name,
            output,
            per_line,
        } => {
            let tables = open_tables(&table)?;
            let per_line = per_line.unwrap_or(config.codegen_per_line);
            write_codegen(&tables, &name, per_line, output.as_deref())?;
        }
    }

    Ok(())
}

fn open_tables(path: &Path) -> Result<Tables> {
    Tables::open(path).with_context(|| format!("Failed to load table file {}", path.display()))
}

fn write_codegen(tables: &Tables, name: &str, per_line: usize, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            codegen::write_rust(&tables.trie(), name, per_line, &mut writer)?;
            writer.flush()?;
            info!("wrote Rust tables to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            codegen::write_rust(&tables.trie(), name, per_line, &mut lock)?;
        }
    }
    Ok(())
}

fn print_report(file: &Path, report: &ScanReport) {
    println!("Scan of {}", file.display());
    println!();
    println!("Total bytes:  {}", report.total_bytes);
    for (label, count) in [
        ("Mapped", report.mapped),
        ("Unmapped", report.unmapped),
        ("Malformed", report.malformed),
        ("Truncated", report.truncated),
    ] {
        println!("  {:10} {:>10} segments {:>12} bytes", label, count.segments, count.bytes);
    }
    if let Some(offset) = report.first_malformed {
        println!();
        println!("First malformed byte at offset {}", offset);
    }
}

/// Parse hex digits, ignoring whitespace
fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("Odd number of hex digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).context("Invalid hex digit")?;
            u8::from_str_radix(s, 16).with_context(|| format!("Invalid hex byte '{}'", s))
        })
        .collect()
}
