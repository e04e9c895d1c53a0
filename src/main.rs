//! qdraw CLI
//!
//! Usage:
//!   qdraw [OPTIONS] [FILE]
//!
//! With no FILE the built-in 8-qubit GHZ circuit is drawn to
//! `../readme_figure_1.png` at scale 0.5 in the iqp-dark style.
//!
//! Options:
//!   -o, --output <PATH>      Output file, `-` for stdout
//!   -f, --format <FORMAT>    png, svg or text (default: from extension)
//!       --scale <SCALE>      Output scale factor
//!   -s, --style <NAME>       Built-in style
//!       --style-file <FILE>  Style file (TOML format)
//!       --list-styles        Print built-in style names
//!   -v, --verbose            More logging, repeat for more
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qdraw::{
    default_circuit, draw, parse_circuit, Circuit, DrawOptions, OutputFormat, Style,
    DEFAULT_CLI_STYLE, DEFAULT_OUTPUT, DEFAULT_SCALE,
};

#[derive(Parser)]
#[command(name = "qdraw")]
#[command(about = "Build quantum circuits and draw them")]
#[command(version)]
struct Cli {
    /// OpenQASM 2 file to draw, `-` for stdin (default: 8-qubit GHZ circuit)
    input: Option<PathBuf>,

    /// Output file, `-` writes to stdout
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Output format: png (alias mpl), svg or text
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Scale factor applied to the drawing
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f64,

    /// Built-in style name
    #[arg(short, long, default_value = DEFAULT_CLI_STYLE)]
    style: String,

    /// Style file (TOML format), overrides --style
    #[arg(long)]
    style_file: Option<PathBuf>,

    /// Print the built-in style names and exit
    #[arg(long)]
    list_styles: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if cli.list_styles {
        for name in Style::available() {
            println!("{}", name);
        }
        return;
    }

    let circuit = match &cli.input {
        Some(path) => load_circuit(path),
        None => match default_circuit() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    };

    let mut options = DrawOptions::new().with_scale(cli.scale);
    options = match &cli.style_file {
        Some(path) => match Style::from_file(path) {
            Ok(style) => options.with_custom_style(style),
            Err(e) => {
                eprintln!("Error loading style '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => options.with_style(cli.style.as_str()),
    };

    let to_stdout = cli.output == Path::new("-");
    if to_stdout {
        options = options.with_format(cli.format.unwrap_or(OutputFormat::Text));
    } else {
        options = options.with_filename(&cli.output);
        if let Some(format) = cli.format {
            options = options.with_format(format);
        }
    }

    match draw(&circuit, &options) {
        Ok(drawing) => {
            if to_stdout {
                let mut stdout = io::stdout().lock();
                if let Err(e) = stdout
                    .write_all(drawing.as_bytes())
                    .and_then(|_| stdout.flush())
                {
                    eprintln!("Error writing to stdout: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_circuit(path: &Path) -> Circuit {
    let (source, filename) = if path == Path::new("-") {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            eprintln!("Error reading from stdin: {}", e);
            std::process::exit(1);
        }
        (buffer, "<stdin>".to_string())
    } else {
        match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    };

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| *s != "-")
        .unwrap_or("circuit");

    match parse_circuit(&source, name) {
        Ok(circuit) => circuit,
        Err(errors) => {
            for e in &errors {
                eprint!("{}", e.format(&source, &filename));
            }
            std::process::exit(1);
        }
    }
}
