//! This is the command line tool that loads an input file (or stdin) and
//! either compresses or decompresses it.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{value_parser, Arg, ArgAction, Command};
use crush::utils::signatures::FILE_EXTENSION;
use crush::{compress_with, decompress_with, Context, Error, Result};
use crush::{DEFAULT_LEVEL, DEFAULT_MAX_OUTPUT_SIZE, VERSION_STRING};

use std::io::{Read, Write};
use std::process::ExitCode;
use std::time::Instant;
use std::{fs, io};

/// The name that selects stdin or stdout.
const STDIO: &str = "-";

fn load_input(path: &str) -> Result<Vec<u8>> {
    if path == STDIO {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return Ok(data);
    }
    Ok(fs::read(path)?)
}

fn save_output(data: &[u8], path: &str) -> Result<()> {
    if path == STDIO {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        out.flush()?;
        return Ok(());
    }
    fs::write(path, data)?;
    log::info!("Wrote {}.", &path);
    Ok(())
}

/// A scoped utility struct for measuring and reporting time.
struct Timer {
    start: std::time::Instant,
}

impl Timer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let now = Instant::now();
        if let Some(duration) = now.checked_duration_since(self.start) {
            log::info!(
                "Operation completed in {:03} seconds",
                duration.as_secs_f32()
            );
        }
    }
}

/// Pick the output path when the user did not provide one.
fn default_output_path(input_path: &str, compress: bool) -> String {
    if input_path == STDIO {
        return String::from(STDIO);
    }
    if !compress && input_path.ends_with(FILE_EXTENSION) {
        // Remove the extension.
        let end = input_path.len() - FILE_EXTENSION.len();
        return String::from(&input_path[0..end]);
    }
    if compress {
        // Add the extension.
        return String::from(input_path) + FILE_EXTENSION;
    }
    String::from(input_path) + ".out"
}

fn run(
    compress: bool,
    checked: bool,
    ctx: &Context,
    input: &[u8],
    out_path: &str,
) -> Result<()> {
    let _timer = Timer::new();

    if !compress {
        let decoded = decompress_with(input, ctx)?;
        log::info!(
            "Decompressed from {} to {} bytes.",
            input.len(),
            decoded.len()
        );
        return save_output(&decoded, out_path);
    }

    log::info!("Compressing with level {}", ctx.level());
    let encoded = compress_with(input, ctx)?;
    log::info!("Compressed from {} to {} bytes.", input.len(), encoded.len());
    log::info!(
        "Compression ratio is {:.4}x.",
        input.len() as f64 / encoded.len() as f64
    );

    if checked {
        let decoded = decompress_with(&encoded, ctx)?;
        if decoded != input {
            return Err(Error::CorruptStream(String::from(
                "the round trip did not reproduce the input",
            )));
        }
        log::info!("Correct!");
    }
    save_output(&encoded, out_path)
}

fn main() -> ExitCode {
    let matches = Command::new("CLI")
        .version(VERSION_STRING)
        .arg(
            Arg::new("checked")
                .long("check")
                .help("Decompress after compressing and verify the result")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("decompress")
                .short('d')
                .long("decompress")
                .help("Try to decompress the input")
                .action(ArgAction::SetTrue)
                .conflicts_with("compress"),
        )
        .arg(
            Arg::new("compress")
                .short('c')
                .long("compress")
                .help("Compress the input")
                .conflicts_with("decompress")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file ('-' for stdout)")
                .num_args(1),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .value_name("LEVEL")
                .help("The compression level (0-9)")
                .value_parser(value_parser!(i32))
                .num_args(1),
        )
        .arg(
            Arg::new("max-size")
                .long("max-size")
                .value_name("BYTES")
                .help("Refuse to decompress streams that declare a larger output")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use ('-' for stdin)")
                .default_value(STDIO)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let cli_decompress = matches.get_flag("decompress");
    let cli_checked_mode = matches.get_flag("checked");
    let cli_level = matches
        .get_one::<i32>("level")
        .copied()
        .unwrap_or(DEFAULT_LEVEL as i32);
    let cli_max_size = matches
        .get_one::<u64>("max-size")
        .copied()
        .unwrap_or(DEFAULT_MAX_OUTPUT_SIZE);
    let input_path = matches
        .get_one::<String>("INPUT")
        .cloned()
        .unwrap_or_else(|| String::from(STDIO));

    // The user did not specify if this is compress or decompress. Try to figure
    // out using the extension.
    let ends_with_ext = input_path.ends_with(FILE_EXTENSION);
    let cli_compress =
        (!cli_decompress && !ends_with_ext) || matches.get_flag("compress");

    let out = matches
        .get_one::<String>("output")
        .cloned()
        .unwrap_or_else(|| default_output_path(&input_path, cli_compress));

    let ctx = Context::new(cli_level, cli_max_size);
    let status = load_input(&input_path)
        .and_then(|input| run(cli_compress, cli_checked_mode, &ctx, &input, &out));

    match status {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
