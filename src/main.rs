mod error;
mod parser;
mod serialiser;
mod time;
mod trim;
mod vtt;

use crate::parser::Parser;
use crate::trim::TrimOpts;

use std::process;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Trim the ends off of VTT files")]
struct Cli {
    #[arg(short, long, value_name = "FILE", help = "Input VTT file")]
    input: Option<String>,
    #[arg(short, long, value_name = "FILE", help = "Output VTT file")]
    output: Option<String>,
    #[arg(
        short,
        long,
        value_name = "TIME",
        help = "Seconds or HH:MM:SS to trim from the beginning",
        default_value = "0"
    )]
    beginning: String,
    #[arg(
        short,
        long,
        value_name = "TIME",
        help = "Ending timestamp in seconds or HH:MM:SS. Defaults to the end of the file."
    )]
    end: Option<String>,
    #[arg(long, help = "Chomp!")]
    whimsy: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.whimsy {
        print_whimsy();
        return Ok(());
    }

    let input = cli
        .input
        .ok_or_else(|| anyhow!("You need to specify an input file, silly!"))?;
    let data = std::fs::read_to_string(&input)
        .context(format!("Failed to open input file: '{}'", input))?;

    let mut parser = Parser::new();
    let cues = parser
        .parse(&data)
        .context(format!("Failed to parse VTT file: '{}'", input))?;
    if cues.is_empty() {
        return Err(anyhow!("You appear to have supplied an empty file."));
    }

    let opts = TrimOpts {
        beginning: time::parse_duration(&cli.beginning)?,
        end: cli.end.as_deref().map(time::parse_duration).transpose()?,
    };
    let cues = trim::trim(cues, opts)?;

    let output = cli
        .output
        .ok_or_else(|| anyhow!("No output file specified!"))?;
    serialiser::serialise(cues, &output)?;

    Ok(())
}

fn print_whimsy() {
    println!("     _    _");
    println!("____/ \\__/ \\____oo__");
    println!("    \\O/  \\O/        \\");
    println!("                    )");
    println!("-----VVVVVVVVVVVVVVV");
    println!();
    println!("         VTT");
    println!();
    println!("-----^^^^^^^^^^^^^^\\");
    println!("____________________)");
}
