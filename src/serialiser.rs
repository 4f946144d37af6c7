use crate::time::write_clock;
use crate::vtt::Cue;

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub fn serialise<P: AsRef<Path>>(cues: Vec<Cue>, output: P) -> Result<()> {
    let file = std::fs::File::create(&output).context(format!(
        "Failed to create output file: '{}'",
        output.as_ref().display()
    ))?;
    let mut writer = BufWriter::new(file);
    write_cues(&mut writer, cues).context("Failed to write to output file.")?;
    writer.flush().context("Failed to write to output file.")?;
    Ok(())
}

fn write_cues<W: Write>(buf: &mut W, cues: Vec<Cue>) -> Result<()> {
    writeln!(buf, "WEBVTT")?;
    writeln!(buf)?;
    for cue in cues {
        write_cue(buf, cue)?;
    }
    Ok(())
}

fn write_cue<W: Write>(buf: &mut W, cue: Cue) -> Result<()> {
    write_clock(buf, cue.start)?;
    write!(buf, " --> ")?;
    write_clock(buf, cue.end)?;
    writeln!(buf)?;
    for line in cue.text {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}
