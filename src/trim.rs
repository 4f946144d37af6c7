use crate::vtt::Cue;

use std::time::Duration;

use anyhow::{bail, Result};

pub struct TrimOpts {
    pub beginning: Duration,
    pub end: Option<Duration>,
}

pub fn trim(cues: Vec<Cue>, opts: TrimOpts) -> Result<Vec<Cue>> {
    // Without an explicit end, the last cue marks the cutoff point.
    let last = match opts.end {
        Some(end) => end,
        None => cues.last().map(|cue| cue.end).unwrap_or_default(),
    };
    validate(opts.beginning, opts.end, last)?;
    Ok(chomp(cues, opts.beginning, last))
}

fn validate(beginning: Duration, requested_end: Option<Duration>, last: Duration) -> Result<()> {
    let no_trim = match requested_end {
        Some(end) => end == beginning,
        None => beginning.is_zero(),
    };
    if no_trim {
        bail!("No trimming requested. That was easy!");
    }
    // Covers an inverted explicit range as well as a beginning at or past
    // the end of the file.
    if last <= beginning {
        bail!("The end time can't be less than the start time. What are you doing?");
    }
    Ok(())
}

fn chomp(cues: Vec<Cue>, first: Duration, last: Duration) -> Vec<Cue> {
    // The boundary test is strict on the start and inclusive on the end: a
    // cue starting exactly at the cut point is dropped.
    cues.into_iter()
        .filter(|cue| cue.start > first && cue.end <= last)
        .map(|cue| Cue {
            start: cue.start - first,
            end: cue.end - first,
            text: cue.text,
        })
        .collect()
}
