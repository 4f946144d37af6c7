use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use nom::bytes::complete::{tag, take_while_m_n};
use nom::combinator::{map_res, opt};
use nom::error::VerboseError;
use nom::sequence::preceded;
use nom::IResult;

pub fn clock(input: &str) -> IResult<&str, Duration, VerboseError<&str>> {
    let take_field = || {
        map_res(
            take_while_m_n(2, 2, |c: char| c.is_digit(10)),
            |s: &str| s.parse(),
        )
    };
    // Hours keep growing past two digits on long timelines, and cue timings
    // are allowed to omit them entirely.
    let take_hours = || {
        map_res(
            take_while_m_n(1, 9, |c: char| c.is_digit(10)),
            |s: &str| s.parse(),
        )
    };
    let take_millis = || {
        map_res(
            take_while_m_n(3, 3, |c: char| c.is_digit(10)),
            |s: &str| s.parse(),
        )
    };

    let (input, first): (_, u64) = take_hours()(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, second): (_, u64) = take_field()(input)?;
    let (input, third): (_, Option<u64>) = opt(preceded(tag(":"), take_field()))(input)?;
    let (input, _) = tag(".")(input)?;
    let (input, millis): (_, u64) = take_millis()(input)?;

    let (hours, minutes, seconds) = match third {
        Some(seconds) => (first, second, seconds),
        None => (0, first, second),
    };

    Ok((
        input,
        Duration::from_millis(
            millis + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

pub fn write_clock<W: Write>(buf: &mut W, timestamp: Duration) -> Result<()> {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.as_millis() % 1000;
    write!(
        buf,
        "{:02}:{:02}:{:02}.{:03}",
        hours, minutes, seconds, millis
    )?;
    Ok(())
}

/// Parses a trim boundary given on the command line, either as a bare number
/// of seconds or as an `MM:SS`/`HH:MM:SS` clock time.
pub fn parse_duration(text: &str) -> Result<Duration> {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        let seconds = text
            .parse()
            .map_err(|_| anyhow!("This does not look like a real timestamp: {}", text))?;
        return Ok(Duration::from_secs(seconds));
    }

    let fields: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match fields.as_slice() {
        [minutes, seconds] => (0, parse_field(minutes, text)?, parse_field(seconds, text)?),
        [hours, minutes, seconds] => (
            parse_field(hours, text)?,
            parse_field(minutes, text)?,
            parse_field(seconds, text)?,
        ),
        _ => bail!("Timestamp {} not in seconds or HH:MM:SS", text),
    };
    if hours > 23 || minutes > 59 || seconds > 59 {
        bail!("This does not look like a real timestamp: {}", text);
    }
    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

fn parse_field(digits: &str, origin: &str) -> Result<u64> {
    digits
        .parse()
        .map_err(|_| anyhow!("This does not look like a real timestamp: {}", origin))
}
