use crate::error::ChompError;
use crate::time::clock;
use crate::vtt::Cue;

use std::time::Duration;

use anyhow::Context;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{line_ending, multispace0, space1};
use nom::combinator::{opt, verify};
use nom::error::{convert_error, ErrorKind, VerboseError};
use nom::multi::many_till;
use nom::sequence::terminated;
use nom::{error_position, Err, IResult};

pub struct Parser;
impl Parser {
    pub fn new() -> Self {
        Self {}
    }

    pub fn parse(&mut self, input: &str) -> Result<Vec<Cue>, anyhow::Error> {
        match vtt_file(input) {
            Ok((_, cues)) => Ok(cues),
            Err(Err::Error(err)) | Err(Err::Failure(err)) => {
                let conv = convert_error(input, err);
                Err(ChompError::ParseError(conv)).context("Failed to parse VTT file")
            }
            Err(Err::Incomplete(_)) => {
                unreachable!("Incomplete data received by non-streaming parser.")
            }
        }
    }
}

fn vtt_file(input: &str) -> IResult<&str, Vec<Cue>, VerboseError<&str>> {
    let (input, _) = header(input)?;
    let (input, cues) = all_cues(input)?;
    let (input, _) = end_of_file(input)?;
    Ok((input, cues))
}

fn header(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, _) = tag("WEBVTT")(input)?;
    let (input, trailer) = take_while(|c: char| c != '\n' && c != '\r')(input)?;
    // The magic may carry trailing text, but only after a space or tab.
    if !(trailer.is_empty() || trailer.starts_with(' ') || trailer.starts_with('\t')) {
        return Err(Err::Error(error_position!(input, ErrorKind::Tag)));
    }
    let (input, _) = alt((line_ending, end_of_file))(input)?;
    // Metadata lines may follow the magic; none of them carry cues.
    discard_block(input)
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn all_cues(input: &str) -> IResult<&str, Vec<Cue>, VerboseError<&str>> {
    let mut parsed_cues = Vec::new();
    let mut input = input;
    loop {
        let (rem_input, _) = multispace0(input)?;
        input = rem_input;
        if input.is_empty() {
            return Ok((input, parsed_cues));
        }
        if let Ok((rem_input, _)) = comment_block(input) {
            input = rem_input;
            continue;
        }
        let (rem_input, cue) = cue(input)?;
        parsed_cues.push(cue);
        input = rem_input;
    }
}

fn comment_block(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let (rest, _) = alt((tag("NOTE"), tag("STYLE"), tag("REGION")))(input)?;
    // The keyword only opens a block when it stands alone or is followed by
    // whitespace; anything else is a cue identifier.
    if let Some(c) = rest.chars().next() {
        if c != ' ' && c != '\t' && c != '\n' && c != '\r' {
            return Err(Err::Error(error_position!(input, ErrorKind::Tag)));
        }
    }
    let (rest, _) = take_while(|c: char| c != '\n' && c != '\r')(rest)?;
    let (rest, _) = alt((line_ending, end_of_file))(rest)?;
    discard_block(rest)
}

fn cue(input: &str) -> IResult<&str, Cue, VerboseError<&str>> {
    let (input, _) = opt(terminated(plain_line, line_ending))(input)?;
    let (input, (start, end)) = terminated(timing, alt((line_ending, end_of_file)))(input)?;
    let (input, text) = cue_text(input)?;

    Ok((input, Cue { start, end, text }))
}

// A line that cannot be a timing line. Used for cue identifiers and for
// discarding header and comment blocks, so that a misplaced timing line
// fails the parse instead of disappearing into a skipped block.
fn plain_line(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    verify(
        take_while1(|c: char| c != '\n' && c != '\r'),
        |line: &str| !line.contains("-->"),
    )(input)
}

fn discard_block(input: &str) -> IResult<&str, (), VerboseError<&str>> {
    let line = terminated(plain_line, alt((line_ending, end_of_file)));
    let (input, _) = many_till(line, alt((line_ending, end_of_file)))(input)?;
    Ok((input, ()))
}

fn timing(input: &str) -> IResult<&str, (Duration, Duration), VerboseError<&str>> {
    let (input, start) = clock(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, end) = clock(input)?;
    if end < start {
        return Err(Err::Failure(error_position!(input, ErrorKind::Verify)));
    }
    // Cue settings may trail the end timestamp; they are not carried over.
    let (input, _) = take_while(|c: char| c != '\n' && c != '\r')(input)?;

    Ok((input, (start, end)))
}

fn cue_text(input: &str) -> IResult<&str, Vec<String>, VerboseError<&str>> {
    let line = terminated(
        take_while1(|c: char| c != '\n' && c != '\r'),
        alt((line_ending, end_of_file)),
    );

    let (input, (vec, _)) = many_till(line, alt((line_ending, end_of_file)))(input)?;

    Ok((input, vec.into_iter().map(String::from).collect()))
}

fn end_of_file(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Cue> {
        Parser::new().parse(input).unwrap()
    }

    fn cue_at(cues: &[Cue], index: usize) -> (u128, u128, Vec<String>) {
        let cue = &cues[index];
        (
            cue.start.as_millis(),
            cue.end.as_millis(),
            cue.text.clone(),
        )
    }

    #[test]
    fn parses_a_minimal_file() {
        let cues = parse("WEBVTT\n\n00:00:05.000 --> 00:00:07.000\nHello\n");

        assert_eq!(cues.len(), 1);
        assert_eq!(cue_at(&cues, 0), (5000, 7000, vec!["Hello".to_string()]));
    }

    #[test]
    fn parses_multiple_cues_in_order() {
        let cues = parse(
            "WEBVTT\n\n\
             00:00:05.000 --> 00:00:07.000\nFirst\n\n\
             00:00:10.000 --> 00:00:12.000\nSecond\nand third line\n",
        );

        assert_eq!(cues.len(), 2);
        assert_eq!(cue_at(&cues, 0), (5000, 7000, vec!["First".to_string()]));
        assert_eq!(
            cue_at(&cues, 1),
            (
                10000,
                12000,
                vec!["Second".to_string(), "and third line".to_string()]
            )
        );
    }

    #[test]
    fn accepts_a_byte_order_mark() {
        let cues = parse("\u{FEFF}WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n");

        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn accepts_text_after_the_magic_and_header_metadata() {
        let cues = parse(
            "WEBVTT - This file has metadata\n\
             Kind: captions\n\
             Language: en\n\n\
             00:00:01.000 --> 00:00:02.000\nHi\n",
        );

        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn rejects_text_glued_onto_the_magic() {
        assert!(Parser::new().parse("WEBVTTX\n\n").is_err());
    }

    #[test]
    fn rejects_a_missing_magic() {
        assert!(Parser::new()
            .parse("00:00:01.000 --> 00:00:02.000\nHi\n")
            .is_err());
    }

    #[test]
    fn drops_cue_identifiers() {
        let cues = parse(
            "WEBVTT\n\n\
             intro\n00:00:01.000 --> 00:00:02.000\nHi\n\n\
             2\n00:00:03.000 --> 00:00:04.000\nBye\n",
        );

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, vec!["Hi".to_string()]);
    }

    #[test]
    fn skips_note_and_style_blocks() {
        let cues = parse(
            "WEBVTT\n\n\
             NOTE This is a comment\nspanning two lines\n\n\
             STYLE\n::cue { color: lime }\n\n\
             00:00:01.000 --> 00:00:02.000\nHi\n",
        );

        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn an_identifier_starting_with_note_is_not_a_comment() {
        let cues = parse("WEBVTT\n\nNOTE-1\n00:00:01.000 --> 00:00:02.000\nHi\n");

        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn discards_cue_settings() {
        let cues = parse("WEBVTT\n\n00:00:01.000 --> 00:00:02.000 align:start line:0\nHi\n");

        assert_eq!(cue_at(&cues, 0), (1000, 2000, vec!["Hi".to_string()]));
    }

    #[test]
    fn accepts_timestamps_without_hours() {
        let cues = parse("WEBVTT\n\n00:05.000 --> 01:07.500\nHi\n");

        assert_eq!(cue_at(&cues, 0), (5000, 67500, vec!["Hi".to_string()]));
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let cues = parse("WEBVTT\r\n\r\n00:00:01.000 --> 00:00:02.000\r\nHi\r\n");

        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn accepts_a_file_without_a_trailing_newline() {
        let cues = parse("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi");

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, vec!["Hi".to_string()]);
    }

    #[test]
    fn a_header_only_file_has_no_cues() {
        assert!(parse("WEBVTT\n").is_empty());
        assert!(parse("WEBVTT\n\n").is_empty());
    }

    #[test]
    fn rejects_a_cue_that_ends_before_it_starts() {
        assert!(Parser::new()
            .parse("WEBVTT\n\n00:00:05.000 --> 00:00:04.000\nHi\n")
            .is_err());
    }

    #[test]
    fn rejects_a_timing_line_before_the_first_blank_line() {
        assert!(Parser::new()
            .parse("WEBVTT\n00:00:01.000 --> 00:00:02.000\nHi\n")
            .is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(Parser::new()
            .parse("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n\nnot a cue\n")
            .is_err());
    }
}
