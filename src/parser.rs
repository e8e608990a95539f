//! Slash-command parser.
//!
//! The entry point is [`interpret`], which tokenizes a `/command` line,
//! dispatches it through the registry, and reports problems to the user.

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::commands::{
    AuthHash, Current, EditScripts, Help, ListScripts, Pause, Repeat, RepeatNlb, Resume, Start,
    Stop,
};
use crate::sequencer::Sequencer;
use anyhow::{Result, anyhow};
use tracing::debug;

/// True for input meant for the interpreter rather than the game.
pub fn is_slash_command(line: &str) -> bool {
    line.trim_start().starts_with('/')
}

/// Run one slash-command line against `seq`.
///
/// Unknown commands and bad arguments are reported through the sequencer's
/// message sink; they never fail.
pub fn interpret(line: &str, seq: &mut Sequencer) -> Outcome {
    match parse_line(line) {
        Ok(cmd) => {
            debug!(command = cmd.name(), "slash command");
            cmd.execute(seq)
        }
        Err(e) => {
            seq.display(&e.to_string());
            Outcome::Done
        }
    }
}

/// Split a line into tokens: double-quoted runs (quotes stripped) or runs of
/// characters that are neither whitespace nor quotes.
///
/// A quote without a closing partner, or an empty `""`, is skipped.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(ch) = rest.chars().next() {
        if ch == '"' {
            let body = &rest[1..];
            match body.find('"') {
                Some(end) if end > 0 => {
                    tokens.push(body[..end].to_string());
                    rest = &body[end + 1..];
                }
                _ => rest = body,
            }
        } else if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
        } else {
            let end = rest
                .find(|c: char| c == '"' || c.is_whitespace())
                .unwrap_or(rest.len());
            tokens.push(rest[..end].to_string());
            rest = &rest[end..];
        }
    }
    tokens
}

type ParseFn = fn(&SlashLine) -> Result<Box<dyn SlashCommand>>;

static REGISTRY: &[(&str, ParseFn)] = &[
    (Help::NAME, Help::parse_boxed),
    (ListScripts::NAME, ListScripts::parse_boxed),
    (EditScripts::NAME, EditScripts::parse_boxed),
    (Current::NAME, Current::parse_boxed),
    (Start::NAME, Start::parse_boxed),
    (Stop::NAME, Stop::parse_boxed),
    (Repeat::NAME, Repeat::parse_boxed),
    (RepeatNlb::NAME, RepeatNlb::parse_boxed),
    (Pause::NAME, Pause::parse_boxed),
    (Resume::NAME, Resume::parse_boxed),
    (AuthHash::NAME, AuthHash::parse_boxed),
];

/// Tokenize `line` and hand it to the parser registered for its keyword.
///
/// To add a new command, add one entry to [`REGISTRY`] using the command's
/// `NAME` constant and `parse_boxed` function pointer.
pub fn parse_line(line: &str) -> Result<Box<dyn SlashCommand>> {
    let raw = line.trim();
    let slash = SlashLine {
        raw: raw.to_string(),
        params: tokenize(raw),
    };
    let keyword = slash
        .arg(0)
        .and_then(|k| k.strip_prefix('/'))
        .unwrap_or_default();

    REGISTRY
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, parse)| parse(&slash))
        .unwrap_or_else(|| Err(anyhow!("Slash command {raw} not found.")))
}
