//! Scans raw arguments for long and shorthand flags.

use tracing::trace;

use crate::{ParseError, PrefixedFlag};

/// Result of scanning one argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned {
    /// Arguments that are not flags, in order.
    Args(Vec<String>),
    /// `--help`, or `-h` where no flag claims the letter.
    Help,
}

pub type Apply<'f> = dyn FnMut(&PrefixedFlag<'_>, &str) -> Result<(), ParseError> + 'f;

/// Applies every flag in `args` through `apply` and returns the rest.
///
/// `long` must be sorted by path and `short` by shorthand letter; neither
/// is checked.
pub fn parse_args(
    short: &[PrefixedFlag<'_>],
    long: &[PrefixedFlag<'_>],
    args: &[String],
    apply: &mut Apply<'_>,
) -> Result<Scanned, ParseError> {
    let mut p = Parser::new(args);
    let mut positional = Vec::new();
    while let Some(arg) = p.next() {
        if arg == "--" {
            positional.extend(p.rest());
            break;
        }
        if arg.len() < 2 || !arg.starts_with('-') {
            positional.push(arg);
            continue;
        }
        let help = match arg.strip_prefix("--") {
            Some(name) => p.long(long, &arg, name, apply)?,
            None => p.short(short, &arg, apply)?,
        };
        if help {
            return Ok(Scanned::Help);
        }
    }
    Ok(Scanned::Args(positional))
}

struct Parser {
    rargs: Vec<String>,
}

impl Parser {
    fn new(args: &[String]) -> Parser {
        let mut rargs = args.to_vec();
        rargs.reverse();
        Parser { rargs }
    }

    fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn rest(&mut self) -> impl Iterator<Item = String> + '_ {
        self.rargs.drain(..).rev()
    }

    /// Returns `true` when help was asked for.
    fn long(
        &mut self,
        flags: &[PrefixedFlag<'_>],
        arg: &str,
        name: &str,
        apply: &mut Apply<'_>,
    ) -> Result<bool, ParseError> {
        if name.starts_with(['-', '=']) {
            return Err(ParseError::BadSyntax(arg.to_string()));
        }
        let (name, inline) = match name.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (name, None),
        };
        let flag = match flags.binary_search_by(|it| it.path.as_str().cmp(name)) {
            Ok(idx) => &flags[idx],
            Err(_) if name == "help" => return Ok(true),
            Err(_) => return Err(ParseError::UnknownFlag(name.to_string())),
        };
        let value = match (inline, &flag.flag.implicit) {
            (Some(value), _) => value.to_string(),
            (None, Some(implicit)) => implicit.clone(),
            (None, None) => {
                self.next().ok_or_else(|| ParseError::MissingValue(arg.to_string()))?
            }
        };
        trace!(path = %flag.path, "long flag");
        apply(flag, &value)?;
        Ok(false)
    }

    /// Consumes a run of shorthand letters, like `-vvx=1`.
    fn short(
        &mut self,
        flags: &[PrefixedFlag<'_>],
        arg: &str,
        apply: &mut Apply<'_>,
    ) -> Result<bool, ParseError> {
        let mut letters = &arg[1..];
        while let Some(letter) = letters.chars().next() {
            let after = &letters[letter.len_utf8()..];
            let flag = match flags.binary_search_by_key(&Some(letter), |it| it.flag.shorthand) {
                Ok(idx) => &flags[idx],
                Err(_) if letter == 'h' => return Ok(true),
                Err(_) => {
                    return Err(ParseError::UnknownShorthand { letter, token: arg.to_string() })
                }
            };
            let value = if let Some(value) = after.strip_prefix('=') {
                letters = "";
                value.to_string()
            } else if let Some(implicit) = &flag.flag.implicit {
                letters = after;
                implicit.clone()
            } else if !after.is_empty() {
                letters = "";
                after.to_string()
            } else {
                letters = "";
                self.next()
                    .ok_or_else(|| ParseError::MissingValue(format!("{letter:?} in {arg}")))?
            };
            trace!(path = %flag.path, "shorthand flag");
            apply(flag, &value)?;
        }
        Ok(false)
    }
}
