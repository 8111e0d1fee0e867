//! Command line parsing
//!
//! A line is split into its command keyword and the remainder, and the
//! remainder is split into argument tokens:
//!
//! - Positional and named arguments: `color red, selection=chain A`
//! - Quoted values: `load "path with spaces.pdb"`, `'''triple'''`
//! - Bracket groups kept whole, commas included: `select s, (resn ALA, GLY)`
//! - Blank arguments: `a,,b`
//! - Multiple commands per line: `set orthoscopic; get orthoscopic`

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::multispace0,
    combinator::recognize,
    sequence::{pair, terminated},
    IResult,
};

use crate::args::{ParseMode, Token};
use crate::error::ParseError;

/// Split a line into its command keyword and argument text
///
/// # Example
/// ```
/// use pymol_cmd::split_command;
///
/// let (name, rest) = split_command("set sphere_scale, 0.5").unwrap();
/// assert_eq!(name, "set");
/// assert_eq!(rest, "sphere_scale, 0.5");
/// ```
pub fn split_command(line: &str) -> Result<(&str, &str), ParseError> {
    let line = line.trim_start();
    let invalid = || {
        ParseError::InvalidCommandName(
            line.split_whitespace().next().unwrap_or_default().to_string(),
        )
    };
    let (rest, name) = command_name(line).map_err(|_| invalid())?;

    // The keyword must end at whitespace; `@` may be followed directly by a path
    if name != "@" && !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Err(invalid());
    }
    Ok((name, rest.trim()))
}

/// Command keywords: alphanumerics and `_`, dots allowed after the first
/// character (`util.cbag`), or `@` to run a script
fn command_name(input: &str) -> IResult<&str, &str> {
    alt((
        tag("@"),
        recognize(pair(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '.'),
        )),
    ))(input)
}

/// Optional `name =` in front of a value
fn arg_name(input: &str) -> IResult<&str, &str> {
    terminated(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        pair(multispace0, tag("=")),
    )(input)
}

fn column(line: &str, rest: &str) -> usize {
    line[..line.len() - rest.len()].chars().count()
}

/// Split the argument text of a command into tokens
///
/// # Example
/// ```
/// use pymol_cmd::{tokenize, ParseMode, Token};
///
/// let tokens = tokenize("sele, (resn ALA and chain A), state=5", ParseMode::Strict).unwrap();
/// assert_eq!(tokens, vec![
///     Token::positional("sele"),
///     Token::positional("(resn ALA and chain A)"),
///     Token::named("state", "5"),
/// ]);
/// ```
pub fn tokenize(line: &str, mode: ParseMode) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    if line.trim().is_empty() {
        return Ok(tokens);
    }

    let mut rest = line;
    loop {
        if mode.literal_threshold() == Some(tokens.len()) {
            tokens.push(Token::positional(rest.trim()));
            break;
        }

        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let name = match arg_name(rest) {
            Ok((after, name)) => {
                rest = after.trim_start();
                Some(name.to_string())
            }
            Err(_) => None,
        };

        let value = if starts_group(rest) {
            let (value, after) = read_group(rest)?;
            rest = after;
            Some(value)
        } else if rest.starts_with(',') {
            None
        } else if rest.is_empty() || rest.starts_with(';') {
            return Err(ParseError::MalformedToken {
                text: rest.to_string(),
                column: 0,
                code: 2,
            });
        } else {
            let (value, after) = read_plain(rest);
            rest = after;
            Some(value)
        };
        tokens.push(Token { name, value });

        rest = rest.trim_start();
        if rest.is_empty() {
            // the literal remainder is still owed, even when blank
            if mode.literal_threshold() == Some(tokens.len()) {
                continue;
            }
            break;
        }
        match rest.strip_prefix(',') {
            Some(after) => rest = after,
            None => {
                return Err(ParseError::MalformedToken {
                    text: rest.to_string(),
                    column: 0,
                    code: 3,
                })
            }
        }
    }
    Ok(tokens)
}

/// A bracket group starts before the next `,` or `;`
fn starts_group(text: &str) -> bool {
    matches!(
        text.chars().find(|c| matches!(c, ',' | ';' | '(' | '[')),
        Some('(' | '[')
    )
}

/// Read bracket groups and the text around them as one value
///
/// Quotes are not tracked here, so a quoted bracket still counts.
fn read_group(text: &str) -> Result<(String, &str), ParseError> {
    let mut depth = 0usize;
    let mut opened_at = 0;
    let mut end = text.len();

    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' => {
                if depth == 0 {
                    opened_at = i;
                }
                depth += 1;
            }
            ')' | ']' if depth > 0 => depth -= 1,
            ',' | ';' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(ParseError::UnmatchedBracket {
            text: text.to_string(),
            column: column(text, &text[opened_at..]),
        });
    }
    Ok((text[..end].trim().to_string(), &text[end..]))
}

const QUOTES: [&str; 3] = ["'''", "'", "\""];

/// Body and total length of a terminated quoted segment at the start of `text`
fn quoted(text: &str) -> Option<(&str, usize)> {
    QUOTES.iter().find_map(|q| {
        let body = text.strip_prefix(q)?;
        let close = body.find(q)?;
        Some((&body[..close], close + 2 * q.len()))
    })
}

/// Read a plain value: quoted and unquoted runs, concatenated
///
/// An unterminated quote is an ordinary character. Trailing whitespace after
/// the last quoted run is dropped.
fn read_plain(text: &str) -> (String, &str) {
    let mut value = String::new();
    let mut kept = 0;
    let mut rest = text;

    loop {
        if let Some((body, len)) = quoted(rest) {
            value.push_str(body);
            kept = value.len();
            rest = &rest[len..];
            continue;
        }

        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            if c == ',' || c == ';' {
                end = i;
                break;
            }
            if (c == '\'' || c == '"') && i > 0 && quoted(&rest[i..]).is_some() {
                end = i;
                break;
            }
        }
        if end == 0 {
            break;
        }
        value.push_str(&rest[..end]);
        rest = &rest[end..];
    }

    let trimmed = kept + value[kept..].trim_end().len();
    value.truncate(trimmed);
    (value, rest)
}

/// Join lines ending in `\` with the line that follows
///
/// # Example
/// ```
/// use pymol_cmd::join_continued_lines;
///
/// let joined = join_continued_lines("set light, [0, \\\n  0, -1]\nget light");
/// assert_eq!(joined, "set light, [0,    0, -1]\nget light\n");
/// ```
pub fn join_continued_lines(script: &str) -> String {
    let mut joined = String::with_capacity(script.len());
    let mut continued = false;

    for line in script.lines() {
        if continued {
            joined.push(' ');
        }
        let line = line.trim_end();
        match line.strip_suffix('\\') {
            Some(head) => {
                joined.push_str(head);
                continued = true;
            }
            None => {
                joined.push_str(line);
                joined.push('\n');
                continued = false;
            }
        }
    }
    if continued {
        joined.push('\n');
    }
    joined
}

/// Byte offset where the command starting at `input` ends: the first `;` or
/// newline outside quotes and brackets
fn command_end(input: &str) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                ';' | '\n' if depth == 0 => return i,
                _ => {}
            },
        }
    }
    input.len()
}

/// Split text into single commands on `;` and newlines
///
/// Separators inside quotes or brackets do not split. Blank commands and
/// `#` comment lines are dropped.
///
/// # Example
/// ```
/// use pymol_cmd::split_commands;
///
/// let cmds = split_commands("set a, 1; get a\n# note\nprint 'x;y'");
/// assert_eq!(cmds, vec!["set a, 1", "get a", "print 'x;y'"]);
/// ```
pub fn split_commands(text: &str) -> Vec<&str> {
    split_commands_max(text, usize::MAX)
}

/// Like [`split_commands`], but stop after `max` pieces; the last piece is
/// the untouched remainder of the text
pub fn split_commands_max(text: &str, max: usize) -> Vec<&str> {
    let mut commands = Vec::new();
    let mut rest = text;

    while !rest.is_empty() && max > 0 {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix(';') {
            rest = after;
            continue;
        }
        if rest.starts_with('#') {
            rest = rest.find('\n').map_or("", |i| &rest[i + 1..]);
            continue;
        }
        if commands.len() + 1 == max {
            let remainder = rest.trim();
            if !remainder.is_empty() {
                commands.push(remainder);
            }
            break;
        }

        let end = command_end(rest);
        let command = rest[..end].trim();
        if !command.is_empty() {
            commands.push(command);
        }
        rest = &rest[end..];
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(line: &str) -> Vec<Token> {
        tokenize(line, ParseMode::Strict).unwrap()
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  zoom").unwrap(), ("zoom", ""));
        assert_eq!(
            split_command("util.cbag  prot ").unwrap(),
            ("util.cbag", "prot")
        );
        assert_eq!(split_command("@script.pml").unwrap(), ("@", "script.pml"));
        assert!(matches!(
            split_command("zoom,foo"),
            Err(ParseError::InvalidCommandName(_))
        ));
        assert!(split_command("=x").is_err());
    }

    #[test]
    fn test_positional_and_named() {
        assert_eq!(
            strict("a,b,c"),
            vec![
                Token::positional("a"),
                Token::positional("b"),
                Token::positional("c")
            ]
        );
        assert_eq!(
            strict("x=1,y=2"),
            vec![Token::named("x", "1"), Token::named("y", "2")]
        );
        assert_eq!(
            strict("  name = sphere_scale ,  0.5 "),
            vec![Token::named("name", "sphere_scale"), Token::positional("0.5")]
        );
    }

    #[test]
    fn test_nested_groups_keep_commas() {
        let tokens = strict("sele,(resn ALA and chain A),5");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::positional("(resn ALA and chain A)"));

        assert_eq!(
            strict("pos=[1, 2, 3], (a,(b,c)) or d"),
            vec![
                Token::named("pos", "[1, 2, 3]"),
                Token::positional("(a,(b,c)) or d")
            ]
        );
        assert_eq!(
            strict("name CA and (chain A)"),
            vec![Token::positional("name CA and (chain A)")]
        );
    }

    #[test]
    fn test_token_count_matches_top_level_commas() {
        for line in ["a", "a,b", "(a,b),c,[d,e,f]", "x=(1,2),y=3,,z"] {
            let depth_zero_commas = {
                let mut depth = 0i32;
                line.chars()
                    .filter(|c| {
                        match c {
                            '(' | '[' => depth += 1,
                            ')' | ']' => depth -= 1,
                            _ => {}
                        }
                        *c == ',' && depth == 0
                    })
                    .count()
            };
            assert_eq!(strict(line).len(), depth_zero_commas + 1, "{}", line);
        }
    }

    #[test]
    fn test_blank_arguments() {
        assert_eq!(
            strict("a,,b"),
            vec![Token::positional("a"), Token::blank(), Token::positional("b")]
        );
        assert_eq!(
            strict("x=,y"),
            vec![
                Token {
                    name: Some("x".to_string()),
                    value: None
                },
                Token::positional("y")
            ]
        );
        // A dangling comma ends the list
        assert_eq!(strict("a, "), vec![Token::positional("a")]);
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            strict("'a, b', c"),
            vec![Token::positional("a, b"), Token::positional("c")]
        );
        assert_eq!(strict("foo'bar'baz"), vec![Token::positional("foobarbaz")]);
        assert_eq!(strict("\"x y \" "), vec![Token::positional("x y ")]);
        assert_eq!(strict("'''it's'''"), vec![Token::positional("it's")]);
        assert_eq!(strict("it's"), vec![Token::positional("it's")]);
    }

    #[test]
    fn test_unbalanced_bracket_is_an_error() {
        let err = tokenize("foo,(bar", ParseMode::Strict).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnmatchedBracket {
                text: "(bar".to_string(),
                column: 0
            }
        );
        assert!(tokenize("x=[1,(2]", ParseMode::Strict).is_err());
    }

    #[test]
    fn test_quotes_are_not_tracked_inside_groups() {
        // the quoted bracket still opens a group
        assert_eq!(tokenize("'a(b', c", ParseMode::Strict).unwrap_err().code(), 1);
        assert_eq!(strict("'(x', y)"), vec![Token::positional("'(x', y)")]);
    }

    #[test]
    fn test_stray_closer_is_text() {
        assert_eq!(strict("a), b"), vec![Token::positional("a)"), Token::positional("b")]);
    }

    #[test]
    fn test_malformed_tokens() {
        let err = tokenize("x=", ParseMode::Strict).unwrap_err();
        assert_eq!(err.code(), 2);
        let err = tokenize("a;b", ParseMode::Strict).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedToken {
                text: ";b".to_string(),
                column: 0,
                code: 3
            }
        );
        assert_eq!(tokenize("(a) b;c", ParseMode::Strict).unwrap_err().code(), 3);
    }

    #[test]
    fn test_literal_modes() {
        assert_eq!(
            tokenize(" print 'a', b ", ParseMode::Literal(0)).unwrap(),
            vec![Token::positional("print 'a', b")]
        );
        assert_eq!(
            tokenize("obj, x=1; y, z", ParseMode::Literal(1)).unwrap(),
            vec![Token::positional("obj"), Token::positional("x=1; y, z")]
        );
        assert!(tokenize("   ", ParseMode::Literal(0)).unwrap().is_empty());
    }

    #[test]
    fn test_literal_remainder_at_end_of_line() {
        let expected = vec![Token::positional("obj"), Token::positional("")];
        assert_eq!(tokenize("obj", ParseMode::Literal(1)).unwrap(), expected);
        assert_eq!(tokenize("obj,", ParseMode::Literal(1)).unwrap(), expected);

        assert_eq!(
            tokenize("a, b", ParseMode::Literal(2)).unwrap(),
            vec![Token::positional("a"), Token::positional("b"), Token::positional("")]
        );
        // fewer arguments than the threshold leave nothing owed
        assert_eq!(
            tokenize("a", ParseMode::Literal(2)).unwrap(),
            vec![Token::positional("a")]
        );
    }

    #[test]
    fn test_split_commands() {
        assert_eq!(
            split_commands("set a, (1;2); get a\n\n;get b"),
            vec!["set a, (1;2)", "get a", "get b"]
        );
        assert!(split_commands("  # only a comment").is_empty());
    }

    #[test]
    fn test_split_commands_max() {
        assert_eq!(
            split_commands_max("a; b; c 'x;y'", 2),
            vec!["a", "b; c 'x;y'"]
        );
        assert_eq!(split_commands_max("a; b", 5), vec!["a", "b"]);
        assert!(split_commands_max("a; b", 0).is_empty());
    }

    #[test]
    fn test_join_continued_lines() {
        assert_eq!(join_continued_lines("a \\\nb\nc"), "a  b\nc\n");
        assert_eq!(join_continued_lines("a\\"), "a\n");
    }
}
