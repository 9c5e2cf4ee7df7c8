//! Parsing of console input lines into [`Command`]s.

/// One line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Display,
    Length,
    GiveBuzzer,
    Seat,
    KickOut(i64),
    TakeBribe(i64),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    UnknownCommand(String),
    WrongArity { command: char, expected: usize },
    BadArgument(String),
}

impl std::fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParseCommandError::UnknownCommand(s) => write!(f, "unknown command `{}`", s),
            ParseCommandError::WrongArity { command, expected } => {
                write!(f, "`{}` takes {} argument(s)", command, expected)
            }
            ParseCommandError::BadArgument(s) => write!(f, "`{}` is not an integer", s),
        }
    }
}

impl std::error::Error for ParseCommandError {}

/// Parses a line such as `g` or `k 3`. A blank line yields `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseCommandError> {
    let mut tokens = line.split_whitespace();
    let head = match tokens.next() {
        Some(t) => t,
        None => return Ok(None),
    };
    let args: Vec<&str> = tokens.collect();

    let mut chars = head.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(ParseCommandError::UnknownCommand(head.to_owned())),
    };

    let cmd = match letter {
        'd' => nullary(letter, &args, Command::Display)?,
        'l' => nullary(letter, &args, Command::Length)?,
        'g' => nullary(letter, &args, Command::GiveBuzzer)?,
        's' => nullary(letter, &args, Command::Seat)?,
        'q' => nullary(letter, &args, Command::Quit)?,
        'k' => Command::KickOut(unary(letter, &args)?),
        'b' => Command::TakeBribe(unary(letter, &args)?),
        _ => return Err(ParseCommandError::UnknownCommand(head.to_owned())),
    };
    Ok(Some(cmd))
}

fn nullary(letter: char, args: &[&str], cmd: Command) -> Result<Command, ParseCommandError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(ParseCommandError::WrongArity {
            command: letter,
            expected: 0,
        })
    }
}

fn unary(letter: char, args: &[&str]) -> Result<i64, ParseCommandError> {
    match args {
        [arg] => parse_int(arg).ok_or_else(|| ParseCommandError::BadArgument((*arg).to_owned())),
        _ => Err(ParseCommandError::WrongArity {
            command: letter,
            expected: 1,
        }),
    }
}

/// Accepts an optional sign followed by decimal, `0x` hex or `0` octal
/// digits.
fn parse_int(s: &str) -> Option<i64> {
    let (negative, digits) = match *s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if digits.starts_with("0x") || digits.starts_with("0X") {
        (16, &digits[2..])
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if digits.is_empty() || digits.starts_with(|c: char| c == '+' || c == '-') {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
