use std::str::FromStr;

use sweeper_core::{Coord, Coord2};
use thiserror::Error;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Open(Coord2),
    Flag(Coord2),
    /// Press with the modifier held, previews the neighbourhood
    Press(Coord2),
    /// Release after a press, commits the preview when it was safe
    Release,
    NewGame,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`")]
    Unknown(String),
    #[error("Expected coordinates `X Y`")]
    MissingCoords,
    #[error("Invalid coordinate `{0}`")]
    InvalidCoord(String),
    #[error("Unexpected input `{0}`")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseError::Empty);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "o" | "open" => Command::Open(parse_coords(&mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(&mut words)?),
            "p" | "press" => Command::Press(parse_coords(&mut words)?),
            "c" | "release" => Command::Release,
            "n" | "new" => Command::NewGame,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" => Command::Quit,
            // bare `X Y` is a plain open
            _ if head.bytes().all(|b| b.is_ascii_digit()) => {
                let x = parse_coord(head)?;
                let y = parse_coord(words.next().ok_or(ParseError::MissingCoords)?)?;
                Command::Open((x, y))
            }
            _ => return Err(ParseError::Unknown(head.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(ParseError::Trailing(extra.to_owned())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, ParseError> {
    let x = parse_coord(words.next().ok_or(ParseError::MissingCoords)?)?;
    let y = parse_coord(words.next().ok_or(ParseError::MissingCoords)?)?;
    Ok((x, y))
}

fn parse_coord(word: &str) -> Result<Coord, ParseError> {
    word.parse()
        .map_err(|_| ParseError::InvalidCoord(word.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_with_coordinates() {
        assert_eq!("o 3 4".parse::<Command>(), Ok(Command::Open((3, 4))));
        assert_eq!("flag 0 19".parse::<Command>(), Ok(Command::Flag((0, 19))));
        assert_eq!("  P 2 2 ".parse::<Command>(), Ok(Command::Press((2, 2))));
        assert_eq!("7 1".parse::<Command>(), Ok(Command::Open((7, 1))));
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!("c".parse::<Command>(), Ok(Command::Release));
        assert_eq!("n".parse::<Command>(), Ok(Command::NewGame));
        assert_eq!("?".parse::<Command>(), Ok(Command::Help));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            "o 3".parse::<Command>(),
            Err(ParseError::MissingCoords)
        );
        assert_eq!(
            "f 3 -1".parse::<Command>(),
            Err(ParseError::InvalidCoord("-1".into()))
        );
        assert_eq!(
            "o 300 1".parse::<Command>(),
            Err(ParseError::InvalidCoord("300".into()))
        );
        assert_eq!(
            "dig 1 1".parse::<Command>(),
            Err(ParseError::Unknown("dig".into()))
        );
        assert_eq!(
            "c now".parse::<Command>(),
            Err(ParseError::Trailing("now".into()))
        );
        assert_eq!("   ".parse::<Command>(), Err(ParseError::Empty));
    }
}
