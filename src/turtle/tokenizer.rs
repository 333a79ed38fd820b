use std::str::Chars;

use thiserror::Error;

use super::common::Command;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unknown command symbol {0:?}")]
    UnknownSymbol(char),
}

/// Converter for [`tokenize_with`] that refuses unknown symbols.
pub fn strict_command(symbol: char) -> Result<Command, TokenError> {
    match Command::from_symbol(symbol) {
        Command::Skip => Err(TokenError::UnknownSymbol(symbol)),
        command => Ok(command),
    }
}

fn trim_trailing_rotations(raw: &str) -> &str {
    raw.trim_end_matches(Command::is_rotation_symbol)
}

#[derive(Debug)]
pub struct Tokens<'a> {
    symbols: Chars<'a>,
}

impl Iterator for Tokens<'_> {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        self.symbols
            .by_ref()
            .map(Command::from_symbol)
            .find(|command| *command != Command::Skip)
    }
}

/// Unknown symbols are skipped.
pub fn tokenize(raw: &str) -> Tokens<'_> {
    Tokens {
        symbols: trim_trailing_rotations(raw).chars(),
    }
}

/// Yields the converter's error once and then ends.
pub struct TokensWith<'a, F> {
    symbols: Chars<'a>,
    converter: F,
    failed: bool,
}

impl<F, E> Iterator for TokensWith<'_, F>
where
    F: FnMut(char) -> Result<Command, E>,
{
    type Item = Result<Command, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for symbol in self.symbols.by_ref() {
            match (self.converter)(symbol) {
                Ok(Command::Skip) => continue,
                Ok(command) => return Some(Ok(command)),
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }

        None
    }
}

pub fn tokenize_with<F, E>(raw: &str, converter: F) -> TokensWith<'_, F>
where
    F: FnMut(char) -> Result<Command, E>,
{
    TokensWith {
        symbols: trim_trailing_rotations(raw).chars(),
        converter,
        failed: false,
    }
}

/// Stops at the first error, which is stored in `error`.
pub fn until_error<'s, I, E>(
    tokens: I,
    error: &'s mut Option<E>,
) -> impl Iterator<Item = Command> + 's
where
    I: IntoIterator<Item = Result<Command, E>>,
    I::IntoIter: 's,
    E: 's,
{
    tokens.into_iter().map_while(move |token| match token {
        Ok(command) => Some(command),
        Err(e) => {
            *error = Some(e);
            None
        }
    })
}
