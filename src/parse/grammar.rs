use winnow::combinator::{alt, repeat};
use winnow::prelude::*;
use winnow::token::take_while;

/// One element of a parsed glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Text that must appear verbatim, backslashes included.
    Literal(String),
    /// `?`: exactly one character.
    AnyChar,
    /// `*`: any run of characters, including none.
    AnyRun,
}

fn is_special(c: char) -> bool {
    matches!(c, '*' | '?')
}

// -- Pieces -----------------------------------------------------------------

fn any_run(input: &mut &str) -> ModalResult<Token> {
    // Consecutive stars are equivalent to one.
    take_while(1.., '*').value(Token::AnyRun).parse_next(input)
}

fn any_char(input: &mut &str) -> ModalResult<Token> {
    '?'.value(Token::AnyChar).parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<Token> {
    take_while(1.., |c: char| !is_special(c))
        .map(|s: &str| Token::Literal(s.to_owned()))
        .parse_next(input)
}

fn piece(input: &mut &str) -> ModalResult<Token> {
    alt((any_run, any_char, literal)).parse_next(input)
}

// -- Top level --------------------------------------------------------------

/// Every input parses: literal runs are maximal, so adjacent pieces always
/// differ in kind.
pub(super) fn parse_glob(input: &mut &str) -> ModalResult<Vec<Token>> {
    repeat(0.., piece).parse_next(input)
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;

    use super::*;

    fn lit(s: &str) -> Token {
        Token::Literal(s.to_owned())
    }

    #[test]
    fn parse_plain_literal() {
        assert_eq!(parse("notes.txt"), vec![lit("notes.txt")]);
    }

    #[test]
    fn parse_extension_glob() {
        assert_eq!(parse("*.tmp"), vec![Token::AnyRun, lit(".tmp")]);
    }

    #[test]
    fn parse_question_marks() {
        assert_eq!(
            parse("a?c"),
            vec![lit("a"), Token::AnyChar, lit("c")]
        );
    }

    #[test]
    fn consecutive_stars_collapse() {
        assert_eq!(
            parse("a***b"),
            vec![lit("a"), Token::AnyRun, lit("b")]
        );
    }

    #[test]
    fn backslash_is_an_ordinary_character() {
        assert_eq!(
            parse(r"C:\Temp\*"),
            vec![lit(r"C:\Temp\"), Token::AnyRun]
        );
        assert_eq!(
            parse(r"why\?"),
            vec![lit(r"why\"), Token::AnyChar]
        );
    }

    #[test]
    fn trailing_backslash_is_literal() {
        assert_eq!(parse("backup\\"), vec![lit("backup\\")]);
    }

    #[test]
    fn empty_pattern_has_no_tokens() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn unicode_literals_survive() {
        assert_eq!(
            parse("résumé-?.pdf"),
            vec![lit("résumé-"), Token::AnyChar, lit(".pdf")]
        );
    }
}
