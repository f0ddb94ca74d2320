mod grammar;

pub(crate) use grammar::Token;

/// Parse a glob pattern into its token sequence.
///
/// Only `*` and `?` are special; every other character, including `\`, is
/// literal.
pub(crate) fn parse(pattern: &str) -> Vec<Token> {
    use winnow::Parser;
    grammar::parse_glob
        .parse(pattern)
        // The grammar accepts every input; a whole-literal token is the
        // faithful reading if that ever stops holding.
        .unwrap_or_else(|_| vec![Token::Literal(pattern.to_owned())])
}
