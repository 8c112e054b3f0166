//! Token parsers for CODEOWNERS rule lines.

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::rest,
    multi::many0,
    sequence::preceded,
};

/// Characters that can appear in a pattern or owner token.
fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && c != '#'
}

/// Parses a complete comment line (optional whitespace + # + content).
pub fn parse_comment_line(input: &str) -> IResult<&str, &str> {
    (space0, char('#'), rest)
        .map(|(_, _, content)| content)
        .parse(input)
}

/// Checks if a line is blank (empty or only whitespace).
pub fn is_blank_line(input: &str) -> bool {
    input.trim().is_empty()
}

/// The pattern and owners of a rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTokens<'a> {
    /// The pattern text.
    pub pattern: &'a str,
    /// Owner texts, in order. Empty for a rule that unsets ownership.
    pub owners: Vec<&'a str>,
}

/// Parses a rule line into its pattern and owners.
///
/// Owners end at the first token starting with `#`; the remaining input
/// (whitespace and any trailing comment) is returned unparsed.
pub fn parse_rule_line(input: &str) -> IResult<&str, RuleTokens<'_>> {
    (
        space0,
        take_while1(is_token_char),
        many0(preceded(space1, take_while1(is_token_char))),
    )
        .map(|(_, pattern, owners)| RuleTokens { pattern, owners })
        .parse(input)
}
