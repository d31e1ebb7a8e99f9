//! Parsers for fractions written the way they usually appear next to video: `30000/1001` for a
//! frame rate, `16:9` for an aspect ratio, or a bare `24`.

use nom::character::complete::{i32 as int, multispace0, one_of};
use nom::combinator::{map, opt};
use nom::error::ParseError;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

use crate::fraction::Fraction;

/// Parses a fraction. A missing denominator means `1`.
pub fn fraction(input: &str) -> IResult<&str, Fraction> {
    map(
        pair(ws(int), opt(preceded(ratio_separator, ws(int)))),
        |(num, den)| Fraction::new(num, den.unwrap_or(1)),
    )(input)
}

/// Parses the separator between numerator and denominator: `/` or `:`.
pub fn ratio_separator(input: &str) -> IResult<&str, char> {
    one_of("/:")(input)
}

/// Strips surrounding whitespace.
fn ws<'a, F: 'a, O, E: ParseError<&'a str>>(
    inner: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Fn(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fraction_parse() {
        assert_eq!(
            fraction("30000/1001").unwrap(),
            ("", Fraction::new(30000, 1001))
        );
        assert_eq!(fraction("16:9").unwrap(), ("", Fraction::new(16, 9)));
        assert_eq!(fraction(" 4 / 3 ").unwrap(), ("", Fraction::new(4, 3)));
        assert_eq!(fraction("-1/-2").unwrap(), ("", Fraction::new(-1, -2)));
        assert_eq!(fraction("24").unwrap(), ("", Fraction::new(24, 1)));
    }

    #[test]
    fn test_fraction_leftovers() {
        assert_eq!(fraction("1/2/3").unwrap(), ("/3", Fraction::new(1, 2)));
        assert_eq!(fraction("7/").unwrap(), ("/", Fraction::new(7, 1)));
        assert_eq!(fraction("5 fps").unwrap(), ("fps", Fraction::new(5, 1)));
        assert!(fraction("fps").is_err());
        assert!(fraction("").is_err());
    }

    #[test]
    fn test_separator() {
        assert_eq!(ratio_separator("/1001").unwrap(), ("1001", '/'));
        assert_eq!(ratio_separator(":9").unwrap(), ("9", ':'));
        assert!(ratio_separator("x9").is_err());
    }
}
