use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, digit1},
    combinator::{map, map_res, opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::{Base, CharVal, NumVal, Repeat, RuleName, Terminal};

pub fn rule_name(input: &str) -> IResult<&str, RuleName> {
    let (rem, matched) = recognize(pair(alpha1, many0(alt((alphanumeric1, tag("-"))))))(input)?;
    Ok((rem, RuleName(matched.to_owned())))
}

fn base(input: &str) -> IResult<&str, Base> {
    alt((
        map(tag_no_case("x"), |_| Base::Hex),
        map(tag_no_case("d"), |_| Base::Decimal),
        map(tag_no_case("b"), |_| Base::Binary),
    ))(input)
}

fn number<'a>(base: Base) -> impl FnMut(&'a str) -> IResult<&'a str, u32> {
    map_res(
        take_while1(move |c: char| c.is_digit(base.radix())),
        move |s: &str| u32::from_str_radix(s, base.radix()),
    )
}

pub fn num_val(input: &str) -> IResult<&str, NumVal> {
    let (rem, base) = preceded(tag("%"), base)(input)?;
    let (rem, first) = number(base)(rem)?;

    let (rem, hi) = opt(preceded(char('-'), number(base)))(rem)?;
    if let Some(hi) = hi {
        return Ok((rem, NumVal::Range { base, lo: first, hi }));
    }

    let (rem, rest) = many0(preceded(char('.'), number(base)))(rem)?;
    let mut values = vec![first];
    values.extend(rest);
    Ok((rem, NumVal::Sequence { base, values }))
}

pub fn char_val(input: &str) -> IResult<&str, CharVal> {
    let (rem, case_sensitive) = opt(alt((
        map(tag_no_case("%s"), |_| true),
        map(tag_no_case("%i"), |_| false),
    )))(input)?;
    let (rem, value) = delimited(char('"'), take_while(|c: char| c != '"'), char('"'))(rem)?;
    Ok((
        rem,
        CharVal::new(value, case_sensitive.unwrap_or(false)),
    ))
}

pub fn terminal(input: &str) -> IResult<&str, Terminal> {
    alt((map(char_val, Terminal::Char), map(num_val, Terminal::Num)))(input)
}

fn decimal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// `[min] "*" [max]`, or a bare count.
pub fn repeat(input: &str) -> IResult<&str, Repeat> {
    let (rem, min) = opt(decimal)(input)?;
    let (rem, star) = opt(char('*'))(rem)?;
    match (min, star) {
        (min, Some(_)) => {
            let (rem, max) = opt(decimal)(rem)?;
            Ok((
                rem,
                Repeat {
                    min: min.unwrap_or(0),
                    max,
                },
            ))
        }
        (Some(n), None) => Ok((rem, Repeat::exactly(n))),
        (None, None) => Err(nom::Err::Error(Error::new(input, ErrorKind::Digit))),
    }
}
