use std::str;

use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till, take_till1};
use nom::character::complete::{char, line_ending, multispace0, one_of, space0, space1};
use nom::combinator::{opt, recognize};
use nom::multi::{many0, many1};
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;
use serde::Serialize;


#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SpiceLine<'a> {
    Subckt(SubcktLine<'a>),
    Capacitor(CapacitorLine<'a>),
    Comment(&'a str),
    Other,
}

impl<'a> SpiceLine<'a> {
    pub fn subckt(&self) -> Option<&SubcktLine> {
        match self {
            SpiceLine::Subckt(line) => Some(line),
            _ => None,
        }
    }

    pub fn capacitor(&self) -> Option<&CapacitorLine> {
        match self {
            SpiceLine::Capacitor(line) => Some(line),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SubcktLine<'a> {
    pub name: &'a str,
    pub ports: Vec<&'a str>,
}

/// A capacitor card: `C<name> <pos> <neg> <value> [params...]`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CapacitorLine<'a> {
    pub name: &'a str,
    pub pos: &'a str,
    pub neg: &'a str,
    /// The value token as written, including any scale suffix and unit.
    pub value: &'a str,
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_space_or_line(c: char) -> bool {
    c == '\n' || c == '\r' || c == ' ' || c == '\t'
}

fn within_line_space1(input: &str) -> IResult<&str, ()> {
    let (input, _) = space1(input)?;
    Ok((input, ()))
}

fn line_continuation1(input: &str) -> IResult<&str, ()> {
    let (input, _) = tuple((
        space0,
        opt(line_comment),
        line_ending,
        space0,
        char('+'),
        space0,
    ))(input)?;
    Ok((input, ()))
}

fn many_line_continuation1(input: &str) -> IResult<&str, ()> {
    let (input, _) = many1(line_continuation1)(input)?;
    Ok((input, ()))
}

fn spice_space1(input: &str) -> IResult<&str, ()> {
    let (input, _) = alt((many_line_continuation1, within_line_space1))(input)?;
    Ok((input, ()))
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = tuple((space0, char(';'), take_till(is_newline)))(input)?;
    Ok((input, ()))
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_till1(is_space_or_line)(input)
}

fn subckt_ports(input: &str) -> IResult<&str, Vec<&str>> {
    many0(preceded(spice_space1, ident))(input)
}

fn subckt_name(input: &str) -> IResult<&str, &str> {
    preceded(spice_space1, ident)(input)
}

fn subckt_line(input: &str) -> IResult<&str, SpiceLine> {
    let (input, (_, name, ports)) =
        tuple((tag_no_case(".subckt"), subckt_name, subckt_ports))(input)?;

    Ok((input, SpiceLine::Subckt(SubcktLine { name, ports })))
}

fn capacitor_line(input: &str) -> IResult<&str, SpiceLine> {
    let (input, (name, pos, neg, value, _)) = tuple((
        recognize(pair(one_of("Cc"), take_till(is_space_or_line))),
        preceded(spice_space1, ident),
        preceded(spice_space1, ident),
        preceded(spice_space1, ident),
        take_till(is_newline),
    ))(input)?;

    Ok((
        input,
        SpiceLine::Capacitor(CapacitorLine {
            name,
            pos,
            neg,
            value,
        }),
    ))
}

fn comment_line(input: &str) -> IResult<&str, SpiceLine> {
    let (input, (_, _, comment, _)) =
        tuple((space0, tag_no_case("*"), take_till(is_newline), line_ending))(input)?;
    Ok((input, SpiceLine::Comment(comment.trim())))
}

fn other_line(input: &str) -> IResult<&str, SpiceLine> {
    let (input, _) = pair(ident, take_till(is_newline))(input)?;
    Ok((input, SpiceLine::Other))
}

fn spice_line(input: &str) -> IResult<&str, SpiceLine> {
    alt((subckt_line, capacitor_line, comment_line, other_line))(input)
}

pub(crate) fn parse_spice(input: &str) -> IResult<&str, Vec<SpiceLine>> {
    many0(delimited(multispace0, spice_line, multispace0))(input)
}
