//! Low-level nom parser functions for style value strings.
//!
//! Accepted forms: a bare number or one suffixed with `pt`/`px` (points),
//! a number followed by `%`, and the keywords `auto` and `undefined`.

use crate::dimension::{Edge, Value};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, space0, space1};
use nom::combinator::{map, opt, value};
use nom::multi::separated_list1;
use nom::number::complete::float;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

fn parse_points(input: &str) -> IResult<&str, Value> {
    map(
        (float, opt(alt((tag_no_case("pt"), tag_no_case("px"))))),
        |(number, _)| Value::points(number),
    )
    .parse(input)
}

fn parse_percent(input: &str) -> IResult<&str, Value> {
    map((float, char('%')), |(number, _)| Value::percent(number)).parse(input)
}

/// Parses a single length value (`"12"`, `"12pt"`, `"50%"`, `"auto"`).
pub fn parse_length_value(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::AUTO, tag_no_case("auto")),
        value(Value::UNDEFINED, tag_no_case("undefined")),
        parse_percent,
        parse_points,
    ))
    .parse(input)
}

/// Parses a whitespace separated list of length values.
pub fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(space0, separated_list1(space1, parse_length_value), space0).parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- High-level Parse Functions ---

pub fn parse_value(input: &str) -> Result<Value, StyleParseError> {
    run_parser(parse_length_value, input)
}

/// Parses CSS box shorthand (1, 2, 3 or 4 values) into per-edge values in
/// top, right, bottom, left order.
pub fn parse_edge_shorthand(input: &str) -> Result<Vec<(Edge, Value)>, StyleParseError> {
    let parts = run_parser(parse_value_list, input)?;
    match parts.as_slice() {
        [all] => Ok(vec![(Edge::All, *all)]),
        [vertical, horizontal] => Ok(vec![
            (Edge::Vertical, *vertical),
            (Edge::Horizontal, *horizontal),
        ]),
        [top, horizontal, bottom] => Ok(vec![
            (Edge::Top, *top),
            (Edge::Horizontal, *horizontal),
            (Edge::Bottom, *bottom),
        ]),
        [top, right, bottom, left] => Ok(vec![
            (Edge::Top, *top),
            (Edge::Right, *right),
            (Edge::Bottom, *bottom),
            (Edge::Left, *left),
        ]),
        _ => Err(StyleParseError::Parse(format!(
            "Invalid number of values for edge shorthand: got {}, expected 1 to 4.",
            parts.len()
        ))),
    }
}
