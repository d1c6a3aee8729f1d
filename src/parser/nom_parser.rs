use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{
        alpha1, alphanumeric1, char, digit1, multispace0, none_of, one_of, space0, space1,
    },
    combinator::{map, opt, recognize},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Signed,
    Unsigned,
}

/// Syntax tree of a C-family type spelling such as `const unsigned int&` or
/// `behaviac::vector<Vec2>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSpelling {
    pub is_const: bool,
    pub sign: Option<Sign>,
    /// Remaining words joined by a space; may contain `::` paths
    pub name: String,
    pub args: Vec<TypeSpelling>,
    pub pointer: usize,
    pub reference: bool,
}

impl TypeSpelling {
    #[allow(dead_code)]
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn path(i: &str) -> IResult<&str, &str> {
    recognize(pair(identifier, many0(pair(tag("::"), identifier))))(i)
}

fn template_args(i: &str) -> IResult<&str, Vec<TypeSpelling>> {
    delimited(
        pair(char('<'), space0),
        separated_list1(delimited(space0, char(','), space0), native_type),
        pair(space0, char('>')),
    )(i)
}

pub fn native_type(i: &str) -> IResult<&str, TypeSpelling> {
    let (i, words) = preceded(space0, separated_list1(space1, path))(i)?;
    let (i, args) = opt(preceded(space0, template_args))(i)?;
    let (i, suffix) = many0(preceded(space0, one_of("*&")))(i)?;
    let (i, _) = space0(i)?;

    let mut ret = TypeSpelling {
        args: args.unwrap_or_default(),
        pointer: suffix.iter().filter(|c| **c == '*').count(),
        reference: suffix.contains(&'&'),
        ..TypeSpelling::default()
    };
    let mut names = vec![];
    for word in words {
        match word {
            "const" => ret.is_const = true,
            "signed" => ret.sign = Some(Sign::Signed),
            "unsigned" => ret.sign = Some(Sign::Unsigned),
            word => names.push(word),
        }
    }
    ret.name = names.join(" ");
    Ok((i, ret))
}

/// An encoded literal before it is given a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLiteral {
    Scalar(String),
    Array(Vec<RawLiteral>),
    Struct(Vec<(String, RawLiteral)>),
}

fn scalar<'a>(stop: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, RawLiteral> {
    map(recognize(many0(none_of(stop))), |s: &str| {
        RawLiteral::Scalar(s.trim().to_owned())
    })
}

/// `N:a|b|c`. The count prefix bounds the number of items.
fn array<'a>(stop: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, RawLiteral> {
    move |i| {
        let (i, count) = terminated(delimited(space0, digit1, space0), char(':'))(i)?;
        let (i, mut items) =
            separated_list0(char('|'), alt((struct_literal, scalar(stop))))(i)?;
        let count = count.parse().unwrap_or(items.len());
        items.truncate(count);
        Ok((i, RawLiteral::Array(items)))
    }
}

fn field(i: &str) -> IResult<&str, (String, RawLiteral)> {
    let (i, (name, value)) = terminated(
        separated_pair(
            delimited(multispace0, identifier, space0),
            char('='),
            preceded(space0, alt((struct_literal, array("|;}"), scalar(";}")))),
        ),
        opt(char(';')),
    )(i)?;
    Ok((i, (name.to_owned(), value)))
}

/// `{x=1;y=2;}`
fn struct_literal(i: &str) -> IResult<&str, RawLiteral> {
    let (i, fields) = delimited(
        pair(space0, char('{')),
        many0(field),
        pair(multispace0, char('}')),
    )(i)?;
    Ok((i, RawLiteral::Struct(fields)))
}

pub fn literal(i: &str) -> IResult<&str, RawLiteral> {
    alt((struct_literal, array("|"), scalar("")))(i)
}

#[cfg(test)]
mod test;
