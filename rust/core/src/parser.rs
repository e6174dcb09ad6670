// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record scanning and tokenizing
//!
//! Georeference extraction only touches a handful of records, so nothing here
//! builds an entity graph. [`EntityScanner`] walks `#id=TYPE(args);` records,
//! [`split_arguments`] cuts a record into its top-level arguments and
//! [`parse_token`] tokenizes a single argument with nom.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// STEP token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text' (doubled quotes left as-is)
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Real: 3.14, 0., 1.5E-10
    Float(f64),
    /// Enumeration: .T., .ELEMENT.
    Enum(&'a str),
    /// Aggregate: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCLENGTHMEASURE(12.5)
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Unset: $
    Null,
    /// Derived: *
    Derived,
}

impl<'a> Token<'a> {
    /// Numeric value of a real or integer token.
    ///
    /// Single-argument typed values such as `IFCLENGTHMEASURE(12.5)` unwrap to
    /// their argument.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Token::Float(v) => Some(*v),
            Token::Integer(v) => Some(*v as f64),
            Token::TypedValue(_, args) if args.len() == 1 => args[0].as_f64(),
            _ => None,
        }
    }

    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            Token::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Token<'a>]> {
        match self {
            Token::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Token::Null)
    }
}

fn ws(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace())(input)
}

fn entity_id(input: &str) -> IResult<&str, u32> {
    preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>()))(input)
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(entity_id, Token::EntityRef)(input)
}

/// Quoted string body. STEP escapes a quote by doubling it.
fn quoted(input: &str) -> IResult<&str, &str> {
    let (rest, _) = char('\'')(input)?;
    let bytes = rest.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Ok((&rest[i + 1..], &rest[..i]));
        }
        i += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Char)))
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    map(quoted, Token::String)(input)
}

fn integer(input: &str) -> IResult<&str, Token> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>().map(Token::Integer)
    })(input)
}

/// Reals always carry a decimal point in STEP; digits after it are optional.
fn float(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            char('.'),
            opt(digit1),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| fast_float::parse::<f64, _>(s).map(Token::Float),
    )(input)
}

fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

fn type_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(char(','), token),
        preceded(ws, char(')')),
    )(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    map(arguments, Token::List)(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    map(pair(type_name, arguments), |(name, args)| {
        Token::TypedValue(name, args)
    })(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // before integer: both start with digits
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

/// Tokenize a single argument. Anything that is not fully consumed is `None`.
pub fn parse_token(argument: &str) -> Option<Token<'_>> {
    all_consuming(token)(argument).ok().map(|(_, t)| t)
}

/// Strictly parse a complete record such as `#9=IFCDIRECTION((0.,1.));`
///
/// Returns the id, the type name as written and the argument tokens.
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<Token<'_>>)> {
    let result: IResult<&str, (u32, &str, Vec<Token>)> = tuple((
        delimited(ws, entity_id, ws),
        preceded(char('='), delimited(ws, type_name, ws)),
        terminated(arguments, pair(ws, char(';'))),
    ))(input);

    match result {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Incomplete(_)) => Err(Error::UnexpectedEof),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::parse(
            input.len() - e.input.len(),
            format!("Failed to parse entity: {:?}", e.code),
        )),
    }
}

/// Split a record into its top-level arguments.
///
/// Nested aggregates and quoted strings are kept intact; each argument is
/// trimmed but otherwise unvalidated, so a record with one garbled argument
/// still yields the others. `None` when the record has no argument list or
/// the list is unterminated.
pub fn split_arguments(record: &str) -> Option<SmallVec<[&str; 8]>> {
    let bytes = record.as_bytes();
    let open = memchr::memchr(b'(', bytes)?;

    let mut args = SmallVec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut arg_start = open + 1;

    for (i, &b) in bytes.iter().enumerate().skip(open + 1) {
        if in_string {
            if b == b'\'' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'\'' => in_string = true,
            b'(' => depth += 1,
            b')' if depth == 0 => {
                let last = record[arg_start..i].trim();
                if !(last.is_empty() && args.is_empty()) {
                    args.push(last);
                }
                return Some(args);
            }
            b')' => depth -= 1,
            b',' if depth == 0 => {
                args.push(record[arg_start..i].trim());
                arg_start = i + 1;
            }
            _ => {}
        }
    }

    None
}

/// End offset (exclusive, past the `;`) of the record body starting at `from`.
/// Semicolons inside quoted strings are skipped.
fn record_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut in_string = false;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match b {
            b'\'' => in_string = !in_string,
            b';' if !in_string => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Record scanner - walks the file without tokenizing arguments
/// O(n) in the length of the text
pub struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next record
    /// Returns (entity_id, type_name, record_start, record_end)
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        loop {
            let offset = memchr::memchr(b'#', bytes.get(self.position..)?)?;
            let start = self.position + offset;
            let mut pos = start + 1;

            let id_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let id_end = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }

            // '#' that does not open a record, e.g. a reference or text
            if id_end == id_start || bytes.get(pos) != Some(&b'=') {
                self.position = start + 1;
                continue;
            }
            let id = match self.content[id_start..id_end].parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    self.position = id_end;
                    continue;
                }
            };

            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let type_start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
            {
                pos += 1;
            }
            let type_end = pos;

            let Some(end) = record_end(bytes, pos) else {
                self.position = bytes.len();
                return None;
            };
            self.position = end;

            return Some((id, &self.content[type_start..type_end], start, end));
        }
    }

    /// First record of a type (case-insensitive), from the current position
    pub fn first_of_type(&mut self, target_type: &str) -> Option<(u32, usize, usize)> {
        while let Some((id, type_name, start, end)) = self.next_entity() {
            if type_name.eq_ignore_ascii_case(target_type) {
                return Some((id, start, end));
            }
        }
        None
    }

    /// All records of a type (case-insensitive), from the current position
    pub fn find_by_type(&mut self, target_type: &str) -> Vec<(u32, usize, usize)> {
        let mut results = Vec::new();

        while let Some((id, start, end)) = self.first_of_type(target_type) {
            results.push((id, start, end));
        }

        results
    }

    /// Record with the given id, from the current position
    /// Returns (type_name, record_start, record_end)
    pub fn find_by_id(&mut self, target_id: u32) -> Option<(&'a str, usize, usize)> {
        while let Some((id, type_name, start, end)) = self.next_entity() {
            if id == target_id {
                return Some((type_name, start, end));
            }
        }
        None
    }

    /// Text of a record returned by the scanner
    #[inline]
    pub fn record(&self, start: usize, end: usize) -> &'a str {
        &self.content[start..end]
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref() {
        assert_eq!(entity_ref("#123"), Ok(("", Token::EntityRef(123))));
        assert_eq!(entity_ref("#0"), Ok(("", Token::EntityRef(0))));
    }

    #[test]
    fn test_string_literal_with_escaped_quote() {
        assert_eq!(string_literal("'hello'"), Ok(("", Token::String("hello"))));
        assert_eq!(
            string_literal("'it''s; fine'"),
            Ok(("", Token::String("it''s; fine")))
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(integer("-42"), Ok(("", Token::Integer(-42))));
        assert_eq!(float("445518.6"), Ok(("", Token::Float(445518.6))));
        assert_eq!(float("-0.7071"), Ok(("", Token::Float(-0.7071))));
        assert_eq!(float("0."), Ok(("", Token::Float(0.0))));
        assert_eq!(float("1.5E-10"), Ok(("", Token::Float(1.5e-10))));
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token(" 59.1 "), Some(Token::Float(59.1)));
        assert_eq!(parse_token("#71"), Some(Token::EntityRef(71)));
        assert_eq!(parse_token("$"), Some(Token::Null));
        assert_eq!(parse_token(".ELEMENT."), Some(Token::Enum("ELEMENT")));
        assert_eq!(parse_token("12.5abc"), None);
        assert_eq!(parse_token("..."), None);
        assert_eq!(parse_token(""), None);

        let measure = parse_token("IFCLENGTHMEASURE(12.5)").unwrap();
        assert_eq!(measure.as_f64(), Some(12.5));
    }

    #[test]
    fn test_parse_token_nested_list() {
        let token = parse_token("((-0.7071,0.7071))").unwrap();
        let outer = token.as_list().unwrap();
        assert_eq!(outer.len(), 1);
        let inner = outer[0].as_list().unwrap();
        assert_eq!(inner, &[Token::Float(-0.7071), Token::Float(0.7071)]);
    }

    #[test]
    fn test_parse_entity() {
        let (id, type_name, args) = parse_entity("#9=IFCDIRECTION((0.,0.,1.));").unwrap();
        assert_eq!(id, 9);
        assert_eq!(type_name, "IFCDIRECTION");
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].as_list().map(|l| l.len()), Some(3));
    }

    #[test]
    fn test_parse_entity_rejects_garbage() {
        let err = parse_entity("#9=IFCDIRECTION((0.,0.,1.)").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(parse_entity("#100=IFCMAPCONVERSION(#1,#2,1.,2.,3.,...);").is_err());
    }

    #[test]
    fn test_split_arguments() {
        let args = split_arguments("#100=IFCMAPCONVERSION(#1,#2,445518.6,5026017.2,59.1,...);")
            .unwrap();
        assert_eq!(
            args.as_slice(),
            &["#1", "#2", "445518.6", "5026017.2", "59.1", "..."]
        );

        let args = split_arguments("#5=IFCX('a,(b)',(1,(2,3)), $ );").unwrap();
        assert_eq!(args.as_slice(), &["'a,(b)'", "(1,(2,3))", "$"]);

        assert_eq!(split_arguments("#6=IFCEMPTY();").unwrap().len(), 0);
        assert!(split_arguments("#7=IFCBROKEN(1,2").is_none());
        assert!(split_arguments("no arguments").is_none());
    }

    #[test]
    fn test_entity_scanner() {
        let content = r#"
ISO-10303-21;
HEADER;
FILE_NAME('model #2.ifc','2024-01-01',(''),(''),'','','');
ENDSEC;
DATA;
#1=IFCPROJECT('guid',$,'A; B',$,$,$,$,$,$);
#2 = IFCWALL('guid2',$,$,$,$,$,$,$);
#3=IFCDOOR('guid3',#2,$,$,$,$,$,$);
#4=IFCWALL('guid4',$,$,$,$,$,$,$);
ENDSEC;
"#;

        let mut scanner = EntityScanner::new(content);

        let (id, type_name, start, end) = scanner.next_entity().unwrap();
        assert_eq!(id, 1);
        assert_eq!(type_name, "IFCPROJECT");
        assert!(scanner.record(start, end).ends_with("$,$);"));

        let (id, type_name, _, _) = scanner.next_entity().unwrap();
        assert_eq!((id, type_name), (2, "IFCWALL"));

        scanner.reset();
        let walls = scanner.find_by_type("ifcwall");
        assert_eq!(walls.iter().map(|w| w.0).collect::<Vec<_>>(), vec![2, 4]);

        scanner.reset();
        let (type_name, _, _) = scanner.find_by_id(3).unwrap();
        assert_eq!(type_name, "IFCDOOR");
        assert!(scanner.find_by_id(3).is_none());
    }
}
