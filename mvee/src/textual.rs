//! Reading point sets from delimited text, one point per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! 1.0, 2.0
//! -3.5, 4e-2
//! ```
mod parser;

use std::str::FromStr;

use winnow::Parser;

use crate::{PointSet, TextualError};

/// What separates the coordinates on each line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// One or more spaces or tabs.
    Whitespace,
    /// A single character like `,` or `;`. Spaces around it are allowed.
    Char(char),
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::Char(',')
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whitespace" | "space" | "tab" | " " | "\t" => Ok(Self::Whitespace),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_ascii_digit() && !"+-.eE".contains(c) => {
                        Ok(Self::Char(c))
                    }
                    _ => Err(format!(
                        "'{s}' isn't a valid delimiter. Use a single non-numeric character, or 'whitespace'."
                    )),
                }
            }
        }
    }
}

/// Parse one point per line. Blank lines and lines starting with `#` are skipped.
pub fn parse_points(text: &str, delimiter: Delimiter) -> Result<PointSet, TextualError> {
    let mut rows = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = match delimiter {
            Delimiter::Whitespace => parser::whitespace_row.parse(line),
            Delimiter::Char(c) => parser::delimited_row(c).parse(line),
        }
        .map_err(|e| TextualError::Syntax {
            line: line_idx + 1,
            message: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(PointSet::from_rows(&rows)?)
}

/// Comma-separated.
impl FromStr for PointSet {
    type Err = TextualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_points(s, Delimiter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputError;

    #[test]
    fn parses_csv() {
        let text = "# x, y\n1, 2\n\n  -3.5 ,4e-2  \n0.25,-0\n";
        let points: PointSet = text.parse().unwrap();
        assert_eq!(points.num_points(), 3);
        assert_eq!(points.dimension(), 2);
        assert_eq!(points.point(1), &[-3.5, 0.04]);
    }

    #[test]
    fn parses_whitespace_and_crlf() {
        let text = "1 2 3\r\n4\t5   6\r\n";
        let points = parse_points(text, Delimiter::Whitespace).unwrap();
        assert_eq!(points.num_points(), 2);
        assert_eq!(points.point(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn reports_line_of_syntax_error() {
        let text = "1,2\n# fine\n3,oops\n";
        match parse_points(text, Delimiter::default()) {
            Err(TextualError::Syntax { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected a syntax error, got {other:?}"),
        }
        assert!(matches!(
            parse_points("1,,2", Delimiter::default()),
            Err(TextualError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn shape_errors_come_from_point_set() {
        assert!(matches!(
            parse_points("1,2\n3\n", Delimiter::default()),
            Err(TextualError::Points(InputError::RaggedRows { row: 1, .. }))
        ));
        assert!(matches!(
            parse_points("# nothing here\n", Delimiter::default()),
            Err(TextualError::Points(InputError::EmptyPointSet))
        ));
    }

    #[test]
    fn delimiter_from_str() {
        assert_eq!("whitespace".parse::<Delimiter>(), Ok(Delimiter::Whitespace));
        assert_eq!(";".parse::<Delimiter>(), Ok(Delimiter::Char(';')));
        assert!("-".parse::<Delimiter>().is_err());
        assert!(",,".parse::<Delimiter>().is_err());
    }
}
