use winnow::{
    Result as WResult,
    ascii::{float, space0, space1},
    combinator::{delimited, separated},
    prelude::*,
};

/// Numbers separated by runs of spaces or tabs.
pub(super) fn whitespace_row(i: &mut &str) -> WResult<Vec<f64>> {
    separated(1.., coordinate, space1).parse_next(i)
}

/// Numbers separated by `delimiter`, with optional spaces around each one.
pub(super) fn delimited_row(delimiter: char) -> impl FnMut(&mut &str) -> WResult<Vec<f64>> {
    move |i: &mut &str| {
        separated(1.., delimited(space0, coordinate, space0), delimiter).parse_next(i)
    }
}

/// One coordinate. `float` already takes plain integers like `3`.
fn coordinate(i: &mut &str) -> WResult<f64> {
    float.parse_next(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates() {
        assert_eq!(coordinate.parse("3").unwrap(), 3.0);
        assert_eq!(coordinate.parse("+0.25").unwrap(), 0.25);
        assert_eq!(coordinate.parse("-1.5e3").unwrap(), -1500.0);
        assert!(coordinate.parse("x").is_err());
    }

    #[test]
    fn rows() {
        assert_eq!(
            delimited_row(';').parse("1 ; 2;3").unwrap(),
            vec![1.0, 2.0, 3.0]
        );
        assert_eq!(whitespace_row.parse("1  2").unwrap(), vec![1.0, 2.0]);
        assert!(delimited_row(',').parse("1,").is_err());
        assert!(whitespace_row.parse("1,2").is_err());
    }
}
