use super::{csv, Primitive};
use crate::ValueError;

/// Accepts an optional sign followed by a decimal number, a `0x`, `0o` or
/// `0b` prefixed number, or a legacy `0`-prefixed octal number.
fn parse_int(input: &str, type_name: &'static str) -> Result<i128, ValueError> {
    let (neg, s) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        Some("0o" | "0O") => (8, &s[2..]),
        Some("0b" | "0B") => (2, &s[2..]),
        _ if s.len() > 1 && s.starts_with('0') => (8, &s[1..]),
        _ => (10, s),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ValueError::Int(input.to_string()));
    }
    let out_of_range = || ValueError::OutOfRange { input: input.to_string(), type_name };
    let magnitude = u128::from_str_radix(digits, radix).map_err(|_| out_of_range())?;
    let magnitude = i128::try_from(magnitude).map_err(|_| out_of_range())?;
    Ok(if neg { -magnitude } else { magnitude })
}

macro_rules! int_primitive {
    ($($ty:ident),*) => {$(
        impl Primitive for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn parse(s: &str) -> Result<$ty, ValueError> {
                let v = parse_int(s, Self::TYPE_NAME)?;
                $ty::try_from(v).map_err(|_| ValueError::OutOfRange {
                    input: s.to_string(),
                    type_name: Self::TYPE_NAME,
                })
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}
int_primitive![i8, i16, i32, i64, isize, u8, u16, u32, u64, usize];

macro_rules! float_primitive {
    ($($ty:ident),*) => {$(
        impl Primitive for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn parse(s: &str) -> Result<$ty, ValueError> {
                let v: $ty = s
                    .parse()
                    .map_err(|source| ValueError::Float { input: s.to_string(), source })?;
                let spelled_inf = s
                    .trim_start_matches(['+', '-'])
                    .get(..3)
                    .is_some_and(|it| it.eq_ignore_ascii_case("inf"));
                if v.is_infinite() && !spelled_inf {
                    return Err(ValueError::OutOfRange {
                        input: s.to_string(),
                        type_name: Self::TYPE_NAME,
                    });
                }
                Ok(v)
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}
float_primitive![f32, f64];

impl Primitive for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse(s: &str) -> Result<bool, ValueError> {
        match s {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(ValueError::Bool(s.to_string())),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn implicit() -> Option<&'static str> {
        Some("true")
    }
}

/// Lists of strings are read and written as one CSV record.
impl Primitive for String {
    const TYPE_NAME: &'static str = "string";

    fn parse(s: &str) -> Result<String, ValueError> {
        Ok(s.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn split(s: &str) -> Result<Vec<String>, ValueError> {
        if s.is_empty() {
            return Ok(Vec::new());
        }
        csv::split(s)
    }

    fn join(items: &[String]) -> String {
        csv::join(items)
    }
}
