//! Durations in the `1h2m3.5s` notation.

use std::time::Duration;

use super::Primitive;
use crate::ValueError;

const MAX_NANOS: u128 = i64::MAX as u128;

impl Primitive for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse(s: &str) -> Result<Duration, ValueError> {
        parse(s)
    }

    fn render(&self) -> String {
        render(*self)
    }
}

fn parse(input: &str) -> Result<Duration, ValueError> {
    let err = |reason| ValueError::Duration { input: input.to_string(), reason };

    let mut s = input;
    if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    } else if s.starts_with('-') {
        return Err(err("negative durations are not supported"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(err("empty duration"));
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        let (int, rest) = s.split_at(int_len);
        s = rest;

        let mut frac = "";
        if let Some(rest) = s.strip_prefix('.') {
            let frac_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            (frac, s) = rest.split_at(frac_len);
        }
        if int.is_empty() && frac.is_empty() {
            return Err(err("expected a number"));
        }

        let unit_len = s.find(|c: char| c == '.' || c.is_ascii_digit()).unwrap_or(s.len());
        let (unit, rest) = s.split_at(unit_len);
        s = rest;
        let unit: u128 = match unit {
            "" => return Err(err("missing unit")),
            "ns" => 1,
            "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 60 * 60 * 1_000_000_000,
            _ => return Err(err("unknown unit")),
        };

        let mut whole: u128 = 0;
        for d in int.bytes() {
            whole = whole * 10 + u128::from(d - b'0');
            if whole > MAX_NANOS {
                return Err(err("overflow"));
            }
        }
        let mut nanos = whole.checked_mul(unit).ok_or_else(|| err("overflow"))?;

        // Digits past nanosecond precision of the largest unit do not matter.
        let mut scaled: u128 = 0;
        let mut scale: u128 = 1;
        for d in frac.bytes().take(15) {
            scaled = scaled * 10 + u128::from(d - b'0');
            scale *= 10;
        }
        nanos += scaled * unit / scale;

        total += nanos;
        if total > MAX_NANOS {
            return Err(err("overflow"));
        }
    }
    Ok(Duration::from_nanos(total as u64))
}

fn render(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000_000_000 {
        let (prec, unit) = match nanos {
            0..=999 => return format!("{nanos}ns"),
            1_000..=999_999 => (3, "\u{b5}s"),
            _ => (6, "ms"),
        };
        let (int, frac) = split_frac(nanos, prec);
        return format!("{int}{frac}{unit}");
    }

    let (secs, frac) = split_frac(nanos, 9);
    let mins = secs / 60;
    let hours = mins / 60;
    if hours > 0 {
        format!("{hours}h{}m{}{frac}s", mins % 60, secs % 60)
    } else if mins > 0 {
        format!("{mins}m{}{frac}s", secs % 60)
    } else {
        format!("{secs}{frac}s")
    }
}

/// Splits off the `prec` lowest decimal digits as a `.ddd` suffix without
/// trailing zeros.
fn split_frac(v: u128, prec: usize) -> (u128, String) {
    let p = 10u128.pow(prec as u32);
    let frac = v % p;
    if frac == 0 {
        return (v / p, String::new());
    }
    let digits = format!("{frac:0prec$}");
    (v / p, format!(".{}", digits.trim_end_matches('0')))
}
