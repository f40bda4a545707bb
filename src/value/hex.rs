use crate::ValueError;

/// Decodes surrounding whitespace, an optional `0x` prefix and either case.
pub(crate) fn decode(input: &str) -> Result<Vec<u8>, ValueError> {
    let s = input.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if s.len() % 2 != 0 {
        return Err(ValueError::Hex { input: input.to_string(), reason: "odd length" });
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| match (digit(pair[0]), digit(pair[1])) {
            (Some(hi), Some(lo)) => Ok(hi << 4 | lo),
            _ => Err(ValueError::Hex { input: input.to_string(), reason: "invalid hex digit" }),
        })
        .collect()
}

pub(crate) fn encode(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut res = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        res.push(DIGITS[usize::from(b >> 4)] as char);
        res.push(DIGITS[usize::from(b & 0xf)] as char);
    }
    res
}

fn digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
