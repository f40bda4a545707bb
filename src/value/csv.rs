//! Single-record CSV, the list syntax of string lists.

use crate::ValueError;

pub(crate) fn split(input: &str) -> Result<Vec<String>, ValueError> {
    let err = |reason| ValueError::Csv { input: input.to_string(), reason };

    let mut fields = Vec::new();
    let mut chars = input.chars().peekable();
    loop {
        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err(err("unterminated quoted field")),
                }
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(',') => fields.push(field),
                Some(_) => return Err(err("extraneous or missing \" in quoted field")),
            }
        } else {
            loop {
                match chars.next() {
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                    Some(',') => break,
                    Some('"') => return Err(err("bare \" in non-quoted field")),
                    Some(c) => field.push(c),
                }
            }
            fields.push(field);
        }
    }
}

pub(crate) fn join(items: &[String]) -> String {
    if let [only] = items {
        if only.is_empty() {
            return r#""""#.to_string();
        }
    }
    let mut res = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            res.push(',');
        }
        if needs_quotes(item) {
            res.push('"');
            res.push_str(&item.replace('"', r#""""#));
            res.push('"');
        } else {
            res.push_str(item);
        }
    }
    res
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n']) || field.starts_with(char::is_whitespace)
}
