//! The field declaration mini-language and the tags that accompany it.
//!
//! ```text
//! -             ignored
//! .             fields inlined into the current group
//! .name         fields nested in group `name`
//! --name -x     flag, long name and/or shorthand letter
//! <name>        required positional argument
//! [name]        optional positional argument
//! ```

use crate::DeclError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Ignore,
    Inline,
    Group(String),
    Flag { long: Option<String>, short: Option<char> },
    Required(String),
    Optional(String),
}

impl Decl {
    pub fn parse(decl: &str) -> Result<Decl, DeclError> {
        let text = decl.trim();
        if text.is_empty() {
            return Err(DeclError::Empty);
        }
        if text == "-" {
            return Ok(Decl::Ignore);
        }
        if text == "." {
            return Ok(Decl::Inline);
        }
        if let Some(name) = text.strip_prefix('.') {
            return Ok(Decl::Group(check_name(decl, name)?));
        }
        if let Some(name) = text.strip_prefix('<') {
            let name = name.strip_suffix('>').ok_or_else(|| malformed(decl))?;
            return Ok(Decl::Required(check_name(decl, name)?));
        }
        if let Some(name) = text.strip_prefix('[') {
            let name = name.strip_suffix(']').ok_or_else(|| malformed(decl))?;
            return Ok(Decl::Optional(check_name(decl, name)?));
        }

        let mut long = None;
        let mut short = None;
        for word in text.split_whitespace() {
            if let Some(name) = word.strip_prefix("--") {
                if long.is_some() {
                    return Err(DeclError::Conflicting(decl.to_string()));
                }
                long = Some(check_name(decl, name)?);
            } else if let Some(letter) = word.strip_prefix('-') {
                let mut chars = letter.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    return Err(malformed(decl));
                };
                if short.is_some() {
                    return Err(DeclError::Conflicting(decl.to_string()));
                }
                check_name(decl, letter)?;
                short = Some(c);
            } else {
                return Err(malformed(decl));
            }
        }
        Ok(Decl::Flag { long, short })
    }

    /// The name a flag or positional is addressed by, relative to its group.
    pub fn name(&self) -> Option<String> {
        match self {
            Decl::Flag { long: Some(long), .. } => Some(long.clone()),
            Decl::Flag { long: None, short: Some(c) } => Some(c.to_string()),
            Decl::Required(name) | Decl::Optional(name) => Some(name.clone()),
            _ => None,
        }
    }
}

fn malformed(decl: &str) -> DeclError {
    DeclError::Malformed(decl.to_string())
}

fn check_name(decl: &str, name: &str) -> Result<String, DeclError> {
    let bad = name.is_empty()
        || name.starts_with('-')
        || name.contains(|c: char| c.is_whitespace() || c == '=' || c == '.');
    if bad {
        return Err(DeclError::InvalidName { decl: decl.to_string(), name: name.to_string() });
    }
    Ok(name.to_string())
}

/// Everything attached to one declared field.
///
/// `Tags::new("--port -p").help("port to listen on").default_value("8080")`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub ask: String,
    pub help: Option<String>,
    pub hidden: bool,
    pub deprecated: Option<String>,
    pub default: Option<String>,
}

impl Tags {
    pub fn new(ask: impl Into<String>) -> Tags {
        Tags { ask: ask.into(), ..Tags::default() }
    }

    pub fn help(mut self, help: impl Into<String>) -> Tags {
        self.help = Some(help.into());
        self
    }

    pub fn hidden(mut self) -> Tags {
        self.hidden = true;
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Tags {
        self.deprecated = Some(reason.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Tags {
        self.default = Some(default.into());
        self
    }

    pub fn decl(&self) -> Result<Decl, DeclError> {
        Decl::parse(&self.ask)
    }
}
