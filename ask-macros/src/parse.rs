use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, Spacing, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

pub(crate) fn parse(ts: TokenStream) -> Result<ast::Load> {
    let mut p = Parser::new(ts);
    load(&mut p)
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

fn load(p: &mut Parser) -> Result<ast::Load> {
    let attrs = attrs(p)?;
    visibility(p);
    if p.at_keyword("enum") || p.at_keyword("union") {
        bail!("`Load` can only be derived for structs")
    }
    p.expect_keyword("struct")?;
    let name = p.expect_ident()?;
    if p.at_punct('<') || p.at_keyword("where") {
        bail!("generic structs are not supported: `{}`", name)
    }

    let mut fields = Vec::new();
    if !p.eat_punct(';') {
        if !p.at_delim(Delimiter::Brace) {
            bail!("expected a struct with named fields: `{}`", name)
        }
        p.enter_delim(Delimiter::Brace)?;
        while !p.end() {
            if let Some(field) = field(p)? {
                fields.push(field);
            }
        }
        p.exit_delim()?;
    }

    let mut caps = ast::Caps::default();
    for item in attrs.ask.into_iter().flatten() {
        let slot = match &item {
            Item::Key(key, None) => match key.as_str() {
                "command" => &mut caps.command,
                "route" => &mut caps.route,
                "help" => &mut caps.help,
                "init_default" => &mut caps.init_default,
                _ => bail!("unknown capability `{}`", key),
            },
            _ => bail!(
                "expected one of `command`, `route`, `help`, `init_default`, got `{}`",
                item
            ),
        };
        *slot = true;
    }
    Ok(ast::Load { name, doc: attrs.doc, caps, fields })
}

/// Returns `None` for fields without an `ask` attribute.
fn field(p: &mut Parser) -> Result<Option<ast::Field>> {
    let attrs = attrs(p)?;
    visibility(p);
    let ident = p.expect_ident()?;
    p.expect_punct(':')?;
    skip_ty(p);
    if !p.end() {
        p.expect_punct(',')?;
    }

    if attrs.ask.is_empty() {
        return Ok(None);
    }
    let mut decl = None;
    let mut changed = None;
    let mut value = false;
    let mut tags = ast::Tags::default();
    for item in attrs.ask.into_iter().flatten() {
        match item {
            Item::Decl(it) if decl.is_none() => decl = Some(it),
            Item::Decl(it) => bail!("`{}` has a second declaration: {:?}", ident, it),
            Item::Key(key, val) => match (key.as_str(), val) {
                ("help", Some(it)) => tags.help = Some(it),
                ("hidden", None) => tags.hidden = true,
                ("deprecated", Some(it)) => tags.deprecated = Some(it),
                ("default", Some(it)) => tags.default = Some(it),
                ("changed", Some(it)) => changed = Some(it),
                ("value", None) => value = true,
                ("hidden" | "value", Some(_)) => bail!("`{}` takes no value", key),
                ("help" | "deprecated" | "default" | "changed", None) => {
                    bail!("`{}` needs a value: `{} = \"...\"`", key, key)
                }
                _ => bail!("unknown key `{}` on `{}`", key, ident),
            },
        }
    }

    let binding = match (decl, changed) {
        (Some(_), Some(_)) => {
            bail!("`changed` marks a separate bool field, `{}` already has a declaration", ident)
        }
        (None, Some(path)) => ast::Binding::Changed(path),
        (None, None) => bail!("`{}` needs a declaration, like `#[ask(\"--{}\")]`", ident, ident),
        (Some(decl), None) => {
            if tags.help.is_none() {
                tags.help = attrs.doc;
            }
            let group = decl.trim_start().starts_with('.');
            tags.decl = decl;
            match (group, value) {
                (true, true) => bail!("group `{}` can't be a value", ident),
                (true, false) => ast::Binding::Group(tags),
                (false, true) => ast::Binding::Value(tags),
                (false, false) => ast::Binding::Field(tags),
            }
        }
    };
    Ok(Some(ast::Field { ident, binding }))
}

#[derive(Default)]
struct Attrs {
    doc: Option<String>,
    ask: Vec<Vec<Item>>,
}

enum Item {
    Decl(String),
    Key(String, Option<String>),
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Decl(it) => write!(f, "{:?}", it),
            Item::Key(key, None) => f.write_str(key),
            Item::Key(key, Some(val)) => write!(f, "{} = {:?}", key, val),
        }
    }
}

fn attrs(p: &mut Parser) -> Result<Attrs> {
    let mut res = Attrs::default();
    let mut doc = Vec::new();
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        if p.eat_keyword("doc") {
            p.expect_punct('=')?;
            let line = p.expect_string()?;
            let line = line.strip_prefix(' ').unwrap_or(&line);
            doc.push(line.to_string());
        } else if p.eat_keyword("ask") {
            p.enter_delim(Delimiter::Parenthesis)?;
            res.ask.push(ask_items(p)?);
            p.exit_delim()?;
        } else {
            p.skip_rest();
        }
        p.exit_delim()?;
    }
    let doc = doc.join("\n");
    let doc = doc.trim();
    if !doc.is_empty() {
        res.doc = Some(doc.to_string());
    }
    Ok(res)
}

fn ask_items(p: &mut Parser) -> Result<Vec<Item>> {
    let mut res = Vec::new();
    while !p.end() {
        let item = if p.at_string() {
            Item::Decl(p.expect_string()?)
        } else {
            let key = p.expect_ident()?;
            let val = if p.eat_punct('=') { Some(p.expect_string()?) } else { None };
            Item::Key(key, val)
        };
        res.push(item);
        if !p.end() {
            p.expect_punct(',')?;
        }
    }
    Ok(res)
}

fn visibility(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

/// Skips a field type, up to the `,` that ends it.
fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    loop {
        match p.ts.last() {
            None => break,
            Some(TokenTree::Punct(punct)) => match punct.as_char() {
                ',' if depth == 0 => break,
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                '-' if punct.spacing() == Spacing::Joint => {
                    p.ts.pop();
                }
                _ => (),
            },
            Some(_) => (),
        }
        p.ts.pop();
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&mut self, delimiter: Delimiter) -> bool {
        match self.ts.last() {
            Some(TokenTree::Group(g)) => g.delimiter() == delimiter,
            _ => false,
        }
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected {}", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.pop().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{}`", next)
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn skip_rest(&mut self) {
        self.ts.clear();
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{}`", kw)
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected an identifier, got: `{}`", tt),
            None => bail!("expected an identifier"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{}`", punct)
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    fn at_string(&mut self) -> bool {
        match self.ts.last() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                text.starts_with('"') || text.starts_with("r\"") || text.starts_with("r#")
            }
            _ => false,
        }
    }
    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => match unquote(&lit.to_string()) {
                Some(it) => Ok(it),
                None => bail!("expected a string, got: `{}`", lit),
            },
            _ => bail!("expected a string"),
        }
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "`(`",
        Delimiter::Brace => "`{`",
        Delimiter::Bracket => "`[`",
        Delimiter::None => "a group",
    }
}

/// Value of a string literal, plain or raw.
fn unquote(text: &str) -> Option<String> {
    if let Some(raw) = text.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = raw.get(hashes..raw.len().checked_sub(hashes)?)?;
        let body = body.strip_prefix('"')?.strip_suffix('"')?;
        return Some(body.to_string());
    }
    let body = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut res = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => {
                let hex = [chars.next()?, chars.next()?].iter().collect::<String>();
                char::from(u8::from_str_radix(&hex, 16).ok()?)
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        '_' => (),
                        c => hex.push(c),
                    }
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            '\n' => {
                while chars.peek().is_some_and(|it| it.is_whitespace()) {
                    chars.next();
                }
                continue;
            }
            _ => return None,
        };
        res.push(escaped);
    }
    Some(res)
}
