//! Rendered metadata of loaded flags, independent of the fields they bind.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `--name` and/or `-x`.
    Flag,
    /// `<name>`
    Required,
    /// `[name]`
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub shorthand: Option<char>,
    pub kind: FlagKind,
    pub help: String,
    /// The bound field rendered after all defaults were applied.
    pub default: String,
    pub type_name: Option<String>,
    pub implicit: Option<String>,
    pub deprecated: Option<String>,
    pub hidden: bool,
}

impl Flag {
    pub fn is_positional(&self) -> bool {
        self.kind != FlagKind::Flag
    }
}

/// Flags of one struct, plus the named groups nested in it. The root group
/// has an empty name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagGroup {
    pub name: String,
    pub help: String,
    pub flags: Vec<Flag>,
    pub groups: Vec<FlagGroup>,
}

impl FlagGroup {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> FlagGroup {
        FlagGroup { name: name.into(), help: help.into(), ..FlagGroup::default() }
    }

    /// All flags of the tree, depth first, own flags before nested groups.
    pub fn flatten(&self) -> Vec<PrefixedFlag<'_>> {
        let mut res = Vec::new();
        self.flatten_into("", &mut res);
        res
    }

    fn flatten_into<'d>(&'d self, prefix: &str, acc: &mut Vec<PrefixedFlag<'d>>) {
        for flag in &self.flags {
            acc.push(PrefixedFlag { path: join_path(prefix, &flag.name), flag });
        }
        for group in &self.groups {
            group.flatten_into(&join_path(prefix, &group.name), acc);
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len() + self.groups.iter().map(FlagGroup::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A flag together with its dotted path from the root group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedFlag<'d> {
    pub path: String,
    pub flag: &'d Flag,
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
