//! Turns tagged structs into flag groups.
//!
//! Loading runs in two passes over the same struct. The describe pass runs
//! [`Load::init_default`] and `default` tags, then records metadata of every
//! flag. The bind pass keeps a [`Value`] per flag, borrowed from the struct,
//! for the duration of one parse.

use std::{
    any::{type_name, Any},
    collections::{BTreeMap, HashMap, HashSet},
    mem,
};

use tracing::trace;

use crate::{
    flag::join_path, Command, Decl, Flag, FlagGroup, FlagKind, Help, LoadError, Registry, Route,
    Tags, Value,
};

/// A struct that declares flags, positionals and groups.
///
/// Usually derived:
///
/// ```
/// #[derive(Default, ask::Load)]
/// struct Serve {
///     #[ask("--port -p", help = "port to listen on", default = "8080")]
///     port: u16,
///     #[ask("<root>")]
///     root: String,
/// }
/// ```
pub trait Load {
    /// Declares every field through `loader`.
    fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError>;

    /// Runs before the fields of this value are loaded.
    fn init_default(&mut self) {}

    fn as_command(&mut self) -> Option<&mut dyn Command> {
        None
    }

    fn as_route(&mut self) -> Option<&mut dyn Route> {
        None
    }

    fn as_help(&self) -> Option<&dyn Help> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Describe,
    Bind,
}

/// Collects the declarations of one loaded struct tree.
pub struct Loader<'a> {
    registry: &'a Registry,
    pass: Pass,
    prefix: String,
    groups: Vec<FlagGroup>,
    paths: HashSet<String>,
    shorthands: HashMap<char, String>,
    required: Vec<String>,
    optional: Vec<String>,
    tracked: BTreeMap<String, Vec<&'a mut bool>>,
    values: BTreeMap<String, Box<dyn Value + 'a>>,
}

pub(crate) struct Loaded<'a> {
    pub(crate) group: FlagGroup,
    pub(crate) required: Vec<String>,
    pub(crate) optional: Vec<String>,
    pub(crate) tracked: BTreeMap<String, Vec<&'a mut bool>>,
    pub(crate) values: BTreeMap<String, Box<dyn Value + 'a>>,
}

impl<'a> Loader<'a> {
    pub(crate) fn new(registry: &'a Registry, pass: Pass) -> Loader<'a> {
        Loader {
            registry,
            pass,
            prefix: String::new(),
            groups: vec![FlagGroup::default()],
            paths: HashSet::new(),
            shorthands: HashMap::new(),
            required: Vec::new(),
            optional: Vec::new(),
            tracked: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    pub(crate) fn load_root<R: Load + ?Sized>(&mut self, root: &'a mut R) -> Result<(), LoadError> {
        if self.pass == Pass::Describe {
            root.init_default();
        }
        root.load(self)
    }

    pub(crate) fn finish(mut self) -> Loaded<'a> {
        let group = self.groups.pop().unwrap_or_default();
        Loaded {
            group,
            required: self.required,
            optional: self.optional,
            tracked: self.tracked,
            values: self.values,
        }
    }

    /// Declares a field whose type is known to the registry.
    pub fn field<T: Any>(&mut self, field: &'a mut T, tags: Tags) -> Result<(), LoadError> {
        let decl = tags.decl()?;
        if decl == Decl::Ignore {
            return Ok(());
        }
        let path = self.path_of(&decl);
        if matches!(decl, Decl::Inline | Decl::Group(_)) {
            return Err(LoadError::ExpectedField(path));
        }
        let value = self
            .registry
            .bind(field)
            .ok_or(LoadError::UnsupportedType { path, type_name: type_name::<T>() })?;
        self.declare(decl, value, tags)
    }

    /// Declares a field that is its own [`Value`].
    pub fn value<V: Value + 'a>(&mut self, value: &'a mut V, tags: Tags) -> Result<(), LoadError> {
        let decl = tags.decl()?;
        match decl {
            Decl::Ignore => Ok(()),
            Decl::Inline | Decl::Group(_) => Err(LoadError::ExpectedField(self.path_of(&decl))),
            _ => self.declare(decl, Box::new(value), tags),
        }
    }

    /// Loads a nested struct, inline (`.`) or as a named group (`.name`).
    pub fn group<G: Load + ?Sized>(&mut self, group: &'a mut G, tags: Tags) -> Result<(), LoadError> {
        let decl = tags.decl()?;
        let name = match decl {
            Decl::Ignore => return Ok(()),
            Decl::Inline => {
                trace!(prefix = %self.prefix, "inlining group");
                if self.pass == Pass::Describe {
                    group.init_default();
                }
                return group.load(self);
            }
            Decl::Group(name) => name,
            _ => return Err(LoadError::ExpectedGroup(self.path_of(&decl))),
        };

        let path = join_path(&self.prefix, &name);
        if !self.paths.insert(path.clone()) {
            return Err(LoadError::DuplicatePath(path));
        }
        trace!(%path, "entering group");
        let help = match tags.help {
            Some(help) => help,
            None => group.as_help().map(|it| it.help()).unwrap_or_default(),
        };
        self.groups.push(FlagGroup::new(name, help));
        let parent = mem::replace(&mut self.prefix, path);

        if self.pass == Pass::Describe {
            group.init_default();
        }
        let res = group.load(self);

        self.prefix = parent;
        let done = self.groups.pop().unwrap_or_default();
        if let Some(top) = self.groups.last_mut() {
            top.groups.push(done);
        }
        res
    }

    /// Sets `marker` whenever the flag at `path`, relative to the current
    /// group, is supplied. Paths that match no flag are never triggered.
    pub fn changed(&mut self, path: &str, marker: &'a mut bool) {
        let path = join_path(&self.prefix, path);
        trace!(%path, "tracking changes");
        self.tracked.entry(path).or_default().push(marker);
    }

    fn path_of(&self, decl: &Decl) -> String {
        match decl {
            Decl::Group(name) => join_path(&self.prefix, name),
            _ => match decl.name() {
                Some(name) => join_path(&self.prefix, &name),
                None => self.prefix.clone(),
            },
        }
    }

    fn declare(
        &mut self,
        decl: Decl,
        mut value: Box<dyn Value + 'a>,
        tags: Tags,
    ) -> Result<(), LoadError> {
        let (name, shorthand, kind) = match decl {
            Decl::Flag { long, short } => {
                let name = long.or_else(|| short.map(String::from)).unwrap_or_default();
                (name, short, FlagKind::Flag)
            }
            Decl::Required(name) => (name, None, FlagKind::Required),
            Decl::Optional(name) => (name, None, FlagKind::Optional),
            Decl::Ignore | Decl::Inline | Decl::Group(_) => return Ok(()),
        };
        let path = join_path(&self.prefix, &name);
        if path == "help" {
            return Err(LoadError::ReservedHelp);
        }
        if !self.paths.insert(path.clone()) {
            return Err(LoadError::DuplicatePath(path));
        }
        if let Some(letter) = shorthand {
            if let Some(other) = self.shorthands.get(&letter) {
                return Err(LoadError::DuplicateShorthand { letter, path, other: other.clone() });
            }
            self.shorthands.insert(letter, path.clone());
        }
        match kind {
            FlagKind::Required => self.required.push(path.clone()),
            FlagKind::Optional => self.optional.push(path.clone()),
            FlagKind::Flag => (),
        }

        match self.pass {
            Pass::Describe => {
                if let Some(default) = &tags.default {
                    value
                        .set(default)
                        .map_err(|source| LoadError::Default { path: path.clone(), source })?;
                }
                trace!(%path, "declared");
                let flag = Flag {
                    name,
                    shorthand,
                    kind,
                    help: tags.help.unwrap_or_default(),
                    default: value.render(),
                    type_name: value.type_name(),
                    implicit: value.implicit(),
                    deprecated: tags.deprecated,
                    hidden: tags.hidden,
                };
                if let Some(group) = self.groups.last_mut() {
                    group.flags.push(flag);
                }
            }
            Pass::Bind => {
                self.values.insert(path, value);
            }
        }
        Ok(())
    }
}

impl<T: Load + Default> Load for Option<T> {
    fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
        self.get_or_insert_with(T::default).load(loader)
    }
    fn init_default(&mut self) {
        self.get_or_insert_with(T::default).init_default()
    }
    fn as_command(&mut self) -> Option<&mut dyn Command> {
        self.as_mut()?.as_command()
    }
    fn as_route(&mut self) -> Option<&mut dyn Route> {
        self.as_mut()?.as_route()
    }
    fn as_help(&self) -> Option<&dyn Help> {
        self.as_ref()?.as_help()
    }
}

impl<T: Load + ?Sized> Load for Box<T> {
    fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
        (**self).load(loader)
    }
    fn init_default(&mut self) {
        (**self).init_default()
    }
    fn as_command(&mut self) -> Option<&mut dyn Command> {
        (**self).as_command()
    }
    fn as_route(&mut self) -> Option<&mut dyn Route> {
        (**self).as_route()
    }
    fn as_help(&self) -> Option<&dyn Help> {
        (**self).as_help()
    }
}

impl<T: Load + ?Sized> Load for &mut T {
    fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
        (**self).load(loader)
    }
    fn init_default(&mut self) {
        (**self).init_default()
    }
    fn as_command(&mut self) -> Option<&mut dyn Command> {
        (**self).as_command()
    }
    fn as_route(&mut self) -> Option<&mut dyn Route> {
        (**self).as_route()
    }
    fn as_help(&self) -> Option<&dyn Help> {
        (**self).as_help()
    }
}

macro_rules! tuple_load {
    ($($t:ident),*) => {
        /// Several values loaded into one description. Capabilities come
        /// from the first value that has them.
        #[allow(non_snake_case)]
        impl<$($t: Load),*> Load for ($($t,)*) {
            fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
                let ($($t,)*) = self;
                $($t.load(loader)?;)*
                Ok(())
            }
            fn init_default(&mut self) {
                let ($($t,)*) = self;
                $($t.init_default();)*
            }
            fn as_command(&mut self) -> Option<&mut dyn Command> {
                let ($($t,)*) = self;
                None$(.or($t.as_command()))*
            }
            fn as_route(&mut self) -> Option<&mut dyn Route> {
                let ($($t,)*) = self;
                None$(.or($t.as_route()))*
            }
            fn as_help(&self) -> Option<&dyn Help> {
                let ($($t,)*) = self;
                None$(.or($t.as_help()))*
            }
        }
    };
}
tuple_load!(A, B);
tuple_load!(A, B, C);
