use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::{
    loader::{Loaded, Loader, Pass},
    tokenizer::{parse_args, Scanned},
    BoxError, Command, Error, FlagGroup, Help, Load, LoadError, ParseError, PrefixedFlag,
    Registry, Route, Value,
};

/// Callback for deprecated flags, run before their value is applied.
pub type OnDeprecated<'c> = dyn FnMut(&PrefixedFlag<'_>) -> Result<(), BoxError> + 'c;

/// One loaded command: its flags and the struct they bind to.
pub struct CommandDescription<'a> {
    root: &'a mut dyn Load,
    registry: &'a Registry,
    layout: Layout,
}

/// What the describe pass found, detached from the struct it came from.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    group: FlagGroup,
    required: Vec<String>,
    optional: Vec<String>,
    tracked: BTreeMap<String, usize>,
}

/// What a successful [`CommandDescription::parse`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Help,
    /// Arguments left over after flags and positionals.
    Args(Vec<String>),
}

impl<'a> CommandDescription<'a> {
    /// Runs defaults on `root` and collects its flags.
    pub fn load(
        root: &'a mut dyn Load,
        registry: &'a Registry,
    ) -> Result<CommandDescription<'a>, LoadError> {
        let mut loader = Loader::new(registry, Pass::Describe);
        loader.load_root(&mut *root)?;
        let Loaded { group, required, optional, tracked, .. } = loader.finish();
        let tracked = tracked.into_iter().map(|(path, markers)| (path, markers.len())).collect();
        let layout = Layout { group, required, optional, tracked };
        Ok(CommandDescription { root, registry, layout })
    }

    /// Reattaches an earlier describe pass to `root` without running
    /// defaults again.
    pub(crate) fn from_layout(
        root: &'a mut dyn Load,
        registry: &'a Registry,
        layout: Layout,
    ) -> CommandDescription<'a> {
        CommandDescription { root, registry, layout }
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn group(&self) -> &FlagGroup {
        &self.layout.group
    }

    pub fn required_args(&self) -> &[String] {
        &self.layout.required
    }

    pub fn optional_args(&self) -> &[String] {
        &self.layout.optional
    }

    /// Tracked paths with the number of markers each one sets.
    pub fn tracked(&self) -> &BTreeMap<String, usize> {
        &self.layout.tracked
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn command(&mut self) -> Option<&mut dyn Command> {
        self.root.as_command()
    }

    pub fn route(&mut self) -> Option<&mut dyn Route> {
        self.root.as_route()
    }

    pub fn help(&self) -> Option<String> {
        self.root.as_help().map(|it| it.help())
    }

    /// Applies flags, then binds positionals, and returns what is left.
    ///
    /// Applied values are not rolled back when a later argument fails.
    pub fn parse(
        &mut self,
        args: &[String],
        on_deprecated: &mut OnDeprecated<'_>,
    ) -> Result<Parsed, Error> {
        let mut loader = Loader::new(self.registry, Pass::Bind);
        loader.load_root(&mut *self.root)?;
        let Loaded { values, tracked, .. } = loader.finish();

        let flags = self.layout.group.flatten();
        let mut long = flags.clone();
        long.sort_by(|a, b| a.path.cmp(&b.path));
        let mut short =
            flags.into_iter().filter(|it| it.flag.shorthand.is_some()).collect::<Vec<_>>();
        short.sort_by_key(|it| it.flag.shorthand);

        let mut binder = Binder { values, tracked, seen: HashSet::new(), on_deprecated };
        let scanned = parse_args(&short, &long, args, &mut |flag, value| binder.apply(flag, value))?;
        let rest = match scanned {
            Scanned::Help => return Ok(Parsed::Help),
            Scanned::Args(rest) => rest,
        };

        let lookup = |path: &str| {
            long.binary_search_by(|it| it.path.as_str().cmp(path)).ok().map(|i| &long[i])
        };
        let required = self.layout.required.iter().filter(|it| !binder.seen.contains(*it));
        let required = required.filter_map(|it| lookup(it)).collect::<Vec<_>>();
        if rest.len() < required.len() {
            let missing = required[rest.len()..].iter().map(|it| it.path.clone()).collect();
            return Err(ParseError::MissingArgs {
                got: rest.len(),
                expected: required.len(),
                missing,
            }
            .into());
        }
        let optional = self.layout.optional.iter().filter(|it| !binder.seen.contains(*it));
        let optional = optional.filter_map(|it| lookup(it)).collect::<Vec<_>>();

        let mut rest = rest.into_iter();
        for flag in required.into_iter().chain(optional) {
            let Some(arg) = rest.next() else { break };
            trace!(path = %flag.path, "positional");
            binder.apply(flag, &arg)?;
        }
        Ok(Parsed::Args(rest.collect()))
    }
}

struct Binder<'v, 'c, 'd> {
    values: BTreeMap<String, Box<dyn Value + 'v>>,
    tracked: BTreeMap<String, Vec<&'v mut bool>>,
    seen: HashSet<String>,
    on_deprecated: &'c mut OnDeprecated<'d>,
}

impl Binder<'_, '_, '_> {
    fn apply(&mut self, flag: &PrefixedFlag<'_>, value: &str) -> Result<(), ParseError> {
        if flag.flag.deprecated.is_some() {
            (self.on_deprecated)(flag)
                .map_err(|source| ParseError::Deprecated { flag: flag.path.clone(), source })?;
        }
        let target = self
            .values
            .get_mut(&flag.path)
            .ok_or_else(|| ParseError::UnknownFlag(flag.path.clone()))?;
        target.set(value).map_err(|source| ParseError::Apply {
            flag: flag.path.clone(),
            value: value.to_string(),
            source,
        })?;
        self.seen.insert(flag.path.clone());
        for marker in self.tracked.get_mut(&flag.path).into_iter().flatten() {
            **marker = true;
        }
        Ok(())
    }
}
