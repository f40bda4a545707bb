//! Walks routes down to the command an argument list is meant for, and
//! runs it.

use std::fmt;

use tracing::{debug, warn};

use crate::{
    description::Layout, BoxError, CommandDescription, Error, Load, LoadError, OnDeprecated,
    Parsed, PrefixedFlag, Registry,
};

/// How an [`Executor::execute`] call ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran and returned `Ok`.
    Ran,
    /// Usage was asked for with `help`, `--help` or `-h`.
    Help,
    /// Arguments ended on a struct that is neither a command nor routed
    /// any further.
    Unrecognized,
}

/// Runs command lines against loadable structs.
///
/// ```
/// # use ask::{Executor, Outcome};
/// #[derive(Default, ask::Load)]
/// #[ask(command)]
/// struct Greet {
///     #[ask("--name", default = "world")]
///     name: String,
/// }
///
/// impl ask::Command for Greet {
///     fn run(&mut self, _args: &[String]) -> Result<(), ask::BoxError> {
///         println!("hello {}", self.name);
///         Ok(())
///     }
/// }
///
/// let mut greet = Greet::default();
/// let args = ["--name".to_string(), "you".to_string()];
/// let res = Executor::new().execute(&mut greet, &args).into_result();
/// assert_eq!(res.unwrap(), Outcome::Ran);
/// assert_eq!(greet.name, "you");
/// ```
pub struct Executor {
    registry: Registry,
    on_deprecated: Option<Box<OnDeprecated<'static>>>,
}

impl Default for Executor {
    fn default() -> Executor {
        Executor::new()
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("registry", &self.registry)
            .field("on_deprecated", &self.on_deprecated.is_some())
            .finish()
    }
}

impl Executor {
    pub fn new() -> Executor {
        Executor { registry: Registry::default(), on_deprecated: None }
    }

    pub fn with_registry(mut self, registry: Registry) -> Executor {
        self.registry = registry;
        self
    }

    /// Called once for every occurrence of a deprecated flag, before its
    /// value is applied. Returning an error aborts the execution.
    ///
    /// Without a callback deprecated flags are logged and accepted.
    pub fn on_deprecated(
        mut self,
        f: impl FnMut(&PrefixedFlag<'_>) -> Result<(), BoxError> + 'static,
    ) -> Executor {
        self.on_deprecated = Some(Box::new(f));
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Executes `args`, the command line without the program name.
    ///
    /// Each route consumes the token it was asked about and hands the rest
    /// to the sub-command it returns, which is loaded fresh.
    pub fn execute<'r>(&mut self, cmd: &'r mut dyn Load, args: &[String]) -> Execution<'r> {
        let mut reached = Reached::Root(cmd);
        let mut layout = None;
        let mut args = args;
        loop {
            let result = match self.step(reached.get_mut(), args, &mut layout) {
                Ok(Step::Descend(sub)) => {
                    reached = Reached::Sub(sub);
                    layout = None;
                    args = &args[1..];
                    continue;
                }
                Ok(Step::Done(outcome)) => Ok(outcome),
                Err(err) => Err(err),
            };
            return Execution { reached, layout, result };
        }
    }

    fn step(
        &mut self,
        cmd: &mut dyn Load,
        args: &[String],
        layout: &mut Option<Layout>,
    ) -> Result<Step, Error> {
        let mut descr = CommandDescription::load(cmd, &self.registry)?;
        *layout = Some(descr.layout().clone());

        if let Some(first) = args.first() {
            if matches!(first.as_str(), "--help" | "-h" | "help") {
                debug!("help requested");
                return Ok(Step::Done(Outcome::Help));
            }
            if let Some(route) = descr.route() {
                match route.route(first) {
                    Ok(Some(sub)) => {
                        debug!(route = %first, "descending");
                        return Ok(Step::Descend(sub));
                    }
                    Ok(None) => debug!(route = %first, "not a route, parsing as arguments"),
                    Err(err) => return Err(Error::Route(err)),
                }
            }
        }

        let mut fallback = warn_deprecated;
        let on_deprecated: &mut OnDeprecated<'_> = match &mut self.on_deprecated {
            Some(f) => f.as_mut(),
            None => &mut fallback,
        };
        let rest = match descr.parse(args, on_deprecated)? {
            Parsed::Help => return Ok(Step::Done(Outcome::Help)),
            Parsed::Args(rest) => rest,
        };
        match descr.command() {
            Some(command) => {
                debug!(remaining = rest.len(), "running command");
                command.run(&rest).map_err(Error::Run)?;
                Ok(Step::Done(Outcome::Ran))
            }
            None => {
                debug!("not a command");
                Ok(Step::Done(Outcome::Unrecognized))
            }
        }
    }
}

fn warn_deprecated(flag: &PrefixedFlag<'_>) -> Result<(), BoxError> {
    let reason = flag.flag.deprecated.as_deref().unwrap_or_default();
    warn!(flag = %flag.path, "flag is deprecated: {reason}");
    Ok(())
}

enum Step {
    Descend(Box<dyn Load>),
    Done(Outcome),
}

enum Reached<'r> {
    Root(&'r mut dyn Load),
    Sub(Box<dyn Load>),
}

impl Reached<'_> {
    fn get_mut(&mut self) -> &mut dyn Load {
        match self {
            Reached::Root(it) => &mut **it,
            Reached::Sub(it) => &mut **it,
        }
    }
}

/// The result of an execution, along with the command it ended on.
pub struct Execution<'r> {
    reached: Reached<'r>,
    layout: Option<Layout>,
    pub result: Result<Outcome, Error>,
}

impl<'r> Execution<'r> {
    /// The root command, or the last sub-command a route returned.
    pub fn command(&mut self) -> &mut dyn Load {
        self.reached.get_mut()
    }

    /// Describes the reached command as it was before its arguments were
    /// applied, e.g. to print its usage. Parsed values are left alone; the
    /// command is only loaded again if its first load failed.
    pub fn describe<'s>(
        &'s mut self,
        registry: &'s Registry,
    ) -> Result<CommandDescription<'s>, LoadError> {
        let root = self.reached.get_mut();
        match &self.layout {
            Some(layout) => Ok(CommandDescription::from_layout(root, registry, layout.clone())),
            None => CommandDescription::load(root, registry),
        }
    }

    pub fn into_result(self) -> Result<Outcome, Error> {
        self.result
    }
}

impl fmt::Debug for Execution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execution").field("result", &self.result).finish_non_exhaustive()
    }
}
