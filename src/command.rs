//! Optional capabilities of a loaded struct.
//!
//! A struct opts into each of them by implementing the trait and exposing
//! it through the matching [`Load`](crate::Load) method, which
//! `#[derive(Load)]` does for the names listed in `#[ask(...)]`.

use crate::{BoxError, Load};

/// A runnable command.
pub trait Command {
    /// Runs with the arguments left over after flags and positionals.
    fn run(&mut self, args: &[String]) -> Result<(), BoxError>;
}

/// A command with sub-commands, produced on demand.
pub trait Route {
    /// Returns the sub-command for `token`, which is loaded and executed
    /// with the arguments after it.
    ///
    /// `Ok(None)` means the token is not a route and is parsed as a regular
    /// argument of this command instead. Unknown routes should return
    /// [`Unrecognized`](crate::Unrecognized).
    fn route(&mut self, token: &str) -> Result<Option<Box<dyn Load>>, BoxError>;

    /// Known routes, listed in usage text.
    fn routes(&self) -> Option<Vec<String>> {
        None
    }
}

/// Help text shown above the flags in usage text.
pub trait Help {
    fn help(&self) -> String;
}

impl Help for &'static str {
    fn help(&self) -> String {
        self.to_string()
    }
}

impl Help for String {
    fn help(&self) -> String {
        self.clone()
    }
}

/// Sets defaults before any field of the struct is loaded.
pub trait InitDefault {
    fn init_default(&mut self);
}
