//! Commands declared as plain structs, loaded lazily.
//!
//! A command is a struct whose fields carry a binding declaration: a flag
//! (`--name -n`), a required or optional positional (`<name>`, `[name]`),
//! or a nested group (`.name`, or `.` to inline). Nothing is registered up
//! front. Each time arguments reach a struct it is loaded fresh, so
//! sub-commands only exist once a route produces them.
//!
//! ```
//! use ask::{BoxError, Command, Executor, Outcome};
//!
//! #[derive(Default, ask::Load)]
//! #[ask(command)]
//! /// Prints a greeting.
//! struct Hello {
//!     /// Who to greet.
//!     #[ask("<name>")]
//!     name: String,
//!     #[ask("--shout -s")]
//!     shout: bool,
//! }
//!
//! impl Command for Hello {
//!     fn run(&mut self, _args: &[String]) -> Result<(), BoxError> {
//!         let greeting = format!("hello {}", self.name);
//!         match self.shout {
//!             true => println!("{}", greeting.to_uppercase()),
//!             false => println!("{greeting}"),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut hello = Hello::default();
//! let args = ["-s".to_string(), "world".to_string()];
//! let outcome = Executor::new().execute(&mut hello, &args).into_result().unwrap();
//! assert_eq!(outcome, Outcome::Ran);
//! assert!(hello.shout);
//! ```
//!
//! Field values are handled by a [`Registry`] of types, which can be
//! extended with [`Primitive`] and [`Value`] implementations.

mod command;
mod decl;
mod description;
mod error;
mod exec;
mod flag;
mod loader;
mod registry;
mod tokenizer;
mod usage;
mod value;

pub use ask_macros::Load;

pub use crate::{
    command::{Command, Help, InitDefault, Route},
    decl::{Decl, Tags},
    description::{CommandDescription, OnDeprecated, Parsed},
    error::{
        BoxError, DeclError, Error, LoadError, ParseError, Result, Unrecognized, ValueError,
    },
    exec::{Execution, Executor, Outcome},
    flag::{Flag, FlagGroup, FlagKind, PrefixedFlag},
    loader::{Load, Loader},
    registry::{Binder, Registry},
    tokenizer::{parse_args, Apply, Scanned},
    value::{IpMask, IpNet, Primitive, Value},
};
