use ask::{BoxError, Command, Error, Executor, LoadError, Outcome, Value, ValueError};
use expect_test::expect;

use crate::{args, usage};

/// Runs the job.
///
/// Flags go before the job arguments.
#[derive(Default, ask::Load)]
#[ask(command)]
struct Job {
    /// Log more.
    #[ask("--verbose -v")]
    verbose: bool,
    #[ask("--high -h", help = "upper bound")]
    high: u32,
    ran_with: Option<Vec<String>>,
}

impl Command for Job {
    fn run(&mut self, args: &[String]) -> Result<(), BoxError> {
        self.ran_with = Some(args.to_vec());
        Ok(())
    }
}

#[derive(Default, ask::Load)]
struct Wrapper {
    #[ask(".")]
    job: Job,
    #[ask("--name")]
    name: String,
}

#[test]
fn inlined_groups_lend_their_capabilities() {
    let mut wrapper = Wrapper::default();
    let res = Executor::new().execute(&mut wrapper, &args("--name x rest -v")).into_result();
    assert_eq!(res.unwrap(), Outcome::Ran);
    assert_eq!(wrapper.name, "x");
    assert!(wrapper.job.verbose);
    assert_eq!(wrapper.job.ran_with, Some(vec!["rest".to_string()]));

    expect![[r#"
        (command) (3 flags)

        Runs the job.

        Flags go before the job arguments.

        Flags/args:
          -v, --verbose      Log more.
          -h, --high u32     upper bound (default: 0)
              --name string

    "#]]
    .assert_eq(&usage(&mut Wrapper::default()));
}

#[test]
fn leading_help_wins_over_a_claimed_shorthand() {
    let mut job = Job::default();
    let res = Executor::new().execute(&mut job, &args("-h 3")).into_result();
    assert_eq!(res.unwrap(), Outcome::Help);
    assert_eq!(job.high, 0);

    let mut job = Job::default();
    let res = Executor::new().execute(&mut job, &args("-vh 3")).into_result();
    assert_eq!(res.unwrap(), Outcome::Ran);
    assert!(job.verbose);
    assert_eq!(job.high, 3);

    let mut job = Job::default();
    let res = Executor::new().execute(&mut job, &args("a help")).into_result();
    assert_eq!(res.unwrap(), Outcome::Ran);
    assert_eq!(job.ran_with, Some(args("a help")));
}

#[derive(Default, ask::Load)]
struct Options {
    #[ask("--n")]
    n: u8,
}

#[test]
fn structs_without_a_command_are_unrecognized() {
    let mut options = Options::default();
    let res = Executor::new().execute(&mut options, &args("--n 3")).into_result();
    assert_eq!(res.unwrap(), Outcome::Unrecognized);
    assert_eq!(options.n, 3);
}

#[derive(Debug, Default, PartialEq)]
struct Level(u8);

impl Value for Level {
    fn set(&mut self, s: &str) -> Result<(), ValueError> {
        self.0 = match s {
            "low" => 1,
            "high" => 3,
            _ => return Err(ValueError::Custom(format!("unknown level {s:?}").into())),
        };
        Ok(())
    }
    fn render(&self) -> String {
        let name = match self.0 {
            1 => "low",
            3 => "high",
            _ => "none",
        };
        name.to_string()
    }
    fn type_name(&self) -> Option<String> {
        Some("level".to_string())
    }
}

#[derive(Default, ask::Load)]
struct Port {
    #[ask("--port")]
    port: u16,
    #[ask(changed = "port")]
    port_set: bool,
}

#[derive(Default, ask::Load)]
#[ask(command)]
struct Tuning {
    #[ask("--level", value, default = "low")]
    level: Level,
    #[ask(".ws")]
    ws: Option<Port>,
    #[ask(".tcp")]
    tcp: Port,
    #[ask("--secret", hidden)]
    secret: String,
    #[ask("--legacy", deprecated = "use --level")]
    legacy: bool,
}

impl Command for Tuning {
    fn run(&mut self, _args: &[String]) -> Result<(), BoxError> {
        Ok(())
    }
}

#[test]
fn custom_values_and_nested_markers() {
    let mut tuning = Tuning::default();
    let res = Executor::new().execute(&mut tuning, &args("--ws.port 8 --level high")).into_result();
    assert_eq!(res.unwrap(), Outcome::Ran);
    assert_eq!(tuning.level, Level(3));
    let ws = tuning.ws.as_ref().unwrap();
    assert_eq!(ws.port, 8);
    assert!(ws.port_set);
    assert!(!tuning.tcp.port_set);

    let mut tuning = Tuning::default();
    let err = Executor::new().execute(&mut tuning, &args("--level max")).into_result().unwrap_err();
    assert_eq!(err.to_string(), r#"failed to apply flag level: "max": unknown level "max""#);
}

#[test]
fn usage_hides_and_marks_flags() {
    expect![[r#"
        (command) (4 flags)

        Flags/args:
              --level level   (default: low)
              --legacy        (DEPRECATED: use --level)
          ws:
              --ws.port u16   (default: 0)
          tcp:
              --tcp.port u16  (default: 0)

    "#]]
    .assert_eq(&usage(&mut Tuning::default()));
}

#[test]
fn deprecated_flags_go_through_the_callback() {
    let mut tuning = Tuning::default();
    let res = Executor::new()
        .on_deprecated(|flag| Err(format!("{} is gone", flag.path).into()))
        .execute(&mut tuning, &args("--legacy"))
        .into_result();
    assert_eq!(res.unwrap_err().to_string(), "deprecated flag legacy was rejected: legacy is gone");
    assert!(!tuning.legacy);

    let mut tuning = Tuning::default();
    let res = Executor::new().execute(&mut tuning, &args("--legacy")).into_result();
    assert_eq!(res.unwrap(), Outcome::Ran);
    assert!(tuning.legacy);
}

#[derive(Default, ask::Load)]
struct Conflicting {
    #[ask("--a --b")]
    x: u8,
}

#[test]
fn declaration_errors_fail_the_load() {
    let mut conflicting = Conflicting::default();
    let res = Executor::new().execute(&mut conflicting, &[]).into_result();
    assert!(matches!(res, Err(Error::Load(LoadError::Declaration(_)))));
}
