use std::fmt::Write;

use crate::{flag::join_path, CommandDescription, Flag, FlagGroup, FlagKind};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

enum Row {
    Group(String),
    Flag(String, String),
}

impl CommandDescription<'_> {
    /// Renders usage text: the synopsis, the help text, every flag and the
    /// known sub-commands.
    ///
    /// Sub-commands are loaded to show the first line of their help. A
    /// sub-command that fails to load gets an inline `[error]` instead.
    pub fn usage(&mut self, show_hidden: bool) -> String {
        let mut buf = String::new();

        w!(buf, "(command)");
        for path in self.required_args() {
            w!(buf, " <{path}>");
        }
        for path in self.optional_args() {
            w!(buf, " [{path}]");
        }
        let flags = self.group().flatten();
        let count = flags
            .iter()
            .filter(|it| !it.flag.is_positional() && (show_hidden || !it.flag.hidden))
            .count();
        match count {
            0 => (),
            1 => w!(buf, " (1 flag)"),
            n => w!(buf, " ({n} flags)"),
        }
        blank_line(&mut buf);
        blank_line(&mut buf);

        if let Some(help) = self.help() {
            let help = help.trim_end();
            if !help.is_empty() {
                w!(buf, "{help}\n");
                blank_line(&mut buf);
            }
        }

        let mut rows = Vec::new();
        rows_rec(&mut rows, "", self.group(), show_hidden);
        if !rows.is_empty() {
            w!(buf, "Flags/args:\n");
            let width = rows
                .iter()
                .map(|row| match row {
                    Row::Flag(left, _) => left.chars().count(),
                    Row::Group(_) => 0,
                })
                .max()
                .unwrap_or(0);
            for row in &rows {
                match row {
                    Row::Group(header) => w!(buf, "  {header}\n"),
                    Row::Flag(left, right) => {
                        let line = format!("  {left:width$}  {right}");
                        w!(buf, "{}\n", line.trim_end());
                    }
                }
            }
            blank_line(&mut buf);
        }

        let routes = self.route().and_then(|route| route.routes());
        if let Some(routes) = routes {
            w!(buf, "Sub commands:\n");
            for name in &routes {
                let pad = if name.len() < 15 { 17 - name.len() } else { 2 };
                let line = format!("  {name}{:pad$}{}", "", self.route_summary(name));
                w!(buf, "{}\n", line.trim_end());
            }
        }

        buf
    }

    fn route_summary(&mut self, name: &str) -> String {
        let registry = self.registry();
        let Some(route) = self.route() else {
            return "[error] command route not available".to_string();
        };
        let mut sub = match route.route(name) {
            Ok(Some(sub)) => sub,
            Ok(None) => return "[error] command route not available".to_string(),
            Err(err) => return format!("[error] failed to load command route: {err}"),
        };
        match CommandDescription::load(&mut *sub, registry) {
            Ok(descr) => {
                let help = descr.help().unwrap_or_default();
                help.lines().next().unwrap_or_default().to_string()
            }
            Err(err) => format!("[error] command is invalid: {err}"),
        }
    }
}

fn rows_rec(rows: &mut Vec<Row>, prefix: &str, group: &FlagGroup, show_hidden: bool) {
    for flag in &group.flags {
        if flag.hidden && !show_hidden {
            continue;
        }
        let path = join_path(prefix, &flag.name);
        rows.push(Row::Flag(left_column(flag, &path), right_column(flag)));
    }
    for sub in &group.groups {
        let path = join_path(prefix, &sub.name);
        let mut nested = Vec::new();
        rows_rec(&mut nested, &path, sub, show_hidden);
        if nested.is_empty() {
            continue;
        }
        let header = if sub.help.is_empty() {
            format!("{path}:")
        } else {
            format!("{path}: {}", sub.help.lines().next().unwrap_or_default())
        };
        rows.push(Row::Group(header));
        rows.extend(nested);
    }
}

fn left_column(flag: &Flag, path: &str) -> String {
    let mut buf = match (flag.kind, flag.shorthand) {
        (FlagKind::Flag, Some(c)) => format!("-{c}, --{path}"),
        (FlagKind::Flag, None) => format!("    --{path}"),
        (FlagKind::Required, _) => format!("    <{path}>"),
        (FlagKind::Optional, _) => format!("    [{path}]"),
    };
    if let (None, Some(ty)) = (&flag.implicit, &flag.type_name) {
        w!(buf, " {ty}");
    }
    buf
}

fn right_column(flag: &Flag) -> String {
    let mut buf = flag.help.lines().next().unwrap_or_default().to_string();
    let trivial = flag.implicit.is_some() && flag.default == "false";
    if !flag.default.is_empty() && !trivial {
        w!(buf, " (default: {})", flag.default);
    }
    if let Some(reason) = &flag.deprecated {
        w!(buf, " (DEPRECATED: {reason})");
    }
    buf.trim_start().to_string()
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::{
        BoxError, Command, CommandDescription, Help, Load, LoadError, Loader, Registry, Route,
        Tags, Unrecognized,
    };

    #[derive(Default)]
    struct Net {
        port: u16,
        hosts: Vec<String>,
    }

    impl Load for Net {
        fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
            loader.field(&mut self.port, Tags::new("--port -p").help("port to use"))?;
            loader.field(&mut self.hosts, Tags::new("--hosts").default_value("a,b"))
        }
    }

    #[derive(Default)]
    struct Serve {
        root: String,
        index: String,
        verbose: bool,
        secret: String,
        legacy: bool,
        net: Net,
    }

    impl Load for Serve {
        fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
            loader.field(&mut self.root, Tags::new("<root>").help("directory to serve"))?;
            loader.field(&mut self.index, Tags::new("[index]").default_value("index.html"))?;
            loader.field(&mut self.verbose, Tags::new("--verbose -v").help("log more"))?;
            loader.field(&mut self.secret, Tags::new("--secret").hidden())?;
            loader.field(&mut self.legacy, Tags::new("--legacy").deprecated("always on"))?;
            loader.group(&mut self.net, Tags::new(".net").help("Networking\nmore text"))
        }
        fn as_command(&mut self) -> Option<&mut dyn Command> {
            Some(self)
        }
        fn as_help(&self) -> Option<&dyn Help> {
            Some(&"Serves files.\n\nLonger description.")
        }
    }

    impl Command for Serve {
        fn run(&mut self, _args: &[String]) -> Result<(), BoxError> {
            Ok(())
        }
    }

    struct Broken(u8);

    impl Load for Broken {
        fn load<'a>(&'a mut self, loader: &mut Loader<'a>) -> Result<(), LoadError> {
            loader.field(&mut self.0, Tags::new("bogus"))
        }
    }

    struct App;

    impl Load for App {
        fn load<'a>(&'a mut self, _loader: &mut Loader<'a>) -> Result<(), LoadError> {
            Ok(())
        }
        fn as_route(&mut self) -> Option<&mut dyn Route> {
            Some(self)
        }
    }

    impl Route for App {
        fn route(&mut self, token: &str) -> Result<Option<Box<dyn Load>>, BoxError> {
            match token {
                "serve" | "a-very-long-route-name" => Ok(Some(Box::<Serve>::default())),
                "broken" => Ok(Some(Box::new(Broken(0)))),
                "self" => Ok(None),
                _ => Err(Unrecognized(token.to_string()).into()),
            }
        }
        fn routes(&self) -> Option<Vec<String>> {
            let routes = ["serve", "broken", "self", "missing", "a-very-long-route-name"];
            Some(routes.map(String::from).to_vec())
        }
    }

    #[test]
    fn command_usage() {
        let registry = Registry::default();
        let mut serve = Serve::default();
        let mut descr = CommandDescription::load(&mut serve, &registry).unwrap();
        expect![[r#"
            (command) <root> [index] (4 flags)

            Serves files.

            Longer description.

            Flags/args:
                  <root> string            directory to serve
                  [index] string           (default: index.html)
              -v, --verbose                log more
                  --legacy                 (DEPRECATED: always on)
              net: Networking
              -p, --net.port u16           port to use (default: 0)
                  --net.hosts stringSlice  (default: a,b)

        "#]]
        .assert_eq(&descr.usage(false));
    }

    #[test]
    fn hidden_flags_on_request() {
        let registry = Registry::default();
        let mut serve = Serve::default();
        let mut descr = CommandDescription::load(&mut serve, &registry).unwrap();
        let usage = descr.usage(true);
        assert!(usage.starts_with("(command) <root> [index] (5 flags)\n"), "{usage}");
        assert!(usage.contains("    --secret string\n"), "{usage}");
    }

    #[test]
    fn route_listing() {
        let registry = Registry::default();
        let mut app = App;
        let mut descr = CommandDescription::load(&mut app, &registry).unwrap();
        expect![[r#"
            (command)

            Sub commands:
              serve            Serves files.
              broken           [error] command is invalid: malformed declaration "bogus"
              self             [error] command route not available
              missing          [error] failed to load command route: command was not recognized: missing
              a-very-long-route-name  Serves files.
        "#]]
        .assert_eq(&descr.usage(false));
    }
}
