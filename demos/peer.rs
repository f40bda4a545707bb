//! A small routed command tree.
//!
//! ```text
//! cargo run --example peer -- connect --addr 127.0.0.1 --port 9001 peer-id 7
//! cargo run --example peer -- connect --help
//! cargo run --example peer -- connect --legacy-addr 127.0.0.1 id 1
//! ```

use std::{net::IpAddr, process::ExitCode, time::Duration};

use ask::{BoxError, Command, Error, Executor, Help, InitDefault, Load, Outcome, Route, Unrecognized};

#[derive(Default, ask::Load)]
#[ask(route)]
/// Talks to peers.
struct Peer {}

impl Route for Peer {
    fn route(&mut self, token: &str) -> Result<Option<Box<dyn Load>>, BoxError> {
        match token {
            "connect" => Ok(Some(Box::<Connect>::default())),
            "ping" => Ok(Some(Box::<Ping>::default())),
            _ => Err(Unrecognized(token.to_string()).into()),
        }
    }

    fn routes(&self) -> Option<Vec<String>> {
        Some(vec!["connect".to_string(), "ping".to_string()])
    }
}

#[derive(Default, ask::Load)]
struct Dial {
    /// Give up after this long.
    #[ask("--timeout -t")]
    timeout: Duration,
    #[ask("--retries", default = "3")]
    retries: u32,
}

#[derive(Default, ask::Load)]
#[ask(command, help, init_default)]
struct Connect {
    /// Address to connect to.
    #[ask("--addr -a")]
    addr: Option<IpAddr>,
    #[ask("--legacy-addr", deprecated = "use --addr", hidden)]
    legacy_addr: Option<IpAddr>,
    #[ask("--port -p", help = "Port to use for the connection.")]
    port: u16,
    /// Peer ID.
    #[ask("<id>")]
    id: String,
    /// Number of streams to open.
    #[ask("<streams>")]
    streams: u8,
    #[ask("[tag]", help = "Tag for the connection.")]
    tag: String,
    #[ask(".dial", help = "Dialing options")]
    dial: Dial,
    #[ask(changed = "port")]
    port_set: bool,
}

impl Help for Connect {
    fn help(&self) -> String {
        "Connect to a peer.\n\nThe address may be omitted for peers already known.".to_string()
    }
}

impl InitDefault for Connect {
    fn init_default(&mut self) {
        self.port = 9000;
        self.dial.timeout = Duration::from_secs(10);
    }
}

impl Command for Connect {
    fn run(&mut self, args: &[String]) -> Result<(), BoxError> {
        let addr = match self.addr.or(self.legacy_addr) {
            Some(addr) => addr.to_string(),
            None => "<peerstore>".to_string(),
        };
        let port = if self.port_set { "explicit" } else { "default" };
        println!(
            "connecting to {} at {addr}:{} ({port} port), {} streams, tag {:?}, timeout {:?}, {} retries",
            self.id, self.port, self.streams, self.tag, self.dial.timeout, self.dial.retries,
        );
        if !args.is_empty() {
            println!("extra arguments: {}", args.join(" "));
        }
        Ok(())
    }
}

#[derive(Default, ask::Load)]
#[ask(command)]
/// Ping a peer.
struct Ping {
    #[ask("<id>")]
    id: String,
    #[ask("--count -c", default = "1")]
    count: u32,
}

impl Command for Ping {
    fn run(&mut self, _args: &[String]) -> Result<(), BoxError> {
        for i in 0..self.count {
            println!("ping {} #{}", self.id, i + 1);
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut executor = Executor::new();
    let mut peer = Peer::default();
    let mut execution = executor.execute(&mut peer, &args);
    let (print_usage, code) = match &execution.result {
        Ok(Outcome::Ran) => (false, ExitCode::SUCCESS),
        Ok(Outcome::Help) => (true, ExitCode::SUCCESS),
        Ok(Outcome::Unrecognized) => {
            eprintln!("command not recognized");
            (true, ExitCode::FAILURE)
        }
        Err(Error::Run(err)) => {
            eprintln!("error: {err}");
            (false, ExitCode::FAILURE)
        }
        Err(err) => {
            eprintln!("error: {err}");
            (true, ExitCode::FAILURE)
        }
    };
    if print_usage {
        match execution.describe(executor.registry()) {
            Ok(mut descr) => eprint!("{}", descr.usage(false)),
            Err(err) => eprintln!("invalid command: {err}"),
        }
    }
    code
}
