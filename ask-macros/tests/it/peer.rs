use std::{cell::RefCell, net::IpAddr, rc::Rc};

use ask::{BoxError, Command, Error, Executor, Help, InitDefault, Load, Outcome, Route, Unrecognized};
use expect_test::expect;

use crate::{args, usage};

#[derive(Default, ask::Load)]
#[ask(route)]
struct Peer {
    state: Rc<RefCell<String>>,
}

impl Route for Peer {
    fn route(&mut self, token: &str) -> Result<Option<Box<dyn Load>>, BoxError> {
        match token {
            "connect" => {
                let connect = Connect { state: Rc::clone(&self.state), ..Connect::default() };
                Ok(Some(Box::new(connect)))
            }
            _ => Err(Unrecognized(token.to_string()).into()),
        }
    }

    fn routes(&self) -> Option<Vec<String>> {
        Some(vec!["connect".to_string()])
    }
}

#[derive(Default, ask::Load)]
struct PeerOptions {
    #[ask("--tag", help = "tag to give to peer")]
    tag: String,
    /// libp2p ID of the peer, if no address is specified, the peer is looked up in the peerstore
    #[ask("<id>")]
    peer_id: String,
}

#[derive(Default, ask::Load)]
struct MiscOptions {
    #[ask("<data>", help = "some number")]
    data: u8,
    #[ask("--awesome", help = "Enable awesome feature")]
    awesome: bool,
    #[ask("--bad", help = "Enable bad feature")]
    bad: bool,
}

#[derive(Default, ask::Load)]
#[ask(init_default)]
struct InlineOptions {
    #[ask("--foobar", help = "foobar integers")]
    foobar: Vec<i32>,
    #[ask("--hex", help = "Hex value")]
    bytes: Vec<u8>,
}

impl InitDefault for InlineOptions {
    fn init_default(&mut self) {
        self.foobar = vec![4, 5, 6];
    }
}

#[derive(Default, ask::Load)]
struct ForkOptions {
    #[ask("--digests", help = "some digests")]
    digests: Vec<[u8; 3]>,
    #[ask("[more]", help = "something optional")]
    more: String,
}

#[derive(Default, ask::Load)]
#[ask(command, help, init_default)]
struct Connect {
    state: Rc<RefCell<String>>,
    #[ask("--addr", help = "address to connect to")]
    addr: Option<IpAddr>,
    #[ask("--port", help = "port to use for connection")]
    port: u16,
    #[ask(".peer", help = "Options for peer stuff")]
    peer: PeerOptions,
    #[ask(".misc", help = "Misc. options")]
    misc: MiscOptions,
    #[ask(".")]
    inline: InlineOptions,
    #[ask(".fork", help = "Fork options")]
    fork: ForkOptions,
    #[ask(changed = "port")]
    port_set: bool,
    #[ask(changed = "addr")]
    addr_set: bool,
}

impl Help for Connect {
    fn help(&self) -> String {
        "Connect to a peer".to_string()
    }
}

impl InitDefault for Connect {
    fn init_default(&mut self) {
        self.port = 9000;
        self.fork.digests = vec![[0xa1, 0xb2, 0xc3], [0xd4, 0xe5, 0xf6]];
        self.misc.bad = true;
    }
}

impl Command for Connect {
    fn run(&mut self, args: &[String]) -> Result<(), BoxError> {
        if self.port_set {
            return Err("expected port not to be set explicitly".into());
        }
        if !self.addr_set {
            return Err("expected addr to be set explicitly".into());
        }
        let digests = self
            .fork
            .digests
            .iter()
            .map(|digest| format!("{}!", hex(digest)))
            .collect::<String>();
        let addr = self.addr.map(|it| it.to_string()).unwrap_or_default();
        *self.state.borrow_mut() = format!(
            "{addr}:{} #{} ${} {} ~ {}, remaining: {} ~ digests: {digests} ~ awesome: {}, bad: {} ~ foobar: {:?} ~ hex: {}",
            self.port,
            self.peer.tag,
            self.misc.data,
            self.peer.peer_id,
            self.fork.more,
            args.join(", "),
            self.misc.awesome,
            self.misc.bad,
            self.inline.foobar,
            hex(&self.inline.bytes),
        );
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|it| format!("{it:02x}")).collect()
}

fn peer(state: &str) -> Peer {
    Peer { state: Rc::new(RefCell::new(state.to_string())) }
}

#[test]
fn unknown_route_is_a_routing_error() {
    let mut peer = peer("old value");
    let res = Executor::new().execute(&mut peer, &args("bad")).into_result();
    match res {
        Err(Error::Route(err)) => {
            assert!(err.is::<Unrecognized>());
            assert_eq!(err.to_string(), "command was not recognized: bad");
        }
        _ => panic!("{res:?}"),
    }
    assert_eq!(*peer.state.borrow(), "old value");
}

#[test]
fn route_listing() {
    expect![[r#"
        (command)

        Sub commands:
          connect          Connect to a peer
    "#]]
    .assert_eq(&usage(&mut peer("")));
}

#[test]
fn help_describes_the_sub_command() {
    let mut executor = Executor::new();
    let mut peer = peer("");
    let mut execution = executor.execute(&mut peer, &args("connect --help"));
    assert!(matches!(execution.result, Ok(Outcome::Help)));
    let usage = execution.describe(executor.registry()).unwrap().usage(false);
    expect![[r#"
        (command) <peer.id> <misc.data> [fork.more] (8 flags)

        Connect to a peer

        Flags/args:
              --addr ip                   address to connect to
              --port u16                  port to use for connection (default: 9000)
              --foobar i32Slice           foobar integers (default: 4,5,6)
              --hex bytes                 Hex value
          peer: Options for peer stuff
              --peer.tag string           tag to give to peer
              <peer.id> string            libp2p ID of the peer, if no address is specified, the peer is looked up in the peerstore
          misc: Misc. options
              <misc.data> u8              some number (default: 0)
              --misc.awesome              Enable awesome feature
              --misc.bad                  Enable bad feature (default: true)
          fork: Fork options
              --fork.digests bytes3Slice  some digests (default: a1b2c3,d4e5f6)
              [fork.more] string          something optional

    "#]]
    .assert_eq(&usage);
}

#[test]
fn connect() {
    let mut peer = peer("old value");
    let line = "connect --addr 1.2.3.4 --peer.tag=123hey somepeerid 42 optionalhere \
        --misc.bad=false --misc.awesome --fork.digests=a1b2c3,42e5f6,a1b2c3 \
        --foobar=2,0x123,-1,8 --hex 0x1234567890 extra more";
    let res = Executor::new().execute(&mut peer, &args(line)).into_result();
    assert_eq!(res.unwrap(), Outcome::Ran);
    assert_eq!(
        *peer.state.borrow(),
        "1.2.3.4:9000 #123hey $42 somepeerid ~ optionalhere, remaining: extra, more \
        ~ digests: a1b2c3!42e5f6!a1b2c3! ~ awesome: true, bad: false \
        ~ foobar: [2, 291, -1, 8] ~ hex: 1234567890"
    );
}

#[test]
fn command_errors_are_returned() {
    let mut peer = peer("old value");
    let res = Executor::new().execute(&mut peer, &args("connect --port 1 id 1")).into_result();
    let err = res.unwrap_err();
    assert!(matches!(err, Error::Run(_)));
    assert_eq!(err.to_string(), "expected port not to be set explicitly");
    assert_eq!(*peer.state.borrow(), "old value");
}

#[test]
fn missing_positionals_are_named() {
    let mut peer = peer("");
    let mut execution = Executor::new().execute(&mut peer, &args("connect --addr 1.2.3.4"));
    let err = execution.result.as_ref().unwrap_err();
    assert_eq!(
        err.to_string(),
        "got 0 arguments, but expected 2, missing required arguments: peer.id, misc.data"
    );
    // Usage is still available for the command that failed.
    let usage = crate::usage(execution.command());
    assert!(usage.starts_with("(command) <peer.id> <misc.data>"), "{usage}");
}
