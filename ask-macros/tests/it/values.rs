use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

use ask::{Error, Executor, IpMask, IpNet, Outcome, ParseError};

use crate::args;

#[derive(Default, ask::Load)]
struct Everything {
    #[ask("--small")]
    small: i8,
    #[ask("--big")]
    big: u64,
    #[ask("--ratio")]
    ratio: f64,
    #[ask("--timeout")]
    timeout: Duration,
    #[ask("--bind")]
    bind: Option<Ipv4Addr>,
    #[ask("--net")]
    net: IpNet,
    #[ask("--mask")]
    mask: IpMask,
    #[ask("--names")]
    names: Vec<String>,
    #[ask("--ports")]
    ports: Vec<u16>,
    #[ask("--root")]
    root: [u8; 4],
    #[ask("--limit")]
    limit: Option<u32>,
    #[ask("-")]
    skipped: u8,
}

fn run(line: &str) -> Result<Everything, Error> {
    let mut everything = Everything::default();
    let res = Executor::new().execute(&mut everything, &args(line)).into_result()?;
    assert_eq!(res, Outcome::Unrecognized);
    Ok(everything)
}

#[test]
fn registry_types_bind_through_the_derive() {
    let it = run(concat!(
        "--small=-0x80 --big 18446744073709551615 --ratio 2.5 --timeout 1h2m3.5s ",
        "--bind 10.0.0.1 --net 10.1.2.3/8 --mask 255.255.255.0 ",
        r#"--names=a,"b,c" --ports 80,443 --root 0xDEADBEEF"#,
    ))
    .unwrap();
    assert_eq!(it.small, -128);
    assert_eq!(it.big, u64::MAX);
    assert_eq!(it.ratio, 2.5);
    assert_eq!(it.timeout, Duration::from_millis(3_723_500));
    assert_eq!(it.bind, Some(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(it.net.to_string(), "10.0.0.0/8");
    assert!(it.net.contains(IpAddr::V4(Ipv4Addr::new(10, 200, 0, 1))));
    assert_eq!(it.mask.prefix_len(), Some(24));
    assert_eq!(it.names, ["a", "b,c"]);
    assert_eq!(it.ports, [80, 443]);
    assert_eq!(it.root, [0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(it.limit, None);
    assert_eq!(it.skipped, 0);
}

#[test]
fn lists_are_replaced_not_appended() {
    let it = run("--ports 1,2 --ports 3 --names= ").unwrap();
    assert_eq!(it.ports, [3]);
    assert!(it.names.is_empty());
}

#[test]
fn bad_values_fail_the_parse() {
    let err = |line: &str| match run(line) {
        Err(Error::Parse(err @ ParseError::Apply { .. })) => err.to_string(),
        Err(err) => panic!("unexpected error: {err}"),
        Ok(_) => panic!("{line} parsed"),
    };
    assert_eq!(err("--small 128"), r#"failed to apply flag small: "128": "128" is out of range for i8"#);
    assert_eq!(
        err("--root 0xdeadbeef00"),
        r#"failed to apply flag root: "0xdeadbeef00": byte length does not match fixed-length of 4 bytes: parsed 5 bytes"#
    );
    assert_eq!(err("--ports 1,x"), r#"failed to apply flag ports: "1,x": invalid integer "x""#);
}

#[test]
fn ignored_fields_are_not_flags() {
    match run("--skipped 1") {
        Err(Error::Parse(ParseError::UnknownFlag(flag))) => assert_eq!(flag, "skipped"),
        _ => panic!("`--skipped` was accepted"),
    }
}
