mod capabilities;
mod peer;
mod values;

use ask::{CommandDescription, Load, Registry};

fn args(line: &str) -> Vec<String> {
    line.split_ascii_whitespace().map(String::from).collect()
}

fn usage(cmd: &mut dyn Load) -> String {
    let registry = Registry::default();
    let mut descr = CommandDescription::load(cmd, &registry).unwrap();
    descr.usage(false)
}
