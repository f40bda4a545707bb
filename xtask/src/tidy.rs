use std::{
    fs,
    path::{Path, PathBuf},
};

use xshell::Shell;

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn manifest_version(text: &str) -> &str {
    let line = text.lines().find(|it| it.starts_with("version = ")).unwrap();
    line.split('"').nth(1).unwrap()
}

#[test]
fn versions_are_in_sync() {
    let sh = Shell::new().unwrap();
    sh.change_dir(project_root());

    let ask = sh.read_file("Cargo.toml").unwrap();
    let macros = sh.read_file("ask-macros/Cargo.toml").unwrap();
    let version = manifest_version(&ask);

    assert_eq!(manifest_version(&macros), version, "ask-macros/Cargo.toml");
    let dep = format!(r#"ask-macros = {{ path = "./ask-macros", version = "={version}" }}"#);
    assert!(ask.contains(&dep), "ask depends on a different ask-macros, expected `{dep}`");
}

#[test]
fn no_trailing_whitespace() {
    let root = project_root();
    let mut files = Vec::new();
    for dir in ["src", "ask-macros/src", "ask-macros/tests", "demos", "xtask/src"] {
        rust_files(&root.join(dir), &mut files);
    }
    assert!(!files.is_empty());

    let mut bad = Vec::new();
    for file in files {
        let text = fs::read_to_string(&file).unwrap();
        for (i, line) in text.lines().enumerate() {
            if line.ends_with([' ', '\t']) {
                bad.push(format!("{}:{}", file.strip_prefix(&root).unwrap().display(), i + 1));
            }
        }
    }
    assert!(bad.is_empty(), "trailing whitespace:\n{}", bad.join("\n"));
}

fn rust_files(dir: &Path, acc: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_files(&path, acc);
        } else if path.extension().is_some_and(|it| it == "rs") {
            acc.push(path);
        }
    }
}
