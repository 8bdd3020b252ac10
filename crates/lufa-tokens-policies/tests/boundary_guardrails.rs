// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use walkdir::WalkDir;

#[test]
fn policies_crate_must_not_import_cli_or_subscriber_crates() {
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let forbidden = [
        "lufa_tokens_cli",
        "clap::",
        "tracing_subscriber",
        "std::process::exit",
        "println!",
    ];

    let sources = WalkDir::new(&src_root)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.expect("walk src").into_path())
        .filter(|path| path.extension().and_then(|v| v.to_str()) == Some("rs"))
        .collect::<Vec<_>>();
    assert!(!sources.is_empty(), "no sources under {}", src_root.display());

    for path in sources {
        let text = std::fs::read_to_string(&path).expect("read file");
        for token in forbidden {
            assert!(
                !text.contains(token),
                "forbidden import token `{token}` in {}",
                path.display()
            );
        }
    }
}
