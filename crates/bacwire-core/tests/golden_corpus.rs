use bacwire_core::encoding::encode::Encode;
use bacwire_core::npdu::Npdu;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("workspace root should be resolvable")
}

fn parse_hex_fixture(path: &Path) -> Vec<u8> {
    let content = fs::read_to_string(path).expect("fixture must be readable");
    let mut out = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        for token in trimmed.split_whitespace() {
            let byte = u8::from_str_radix(token, 16)
                .unwrap_or_else(|_| panic!("invalid hex token '{token}' in {}", path.display()));
            out.push(byte);
        }
    }
    out
}

#[test]
fn golden_npdu_fixtures_decode_and_reencode() {
    let fixture_dir = workspace_root().join("fixtures/golden/npdu");
    let mut fixture_files = fs::read_dir(&fixture_dir)
        .expect("fixtures directory should exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "hex"))
        .collect::<Vec<_>>();
    fixture_files.sort();
    assert!(
        !fixture_files.is_empty(),
        "expected at least one corpus fixture in {}",
        fixture_dir.display()
    );

    for fixture in fixture_files {
        let bytes = parse_hex_fixture(&fixture);
        let npdu = Npdu::from_bytes(&bytes).unwrap_or_else(|e| {
            panic!(
                "fixture {} failed NPDU decode with error {e:?}",
                fixture.display()
            )
        });
        assert_eq!(
            npdu.bit_len(),
            bytes.len() * 8,
            "fixture {} length mismatch",
            fixture.display()
        );
        assert_eq!(
            npdu.to_bytes().unwrap(),
            bytes,
            "fixture {} did not re-encode to the same bytes",
            fixture.display()
        );
    }
}
