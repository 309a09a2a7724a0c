use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use super::*;
use crate::checksum::sha256_reader_hex;

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

static TEST_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_file(contents: &[u8]) -> PathBuf {
    let sequence = TEST_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "openvox-bootstrap-security-{}-{}.bin",
        std::process::id(),
        sequence
    ));
    std::fs::write(&path, contents).expect("must write fixture");
    path
}

#[test]
fn sha256_of_empty_input() {
    assert_eq!(
        sha256_reader_hex(io::empty()).expect("empty reader must hash"),
        EMPTY_SHA256
    );
}

#[test]
fn sha256_of_file() {
    let path = test_file(b"abc");

    assert_eq!(sha256_file_hex(&path).expect("must hash fixture"), ABC_SHA256);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn sha256_of_missing_file_is_an_io_error() {
    let err = sha256_file_hex(std::path::Path::new("/no/such/artifact"))
        .expect_err("missing file must fail");
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn digest_comparison_ignores_case_and_whitespace() {
    assert!(digest_matches(
        ABC_SHA256,
        " BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD\n"
    ));
    assert!(!digest_matches(ABC_SHA256, EMPTY_SHA256));
    assert!(!digest_matches(ABC_SHA256, ""));
}
