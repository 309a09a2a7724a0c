mod checksum;

pub use checksum::{digest_matches, sha256_file_hex};

#[cfg(test)]
mod tests;
