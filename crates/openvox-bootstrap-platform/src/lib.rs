mod arch;
mod facts;
mod platform;

pub use arch::{normalize_cpu_architecture, resolve_cpu_architecture, resolve_package_architecture};
pub use facts::FactsProvider;
pub use platform::{codename_version, resolve_platform, RELEASE_NOT_APPLICABLE};

#[cfg(test)]
mod tests;
