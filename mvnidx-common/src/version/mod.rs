// mvnidx-common/src/version/mod.rs
pub mod maven;
pub mod range;
pub mod spec;

pub use maven::MavenVersion;
pub use range::{Restriction, VersionRange};
pub use spec::VersionSpec;
