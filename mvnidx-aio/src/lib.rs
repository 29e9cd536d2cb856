// mvnidx-aio/src/lib.rs
//! Synchronous IO primitives for mvnidx (filesystem, json, checksums)

pub mod checksum;
pub mod fs;
pub mod json_io;

pub use checksum::sha256_file;
pub use fs::{atomic_write_file, is_regular_file, modified_time, remove_file_if_exists};
pub use json_io::{read_json, write_json};
