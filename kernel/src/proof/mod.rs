//! Proof module: evidence digests for worlds, policies, plans and reports.
//!
//! Depends on nothing else in the kernel. Every digest in the workspace is
//! produced by [`hash::canonical_hash`] over [`canon::canonical_json_bytes`].

pub mod canon;
pub mod hash;
pub mod hash_domain;
