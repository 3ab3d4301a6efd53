//! Typed domain separators for canonical hashing.
//!
//! Every digest selects a [`HashDomain`]. Two artifacts with identical bytes
//! but different meaning (a plan and a report, say) never share a digest.

/// Declares `HashDomain`, its byte prefixes and `ALL` from a single list.
macro_rules! hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Domain separator for [`super::hash::canonical_hash`].
        ///
        /// Each variant maps to a unique, null-terminated prefix that is fed
        /// to SHA-256 ahead of the payload.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $( $(#[$meta])* $variant, )+
        }

        impl HashDomain {
            /// Every domain, in declaration order.
            pub const ALL: &[HashDomain] = &[ $( Self::$variant, )+ ];

            /// The prefix bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// Variant name, for logs and error messages.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )+
                }
            }
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

hash_domains! {
    /// Frozen world snapshot content.
    WorldSnapshot => b"VOXELPATH::WORLD_SNAPSHOT::V1\0",

    /// Search policy (budgets and enabled action kinds).
    SearchPolicy => b"VOXELPATH::SEARCH_POLICY::V1\0",

    /// A successful plan.
    Plan => b"VOXELPATH::PLAN::V1\0",

    /// One episode report.
    EpisodeReport => b"VOXELPATH::EPISODE_REPORT::V1\0",

    /// An ordered batch of episode reports.
    BatchReport => b"VOXELPATH::BATCH_REPORT::V1\0",
}
