use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(BioSampleId);
id_newtype!(CommentId);

/// Anything rendered in a keyed list. The client core never looks past the key.
pub trait Keyed {
    type Key: Copy + Eq + std::hash::Hash + fmt::Debug;

    fn key(&self) -> Self::Key;
}
