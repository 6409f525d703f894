use serde::{Deserialize, Serialize};

use crate::IncidentKey;

/// A `(kept, absorbed)` pair from the duplicate list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub kept: IncidentKey,
    pub absorbed: IncidentKey,
}

impl DuplicatePair {
    pub fn new(kept: IncidentKey, absorbed: IncidentKey) -> Self {
        Self { kept, absorbed }
    }

    pub fn is_self_pair(&self) -> bool {
        self.kept == self.absorbed
    }
}
