//! Storage engine selection for the store role.
//!
//! The operator supplies a free-form hint (`--store` or `storage.store`).
//! The known tokens are tested for containment in priority order. No token
//! contains another, so a hint naming one engine always resolves to it;
//! priority only decides hints that name several. No match means no
//! explicit kind: the store host applies its own default.

use std::fmt;

use serde::Serialize;

/// Pluggable storage engine variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Rockstor,
    Chunky,
    ManyRocks,
    RockCfStor,
}

/// Tokens in match priority order.
const PRIORITY: [BackendKind; 4] = [
    BackendKind::Rockstor,
    BackendKind::Chunky,
    BackendKind::ManyRocks,
    BackendKind::RockCfStor,
];

impl BackendKind {
    pub fn token(self) -> &'static str {
        match self {
            BackendKind::Rockstor => "rockstor",
            BackendKind::Chunky => "chunky",
            BackendKind::ManyRocks => "manyrocks",
            BackendKind::RockCfStor => "rockcfstor",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Map a backend hint to a [`BackendKind`], case-insensitively.
pub fn resolve_backend(raw: &str) -> Option<BackendKind> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    PRIORITY.into_iter().find(|kind| name.contains(kind.token()))
}
