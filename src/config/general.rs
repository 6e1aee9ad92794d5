//! The general configuration settings for myls.
//!
//! This module defines the [General] struct for deserializing the `[general]` table of
//! myls.toml and the [InternalGeneral] struct used at runtime, which holds the parsed sort key.

use crate::core::SortKey;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    all: bool,
    dirs_first: bool,
    git: bool,
    reverse: bool,
    sort: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            all: false,
            dirs_first: false,
            git: false,
            reverse: false,
            sort: SortKey::Name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InternalGeneral {
    all: bool,
    dirs_first: bool,
    git: bool,
    reverse: bool,
    sort: SortKey,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        let sort = match g.sort.parse::<SortKey>() {
            Ok(key) => key,
            Err(e) => {
                log::warn!("config: {e}, sorting by name");
                SortKey::Name
            }
        };
        Self {
            all: g.all,
            dirs_first: g.dirs_first,
            git: g.git,
            reverse: g.reverse,
            sort,
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn all(&self) -> bool {
        self.all
    }

    #[inline]
    pub fn dirs_first(&self) -> bool {
        self.dirs_first
    }

    #[inline]
    pub fn git(&self) -> bool {
        self.git
    }

    #[inline]
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    #[inline]
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub(crate) fn set_dirs_first(&mut self, value: bool) {
        self.dirs_first = value;
    }

    pub(crate) fn set_git(&mut self, value: bool) {
        self.git = value;
    }
}
