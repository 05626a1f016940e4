//! Official per-branch price sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// One line of a branch's official price sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchProcedure {
    pub no: u32,
    pub category: String,
    pub name: String,
    pub standard_price: Won,
    #[serde(default)]
    pub taxable: bool,
}

impl NamedEntity for BranchProcedure {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Known branches and their price sheets, keyed by branch name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BranchManifest {
    #[serde(default)]
    sheets: BTreeMap<String, Vec<BranchProcedure>>,
}

impl BranchManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a sheet, replacing any previous sheet for the same branch.
    pub fn insert(&mut self, branch: impl Into<String>, sheet: Vec<BranchProcedure>) {
        self.sheets.insert(branch.into(), sheet);
    }

    pub fn remove(&mut self, branch: &str) -> Option<Vec<BranchProcedure>> {
        self.sheets.remove(branch)
    }

    pub fn sheet(&self, branch: &str) -> Option<&[BranchProcedure]> {
        self.sheets.get(branch).map(Vec::as_slice)
    }

    pub fn branch_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sheets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
