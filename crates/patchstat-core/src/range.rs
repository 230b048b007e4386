//! Named commit ranges

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A range as declared by the user, before enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Label, unique within one comparison
    pub name: String,

    /// Range expression passed through to the commit source (e.g. "v6.8..topic")
    pub expression: String,
}

impl RangeSpec {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

impl FromStr for RangeSpec {
    type Err = CoreError;

    /// Parses "NAME=EXPRESSION"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, expression) = s
            .split_once('=')
            .ok_or_else(|| CoreError::InvalidRangeSpec(s.to_string()))?;
        let (name, expression) = (name.trim(), expression.trim());
        if name.is_empty() || expression.is_empty() {
            return Err(CoreError::InvalidRangeSpec(s.to_string()));
        }
        Ok(RangeSpec::new(name, expression))
    }
}

/// An enumerated range: ordered, duplicate-free commit ids
///
/// Order is the commit source's emission order. Positions double as the
/// membership set and as the tie-break order for ambiguous matches.
#[derive(Debug, Clone)]
pub struct Range {
    name: String,
    expression: String,
    members: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Range {
    /// Builds a range, keeping the first occurrence of repeated ids
    pub fn new(
        name: impl Into<String>,
        expression: impl Into<String>,
        ids: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut members = Vec::new();
        let mut positions = HashMap::new();
        for id in ids {
            if positions.contains_key(&id) {
                continue;
            }
            positions.insert(id.clone(), members.len());
            members.push(id);
        }

        Self {
            name: name.into(),
            expression: expression.into(),
            members,
            positions,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Index of `id` in emission order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
