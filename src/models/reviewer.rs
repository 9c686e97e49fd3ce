//! Reviewer model.
//!
//! Reviewers are the people assigned to projects. Each reviewer belongs to
//! an organisation (and optionally a parent organisation); two reviewers
//! from the same organisation tree may never review the same project.

use serde::{Deserialize, Serialize};

/// A reviewer available for a roster run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reviewer {
    /// Unique reviewer handle.
    pub handle: String,
    /// Employing organisation.
    pub organisation: String,
    /// Parent organisation, if the employer belongs to a group.
    pub parent_organisation: Option<String>,
    /// Physically attending (`true`) or spare/remote (`false`).
    pub present: bool,
    /// Whether the reviewer has prior review experience.
    pub experienced: bool,
    /// Informational risk flag, carried through untouched.
    pub risky: bool,
    /// Informational weight, carried through untouched.
    pub weight: f64,
    /// Informational availability fraction, carried through untouched.
    pub availability: f64,
}

impl Reviewer {
    /// Creates a present, inexperienced reviewer.
    pub fn new(handle: impl Into<String>, organisation: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            organisation: organisation.into(),
            parent_organisation: None,
            present: true,
            experienced: false,
            risky: false,
            weight: 1.0,
            availability: 1.0,
        }
    }

    /// Sets the parent organisation.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_organisation = Some(parent.into());
        self
    }

    /// Marks the reviewer as spare (not physically present).
    pub fn spare(mut self) -> Self {
        self.present = false;
        self
    }

    /// Marks the reviewer as experienced.
    pub fn experienced(mut self) -> Self {
        self.experienced = true;
        self
    }

    /// Sets the risk flag.
    pub fn with_risky(mut self, risky: bool) -> Self {
        self.risky = risky;
        self
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the availability fraction.
    pub fn with_availability(mut self, availability: f64) -> Self {
        self.availability = availability;
        self
    }

    /// Whether this reviewer counts toward a project's minimum under the
    /// given spare-inclusion policy.
    #[inline]
    pub fn counts_toward_minimum(&self, include_spare: bool) -> bool {
        self.present || include_spare
    }

    /// Whether two reviewers share an organisation or a parent organisation.
    ///
    /// Empty organisation names never conflict.
    pub fn conflicts_with(&self, other: &Reviewer) -> bool {
        if !self.organisation.is_empty() && self.organisation == other.organisation {
            return true;
        }
        match (&self.parent_organisation, &other.parent_organisation) {
            (Some(a), Some(b)) => !a.is_empty() && a == b,
            _ => false,
        }
    }
}
