//! Association browsing results

use super::traits::FeatureForm;
use std::fmt;
use std::sync::Arc;

/// A related record reachable from the current one
#[derive(Clone)]
pub struct Association {
    pub title: String,
    pub form: Arc<dyn FeatureForm>,
}

impl fmt::Debug for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Association")
            .field("title", &self.title)
            .field("record", &self.form.global_id())
            .finish()
    }
}

/// Associations of one kind (e.g. all connected valves)
#[derive(Debug, Clone)]
pub struct AssociationGroupResult {
    pub name: String,
    pub associations: Vec<Association>,
}

/// A named association filter and the groups it yields
#[derive(Debug, Clone)]
pub struct AssociationFilterResult {
    pub name: String,
    pub groups: Vec<AssociationGroupResult>,
}

impl AssociationFilterResult {
    /// Total associations across every group
    pub fn association_count(&self) -> usize {
        self.groups.iter().map(|g| g.associations.len()).sum()
    }
}
