//! Module group resolution for co-located lazy modules.
//!
//! A group concatenates the code of several lazy modules under one table
//! entry (e.g. locale variants stored with their root). The root is the
//! "head": its blob carries every member's code, and every member's table
//! entry aliases the head's offset and length. Members are never encoded
//! on their own.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::module::ModuleRecord;

/// Resolved view of the grouping map against a module list.
pub struct ModuleGroups<'a> {
    /// Root id mapped to member ids.
    groups: &'a BTreeMap<u64, BTreeSet<u64>>,

    /// Every lazy module, indexed by id.
    modules_by_id: HashMap<u64, &'a ModuleRecord>,

    /// Ids that appear as a member of some group.
    modules_in_groups: HashSet<u64>,
}

impl<'a> ModuleGroups<'a> {
    /// Builds the resolved view for a grouping map and module list.
    pub fn new(groups: &'a BTreeMap<u64, BTreeSet<u64>>, modules: &'a [ModuleRecord]) -> Self {
        Self {
            groups,
            modules_by_id: modules.iter().map(|m| (m.id, m)).collect(),
            modules_in_groups: groups.values().flatten().copied().collect(),
        }
    }

    /// Returns `true` if the id is a member of some group (and therefore
    /// not encoded as its own blob).
    pub fn is_member(&self, id: u64) -> bool {
        self.modules_in_groups.contains(&id)
    }

    /// Returns the ids sharing the blob of the given head: the head
    /// itself plus its group members, if any.
    pub fn ids_in_group(&self, head_id: u64) -> Vec<u64> {
        let mut ids = vec![head_id];
        if let Some(members) = self.groups.get(&head_id) {
            ids.extend(members.iter().copied());
        }
        ids
    }

    /// Produces the final code for a head module: its own code joined
    /// with every member's code, newline-separated, in group order.
    ///
    /// A member id with no corresponding module contributes an empty
    /// string; the table construction must stay total even when the
    /// grouping input is malformed.
    pub fn group_code(&self, head: &ModuleRecord) -> String {
        let Some(members) = self.groups.get(&head.id).filter(|m| !m.is_empty()) else {
            return head.code.clone();
        };

        let mut sections = vec![head.code.as_str()];
        for id in members {
            sections.push(self.modules_by_id.get(id).map_or("", |m| m.code.as_str()));
        }
        sections.join("\n")
    }

    /// Every id that needs a table entry: all lazy module ids plus every
    /// id referenced by a group, whether or not a module backs it.
    ///
    /// Member ids must be tabled even though their bytes live under the
    /// head, because the table is addressed directly by id.
    pub fn tabled_ids(&self) -> BTreeSet<u64> {
        let mut ids: BTreeSet<u64> = self.modules_by_id.keys().copied().collect();
        for (head, members) in self.groups {
            ids.insert(*head);
            ids.extend(members.iter().copied());
        }
        ids
    }
}
