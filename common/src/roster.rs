// Keyed lookups for display joins. Task rows carry only people ids; the
// tables resolve names and detail cards through these maps instead of
// scanning the fetched collections per cell.

use std::collections::HashMap;

use crate::models::{Foreman, Technician};

/// Id-keyed index over the fetched foreman and technician collections,
/// rebuilt whenever either collection is (re)fetched
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    foremen: HashMap<i64, Foreman>,
    technicians: HashMap<i64, Technician>,
}

impl RosterIndex {
    pub fn new(foremen: &[Foreman], technicians: &[Technician]) -> Self {
        Self {
            foremen: foremen
                .iter()
                .map(|f| (f.foreman_id, f.clone()))
                .collect(),
            technicians: technicians
                .iter()
                .map(|t| (t.technician_id, t.clone()))
                .collect(),
        }
    }

    pub fn foreman(&self, id: i64) -> Option<&Foreman> {
        self.foremen.get(&id)
    }

    pub fn technician(&self, id: i64) -> Option<&Technician> {
        self.technicians.get(&id)
    }

    pub fn foreman_name(&self, id: i64) -> Option<&str> {
        self.foremen.get(&id).map(|f| f.full_name.as_str())
    }

    pub fn technician_name(&self, id: i64) -> Option<&str> {
        self.technicians.get(&id).map(|t| t.full_name.as_str())
    }

    /// Foremen with a non-empty workshop label, for the workshop select of
    /// the task form
    pub fn foremen_with_workshop(&self) -> Vec<&Foreman> {
        let mut list: Vec<&Foreman> = self
            .foremen
            .values()
            .filter(|f| !f.workshop.is_empty())
            .collect();
        list.sort_by_key(|f| f.foreman_id);
        list
    }
}
