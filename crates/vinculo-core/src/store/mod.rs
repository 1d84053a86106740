mod seed;

pub use seed::seed_projects;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::model::{NewProject, Project, ProjectPatch, ProjectStats};

/// In-memory collection of projects.
///
/// Records live in a map keyed by id; `order` keeps the ids newest-insert
/// first, which is the "stored order" search results come back in. Absence is
/// never an error here: lookups return `Option` and deletes return `bool`.
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: HashMap<String, Project>,
    order: Vec<String>,
}

impl ProjectStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the demo projects.
    pub fn seeded() -> Self {
        Self::from_projects(seed_projects(Utc::now()))
    }

    /// Build a store from existing records, keeping their order as stored order.
    /// Later records with an id already seen are dropped.
    pub fn from_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        let mut store = Self::new();
        for project in projects {
            if store.projects.contains_key(&project.id) {
                tracing::warn!(id = %project.id, "duplicate project id, skipping");
                continue;
            }
            store.order.push(project.id.clone());
            store.projects.insert(project.id.clone(), project);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// All projects newest-created first, or the substring matches in stored
    /// order when `query` has non-whitespace content.
    pub fn list(&self, query: Option<&str>) -> Vec<Project> {
        let needle = query.map(str::trim).unwrap_or_default();
        if needle.is_empty() {
            return self.sorted_by_created_desc();
        }

        let needle = needle.to_lowercase();
        self.stored()
            .filter(|p| p.matches(&needle))
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Project> {
        self.projects.get(id).cloned()
    }

    /// Insert a new record with a fresh id. `createdAt == updatedAt` on return.
    pub fn create(&mut self, data: NewProject) -> Project {
        let mut id = Uuid::now_v7().to_string();
        while self.projects.contains_key(&id) {
            id = Uuid::now_v7().to_string();
        }

        let project = Project::from_new(id.clone(), data, Utc::now());
        self.order.insert(0, id.clone());
        self.projects.insert(id, project.clone());

        tracing::debug!(id = %project.id, name = %project.project_name, "project created");
        project
    }

    /// Merge `patch` onto the record and bump `updatedAt`.
    pub fn update(&mut self, id: &str, patch: ProjectPatch) -> Option<Project> {
        let project = self.projects.get_mut(id)?;
        project.apply(patch);
        project.updated_at = next_timestamp(project.updated_at, Utc::now());

        tracing::debug!(id = %project.id, "project updated");
        Some(project.clone())
    }

    /// Hard-delete. Returns whether a record was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.projects.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != id);

        tracing::debug!(id, "project deleted");
        true
    }

    pub fn stats(&self) -> ProjectStats {
        let mut stats = ProjectStats::default();
        for project in self.projects.values() {
            stats.record(project.status);
        }
        stats
    }

    /// The `count` most recently created projects, newest first.
    pub fn recent(&self, count: usize) -> Vec<Project> {
        let mut projects = self.sorted_by_created_desc();
        projects.truncate(count);
        projects
    }

    fn stored(&self) -> impl Iterator<Item = &Project> {
        self.order.iter().filter_map(|id| self.projects.get(id))
    }

    fn sorted_by_created_desc(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self.stored().cloned().collect();
        // Stable: equal timestamps keep stored order.
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        projects
    }
}

/// `now`, unless the clock has not moved past `previous`; then one microsecond after it.
fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    now.max(floor)
}
