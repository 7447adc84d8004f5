use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub label: String,
    /// Display color token, `#RRGGBB` for the seed projects.
    pub color: String,
    pub desc: String,
    pub archived: bool,
}

/// Projects keyed by id. Insertion order is the catalog display order.
pub type ProjectMap = IndexMap<String, Project>;

impl Project {
    fn seed(id: &str, label: &str, color: &str, desc: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            desc: desc.to_string(),
            archived: false,
        }
    }
}

pub fn seed_projects() -> ProjectMap {
    [
        Project::seed(
            "YC26",
            "Youth Councils 2026",
            "#3B82F6",
            "Develop and Execute Youth Councils Brief and Plan.",
        ),
        Project::seed(
            "RENDEZVOUS",
            "Rendezvous",
            "#EC4899",
            "Monthly youth gathering coordination and planning.",
        ),
        Project::seed(
            "DISCIPLESHIP",
            "Discipleship & Camp",
            "#10B981",
            "Tracking, resource creation, and summer camp spiritual development.",
        ),
        Project::seed(
            "LEADERSHIP",
            "Leadership",
            "#8B5CF6",
            "Internal committee formation and leadership development.",
        ),
        Project::seed(
            "ADMIN",
            "Administration",
            "#52525B",
            "General department upkeep, compliance, and HR goals.",
        ),
    ]
    .into_iter()
    .map(|project| (project.id.clone(), project))
    .collect()
}

/// Projects shown in the catalog, in map order.
pub fn active_projects(projects: &ProjectMap) -> impl Iterator<Item = &Project> {
    projects.values().filter(|p| !p.archived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_five_active_projects_in_order() {
        let projects = seed_projects();
        let ids: Vec<_> = projects.keys().map(String::as_str).collect();
        assert_eq!(
            ids,
            ["YC26", "RENDEZVOUS", "DISCIPLESHIP", "LEADERSHIP", "ADMIN"]
        );
        assert!(projects.values().all(|p| !p.archived));
        assert!(projects.iter().all(|(key, p)| key == &p.id));
    }

    #[test]
    fn active_projects_skips_archived() {
        let mut projects = seed_projects();
        projects["RENDEZVOUS"].archived = true;
        let ids: Vec<_> = active_projects(&projects).map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["YC26", "DISCIPLESHIP", "LEADERSHIP", "ADMIN"]);
    }

    #[test]
    fn missing_field_fails_to_deserialize() {
        let raw = r##"{"id":"X","label":"X","color":"#000000","desc":""}"##;
        assert!(serde_json::from_str::<Project>(raw).is_err());
    }
}
