use chrono::{DateTime, Duration, Utc};

use crate::model::{Project, ProjectStatus};

struct SeedRow {
    id: &'static str,
    project_name: &'static str,
    location: &'static str,
    responsible_department: &'static str,
    project_lead: &'static str,
    academic_tutor: &'static str,
    community_tutor: &'static str,
    contact_information: &'static str,
    status: ProjectStatus,
    description: &'static str,
    project_type: &'static str,
    public_objective: &'static str,
    scope: &'static str,
    created_days_ago: i64,
    updated_days_ago: i64,
}

const SEED_ROWS: [SeedRow; 3] = [
    SeedRow {
        id: "1",
        project_name: "Community Garden Initiative",
        location: "Sector El Limón, Maracay",
        responsible_department: "Agricultural Engineering",
        project_lead: "Juan Pérez Colmenares",
        academic_tutor: "Prof. Maria Silva",
        community_tutor: "Prof. Carlos Mendez",
        contact_information: "j.perez@unefa.edu.ve",
        status: ProjectStatus::InProgress,
        description: "Development of a community garden to promote sustainable agriculture and provide fresh produce to local families.",
        project_type: "Agricultural Development",
        public_objective: "Improve food security and promote sustainable practices.",
        scope: "Establishment of garden plots, training workshops, and community outreach.",
        created_days_ago: 10,
        updated_days_ago: 2,
    },
    SeedRow {
        id: "2",
        project_name: "Digital Literacy Program for Seniors",
        location: "UNEFA Cagua Extension",
        responsible_department: "Systems Engineering",
        project_lead: "Andrea González Rivas",
        academic_tutor: "Prof. Ana Rodriguez",
        community_tutor: "Carmen Torres Blanco",
        contact_information: "a.gonzalez@unefa.edu.ve",
        status: ProjectStatus::Planning,
        description: "A program to teach basic computer and internet skills to senior citizens in the community.",
        project_type: "Educational Program",
        public_objective: "Enhance digital inclusion for seniors.",
        scope: "Weekly workshops, personalized assistance, and resource material development.",
        created_days_ago: 5,
        updated_days_ago: 1,
    },
    SeedRow {
        id: "3",
        project_name: "River Cleanup Campaign",
        location: "Turmero River Banks",
        responsible_department: "Civil Engineering & Environmental Science",
        project_lead: "Ricardo Salazar Méndez",
        academic_tutor: "Prof. Luis Fernandez",
        community_tutor: "Prof. Sofia Herrera",
        contact_information: "cleanup@unefa.edu.ve",
        status: ProjectStatus::Completed,
        description: "Organized cleanup drives along the Turmero river to remove waste and raise environmental awareness.",
        project_type: "Environmental Conservation",
        public_objective: "Reduce river pollution and promote community involvement in environmental protection.",
        scope: "Three cleanup events, waste sorting and recycling, awareness talks in local schools.",
        created_days_ago: 60,
        updated_days_ago: 30,
    },
];

/// The demo projects a fresh server starts with, timestamped relative to `now`.
pub fn seed_projects(now: DateTime<Utc>) -> Vec<Project> {
    SEED_ROWS
        .iter()
        .map(|row| Project {
            id: row.id.to_string(),
            project_name: row.project_name.to_string(),
            location: row.location.to_string(),
            responsible_department: row.responsible_department.to_string(),
            project_lead: row.project_lead.to_string(),
            academic_tutor: row.academic_tutor.to_string(),
            community_tutor: row.community_tutor.to_string(),
            contact_information: row.contact_information.to_string(),
            status: row.status,
            status_description: None,
            description: row.description.to_string(),
            project_type: Some(row.project_type.to_string()),
            public_objective: Some(row.public_objective.to_string()),
            scope: Some(row.scope.to_string()),
            created_at: now - Duration::days(row.created_days_ago),
            updated_at: now - Duration::days(row.updated_days_ago),
        })
        .collect()
}
