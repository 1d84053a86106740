use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use vinculo_core::model::{
    validate_new_project, validate_patch, NewProject, Project, ProjectPatch, ProjectStatus,
    ValidationErrors,
};

use crate::error::ApiError;
use crate::latency::{self, StoreOp};
use crate::routes::parse_body;
use crate::AppState;

const NOT_FOUND: &str = "Proyecto no encontrado.";
const CREATED: &str = "Proyecto creado exitosamente.";
const UPDATED: &str = "Proyecto actualizado exitosamente.";
const DELETED: &str = "Proyecto eliminado exitosamente.";
const DELETE_FAILED: &str = "No se pudo eliminar el proyecto o proyecto no encontrado.";
const INVALID_STATUS: &str = "Por favor, selecciona un estado válido.";
const REQUIRED: &str = "Este campo es obligatorio.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/projects", get(list_projects).post(create_project))
        .route(
            "/api/v1/projects/{id}",
            get(get_project)
                .put(update_project)
                .patch(update_project)
                .delete(delete_project),
        )
}

// -- Request/Response types --

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// Project fields as submitted by a form or JSON client. Everything is
/// optional and stringly typed so that missing fields and bad statuses come
/// back as field errors rather than as a body parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectForm {
    pub project_name: Option<String>,
    pub location: Option<String>,
    pub responsible_department: Option<String>,
    pub project_lead: Option<String>,
    pub academic_tutor: Option<String>,
    pub community_tutor: Option<String>,
    pub contact_information: Option<String>,
    pub status: Option<String>,
    pub status_description: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<String>,
    pub public_objective: Option<String>,
    pub scope: Option<String>,
}

impl ProjectForm {
    /// Full create payload: every required field must be present and valid.
    pub fn into_new_project(self) -> Result<NewProject, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("status", INVALID_STATUS);
                ProjectStatus::Planning
            }
            Some(s) => s.parse::<ProjectStatus>().unwrap_or_else(|_| {
                errors.add("status", INVALID_STATUS);
                ProjectStatus::Planning
            }),
        };

        let mut required = |field: &str, value: Option<String>| match value {
            Some(v) => v,
            None => {
                errors.add(field, REQUIRED);
                String::new()
            }
        };

        let input = NewProject {
            project_name: required("projectName", self.project_name),
            location: required("location", self.location),
            responsible_department: required("responsibleDepartment", self.responsible_department),
            project_lead: required("projectLead", self.project_lead),
            academic_tutor: required("academicTutor", self.academic_tutor),
            community_tutor: required("communityTutor", self.community_tutor),
            contact_information: required("contactInformation", self.contact_information),
            description: required("description", self.description),
            status,
            status_description: non_blank(self.status_description),
            project_type: non_blank(self.project_type),
            public_objective: non_blank(self.public_objective),
            scope: non_blank(self.scope),
        };

        if let Err(field_errors) = validate_new_project(&input) {
            errors.merge(field_errors);
        }
        errors.into_result().map(|()| input)
    }

    /// Partial update: only the fields present are checked and applied. A blank
    /// optional field is passed through so the store clears it.
    pub fn into_patch(self) -> Result<ProjectPatch, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let status = match self.status {
            Some(s) => match s.parse::<ProjectStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add("status", INVALID_STATUS);
                    None
                }
            },
            None => None,
        };

        let patch = ProjectPatch {
            project_name: self.project_name,
            location: self.location,
            responsible_department: self.responsible_department,
            project_lead: self.project_lead,
            academic_tutor: self.academic_tutor,
            community_tutor: self.community_tutor,
            contact_information: self.contact_information,
            status,
            status_description: self.status_description,
            description: self.description,
            project_type: self.project_type,
            public_objective: self.public_objective,
            scope: self.scope,
        };

        if let Err(field_errors) = validate_patch(&patch) {
            errors.merge(field_errors);
        }
        errors.into_result().map(|()| patch)
    }
}

/// On create, blank optional text means "not provided" (HTML forms always send the key).
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub message: String,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

// -- Handlers --

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Project>>, ApiError> {
    latency::simulate(&state.config.store, StoreOp::List).await;
    let projects = state.read_store()?.list(params.query.as_deref());
    Ok(Json(projects))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    latency::simulate(&state.config.store, StoreOp::Get).await;
    let project = state.read_store()?.get_by_id(&id);
    project.map(Json).ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let form: ProjectForm = parse_body(&headers, &body)?;
    let input = form.into_new_project()?;

    latency::simulate(&state.config.store, StoreOp::Create).await;
    let project = state.write_store()?.create(input);

    tracing::info!(id = %project.id, name = %project.project_name, "project created");
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            message: CREATED.to_string(),
            project,
        }),
    ))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<ProjectResponse>, ApiError> {
    let form: ProjectForm = parse_body(&headers, &body)?;
    let patch = form.into_patch()?;

    latency::simulate(&state.config.store, StoreOp::Update).await;
    let project = state
        .write_store()?
        .update(&id, patch)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    tracing::info!(id = %project.id, status = %project.status, "project updated");
    Ok(Json(ProjectResponse {
        message: UPDATED.to_string(),
        project,
    }))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    latency::simulate(&state.config.store, StoreOp::Delete).await;
    let removed = state.write_store()?.delete(&id);

    if removed {
        tracing::info!(id = %id, "project deleted");
        Ok(Json(DeleteResponse {
            success: true,
            message: DELETED.to_string(),
        })
        .into_response())
    } else {
        tracing::warn!(id = %id, "delete of unknown project");
        Ok((
            StatusCode::NOT_FOUND,
            Json(DeleteResponse {
                success: false,
                message: DELETE_FAILED.to_string(),
            }),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{
        body_json, get, json_request, test_app_state, test_router, valid_project_json,
    };
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_form_missing_fields_reported() {
        let form = ProjectForm {
            project_name: Some("Library".into()),
            ..Default::default()
        };
        let errors = form.into_new_project().unwrap_err();
        assert!(errors.get("projectName").is_none());
        assert_eq!(errors.get("location").unwrap()[0], REQUIRED);
        assert_eq!(errors.get("status").unwrap(), [INVALID_STATUS]);
        assert!(errors.get("contactInformation").is_some());
    }

    #[test]
    fn test_form_blank_optionals_become_none() {
        let form: ProjectForm = serde_json::from_value(valid_project_json()).unwrap();
        let form = ProjectForm {
            scope: Some("   ".into()),
            project_type: Some("Education".into()),
            ..form
        };
        let input = form.into_new_project().unwrap();
        assert!(input.scope.is_none());
        assert_eq!(input.project_type.as_deref(), Some("Education"));
    }

    #[test]
    fn test_patch_invalid_status() {
        let form = ProjectForm {
            status: Some("Archived".into()),
            ..Default::default()
        };
        let errors = form.into_patch().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["status"]);
    }

    #[tokio::test]
    async fn test_list_projects_sorted() {
        let resp = test_router().oneshot(get("/api/v1/projects")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        let ids: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[tokio::test]
    async fn test_list_projects_query() {
        let resp = test_router()
            .oneshot(get("/api/v1/projects?query=maracay"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["location"], "Sector El Limón, Maracay");
    }

    #[tokio::test]
    async fn test_get_project_and_not_found() {
        let app = test_router();
        let resp = app.clone().oneshot(get("/api/v1/projects/3")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["projectName"], "River Cleanup Campaign");
        assert_eq!(json["status"], "Completed");

        let resp = app.oneshot(get("/api/v1/projects/999")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["error"], NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_project_json() {
        let state = test_app_state();
        let app = crate::routes::router().with_state(state.clone());

        let resp = app
            .oneshot(json_request("POST", "/api/v1/projects", valid_project_json()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["message"], CREATED);
        assert_eq!(json["project"]["projectName"], "Community Library");
        assert_eq!(json["project"]["createdAt"], json["project"]["updatedAt"]);

        let id = json["project"]["id"].as_str().unwrap();
        assert!(state.read_store().unwrap().get_by_id(id).is_some());
        assert_eq!(state.read_store().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_project_form_encoded() {
        let state = test_app_state();
        let app = crate::routes::router().with_state(state.clone());

        let body = "projectName=Huerto+Escolar&location=Cagua&responsibleDepartment=Agronomy\
            &projectLead=Marta+Leon+Vera&academicTutor=Prof.+Ivan+Mora\
            &communityTutor=Rosa+Pinto+Gil&contactInformation=m.leon%40unefa.edu.ve\
            &status=In+Progress&description=School+garden+for+the+neighbourhood.\
            &projectType=&publicObjective=&scope=";
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/projects")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["project"]["status"], "In Progress");
        assert_eq!(json["project"]["contactInformation"], "m.leon@unefa.edu.ve");
        assert!(json["project"].get("scope").is_none());
    }

    #[tokio::test]
    async fn test_create_project_validation_failure() {
        let state = test_app_state();
        let app = crate::routes::router().with_state(state.clone());

        let mut body = valid_project_json();
        body["projectName"] = "ab".into();
        body["contactInformation"] = "not-an-email".into();
        body["status"] = "Archived".into();

        let resp = app
            .oneshot(json_request("POST", "/api/v1/projects", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["error"], crate::error::VALIDATION_FAILED);
        assert!(json["fields"]["projectName"].is_array());
        assert!(json["fields"]["contactInformation"].is_array());
        assert_eq!(json["fields"]["status"][0], INVALID_STATUS);
        assert_eq!(state.read_store().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_project_bad_json() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/projects")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_project_status() {
        let state = test_app_state();
        let before = state.read_store().unwrap().get_by_id("2").unwrap();
        let app = crate::routes::router().with_state(state.clone());

        let resp = app
            .oneshot(json_request(
                "PATCH",
                "/api/v1/projects/2",
                serde_json::json!({ "status": "Completed" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["message"], UPDATED);
        assert_eq!(json["project"]["status"], "Completed");
        assert_eq!(json["project"]["projectName"], before.project_name);

        let after = state.read_store().unwrap().get_by_id("2").unwrap();
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_patch_blank_optional_clears_field() {
        let state = test_app_state();
        let app = crate::routes::router().with_state(state.clone());

        let resp = app
            .oneshot(json_request(
                "PATCH",
                "/api/v1/projects/1",
                serde_json::json!({ "projectType": "", "scope": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert!(json["project"].get("projectType").is_none());
        assert!(json["project"].get("scope").is_none());
        assert!(json["project"]["publicObjective"].is_string());

        let stored = state.read_store().unwrap().get_by_id("1").unwrap();
        assert!(stored.project_type.is_none());
    }

    #[tokio::test]
    async fn test_form_edit_with_blank_optional_clears_field() {
        let app = test_router();
        let req = Request::builder()
            .method("PUT")
            .uri("/api/v1/projects/2")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("status=On+Hold&statusDescription=&publicObjective="))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["project"]["status"], "On Hold");
        assert!(json["project"].get("publicObjective").is_none());
        assert!(!json["project"]["scope"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_stores_trimmed_text() {
        let resp = test_router()
            .oneshot(json_request(
                "PATCH",
                "/api/v1/projects/3",
                serde_json::json!({ "location": "   Turmero Centro   " }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["project"]["location"], "Turmero Centro");
    }

    #[tokio::test]
    async fn test_put_project_validation_failure() {
        let resp = test_router()
            .oneshot(json_request(
                "PUT",
                "/api/v1/projects/1",
                serde_json::json!({ "description": "short" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp.into_body()).await;
        assert!(json["fields"]["description"].is_array());
    }

    #[tokio::test]
    async fn test_update_unknown_project() {
        let resp = test_router()
            .oneshot(json_request(
                "PATCH",
                "/api/v1/projects/999",
                serde_json::json!({ "status": "On Hold" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = test_router();
        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/projects/1")
                .body(Body::empty())
                .unwrap()
        };

        let resp = app.clone().oneshot(delete()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], DELETED);

        let resp = app.oneshot(delete()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], DELETE_FAILED);
    }
}
