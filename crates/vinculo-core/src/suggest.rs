//! AI-assisted project details: given a free-text description, ask the model
//! for a project type, a public objective and a scope.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VinculoError};
use crate::llm::LlmService;
use crate::model::MIN_DESCRIPTION_LENGTH;

const SYSTEM_PROMPT: &str = "You are an AI assistant designed to suggest project details \
for university community outreach projects. Reply with JSON only.";

const PROMPT_TEMPLATE: &str = r#"Based on the following project description, suggest a project type, a public objective, and a scope for the project.

Description: {description}

Respond with a single JSON object with exactly these string keys:
{"projectType": "...", "publicObjective": "...", "scope": "..."}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionInput {
    /// A missing description is treated like an empty one and fails `check_input`.
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSuggestion {
    pub project_type: String,
    pub public_objective: String,
    pub scope: String,
}

/// Raw model output; every field optional so a missing key is reported by name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    project_type: Option<String>,
    public_objective: Option<String>,
    scope: Option<String>,
}

/// Reject descriptions too short to suggest anything from.
pub fn check_input(input: &SuggestionInput) -> Result<()> {
    if input.description.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
        return Err(VinculoError::InvalidInput(
            "La descripción debe tener al menos 10 caracteres.".into(),
        ));
    }
    Ok(())
}

pub fn render_prompt(input: &SuggestionInput) -> String {
    PROMPT_TEMPLATE.replace("{description}", input.description.trim())
}

/// Parse a model reply into a suggestion. Accepts bare JSON, JSON inside a
/// Markdown code fence, or JSON surrounded by prose.
pub fn parse_suggestion(reply: &str) -> Result<ProjectSuggestion> {
    let json = extract_json_object(reply).ok_or_else(|| {
        VinculoError::Suggestion("model reply contains no JSON object".into())
    })?;

    let raw: RawSuggestion = serde_json::from_str(json)
        .map_err(|e| VinculoError::Suggestion(format!("malformed suggestion JSON: {e}")))?;

    Ok(ProjectSuggestion {
        project_type: required("projectType", raw.project_type)?,
        public_objective: required("publicObjective", raw.public_objective)?,
        scope: required("scope", raw.scope)?,
    })
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(VinculoError::Suggestion(format!(
            "suggestion is missing '{field}'"
        ))),
    }
}

/// The outermost `{...}` span of `text`, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Run the full flow: input check, one model call, output parsing.
pub async fn suggest_project_details(
    llm: &LlmService,
    input: &SuggestionInput,
) -> Result<ProjectSuggestion> {
    check_input(input)?;

    let reply = llm.generate(&render_prompt(input), Some(SYSTEM_PROMPT)).await?;
    let suggestion = parse_suggestion(&reply)?;

    tracing::info!(
        provider = llm.provider_name(),
        project_type = %suggestion.project_type,
        "project details suggested"
    );
    Ok(suggestion)
}
