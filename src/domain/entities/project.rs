use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One portfolio entry from the seed file. Keys this type does not name are
/// carried through untouched so the frontend can grow the schema freely.
/// Named fields are lenient: the id may be any JSON value, and absent or
/// `null` text and list fields read as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub long_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub badges: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The seed file is either `{"projects": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProjectSeed {
    Wrapped { projects: Vec<Project> },
    Bare(Vec<Project>),
}

impl ProjectSeed {
    pub fn into_projects(self) -> Vec<Project> {
        match self {
            ProjectSeed::Wrapped { projects } | ProjectSeed::Bare(projects) => projects,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub mock: bool,
    pub timestamp: String,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"{
        "id": "gmaps-agent",
        "title": "Google Maps Agent",
        "shortDescription": "AI Agent thu thập thông tin khách hàng",
        "longDescription": "Long text",
        "badges": ["AI"],
        "status": "completed",
        "demoUrl": "https://demo.example.com",
        "repoUrl": null,
        "screenshots": [],
        "technologies": ["Next.js"],
        "featured": true
    }"#;

    #[test]
    fn accepts_both_seed_layouts() {
        let wrapped: ProjectSeed = serde_json::from_str(&format!(r#"{{"projects":[{ENTRY}]}}"#)).unwrap();
        let bare: ProjectSeed = serde_json::from_str(&format!("[{ENTRY}]")).unwrap();

        assert_eq!(wrapped.into_projects(), bare.into_projects());
    }

    #[test]
    fn unknown_keys_round_trip_in_camel_case() {
        let project: Project = serde_json::from_str(ENTRY).unwrap();
        let out = serde_json::to_value(&project).unwrap();

        assert_eq!(out["shortDescription"], "AI Agent thu thập thông tin khách hàng");
        assert_eq!(out["featured"], true);
        assert!(out["repoUrl"].is_null());
    }

    #[test]
    fn numeric_ids_and_missing_fields_are_accepted() {
        let seed: ProjectSeed = serde_json::from_str(r#"{"projects":[{"id":1,"title":"A"},{"id":"b"}]}"#).unwrap();
        let projects = seed.into_projects();

        assert_eq!(projects[0].id, 1);
        assert_eq!(projects[0].title, "A");
        assert_eq!(projects[1].id, "b");
        assert_eq!(projects[1].title, "");
    }

    #[test]
    fn null_lists_and_text_read_as_empty() {
        let project: Project = serde_json::from_str(
            r#"{"id":"x","title":null,"badges":null,"screenshots":null,"technologies":null,"status":null}"#,
        )
        .unwrap();

        assert!(project.badges.is_empty());
        assert!(project.screenshots.is_empty());
        assert!(project.technologies.is_empty());
        assert_eq!(project.title, "");
        assert_eq!(project.status, "");
        assert!(project.extra.is_empty());
    }

    #[test]
    fn non_array_seed_is_still_rejected() {
        assert!(serde_json::from_str::<ProjectSeed>(r#"{"projects":"nope"}"#).is_err());
        assert!(serde_json::from_str::<ProjectSeed>(r#"[1, 2]"#).is_err());
    }
}
