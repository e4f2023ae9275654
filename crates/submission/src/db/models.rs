use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Client-supplied project metadata, used for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub students: Vec<String>,
    #[serde(default)]
    pub guide_name: String,
    #[serde(default)]
    pub co_guide_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub github_repo: Option<String>,
    pub start_date: NaiveDate,
    pub final_submission_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remark {
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// A submitted project. The summary PDF itself is served separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub students: Vec<String>,
    pub guide_name: String,
    pub co_guide_name: Option<String>,
    pub email: Option<String>,
    pub github_repo: Option<String>,
    pub start_date: NaiveDate,
    pub final_submission_date: NaiveDate,
    pub has_summary_pdf: bool,
    pub created_by: String,
    pub remarks: Vec<Remark>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Address for remark notifications, if one was given.
    pub fn notification_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewImportantDate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportantDate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
}
