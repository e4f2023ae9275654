use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Json, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{Project, ProjectFields, Remark};

const PROJECT_COLUMNS: &str = "id, title, description, students, guide_name, co_guide_name, \
     email, github_repo, start_date, final_submission_date, \
     summary_pdf IS NOT NULL AS has_summary_pdf, created_by, created_at, updated_at";

/// Ids bound per remark query; SQLite caps host parameters per statement.
const REMARK_LOOKUP_CHUNK: usize = 500;

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    title: String,
    description: String,
    students: Json<Vec<String>>,
    guide_name: String,
    co_guide_name: Option<String>,
    email: Option<String>,
    github_repo: Option<String>,
    start_date: NaiveDate,
    final_submission_date: NaiveDate,
    has_summary_pdf: bool,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, remarks: Vec<Remark>) -> Project {
        Project {
            id: self.id,
            title: self.title,
            description: self.description,
            students: self.students.0,
            guide_name: self.guide_name,
            co_guide_name: self.co_guide_name,
            email: self.email,
            github_repo: self.github_repo,
            start_date: self.start_date,
            final_submission_date: self.final_submission_date,
            has_summary_pdf: self.has_summary_pdf,
            created_by: self.created_by,
            remarks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RemarkRow {
    project_id: String,
    text: String,
    author: String,
    created_at: DateTime<Utc>,
}

/// Project records with their embedded remark history.
pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn create(
        pool: &SqlitePool,
        fields: &ProjectFields,
        summary_pdf: Option<&[u8]>,
        created_by: &str,
    ) -> Result<Project, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO projects (
                id, title, description, students, guide_name, co_guide_name, email,
                github_repo, start_date, final_submission_date, summary_pdf, created_by,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(Json(&fields.students))
        .bind(&fields.guide_name)
        .bind(&fields.co_guide_name)
        .bind(&fields.email)
        .bind(&fields.github_repo)
        .bind(fields.start_date)
        .bind(fields.final_submission_date)
        .bind(summary_pdf)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Overwrites every mutable field. The stored PDF is replaced only when
    /// `summary_pdf` is `Some`. Returns `None` for an unknown id.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        fields: &ProjectFields,
        summary_pdf: Option<&[u8]>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = ?, description = ?, students = ?, guide_name = ?,
                co_guide_name = ?, email = ?, github_repo = ?, start_date = ?,
                final_submission_date = ?, summary_pdf = COALESCE(?, summary_pdf),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(Json(&fields.students))
        .bind(&fields.guide_name)
        .bind(&fields.co_guide_name)
        .bind(&fields.email)
        .bind(&fields.github_repo)
        .bind(fields.start_date)
        .bind(fields.final_submission_date)
        .bind(summary_pdf)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Project>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Self::with_remarks(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY rowid"
        ))
        .fetch_all(pool)
        .await?;

        Self::with_remarks(pool, rows).await
    }

    pub async fn find_by_creator(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE created_by = ? ORDER BY rowid"
        ))
        .bind(username)
        .fetch_all(pool)
        .await?;

        Self::with_remarks(pool, rows).await
    }

    /// `None` when the project is unknown, `Some(None)` when it has no PDF.
    pub async fn summary_pdf(
        pool: &SqlitePool,
        id: &str,
    ) -> Result<Option<Option<Vec<u8>>>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Vec<u8>>>("SELECT summary_pdf FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Appends a remark in a single statement, so concurrent appends never
    /// overwrite each other. Returns `false` for an unknown project.
    pub async fn append_remark(
        pool: &SqlitePool,
        id: &str,
        remark: &Remark,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_remarks (project_id, text, author, created_at)
            SELECT id, ?, ?, ? FROM projects WHERE id = ?
            "#,
        )
        .bind(&remark.text)
        .bind(&remark.author)
        .bind(remark.created_at)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` for an unknown project.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_remarks WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_remarks(
        pool: &SqlitePool,
        rows: Vec<ProjectRow>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_project: HashMap<String, Vec<Remark>> = HashMap::new();
        for chunk in rows.chunks(REMARK_LOOKUP_CHUNK) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "SELECT project_id, text, author, created_at FROM project_remarks WHERE project_id IN (",
            );
            {
                let mut ids = query.separated(", ");
                for row in chunk {
                    ids.push_bind(row.id.clone());
                }
                ids.push_unseparated(") ORDER BY id");
            }

            for remark in query.build_query_as::<RemarkRow>().fetch_all(pool).await? {
                by_project.entry(remark.project_id).or_default().push(Remark {
                    text: remark.text,
                    author: remark.author,
                    created_at: remark.created_at,
                });
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let remarks = by_project.remove(&row.id).unwrap_or_default();
                row.into_project(remarks)
            })
            .collect())
    }
}
