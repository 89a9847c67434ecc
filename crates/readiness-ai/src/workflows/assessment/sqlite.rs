//! SQLite-backed [`AssessmentRepository`].
//!
//! Tables: `company`, `assessment`, and `get_well_plan` (one row per company and section,
//! enforced by a unique index and written with `ON CONFLICT ... DO UPDATE`). Multi-row
//! writes run inside a single transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use tracing::debug;

use super::domain::{
    Assessment, AssessmentId, Company, CompanyId, CompanyProfile, NewAssessment, NewPlan, Plan,
    PlanId, PLAN_MARKER,
};
use super::repository::{AssessmentRepository, RepositoryError, ScoringChangeSet};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS company (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    annual_revenue TEXT,
    employee_count TEXT,
    company_type TEXT,
    naics_codes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assessment (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES company(id) ON DELETE CASCADE,
    section TEXT NOT NULL,
    question TEXT NOT NULL,
    answer TEXT,
    score INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_assessment_company_section
    ON assessment(company_id, section);

CREATE TABLE IF NOT EXISTS get_well_plan (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES company(id) ON DELETE CASCADE,
    section TEXT NOT NULL,
    plan_text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(company_id, section)
);
";

const COMPANY_COLUMNS: &str = "id, name, annual_revenue, employee_count, company_type, naics_codes, created_at, updated_at";
const ASSESSMENT_COLUMNS: &str =
    "id, company_id, section, question, answer, score, created_at, updated_at";
const PLAN_COLUMNS: &str = "id, company_id, section, plan_text, created_at, updated_at";

const UPSERT_PLAN: &str = "INSERT INTO get_well_plan (company_id, section, plan_text, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?4)
     ON CONFLICT(company_id, section)
     DO UPDATE SET plan_text = excluded.plan_text, updated_at = excluded.updated_at";

pub struct SqliteAssessmentRepository {
    conn: Mutex<Connection>,
}

impl SqliteAssessmentRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite assessment store");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let repository = Self {
            conn: Mutex::new(conn),
        };
        repository.migrate()?;
        Ok(repository)
    }

    /// Creates missing tables. Safe to run against an existing database.
    pub fn migrate(&self) -> Result<(), RepositoryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("sqlite connection poisoned".to_string()))
    }
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: CompanyId(row.get(0)?),
        name: row.get(1)?,
        annual_revenue: row.get(2)?,
        employee_count: row.get(3)?,
        company_type: row.get(4)?,
        naics_codes: row.get(5)?,
        created_at: row.get::<_, DateTime<Utc>>(6)?,
        updated_at: row.get::<_, DateTime<Utc>>(7)?,
    })
}

fn assessment_from_row(row: &Row<'_>) -> rusqlite::Result<Assessment> {
    Ok(Assessment {
        id: AssessmentId(row.get(0)?),
        company_id: CompanyId(row.get(1)?),
        section: row.get(2)?,
        question: row.get(3)?,
        answer: row.get(4)?,
        score: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: PlanId(row.get(0)?),
        company_id: CompanyId(row.get(1)?),
        section: row.get(2)?,
        plan_text: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn find_company_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Company>> {
    conn.query_row(
        &format!("SELECT {COMPANY_COLUMNS} FROM company WHERE name = ?1"),
        params![name],
        company_from_row,
    )
    .optional()
}

fn apply_changes(tx: &Transaction<'_>, changes: &ScoringChangeSet) -> Result<(), RepositoryError> {
    let now = Utc::now();
    let company_id = changes.company_id.0;

    for edit in &changes.answer_edits {
        let updated = tx.execute(
            "UPDATE assessment SET answer = ?1, updated_at = ?2 WHERE id = ?3 AND company_id = ?4",
            params![edit.answer, now, edit.assessment_id.0, company_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }
    }

    for update in &changes.section_scores {
        tx.execute(
            "UPDATE assessment SET score = ?1, updated_at = ?2
             WHERE company_id = ?3 AND section = ?4 AND instr(question, ?5) = 0",
            params![update.score, now, company_id, update.section, PLAN_MARKER],
        )?;
    }

    for plan in &changes.plans {
        tx.execute(
            UPSERT_PLAN,
            params![company_id, plan.section, plan.plan_text, now],
        )?;
    }

    Ok(())
}

impl AssessmentRepository for SqliteAssessmentRepository {
    fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {COMPANY_COLUMNS} FROM company ORDER BY id"))?;
        let companies = stmt
            .query_map([], company_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(companies)
    }

    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        let conn = self.conn()?;
        let company = conn
            .query_row(
                &format!("SELECT {COMPANY_COLUMNS} FROM company WHERE id = ?1"),
                params![id.0],
                company_from_row,
            )
            .optional()?;
        Ok(company)
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        let conn = self.conn()?;
        Ok(find_company_by_name(&conn, name)?)
    }

    fn save_company(&self, profile: &CompanyProfile) -> Result<Company, RepositoryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let company = match find_company_by_name(&tx, &profile.name)? {
            Some(mut company) => {
                profile.apply_to(&mut company);
                company.updated_at = now;
                tx.execute(
                    "UPDATE company SET annual_revenue = ?1, employee_count = ?2, company_type = ?3,
                     naics_codes = ?4, updated_at = ?5 WHERE id = ?6",
                    params![
                        company.annual_revenue,
                        company.employee_count,
                        company.company_type,
                        company.naics_codes,
                        company.updated_at,
                        company.id.0
                    ],
                )?;
                company
            }
            None => {
                tx.execute(
                    "INSERT INTO company (name, annual_revenue, employee_count, company_type,
                     naics_codes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    params![
                        profile.name,
                        profile.annual_revenue,
                        profile.employee_count,
                        profile.company_type,
                        profile.naics_codes,
                        now
                    ],
                )?;
                Company {
                    id: CompanyId(tx.last_insert_rowid()),
                    name: profile.name.clone(),
                    annual_revenue: profile.annual_revenue.clone(),
                    employee_count: profile.employee_count.clone(),
                    company_type: profile.company_type.clone(),
                    naics_codes: profile.naics_codes.clone(),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        tx.commit()?;
        Ok(company)
    }

    fn replace_records(
        &self,
        company_id: CompanyId,
        assessments: Vec<NewAssessment>,
        plans: Vec<NewPlan>,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let exists = tx
            .query_row(
                "SELECT 1 FROM company WHERE id = ?1",
                params![company_id.0],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        tx.execute(
            "DELETE FROM assessment WHERE company_id = ?1",
            params![company_id.0],
        )?;
        tx.execute(
            "DELETE FROM get_well_plan WHERE company_id = ?1",
            params![company_id.0],
        )?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO assessment (company_id, section, question, answer, score, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?5)",
            )?;
            for row in &assessments {
                insert.execute(params![company_id.0, row.section, row.question, row.answer, now])?;
            }

            let mut upsert = tx.prepare(UPSERT_PLAN)?;
            for plan in &plans {
                upsert.execute(params![company_id.0, plan.section, plan.plan_text, now])?;
            }
        }

        tx.commit()?;
        debug!(
            company_id = company_id.0,
            assessments = assessments.len(),
            plans = plans.len(),
            "replaced company records"
        );
        Ok(())
    }

    fn assessments(&self, company_id: CompanyId) -> Result<Vec<Assessment>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessment WHERE company_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![company_id.0], assessment_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn section_assessments(
        &self,
        company_id: CompanyId,
        section: &str,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessment
             WHERE company_id = ?1 AND section = ?2 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![company_id.0, section], assessment_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {ASSESSMENT_COLUMNS} FROM assessment WHERE id = ?1"),
                params![id.0],
                assessment_from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn plans(&self, company_id: CompanyId) -> Result<Vec<Plan>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAN_COLUMNS} FROM get_well_plan WHERE company_id = ?1 ORDER BY id"
        ))?;
        let plans = stmt
            .query_map(params![company_id.0], plan_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plans)
    }

    fn commit(&self, changes: &ScoringChangeSet) -> Result<(), RepositoryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        apply_changes(&tx, changes)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::repository::{
        AnswerEdit, PlanUpsert, SectionScoreUpdate,
    };

    const TALENT: &str = "Section 5: AI Talent, Culture & Organizational Readiness";

    fn seeded() -> (SqliteAssessmentRepository, Company) {
        let repository = SqliteAssessmentRepository::in_memory().expect("sqlite opens");
        let company = repository
            .save_company(&CompanyProfile {
                name: "Contoso Health".to_string(),
                company_type: Some("Healthcare".to_string()),
                ..CompanyProfile::default()
            })
            .expect("company saved");
        repository
            .replace_records(
                company.id,
                vec![
                    NewAssessment {
                        section: TALENT.to_string(),
                        question: "AI headcount?".to_string(),
                        answer: Some("12 engineers".to_string()),
                    },
                    NewAssessment {
                        section: TALENT.to_string(),
                        question: format!("Get-Well Plan AI {TALENT}"),
                        answer: None,
                    },
                ],
                Vec::new(),
            )
            .expect("records replaced");
        (repository, company)
    }

    #[test]
    fn migrate_is_idempotent() {
        let (repository, company) = seeded();
        repository.migrate().expect("second migration");
        assert_eq!(repository.assessments(company.id).expect("rows").len(), 2);
    }

    #[test]
    fn save_company_keeps_unspecified_fields() {
        let (repository, company) = seeded();
        let updated = repository
            .save_company(&CompanyProfile {
                name: "Contoso Health".to_string(),
                employee_count: Some("250".to_string()),
                ..CompanyProfile::default()
            })
            .expect("update");

        assert_eq!(updated.id, company.id);
        let stored = repository
            .company(company.id)
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.company_type.as_deref(), Some("Healthcare"));
        assert_eq!(stored.employee_count.as_deref(), Some("250"));
        assert_eq!(
            repository
                .company_by_name("Contoso Health")
                .expect("lookup")
                .map(|company| company.id),
            Some(company.id)
        );
    }

    #[test]
    fn plan_upsert_keeps_one_row_per_section() {
        let (repository, company) = seeded();
        for text in ["Hire a head of AI", "Stand up an AI guild"] {
            let mut changes = ScoringChangeSet::new(company.id);
            changes.plans.push(PlanUpsert {
                section: TALENT.to_string(),
                plan_text: text.to_string(),
            });
            repository.commit(&changes).expect("commit");
        }

        let plans = repository.plans(company.id).expect("plans");
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].plan_text, "Stand up an AI guild");
    }

    #[test]
    fn commit_scores_only_non_marker_rows() {
        let (repository, company) = seeded();
        let mut changes = ScoringChangeSet::new(company.id);
        changes.section_scores.push(SectionScoreUpdate {
            section: TALENT.to_string(),
            score: 5,
        });
        repository.commit(&changes).expect("commit");

        let rows = repository
            .section_assessments(company.id, TALENT)
            .expect("rows");
        assert_eq!(rows[0].score, Some(5));
        assert_eq!(rows[1].score, None);
    }

    #[test]
    fn failed_commit_rolls_back_every_change() {
        let (repository, company) = seeded();
        let mut changes = ScoringChangeSet::new(company.id);
        changes.section_scores.push(SectionScoreUpdate {
            section: TALENT.to_string(),
            score: 8,
        });
        changes.plans.push(PlanUpsert {
            section: TALENT.to_string(),
            plan_text: "never stored".to_string(),
        });
        changes.answer_edits.push(AnswerEdit {
            assessment_id: AssessmentId(4242),
            answer: Some("missing row".to_string()),
        });

        assert!(matches!(
            repository.commit(&changes),
            Err(RepositoryError::NotFound)
        ));
        assert!(repository.plans(company.id).expect("plans").is_empty());
        assert!(repository
            .assessments(company.id)
            .expect("rows")
            .iter()
            .all(|row| row.score.is_none()));
    }

    #[test]
    fn replace_records_is_transactional() {
        let (repository, company) = seeded();
        let before = repository.assessments(company.id).expect("rows");

        let result = repository.replace_records(CompanyId(company.id.0 + 100), Vec::new(), Vec::new());
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(repository.assessments(company.id).expect("rows"), before);

        repository
            .replace_records(
                company.id,
                vec![NewAssessment {
                    section: TALENT.to_string(),
                    question: "Upskilling budget?".to_string(),
                    answer: Some("$50k".to_string()),
                }],
                vec![
                    NewPlan {
                        section: TALENT.to_string(),
                        plan_text: "draft".to_string(),
                    },
                    NewPlan {
                        section: TALENT.to_string(),
                        plan_text: "final".to_string(),
                    },
                ],
            )
            .expect("replace");

        let rows = repository.assessments(company.id).expect("rows");
        assert_eq!(rows.len(), 1);
        let plans = repository.plans(company.id).expect("plans");
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].plan_text, "final");
    }

    #[test]
    fn reopening_a_file_database_preserves_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("readiness.db");
        {
            let repository = SqliteAssessmentRepository::open(&path).expect("open");
            repository
                .save_company(&CompanyProfile {
                    name: "Fabrikam".to_string(),
                    ..CompanyProfile::default()
                })
                .expect("save");
        }

        let reopened = SqliteAssessmentRepository::open(&path).expect("reopen");
        let companies = reopened.companies().expect("companies");
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Fabrikam");
    }
}
