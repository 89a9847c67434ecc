use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{
    Assessment, AssessmentId, Company, CompanyId, CompanyProfile, NewAssessment, NewPlan, Plan,
    PlanId,
};
use super::repository::{AssessmentRepository, RepositoryError, ScoringChangeSet};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_company: i64,
    next_assessment: i64,
    next_plan: i64,
    companies: BTreeMap<CompanyId, Company>,
    assessments: BTreeMap<AssessmentId, Assessment>,
    plans: BTreeMap<PlanId, Plan>,
}

impl MemoryState {
    fn upsert_plan(&mut self, company_id: CompanyId, section: &str, plan_text: &str) {
        let now = Utc::now();
        if let Some(plan) = self
            .plans
            .values_mut()
            .find(|plan| plan.company_id == company_id && plan.section == section)
        {
            plan.plan_text = plan_text.to_string();
            plan.updated_at = now;
            return;
        }

        self.next_plan += 1;
        let id = PlanId(self.next_plan);
        self.plans.insert(
            id,
            Plan {
                id,
                company_id,
                section: section.to_string(),
                plan_text: plan_text.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
    }

    fn insert_assessment(&mut self, company_id: CompanyId, row: NewAssessment) {
        let now = Utc::now();
        self.next_assessment += 1;
        let id = AssessmentId(self.next_assessment);
        self.assessments.insert(
            id,
            Assessment {
                id,
                company_id,
                section: row.section,
                question: row.question,
                answer: row.answer,
                score: None,
                created_at: now,
                updated_at: now,
            },
        );
    }

    fn apply(&mut self, changes: &ScoringChangeSet) -> Result<(), RepositoryError> {
        let now = Utc::now();

        for edit in &changes.answer_edits {
            let assessment = self
                .assessments
                .get_mut(&edit.assessment_id)
                .filter(|assessment| assessment.company_id == changes.company_id)
                .ok_or(RepositoryError::NotFound)?;
            assessment.answer = edit.answer.clone();
            assessment.updated_at = now;
        }

        for update in &changes.section_scores {
            for assessment in self.assessments.values_mut().filter(|assessment| {
                assessment.company_id == changes.company_id
                    && assessment.section == update.section
                    && !assessment.is_plan_marker()
            }) {
                assessment.score = Some(update.score);
                assessment.updated_at = now;
            }
        }

        for plan in &changes.plans {
            self.upsert_plan(changes.company_id, &plan.section, &plan.plan_text);
        }

        Ok(())
    }
}

/// Process-local repository used by tests and `APP_STORAGE=memory`.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn companies(&self) -> Result<Vec<Company>, RepositoryError> {
        Ok(self.state()?.companies.values().cloned().collect())
    }

    fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.state()?.companies.get(&id).cloned())
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        Ok(self
            .state()?
            .companies
            .values()
            .find(|company| company.name == name)
            .cloned())
    }

    fn save_company(&self, profile: &CompanyProfile) -> Result<Company, RepositoryError> {
        let mut state = self.state()?;
        let now = Utc::now();

        if let Some(company) = state
            .companies
            .values_mut()
            .find(|company| company.name == profile.name)
        {
            profile.apply_to(company);
            company.updated_at = now;
            return Ok(company.clone());
        }

        state.next_company += 1;
        let mut company = Company {
            id: CompanyId(state.next_company),
            name: profile.name.clone(),
            annual_revenue: None,
            employee_count: None,
            company_type: None,
            naics_codes: None,
            created_at: now,
            updated_at: now,
        };
        profile.apply_to(&mut company);
        state.companies.insert(company.id, company.clone());
        Ok(company)
    }

    fn replace_records(
        &self,
        company_id: CompanyId,
        assessments: Vec<NewAssessment>,
        plans: Vec<NewPlan>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if !state.companies.contains_key(&company_id) {
            return Err(RepositoryError::NotFound);
        }

        state
            .assessments
            .retain(|_, assessment| assessment.company_id != company_id);
        state.plans.retain(|_, plan| plan.company_id != company_id);

        for row in assessments {
            state.insert_assessment(company_id, row);
        }
        for plan in plans {
            state.upsert_plan(company_id, &plan.section, &plan.plan_text);
        }
        Ok(())
    }

    fn assessments(&self, company_id: CompanyId) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(self
            .state()?
            .assessments
            .values()
            .filter(|assessment| assessment.company_id == company_id)
            .cloned()
            .collect())
    }

    fn assessment(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self.state()?.assessments.get(&id).cloned())
    }

    fn plans(&self, company_id: CompanyId) -> Result<Vec<Plan>, RepositoryError> {
        Ok(self
            .state()?
            .plans
            .values()
            .filter(|plan| plan.company_id == company_id)
            .cloned()
            .collect())
    }

    fn commit(&self, changes: &ScoringChangeSet) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let mut staged = (*state).clone();
        staged.apply(changes)?;
        *state = staged;
        Ok(())
    }
}
