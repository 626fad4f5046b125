//! Researcher repository: list/detail/create/update/delete plus the
//! top-by-publications report.

use chrono::NaiveDate;

use super::DbError;
use crate::db::store::{QueryError, Row, SqlValue, Store, WriteError};
use crate::models::{
    ProfilePatch, Researcher, ResearcherForm, ResearcherSummary, ResearcherUpdate, TopResearcher,
};

const RESEARCHER_COLUMNS: &str =
    "chno, chnom, grade, statut, daterecrut, salaire, prime, email, supno, labno, facno";

pub struct ResearcherRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> ResearcherRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// List all researchers.
    pub async fn list(&self) -> Result<Vec<Researcher>, DbError> {
        let rows = self
            .store
            .query(
                &format!("SELECT {RESEARCHER_COLUMNS} FROM chercheur ORDER BY chno"),
                &[],
            )
            .await?;

        rows.iter().map(researcher_from_row).collect::<Result<_, _>>().map_err(Into::into)
    }

    /// Fetch one researcher by identifier. An empty result is `NotFound`,
    /// never an index into a missing first row.
    pub async fn get(&self, chno: i64) -> Result<Researcher, DbError> {
        let rows = self
            .store
            .query(
                &format!("SELECT {RESEARCHER_COLUMNS} FROM chercheur WHERE chno = $1"),
                &[SqlValue::from(chno)],
            )
            .await?;

        let row = rows.first().ok_or_else(|| DbError::NotFound {
            resource: "researcher",
            id: chno.to_string(),
        })?;

        researcher_from_row(row).map_err(Into::into)
    }

    /// Researchers attached to one laboratory.
    pub async fn in_lab(&self, labno: i64) -> Result<Vec<ResearcherSummary>, DbError> {
        let rows = self
            .store
            .query(
                "SELECT chno, chnom, grade FROM chercheur WHERE labno = $1 ORDER BY chno",
                &[SqlValue::from(labno)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ResearcherSummary {
                    chno: row.int("chno")?,
                    chnom: row.text("chnom")?,
                    grade: row.opt_text("grade")?,
                })
            })
            .collect::<Result<_, QueryError>>()
            .map_err(Into::into)
    }

    /// Create a researcher via the store's add routine. The ten submitted
    /// fields travel positionally in the routine's fixed order.
    pub async fn create(&self, form: &ResearcherForm) -> Result<(), WriteError> {
        self.store
            .execute(
                "CALL researcher_operations.add_chercheur($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
                &[
                    SqlValue::from(form.chnom.clone()),
                    SqlValue::from(form.grade.clone()),
                    SqlValue::from(form.statut.clone()),
                    SqlValue::from(form.daterecrut),
                    SqlValue::from(form.salaire),
                    SqlValue::from(form.prime),
                    SqlValue::from(form.email.clone()),
                    SqlValue::from(form.supno),
                    SqlValue::from(form.labno),
                    SqlValue::from(form.facno),
                ],
            )
            .await
    }

    /// Full update keyed by identifier.
    pub async fn update(&self, chno: i64, form: &ResearcherUpdate) -> Result<(), WriteError> {
        self.store
            .execute(
                "UPDATE chercheur SET chnom = $1, grade = $2, statut = $3, salaire = $4, prime = $5, supno = $6 WHERE chno = $7",
                &[
                    SqlValue::from(form.chnom.clone()),
                    SqlValue::from(form.grade.clone()),
                    SqlValue::from(form.statut.clone()),
                    SqlValue::from(form.salaire),
                    SqlValue::from(form.prime),
                    SqlValue::from(form.supno),
                    SqlValue::from(chno),
                ],
            )
            .await
    }

    /// Partial profile update via the store's routine; absent fields keep
    /// their stored values.
    pub async fn update_profile(&self, chno: i64, patch: &ProfilePatch) -> Result<(), WriteError> {
        self.store
            .execute(
                "SELECT researcher_operations.update_researcher_profile($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                &[
                    SqlValue::from(chno),
                    SqlValue::from(patch.grade.clone()),
                    SqlValue::from(patch.statut.clone()),
                    SqlValue::from(patch.salaire),
                    SqlValue::from(patch.prime),
                    SqlValue::from(patch.email.clone()),
                    SqlValue::from(patch.supno),
                    SqlValue::from(patch.labno),
                    SqlValue::from(patch.facno),
                ],
            )
            .await
    }

    /// Delete by identifier.
    pub async fn delete(&self, chno: i64) -> Result<(), WriteError> {
        self.store
            .execute("DELETE FROM chercheur WHERE chno = $1", &[SqlValue::from(chno)])
            .await
    }

    /// Top researchers by publication count in a date range. Pass-through to
    /// the store routine: two date parameters in, whatever rows come back
    /// out. An inverted range yields an empty list.
    pub async fn top_by_publications(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TopResearcher>, DbError> {
        let rows = self
            .store
            .query(
                "SELECT chno, chnom, publication_count FROM get_top_researchers_by_publications($1, $2)",
                &[SqlValue::from(start), SqlValue::from(end)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(TopResearcher {
                    chno: row.int("chno")?,
                    chnom: row.text("chnom")?,
                    publication_count: row.int("publication_count")?,
                })
            })
            .collect::<Result<_, QueryError>>()
            .map_err(Into::into)
    }
}

fn researcher_from_row(row: &Row) -> Result<Researcher, QueryError> {
    Ok(Researcher {
        chno: row.int("chno")?,
        chnom: row.text("chnom")?,
        grade: row.opt_text("grade")?,
        statut: row.opt_text("statut")?,
        daterecrut: row.opt_date("daterecrut")?,
        salaire: row.opt_float("salaire")?,
        prime: row.opt_float("prime")?,
        email: row.opt_text("email")?,
        supno: row.opt_int("supno")?,
        labno: row.opt_int("labno")?,
        facno: row.opt_int("facno")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fakes::{EmptyStore, RecordingStore};
    use crate::db::store::SqlValue;

    #[tokio::test]
    async fn get_binds_identifier_positionally() {
        let store = RecordingStore::default();
        let repo = ResearcherRepo::new(&store);

        // Empty result, so the lookup itself reports NotFound.
        let err = repo.get(7).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        let (statement, params) = &calls[0];
        // The statement keeps its placeholder; the value travels separately.
        assert!(statement.ends_with("WHERE chno = $1"));
        assert!(!statement.contains('7'));
        assert_eq!(params, &[SqlValue::Int(Some(7))]);
    }

    #[tokio::test]
    async fn create_forwards_all_ten_fields_in_order() {
        let store = RecordingStore::default();
        let repo = ResearcherRepo::new(&store);

        let form = ResearcherForm {
            chnom: "Benali".into(),
            grade: Some("MC".into()),
            email: Some("benali@univ.example".into()),
            labno: Some(2),
            ..Default::default()
        };
        repo.create(&form).await.unwrap();

        let calls = store.calls();
        let (statement, params) = &calls[0];
        assert!(statement.starts_with("CALL researcher_operations.add_chercheur("));
        assert!(statement.contains("$10"));
        assert!(!statement.contains("Benali"));
        assert_eq!(params.len(), 10);
        assert_eq!(params[0], SqlValue::Text(Some("Benali".into())));
        // Unsubmitted fields are forwarded as typed NULLs, not dropped.
        assert_eq!(params[3], SqlValue::Date(None));
        assert_eq!(params[7], SqlValue::Int(None));
    }

    #[tokio::test]
    async fn missing_researcher_is_not_found() {
        let store = EmptyStore;
        let repo = ResearcherRepo::new(&store);

        match repo.get(999).await {
            Err(DbError::NotFound { resource, id }) => {
                assert_eq!(resource, "researcher");
                assert_eq!(id, "999");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
