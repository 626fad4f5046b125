//! Publication repository: listings and per-publication bibliography.

use super::DbError;
use crate::db::store::{QueryError, Row, SqlValue, Store};
use crate::models::{BibliographyEntry, Publication};

pub struct PublicationRepo<'a> {
    store: &'a dyn Store,
}

impl<'a> PublicationRepo<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// List all publications.
    pub async fn list(&self) -> Result<Vec<Publication>, DbError> {
        let rows = self
            .store
            .query(
                "SELECT pubno, titre, date, theme, type FROM publication ORDER BY pubno",
                &[],
            )
            .await?;

        rows.iter()
            .map(publication_from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Publications authored by one researcher.
    pub async fn for_researcher(&self, chno: i64) -> Result<Vec<Publication>, DbError> {
        let rows = self
            .store
            .query(
                "SELECT p.pubno, p.titre, p.date, p.theme, p.type \
                 FROM publication p \
                 JOIN publier pu ON pu.pubno = p.pubno \
                 WHERE pu.chno = $1 \
                 ORDER BY p.date",
                &[SqlValue::from(chno)],
            )
            .await?;

        rows.iter()
            .map(publication_from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Co-author bibliography of one publication: author name and rank.
    pub async fn bibliography(&self, pubno: &str) -> Result<Vec<BibliographyEntry>, DbError> {
        let rows = self
            .store
            .query(
                "SELECT c.chnom, pu.rang \
                 FROM chercheur c \
                 JOIN publier pu ON pu.chno = c.chno \
                 WHERE pu.pubno = $1 \
                 ORDER BY pu.rang",
                &[SqlValue::from(pubno)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(BibliographyEntry {
                    chnom: row.text("chnom")?,
                    rang: row.int("rang")?,
                })
            })
            .collect::<Result<_, QueryError>>()
            .map_err(Into::into)
    }
}

fn publication_from_row(row: &Row) -> Result<Publication, QueryError> {
    Ok(Publication {
        pubno: row.text("pubno")?,
        titre: row.text("titre")?,
        date: row.opt_date("date")?,
        theme: row.opt_text("theme")?,
        kind: row.opt_text("type")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fakes::RecordingStore;

    #[tokio::test]
    async fn bibliography_binds_pubno_positionally() {
        let store = RecordingStore::default();
        let repo = PublicationRepo::new(&store);

        repo.bibliography("P42").await.unwrap();

        let calls = store.calls();
        let (statement, params) = &calls[0];
        assert!(statement.contains("WHERE pu.pubno = $1"));
        assert!(!statement.contains("P42"));
        assert_eq!(params, &[SqlValue::Text(Some("P42".into()))]);
    }
}
