//! Schema bootstrap: tables, triggers, and stored routines.
//!
//! Everything that enforces the domain's rules lives in the database, not in
//! application code: the business-hours trigger, the audit-history trigger,
//! and the reporting routine. `run_migrations` installs all of it
//! idempotently so a fresh database is usable after one call.
//!
//! The SQLSTATE and message raised by the business-hours trigger are a
//! contract with [`crate::db::classify`]; change them together or not at all.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chercheur (
            chno SERIAL PRIMARY KEY,
            chnom TEXT NOT NULL,
            grade TEXT,
            statut TEXT,
            daterecrut DATE,
            salaire DOUBLE PRECISION,
            prime DOUBLE PRECISION,
            email TEXT,
            supno INTEGER REFERENCES chercheur(chno),
            labno INTEGER,
            facno INTEGER
        );
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create chercheur table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS publication (
            pubno TEXT PRIMARY KEY,
            titre TEXT NOT NULL,
            date DATE,
            theme TEXT,
            type TEXT
        );
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create publication table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS publier (
            chno INTEGER NOT NULL REFERENCES chercheur(chno) ON DELETE CASCADE,
            pubno TEXT NOT NULL REFERENCES publication(pubno) ON DELETE CASCADE,
            rang INTEGER NOT NULL,
            PRIMARY KEY (chno, pubno)
        );
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create publier table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS historique_chercheurs (
            histno SERIAL PRIMARY KEY,
            chno INTEGER,
            action TEXT NOT NULL,
            action_date TIMESTAMPTZ NOT NULL DEFAULT now()
        );
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create historique_chercheurs table")?;

    sqlx::query("CREATE SCHEMA IF NOT EXISTS researcher_operations;")
        .execute(pool)
        .await
        .context("failed to create researcher_operations schema")?;

    // Business-hours enforcement. SQLSTATE and message text are matched by
    // the application's write classifier.
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION enforce_business_hours() RETURNS trigger AS $$
        BEGIN
            IF EXTRACT(ISODOW FROM now()) > 5
               OR CURRENT_TIME < TIME '08:00'
               OR CURRENT_TIME > TIME '18:00' THEN
                RAISE EXCEPTION 'chercheur writes restricted to business hours (Mon-Fri 08:00-18:00)'
                    USING ERRCODE = 'RSH01';
            END IF;
            IF TG_OP = 'DELETE' THEN
                RETURN OLD;
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create enforce_business_hours function")?;

    sqlx::query("DROP TRIGGER IF EXISTS chercheur_business_hours ON chercheur;")
        .execute(pool)
        .await
        .context("failed to drop chercheur_business_hours trigger")?;

    sqlx::query(
        r#"
        CREATE TRIGGER chercheur_business_hours
            BEFORE INSERT OR UPDATE OR DELETE ON chercheur
            FOR EACH ROW EXECUTE FUNCTION enforce_business_hours();
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create chercheur_business_hours trigger")?;

    // Append-only audit history, written by the database only.
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION log_chercheur_history() RETURNS trigger AS $$
        BEGIN
            IF TG_OP = 'DELETE' THEN
                INSERT INTO historique_chercheurs (chno, action) VALUES (OLD.chno, TG_OP);
                RETURN OLD;
            END IF;
            INSERT INTO historique_chercheurs (chno, action) VALUES (NEW.chno, TG_OP);
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create log_chercheur_history function")?;

    sqlx::query("DROP TRIGGER IF EXISTS chercheur_history ON chercheur;")
        .execute(pool)
        .await
        .context("failed to drop chercheur_history trigger")?;

    sqlx::query(
        r#"
        CREATE TRIGGER chercheur_history
            AFTER INSERT OR UPDATE OR DELETE ON chercheur
            FOR EACH ROW EXECUTE FUNCTION log_chercheur_history();
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create chercheur_history trigger")?;

    // Fixed 10-parameter order: callers bind positionally in this order.
    sqlx::query(
        r#"
        CREATE OR REPLACE PROCEDURE researcher_operations.add_chercheur(
            p_chnom TEXT,
            p_grade TEXT,
            p_statut TEXT,
            p_daterecrut DATE,
            p_salaire DOUBLE PRECISION,
            p_prime DOUBLE PRECISION,
            p_email TEXT,
            p_supno BIGINT,
            p_labno BIGINT,
            p_facno BIGINT
        ) AS $$
        BEGIN
            INSERT INTO chercheur (chnom, grade, statut, daterecrut, salaire, prime, email, supno, labno, facno)
            VALUES (p_chnom, p_grade, p_statut, p_daterecrut, p_salaire, p_prime, p_email, p_supno, p_labno, p_facno);
        END;
        $$ LANGUAGE plpgsql;
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create add_chercheur procedure")?;

    // Partial profile update: NULL arguments leave the column untouched.
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION researcher_operations.update_researcher_profile(
            p_chno BIGINT,
            p_grade TEXT,
            p_statut TEXT,
            p_salaire DOUBLE PRECISION,
            p_prime DOUBLE PRECISION,
            p_email TEXT,
            p_supno BIGINT,
            p_labno BIGINT,
            p_facno BIGINT
        ) RETURNS void AS $$
        BEGIN
            UPDATE chercheur
            SET grade   = COALESCE(p_grade, grade),
                statut  = COALESCE(p_statut, statut),
                salaire = COALESCE(p_salaire, salaire),
                prime   = COALESCE(p_prime, prime),
                email   = COALESCE(p_email, email),
                supno   = COALESCE(p_supno::integer, supno),
                labno   = COALESCE(p_labno::integer, labno),
                facno   = COALESCE(p_facno::integer, facno)
            WHERE chno = p_chno;
        END;
        $$ LANGUAGE plpgsql;
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create update_researcher_profile function")?;

    // Closed-inclusive bounds: start > end matches nothing and returns an
    // empty set rather than erroring.
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION get_top_researchers_by_publications(p_start DATE, p_end DATE)
        RETURNS TABLE (chno INTEGER, chnom TEXT, publication_count BIGINT) AS $$
        BEGIN
            RETURN QUERY
            SELECT c.chno, c.chnom, COUNT(pu.pubno) AS publication_count
            FROM chercheur c
            JOIN publier pu ON pu.chno = c.chno
            JOIN publication p ON p.pubno = pu.pubno
            WHERE p.date BETWEEN p_start AND p_end
            GROUP BY c.chno, c.chnom
            ORDER BY COUNT(pu.pubno) DESC, c.chno
            LIMIT 10;
        END;
        $$ LANGUAGE plpgsql;
    "#,
    )
    .execute(pool)
    .await
    .context("failed to create get_top_researchers_by_publications function")?;

    info!("database migrations complete");
    Ok(())
}
