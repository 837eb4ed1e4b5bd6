//! Candidate sources.
//!
//! The SQLite schema is owned by the surrounding application: profiles live
//! in `user`, with a `roleId` foreign key into `role`. The source only ever
//! reads; records whose role matches the excluded role name (typically
//! "Admin") never enter the ranking pool.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::candidate::CandidateRecord;
use crate::error::Result;

/// Supplies the snapshot of candidate records for a ranking run.
///
/// The snapshot is taken once, synchronously, before any concurrent work
/// starts, so implementations do not need to be shareable across tasks.
pub trait CandidateSource {
    /// Fetch all candidates whose role name differs from `exclude_role`.
    /// All profile fields are passed through verbatim.
    fn fetch_candidates(&self, exclude_role: &str) -> Result<Vec<CandidateRecord>>;

    /// Fetch the contact emails of all candidates whose role name differs
    /// from `exclude_role`.
    fn fetch_emails(&self, exclude_role: &str) -> Result<Vec<String>>;
}

/// Candidate source backed by the application's SQLite database.
pub struct SqliteCandidateSource {
    conn: Connection,
}

impl SqliteCandidateSource {
    /// Open the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Direct access to the underlying connection, for seeding in tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CandidateSource for SqliteCandidateSource {
    fn fetch_candidates(&self, exclude_role: &str) -> Result<Vec<CandidateRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.name, u.lastname, u.email, u.job, u.curriculum,
                    u.curriculumNormalized, u.skillsNormalized, u.expertiseNormalized
             FROM user u
             JOIN role r ON u.roleId = r.id
             WHERE r.name != ?1",
        )?;

        let rows = stmt.query_map([exclude_role], |row| {
            let first: String = row.get::<_, Option<String>>(0)?.unwrap_or_default();
            let last: String = row.get::<_, Option<String>>(1)?.unwrap_or_default();

            Ok(CandidateRecord {
                name: format!("{first} {last}"),
                email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                job: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                curriculum: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                curriculum_normalized: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                skills: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                expertise: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            })
        })?;

        let candidates = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(
            "Fetched {} candidates (excluding role {exclude_role})",
            candidates.len()
        );

        Ok(candidates)
    }

    fn fetch_emails(&self, exclude_role: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.email
             FROM user u
             JOIN role r ON u.roleId = r.id
             WHERE r.name != ?1",
        )?;

        let rows = stmt.query_map([exclude_role], |row| row.get(0))?;
        let emails = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(emails)
    }
}
