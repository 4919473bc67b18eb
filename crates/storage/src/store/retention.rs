use super::*;
use regex_lite::Regex;
use rusqlite::params;

impl SqliteStore {
    /// Deletes every branch whose name matches none of `keep_patterns`.
    /// Patterns are regular expressions matched anywhere in the name unless
    /// they anchor themselves. All patterns compile before anything is
    /// deleted; one bad pattern fails the whole call and leaves the project
    /// untouched. An empty pattern list deletes nothing.
    pub fn clear_branches(
        &mut self,
        project_id: i64,
        keep_patterns: &[String],
    ) -> Result<usize, StoreError> {
        if keep_patterns.is_empty() {
            return Ok(0);
        }

        let mut compiled = Vec::with_capacity(keep_patterns.len());
        for pattern in keep_patterns {
            let regex = Regex::new(pattern).map_err(|err| StoreError::InvalidPattern {
                pattern: pattern.clone(),
                detail: err.to_string(),
            })?;
            compiled.push(regex);
        }

        let tx = self.conn.transaction()?;

        let mut doomed = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT id, name FROM branches WHERE project_id = ?1 ORDER BY position ASC",
            )?;
            let mut rows = stmt.query(params![project_id])?;
            while let Some(row) = rows.next()? {
                let id = row.get::<_, i64>(0)?;
                let name = row.get::<_, String>(1)?;
                if !compiled.iter().any(|regex| regex.is_match(&name)) {
                    doomed.push(id);
                }
            }
        }

        let mut delete = tx.prepare("DELETE FROM branches WHERE id = ?1")?;
        for id in &doomed {
            delete.execute(params![id])?;
        }
        drop(delete);

        reorder_branches_tx(&tx, project_id)?;
        tx.commit()?;

        tracing::debug!(project_id, deleted = doomed.len(), "cleared branches");
        Ok(doomed.len())
    }

    /// Drops every branch past the `max_count` most recently visited. The
    /// automatic-tracking hook runs this after each visit to cap growth.
    pub fn cleanup_excess(
        &mut self,
        project_id: i64,
        max_count: usize,
    ) -> Result<usize, StoreError> {
        let max_count = i64::try_from(max_count)
            .map_err(|_| StoreError::InvalidInput("max_count overflows sqlite integer"))?;

        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM branches WHERE project_id = ?1 AND id IN ( \
               SELECT id FROM branches \
               WHERE project_id = ?1 \
               ORDER BY position ASC, last_visited_at_ms DESC \
               LIMIT -1 OFFSET ?2 \
             )",
            params![project_id, max_count],
        )?;

        if deleted > 0 {
            reorder_branches_tx(&tx, project_id)?;
        }
        tx.commit()?;

        if deleted > 0 {
            tracing::debug!(project_id, deleted, "evicted excess branches");
        }
        Ok(deleted)
    }
}
