use super::*;
use hop_core::mru;
use rusqlite::params;

impl SqliteStore {
    /// Next branch in rotation after `current`, wrapping at the tail. An
    /// untracked or unknown current branch resolves to the head of the list.
    pub fn next_branch(
        &self,
        project_id: i64,
        current: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        let names = self.branch_names(project_id)?;
        Ok(mru::next_after(&names, current).map(str::to_string))
    }

    /// 1-based index into the MRU list, matching the numbering `list`
    /// renders. Out-of-range indices resolve to no branch.
    pub fn branch_at_index(
        &self,
        project_id: i64,
        index: i64,
    ) -> Result<Option<String>, StoreError> {
        let names = self.branch_names(project_id)?;
        Ok(mru::at_index(&names, index).map(str::to_string))
    }

    pub fn project_stats(&self, project_id: i64) -> Result<ProjectStats, StoreError> {
        let total_branches = self.count_branches(project_id)?;
        let most_recent = self.list_branches(project_id, Some(1))?.into_iter().next();
        Ok(ProjectStats {
            total_branches,
            most_recent,
        })
    }

    fn branch_names(&self, project_id: i64) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM branches \
             WHERE project_id = ?1 \
             ORDER BY position ASC, last_visited_at_ms DESC",
        )?;
        let rows = stmt.query_map(params![project_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
