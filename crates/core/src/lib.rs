#![forbid(unsafe_code)]

pub mod ids {
    /// Trimmed, validated branch name as git would accept it for a ref.
    pub fn canonical_branch_name(value: &str) -> Result<String, BranchNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(BranchNameError::Empty);
        }
        if value.len() > 512 {
            return Err(BranchNameError::TooLong);
        }
        if value.starts_with('-') {
            return Err(BranchNameError::LeadingDash);
        }
        for (index, ch) in value.chars().enumerate() {
            if ch.is_control() || ch == ' ' {
                return Err(BranchNameError::InvalidChar { ch, index });
            }
        }
        Ok(value.to_string())
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum BranchNameError {
        Empty,
        TooLong,
        LeadingDash,
        InvalidChar { ch: char, index: usize },
    }

    /// Canonical project key: an absolute path with no trailing separator.
    /// The store matches this string verbatim, so every caller must go
    /// through here before touching the projects table.
    pub fn canonical_project_path(value: &str) -> Result<String, ProjectPathError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ProjectPathError::Empty);
        }
        if !std::path::Path::new(value).is_absolute() {
            return Err(ProjectPathError::NotAbsolute);
        }
        let trimmed = value.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok("/".to_string());
        }
        Ok(trimmed.to_string())
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ProjectPathError {
        Empty,
        NotAbsolute,
    }
}

pub mod mru {
    /// Next branch in MRU rotation. `names` is the ordered list, most
    /// recent first. An unknown or absent current branch wraps to the head,
    /// as does advancing past the tail.
    pub fn next_after<'a>(names: &'a [String], current: Option<&str>) -> Option<&'a str> {
        let first = names.first()?;
        let Some(current) = current else {
            return Some(first.as_str());
        };
        match names.iter().position(|name| name == current) {
            None => Some(first.as_str()),
            Some(index) if index + 1 == names.len() => Some(first.as_str()),
            Some(index) => Some(names[index + 1].as_str()),
        }
    }

    /// 1-based lookup into the ordered list. Out-of-range indices resolve
    /// to no branch rather than an error.
    pub fn at_index(names: &[String], index: i64) -> Option<&str> {
        if index < 1 {
            return None;
        }
        let slot = usize::try_from(index - 1).ok()?;
        names.get(slot).map(String::as_str)
    }
}

pub mod age {
    /// Display bucket for "last visited" timestamps.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Age {
        JustNow,
        Minutes(i64),
        Hours(i64),
        Days(i64),
        Older,
    }

    const MINUTE_S: i64 = 60;
    const HOUR_S: i64 = 3_600;
    const DAY_S: i64 = 86_400;
    const MONTH_S: i64 = 2_592_000;

    pub fn classify(now_ms: i64, then_ms: i64) -> Age {
        let diff_s = now_ms.saturating_sub(then_ms) / 1_000;
        if diff_s < MINUTE_S {
            Age::JustNow
        } else if diff_s < HOUR_S {
            Age::Minutes(diff_s / MINUTE_S)
        } else if diff_s < DAY_S {
            Age::Hours(diff_s / HOUR_S)
        } else if diff_s < MONTH_S {
            Age::Days(diff_s / DAY_S)
        } else {
            Age::Older
        }
    }
}

#[cfg(test)]
mod tests {
    use super::age::{self, Age};
    use super::ids::{
        BranchNameError, ProjectPathError, canonical_branch_name, canonical_project_path,
    };
    use super::mru;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn branch_name_is_trimmed_and_validated() {
        assert_eq!(
            canonical_branch_name("  feature/login  ").expect("valid name must canonicalize"),
            "feature/login"
        );
        assert_eq!(canonical_branch_name(""), Err(BranchNameError::Empty));
        assert_eq!(canonical_branch_name("   "), Err(BranchNameError::Empty));
        assert_eq!(
            canonical_branch_name("-rf"),
            Err(BranchNameError::LeadingDash)
        );
        assert_eq!(
            canonical_branch_name("a b"),
            Err(BranchNameError::InvalidChar { ch: ' ', index: 1 })
        );
        assert_eq!(
            canonical_branch_name(&"x".repeat(513)),
            Err(BranchNameError::TooLong)
        );
    }

    #[test]
    fn project_path_must_be_absolute() {
        assert_eq!(
            canonical_project_path("/home/me/repo/").expect("absolute path must canonicalize"),
            "/home/me/repo"
        );
        assert_eq!(
            canonical_project_path("/").expect("root is a valid project path"),
            "/"
        );
        assert_eq!(canonical_project_path(""), Err(ProjectPathError::Empty));
        assert_eq!(
            canonical_project_path("relative/repo"),
            Err(ProjectPathError::NotAbsolute)
        );
    }

    #[test]
    fn next_after_cycles_with_wraparound() {
        let list = names(&["c", "b", "a"]);
        assert_eq!(mru::next_after(&list, Some("c")), Some("b"));
        assert_eq!(mru::next_after(&list, Some("b")), Some("a"));
        assert_eq!(mru::next_after(&list, Some("a")), Some("c"));
        assert_eq!(mru::next_after(&list, Some("unknown")), Some("c"));
        assert_eq!(mru::next_after(&list, None), Some("c"));
        assert_eq!(mru::next_after(&[], Some("a")), None);
    }

    #[test]
    fn at_index_is_one_based_and_bounded() {
        let list = names(&["c", "b", "a"]);
        assert_eq!(mru::at_index(&list, 1), Some("c"));
        assert_eq!(mru::at_index(&list, 3), Some("a"));
        assert_eq!(mru::at_index(&list, 4), None);
        assert_eq!(mru::at_index(&list, 0), None);
        assert_eq!(mru::at_index(&list, -2), None);
        assert_eq!(mru::at_index(&[], 1), None);
    }

    #[test]
    fn age_buckets_match_display_contract() {
        let now = 10_000_000_000i64;
        assert_eq!(age::classify(now, now - 30_000), Age::JustNow);
        assert_eq!(age::classify(now, now - 5 * 60_000), Age::Minutes(5));
        assert_eq!(age::classify(now, now - 3 * 3_600_000), Age::Hours(3));
        assert_eq!(age::classify(now, now - 2 * 86_400_000), Age::Days(2));
        assert_eq!(age::classify(now, now - 40 * 86_400_000), Age::Older);
        assert_eq!(age::classify(now, now + 60_000), Age::JustNow);
    }
}
