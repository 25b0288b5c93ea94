// Exact substring scanning

/// Result of an exact scan. Finding nothing is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome<'a> {
    Matches(Vec<&'a str>),
    NoMatch,
}

impl<'a> ScanOutcome<'a> {
    pub fn matches(&self) -> &[&'a str] {
        match self {
            ScanOutcome::Matches(found) => found,
            ScanOutcome::NoMatch => &[],
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, ScanOutcome::Matches(_))
    }

    pub fn len(&self) -> usize {
        self.matches().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_match()
    }
}

/// Every candidate containing `query` (case-sensitive), in candidate order.
/// An empty query matches nothing.
pub fn scan_all<'a>(query: &str, candidates: &'a [String]) -> ScanOutcome<'a> {
    if query.is_empty() {
        return ScanOutcome::NoMatch;
    }

    let found: Vec<&str> = candidates
        .iter()
        .map(String::as_str)
        .filter(|candidate| candidate.contains(query))
        .collect();

    if found.is_empty() {
        ScanOutcome::NoMatch
    } else {
        ScanOutcome::Matches(found)
    }
}
