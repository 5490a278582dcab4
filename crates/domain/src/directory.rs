/// Group object found by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    /// Group object id, usable as a group search value.
    pub group_id: String,
    /// Group display name.
    pub display_name: String,
}

/// Service principal found by display name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRef {
    /// Service principal object id, usable as an application search value.
    pub object_id: String,
    /// Service principal display name.
    pub display_name: String,
    /// Application (client) id.
    pub app_id: String,
}

/// Outcome of resolving a human-entered name to directory objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Exactly one object matched.
    Single(T),
    /// Several objects matched; the caller picks one. Directory order is kept.
    Multiple(Vec<T>),
}

impl<T> Resolution<T> {
    /// Builds a resolution from candidates. Returns `None` when there are none.
    #[must_use]
    pub fn from_candidates(mut candidates: Vec<T>) -> Option<Self> {
        match candidates.len() {
            0 => None,
            1 => candidates.pop().map(Self::Single),
            _ => Some(Self::Multiple(candidates)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Resolution;

    #[test]
    fn resolution_cardinality() {
        assert_eq!(Resolution::<u8>::from_candidates(Vec::new()), None);
        assert_eq!(
            Resolution::from_candidates(vec![7]),
            Some(Resolution::Single(7))
        );
        assert_eq!(
            Resolution::from_candidates(vec![1, 2]),
            Some(Resolution::Multiple(vec![1, 2]))
        );
    }
}
