/// A fixed geographic category a client belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub id: u32,
    pub label: &'static str,
}

/// The static region lookup set. Owned here as the single source of truth;
/// the backend never serves it and nothing validates that a stored record's
/// region label is in this set.
pub const REGIONS: &[Region] = &[
    Region { id: 1, label: "Mahdia" },
    Region { id: 2, label: "Tunis" },
    Region { id: 3, label: "Gafsa" },
    Region { id: 4, label: "Kef" },
    Region { id: 5, label: "Tataouine" },
];

/// Resolve a region id to its label.
pub fn label_for(id: u32) -> Option<&'static str> {
    REGIONS.iter().find(|r| r.id == id).map(|r| r.label)
}

/// Resolve a region label back to its id. Exact match only; an unknown
/// label resolves to nothing rather than a fallback region.
pub fn id_for_label(label: &str) -> Option<u32> {
    REGIONS.iter().find(|r| r.label == label).map(|r| r.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_for_known_id() {
        assert_eq!(label_for(2), Some("Tunis"));
        assert_eq!(label_for(5), Some("Tataouine"));
    }

    #[test]
    fn label_for_unknown_id_is_none() {
        assert_eq!(label_for(0), None);
        assert_eq!(label_for(99), None);
    }

    #[test]
    fn id_for_label_round_trips() {
        for region in REGIONS {
            assert_eq!(id_for_label(region.label), Some(region.id));
        }
    }

    #[test]
    fn id_for_label_is_exact_match() {
        assert_eq!(id_for_label("tunis"), None);
        assert_eq!(id_for_label("Sfax"), None);
        assert_eq!(id_for_label(""), None);
    }
}
