//! Shared priority scale for ideas and tasks.

wire_enum! {
    /// Priority level; declaration order is the sort rank (high first).
    pub enum Priority {
        High => "alta",
        Medium => "media",
        Low => "baja",
    }
    default = Medium;
}

impl Priority {
    /// Sort rank: `0` for high, `2` for low.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Priority;

    #[test]
    fn unknown_ids_read_as_medium() {
        let parsed: Priority = serde_json::from_str("\"urgente\"").unwrap();
        assert_eq!(parsed, Priority::Medium);
        let null: Priority = serde_json::from_str("null").unwrap();
        assert_eq!(null, Priority::Medium);
    }

    #[test]
    fn rank_matches_declaration_order() {
        assert!(Priority::High < Priority::Medium && Priority::Medium < Priority::Low);
        assert_eq!(Priority::Low.rank(), 2);
    }
}
