//! Schedule tier types

use serde::{Deserialize, Serialize};

/// Schedule tier of a row. Declaration order is grouping priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    OnSchedule,
    OffSchedule,
    Inactive,
}

impl Tier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::OnSchedule => "on-schedule",
            Tier::OffSchedule => "off-schedule",
            Tier::Inactive => "inactive",
        }
    }
}

/// Rendering context of the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewContext {
    /// Shared/edit view with the three-tier classification.
    /// The plain view only separates active from inactive rows.
    pub tiered: bool,
}

impl ViewContext {
    pub const TIERED: ViewContext = ViewContext { tiered: true };
    pub const PLAIN: ViewContext = ViewContext { tiered: false };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_priority_order() {
        assert!(Tier::OnSchedule < Tier::OffSchedule);
        assert!(Tier::OffSchedule < Tier::Inactive);
    }

    #[test]
    fn test_tier_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&Tier::OffSchedule).unwrap(), "\"off-schedule\"");
        assert_eq!(Tier::OnSchedule.as_str(), "on-schedule");
    }
}
