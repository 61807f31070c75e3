/// Canned instructions the user can pick instead of typing their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickPrompt {
    Executive,
    ActionItems,
    Technical,
}

impl QuickPrompt {
    pub const ALL: [Self; 3] = [Self::Executive, Self::ActionItems, Self::Technical];

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prompt| prompt.id() == id)
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Executive => "executive",
            Self::ActionItems => "action",
            Self::Technical => "technical",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Executive => "Executive Summary",
            Self::ActionItems => "Action Items",
            Self::Technical => "Technical Points",
        }
    }

    #[must_use]
    pub fn instructions(self) -> &'static str {
        match self {
            Self::Executive => {
                "Summarize in bullet points for executives, highlight action items clearly"
            }
            Self::ActionItems => "Extract all action items with owners and deadlines",
            Self::Technical => {
                "Focus on technical decisions, architecture, and implementation details"
            }
        }
    }
}
