use std::fmt;

/// Gmail system label for the inbox; removing it archives a message
pub const INBOX_LABEL: &str = "INBOX";

/// Gmail system label for unread messages
pub const UNREAD_LABEL: &str = "UNREAD";

/// Label info returned from Gmail API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInfo {
    pub id: String,
    pub name: String,
}

/// Visibility settings for a label being created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelVisibility {
    /// Gmail `messageListVisibility`: "show" or "hide"
    pub message_list: &'static str,
    /// Gmail `labelListVisibility`: "labelShow", "labelShowIfUnread" or "labelHide"
    pub label_list: &'static str,
}

impl LabelVisibility {
    /// Shown on messages and in the label list
    pub const SHOWN: Self = Self {
        message_list: "show",
        label_list: "labelShow",
    };

    /// Listed in the sidebar but hidden from message rows
    pub const HIDDEN_ON_MESSAGES: Self = Self {
        message_list: "hide",
        label_list: "labelShow",
    };
}

/// Resolved ids of the two labels the run applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIds {
    pub classified: String,
    pub recruiter: String,
}

/// Label changes applied to one message in a single modify call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChange {
    pub message_id: String,
    pub add_label_ids: Vec<String>,
    pub remove_label_ids: Vec<String>,
}

/// Outcome of classifying one message
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub message_id: String,
    pub scores: [f32; 2],
    pub is_recruiter: bool,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub checked: usize,
    pub recruiter: usize,
    pub dry_run: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Checked {} messages, marked {} as recruiter message.",
            self.checked, self.recruiter
        )?;
        if self.dry_run {
            write!(f, " (dry run, no labels changed)")?;
        }
        Ok(())
    }
}
