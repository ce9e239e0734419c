//! Applies the classification outcome to each message

use crate::client::GmailClient;
use crate::error::Result;
use crate::models::{Classification, LabelChange, LabelIds, INBOX_LABEL};
use tracing::{debug, info};

/// Label change for one classified message
///
/// Every message gains the classified label; recruiter messages also gain the
/// recruiter label and leave the inbox.
pub fn label_change_for(labels: &LabelIds, classification: &Classification) -> LabelChange {
    let (add_label_ids, remove_label_ids) = if classification.is_recruiter {
        (
            vec![labels.classified.clone(), labels.recruiter.clone()],
            vec![INBOX_LABEL.to_string()],
        )
    } else {
        (vec![labels.classified.clone()], Vec::new())
    };

    LabelChange {
        message_id: classification.message_id.clone(),
        add_label_ids,
        remove_label_ids,
    }
}

/// Issues one modify call per message
pub struct Labeler<'a> {
    client: &'a dyn GmailClient,
    labels: LabelIds,
    dry_run: bool,
}

impl<'a> Labeler<'a> {
    pub fn new(client: &'a dyn GmailClient, labels: LabelIds, dry_run: bool) -> Self {
        Self {
            client,
            labels,
            dry_run,
        }
    }

    /// Apply labels for every classification, in order
    pub async fn apply(&self, classifications: &[Classification]) -> Result<()> {
        let mut modified = 0;

        for classification in classifications {
            let change = label_change_for(&self.labels, classification);

            if self.dry_run {
                info!(
                    "[dry run] would label {} add={:?} remove={:?}",
                    change.message_id, change.add_label_ids, change.remove_label_ids
                );
                continue;
            }

            debug!(
                "Labeling {} add={:?} remove={:?}",
                change.message_id, change.add_label_ids, change.remove_label_ids
            );
            self.client
                .modify_labels(
                    &change.message_id,
                    &change.add_label_ids,
                    &change.remove_label_ids,
                )
                .await?;
            modified += 1;
        }

        info!("Labeled {} messages", modified);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelIds {
        LabelIds {
            classified: "Label_c".to_string(),
            recruiter: "Label_r".to_string(),
        }
    }

    fn classification(id: &str, is_recruiter: bool) -> Classification {
        Classification {
            message_id: id.to_string(),
            scores: if is_recruiter { [0.9, 0.3] } else { [0.5, 0.5] },
            is_recruiter,
        }
    }

    #[test]
    fn test_recruiter_change_archives() {
        let change = label_change_for(&labels(), &classification("m1", true));

        assert_eq!(change.message_id, "m1");
        assert_eq!(change.add_label_ids, vec!["Label_c", "Label_r"]);
        assert_eq!(change.remove_label_ids, vec!["INBOX"]);
    }

    #[test]
    fn test_non_recruiter_change_keeps_inbox() {
        let change = label_change_for(&labels(), &classification("m2", false));

        assert_eq!(change.add_label_ids, vec!["Label_c"]);
        assert!(change.remove_label_ids.is_empty());
    }
}
