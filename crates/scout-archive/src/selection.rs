//! # Batch Selection
//!
//! Tracks which compatible codes are checked for a batch action. A
//! selection is bound to the set of documents it was made against, and to
//! each document's compatibility: when a refresh produces a different set,
//! or reclassifies a document, the selection is cleared rather than carried
//! over to codes the user never saw.

use std::collections::BTreeSet;

use crate::classify::Classification;

/// Checked codes for a batch action.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    documents: Vec<(String, bool)>,
    selectable: BTreeSet<String>,
    selected: BTreeSet<String>,
    selecting: bool,
}

impl Selection {
    /// An empty selection bound to `classification`.
    pub fn new(classification: &Classification) -> Self {
        let mut selection = Self::default();
        selection.sync(classification);
        selection
    }

    /// Rebind to a fresh classification.
    ///
    /// Returns `true` if the document set or any document's compatibility
    /// changed, in which case the selection has been cleared.
    pub fn sync(&mut self, classification: &Classification) -> bool {
        let mut documents: Vec<(String, bool)> = classification
            .compatible
            .iter()
            .map(|c| (c.origin.key(), true))
            .chain(
                classification
                    .incompatible
                    .iter()
                    .map(|c| (c.origin.key(), false)),
            )
            .collect();
        documents.sort();
        if documents == self.documents {
            return false;
        }
        self.selectable = documents
            .iter()
            .filter(|(_, compatible)| *compatible)
            .map(|(key, _)| key.clone())
            .collect();
        self.documents = documents;
        if !self.selected.is_empty() {
            tracing::debug!(dropped = self.selected.len(), "selection reset");
        }
        self.selected.clear();
        true
    }

    /// Enter or leave selection mode. Leaving clears the selection.
    pub fn set_selecting(&mut self, selecting: bool) {
        self.selecting = selecting;
        if !selecting {
            self.selected.clear();
        }
    }

    /// Whether selection mode is active.
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Flip a code's checked state. Returns whether it is now selected.
    ///
    /// Only compatible codes can be selected; other keys are ignored.
    pub fn toggle(&mut self, key: &str) -> bool {
        if !self.selectable.contains(key) {
            return false;
        }
        if !self.selected.remove(key) {
            self.selected.insert(key.to_string());
            return true;
        }
        false
    }

    /// Whether a code is selected.
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Selected keys in sorted order.
    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Uncheck everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CodeOrigin, CompatibleCode, IncompatibleCode, IncompatibleReason};
    use scout_codec::PayloadEnvelope;
    use scout_core::MatchRecord;
    use scout_crypto::SchemaFingerprint;

    fn compatible(name: &str) -> CompatibleCode {
        CompatibleCode {
            origin: CodeOrigin::Stored {
                file_name: name.into(),
                archived: false,
            },
            envelope: PayloadEnvelope {
                schema: SchemaFingerprint::parse(&"aa".repeat(32)).unwrap(),
                data: MatchRecord::new(),
            },
        }
    }

    fn classification(names: &[&str]) -> Classification {
        Classification {
            compatible: names.iter().map(|n| compatible(n)).collect(),
            incompatible: vec![IncompatibleCode {
                origin: CodeOrigin::Stored {
                    file_name: "old.svg".into(),
                    archived: false,
                },
                reason: IncompatibleReason::MissingPayload,
            }],
        }
    }

    #[test]
    fn toggle_only_compatible() {
        let mut sel = Selection::new(&classification(&["a.svg", "b.svg"]));
        sel.set_selecting(true);
        assert!(sel.toggle("a.svg"));
        assert!(!sel.toggle("old.svg"));
        assert!(sel.is_selected("a.svg"));
        assert!(!sel.toggle("a.svg"));
        assert!(!sel.is_selected("a.svg"));
    }

    #[test]
    fn same_documents_keep_selection() {
        let mut sel = Selection::new(&classification(&["a.svg", "b.svg"]));
        sel.toggle("b.svg");
        assert!(!sel.sync(&classification(&["b.svg", "a.svg"])));
        assert_eq!(sel.selected(), vec!["b.svg"]);
    }

    #[test]
    fn changed_documents_reset_selection() {
        let mut sel = Selection::new(&classification(&["a.svg", "b.svg"]));
        sel.toggle("b.svg");
        assert!(sel.sync(&classification(&["a.svg"])));
        assert!(sel.selected().is_empty());
        assert!(!sel.toggle("b.svg"));
    }

    #[test]
    fn reclassified_document_resets_selection() {
        let mut sel = Selection::new(&classification(&["a.svg", "b.svg"]));
        sel.toggle("a.svg");

        let mut refreshed = classification(&["b.svg"]);
        refreshed.incompatible.push(IncompatibleCode {
            origin: CodeOrigin::Stored {
                file_name: "a.svg".into(),
                archived: false,
            },
            reason: IncompatibleReason::SchemaMismatch {
                found: SchemaFingerprint::parse(&"bb".repeat(32)).unwrap(),
            },
        });

        assert!(sel.sync(&refreshed));
        assert!(sel.selected().is_empty());
        assert!(!sel.toggle("a.svg"));
        assert!(sel.toggle("b.svg"));
    }

    #[test]
    fn leaving_selection_mode_clears() {
        let mut sel = Selection::new(&classification(&["a.svg"]));
        sel.set_selecting(true);
        sel.toggle("a.svg");
        sel.set_selecting(false);
        assert!(!sel.is_selecting());
        assert!(sel.selected().is_empty());
    }
}
