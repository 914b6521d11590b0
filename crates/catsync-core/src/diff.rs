use serde::{Deserialize, Serialize};

/// One file's change within a push's commit range, as reported by the
/// source-control host.
///
/// `diff_text` is only consulted to detect "no textual change" on diffs
/// that are otherwise flagged as modifications; the engine never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub is_new: bool,
    pub is_renamed: bool,
    pub is_deleted: bool,
    #[serde(default)]
    pub diff_text: String,
}

impl FileDiff {
    pub fn added(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            old_path: path.clone(),
            new_path: path,
            is_new: true,
            is_renamed: false,
            is_deleted: false,
            diff_text: "+".to_string(),
        }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            old_path: path.clone(),
            new_path: path,
            is_new: false,
            is_renamed: false,
            is_deleted: false,
            diff_text: "@@".to_string(),
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            old_path: path.clone(),
            new_path: path,
            is_new: false,
            is_renamed: false,
            is_deleted: true,
            diff_text: "-".to_string(),
        }
    }

    /// A rename with no content change; set `diff_text` separately when the
    /// host reports edits alongside the rename.
    pub fn renamed(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            is_new: false,
            is_renamed: true,
            is_deleted: false,
            diff_text: String::new(),
        }
    }

    pub fn with_diff_text(mut self, diff_text: impl Into<String>) -> Self {
        self.diff_text = diff_text.into();
        self
    }
}
