//! Names of the boundary operations, used in errors and logs

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    NewDocument,
    OpenDocument,
    SaveDocument,
    ValidateDocument,
    Outline,
    AddSegment,
    RemoveSegment,
    UpdateSegment,
    MoveSegment,
    AddDay,
    RemoveDay,
    UpdateDay,
    GetGroups,
    UpsertGroup,
    RemoveGroup,
    AddDictionaryEntry,
    AppSupportDir,
    CacheDir,
    DraftsDir,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::NewDocument => "new document",
            Operation::OpenDocument => "open document",
            Operation::SaveDocument => "save document",
            Operation::ValidateDocument => "validate document",
            Operation::Outline => "outline document",
            Operation::AddSegment => "add segment",
            Operation::RemoveSegment => "remove segment",
            Operation::UpdateSegment => "update segment",
            Operation::MoveSegment => "move segment",
            Operation::AddDay => "add day",
            Operation::RemoveDay => "remove day",
            Operation::UpdateDay => "update day",
            Operation::GetGroups => "get groups",
            Operation::UpsertGroup => "add/update group",
            Operation::RemoveGroup => "remove group",
            Operation::AddDictionaryEntry => "add dictionary entry",
            Operation::AppSupportDir => "get app-support directory",
            Operation::CacheDir => "get cache directory",
            Operation::DraftsDir => "get drafts directory",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
