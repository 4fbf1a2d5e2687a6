use common::storage::types::raw_exercise::RawExerciseMetadata;
use serde::Deserialize;
use serde_json::Value;

const BLOCK_START: &str = "<!---";
const BLOCK_END: &str = "--->";

/// What a repository's descriptive document yielded.
#[derive(Debug, Clone, PartialEq)]
pub enum BlobExtraction {
    /// The repository has no descriptive document.
    NoBlob,
    /// The document has no marker pair, or the block between them is not exercise metadata.
    NoValidBlock,
    /// The metadata block, exactly as written.
    Extracted(Value),
}

/// Text between the first `<!---` and the following `--->`, trimmed.
pub fn find_block(text: &str) -> Option<&str> {
    let start = text.find(BLOCK_START)?.checked_add(BLOCK_START.len())?;
    let rest = text.get(start..)?;
    let end = rest.find(BLOCK_END)?;
    rest.get(..end).map(str::trim)
}

pub fn classify_blob(blob: Option<&str>) -> BlobExtraction {
    let Some(text) = blob else {
        return BlobExtraction::NoBlob;
    };

    let Some(block) = find_block(text) else {
        return BlobExtraction::NoValidBlock;
    };

    match serde_json::from_str::<Value>(block) {
        Ok(value) if is_metadata(&value) => BlobExtraction::Extracted(value),
        _ => BlobExtraction::NoValidBlock,
    }
}

/// A non-empty object that reads as exercise metadata.
fn is_metadata(value: &Value) -> bool {
    value.as_object().is_some_and(|fields| !fields.is_empty())
        && RawExerciseMetadata::deserialize(value).is_ok()
}
