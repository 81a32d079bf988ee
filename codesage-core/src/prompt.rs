//! The fixed instruction sent to the model.

/// Wraps extracted document text in the question-generation instruction.
///
/// The text is interpolated verbatim; nothing is trimmed or escaped.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are an AI teacher. Generate:\n\
         - 5 one-mark questions with answers\n\
         - 5 five-mark questions with answers\n\
         - 5 ten-mark questions with answers\n\
         \n\
         Text:\n\
         {text}\n"
    )
}
