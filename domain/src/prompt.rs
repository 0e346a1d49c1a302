use crate::models::Segment;

const PREAMBLE: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Stuff every retrieved segment into one prompt, followed by the question.
pub fn stuff_prompt(segments: &[Segment], question: &str) -> String {
    let context = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{PREAMBLE}\n\n{context}\n\nQuestion: {question}\nHelpful Answer:")
}
