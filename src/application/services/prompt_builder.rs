const INSTRUCTIONS: &str = "\
You are a knowledgeable assistant. Use ONLY the context below to answer the question politely and clearly.
If the context does not contain the answer, say that you don't know or suggest checking official sources.

Always format your replies using:
- Full sentences
- A professional, friendly tone
- Markdown formatting (bullets, bold, headings) where it helps
- Clean links when the context provides them";

/// Renders retrieved passages and the user's question into a single generation prompt.
///
/// Pure: identical inputs always produce byte-identical prompts.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build<S: AsRef<str>>(question: &str, passages: &[S]) -> String {
        let context_len: usize = passages.iter().map(|p| p.as_ref().len() + 3).sum();
        let mut prompt =
            String::with_capacity(INSTRUCTIONS.len() + context_len + question.len() + 32);

        prompt.push_str(INSTRUCTIONS);
        prompt.push_str("\n\nContext:\n");
        for passage in passages {
            prompt.push_str("- ");
            prompt.push_str(passage.as_ref());
            prompt.push('\n');
        }
        prompt.push_str("\nQuestion: ");
        prompt.push_str(question);
        prompt.push_str("\n\nAnswer:");

        prompt
    }
}
