//! Prompt templating for the retrieval chain.

/// Chat-template control tokens that must never reach the model from user
/// or document text.
const CONTROL_TOKENS: [&str; 6] = [
    "<|im_start|>",
    "<|im_end|>",
    "<|system|>",
    "<|user|>",
    "<|assistant|>",
    "<|endoftext|>",
];

pub const DEFAULT_TEMPLATE: &str = "\
You are DocSentry, an AI compliance and data-security analyst built on a Retrieval-Augmented Generation (RAG) framework.
Analyze the provided context and detect sensitive information (PII, PHI, financial, or confidential data).

Follow these strict rules:
1. Only use the given context. Make no assumptions.
2. Quote each sensitive data item and explain why it is sensitive.
3. Avoid false positives like invoice IDs or random numbers.
4. If none found, reply: \"No sensitive information matching the request was found in the provided context.\"

Context:
{context}

User Query:
{question}

Your Analysis:
";

/// Strip chat-template control tokens from text destined for a prompt.
///
/// Removal repeats until nothing changes, so a token split around another
/// token cannot reassemble.
pub fn sanitize_for_prompt(text: &str) -> String {
    let mut out = text.to_string();
    loop {
        let mut next = out.clone();
        for token in CONTROL_TOKENS {
            if next.contains(token) {
                next = next.replace(token, "");
            }
        }
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Fill `{context}` and `{question}` in `template`. Context goes in first so a
/// question containing the literal `{context}` is not expanded.
pub fn render(template: &str, context: &str, question: &str) -> String {
    match template.split_once("{question}") {
        Some((before, after)) => format!(
            "{}{}{}",
            before.replace("{context}", context),
            question,
            after.replace("{context}", context)
        ),
        None => template.replace("{context}", context),
    }
}
