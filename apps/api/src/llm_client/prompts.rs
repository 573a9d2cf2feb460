// Shared prompt fragments. Each generator defines its own prompts alongside
// it (see `content::prompts`); only cross-cutting pieces live here.

/// Appended to every generation prompt so replies parse as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
