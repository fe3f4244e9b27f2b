// Shared prompt fragments.
// Each module that talks to the model defines its own prompts.rs alongside it;
// this file holds the pieces every prompt reuses.

/// Enforces JSON-only output on top of the response schema.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the voice human and plain.
pub const PLAIN_LANGUAGE_INSTRUCTION: &str = "Use everyday, simple language. \
    Do not sound automated. \
    Do not mention the app, the system, or that you are an AI.";
