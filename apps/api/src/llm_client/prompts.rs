pub const SUMMARIZE_SYSTEM: &str = "You are an assistant for an auto-insurance claims team. \
You write short, factual summaries of accident reports. You never invent details \
that are not in the report.";

pub const SUMMARIZE_PROMPT: &str = r#"Summarize the following accident description in 2-3 sentences.

Keep every concrete fact (vehicles, locations, times, damage, injuries) so the
summary can later be cross-checked against photos of the damage. Do not add
speculation or advice.

Accident description:
{description}"#;
