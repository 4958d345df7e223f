//! Prompt templates for snippet analysis.
//!
//! Each [`PromptMode`] maps to one pure builder function. All of them embed
//! the same response shape in the system message; the reply is parsed by
//! [`super::normalize`].

use crate::models::{Message, PromptMode, Study};

/// Objective used when the caller does not supply one.
pub const DEFAULT_OBJECTIVE: &str =
    "Understand the participant's needs, pain points, and opportunities.";

/// JSON shape every mode asks the model to return.
pub const RESPONSE_SHAPE: &str = r#"{
  "summary": "...",
  "themes": [
    { "title": "...", "description": "..." },
    { "title": "...", "description": "..." },
    { "title": "...", "description": "..." }
  ]
}"#;

/// Fence placed around the snippet. Not escaped inside the snippet.
const FENCE: &str = r#"""""#;

const RESEARCHER_FRAMING: &str = r#"Act as a senior user researcher preparing findings for a product decision meeting.
- Stay faithful to what the participant actually said. Do not invent facts, numbers, or feelings that are not in the snippet.
- Phrase every insight so a product team could act on it.
- Keep only what is relevant to the persona and research objective above."#;

/// Build the ordered message list for a snippet.
///
/// Pure: identical arguments always produce identical messages. The snippet
/// is embedded verbatim.
pub fn build(
    mode: PromptMode,
    study_title: &str,
    persona: &str,
    objective: Option<&str>,
    snippet: &str,
) -> Vec<Message> {
    let objective = objective
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .unwrap_or(DEFAULT_OBJECTIVE);

    match mode {
        PromptMode::Default => build_default(study_title, persona, objective, snippet),
        PromptMode::Researcher => build_researcher(study_title, persona, objective, snippet),
        PromptMode::Stepwise => build_stepwise(study_title, persona, objective, snippet),
    }
}

/// Build messages using a catalog study's title and persona.
pub fn build_for_study(
    mode: PromptMode,
    study: &Study,
    objective: Option<&str>,
    snippet: &str,
) -> Vec<Message> {
    build(mode, &study.title, &study.persona, objective, snippet)
}

fn build_default(title: &str, persona: &str, objective: &str, snippet: &str) -> Vec<Message> {
    let user = format!(
        "{snippet}\n\n\
         1) Summarize this snippet in 2 concise sentences.\n\
         2) Extract exactly 3 key themes or insights, each with a short title and a one-sentence description.\n\n\
         Return only the JSON object described above.",
        snippet = fenced(snippet),
    );

    vec![
        Message::system(base_system(title, persona, objective)),
        Message::user(user),
    ]
}

fn build_researcher(title: &str, persona: &str, objective: &str, snippet: &str) -> Vec<Message> {
    let system = format!(
        "{base}\n\n{framing}",
        base = base_system(title, persona, objective),
        framing = RESEARCHER_FRAMING,
    );

    let user = format!(
        "{snippet}\n\n\
         1) Write a decision-ready summary of exactly 2 sentences. \
         Sentence 1 states the participant's overall sentiment. \
         Sentence 2 names the most important problems or opportunities.\n\
         2) Extract exactly 3 themes that are specific to this snippet. \
         Reject generic phrasing such as \"usability issues\", \"user experience\" or \"needs improvement\"; \
         each title must name the concrete problem or opportunity, and each description must say why it matters for the objective.\n\n\
         Return only the JSON object described above.",
        snippet = fenced(snippet),
    );

    vec![Message::system(system), Message::user(user)]
}

fn build_stepwise(title: &str, persona: &str, objective: &str, snippet: &str) -> Vec<Message> {
    let user = format!(
        "{snippet}\n\n\
         Work in two stages.\n\
         Stage 1: privately list 5-8 observations from the snippet. Each observation must be a near-verbatim quote or a very close paraphrase of what the participant said.\n\
         Stage 2: using only those observations, write a 2-sentence summary and derive exactly 3 themes.\n\n\
         Do NOT include the observations in your final answer. \
         Your final answer must be the JSON object only, with no preamble, markdown, or explanation.",
        snippet = fenced(snippet),
    );

    vec![
        Message::system(base_system(title, persona, objective)),
        Message::user(user),
    ]
}

/// System message shared by every mode.
fn base_system(title: &str, persona: &str, objective: &str) -> String {
    format!(
        "You are an expert research analyst helping product teams interpret user interviews.\n\n\
         Study: {title}\n\
         Persona: {persona}\n\
         Research objective: {objective}\n\n\
         Always respond with a single JSON object using exactly this shape:\n\
         {shape}\n\
         The \"themes\" array must contain exactly 3 objects, each with a \"title\" and a \"description\".",
        shape = RESPONSE_SHAPE,
    )
}

fn fenced(snippet: &str) -> String {
    format!("Interview snippet:\n{FENCE}\n{snippet}\n{FENCE}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    const SNIPPET: &str = "I love the product, but the checkout always times out on mobile…";

    fn build_all() -> Vec<(PromptMode, Vec<Message>)> {
        PromptMode::ALL
            .iter()
            .map(|&mode| {
                (
                    mode,
                    build(mode, "Checkout", "Frequent online shoppers", None, SNIPPET),
                )
            })
            .collect()
    }

    #[test]
    fn test_build_is_deterministic() {
        for mode in PromptMode::ALL {
            let a = build(mode, "T", "P", Some("O"), SNIPPET);
            let b = build(mode, "T", "P", Some("O"), SNIPPET);
            assert_eq!(a, b, "mode {} not deterministic", mode);
        }
    }

    #[test]
    fn test_system_then_user() {
        for (mode, messages) in build_all() {
            let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
            assert_eq!(roles, vec![Role::System, Role::User], "mode {}", mode);
        }
    }

    #[test]
    fn test_snippet_embedded_verbatim() {
        let tricky = "line one\n  \"quoted\" {braces} \\ backslash\n\u{1F600} and a \"\"\" fence";
        for mode in PromptMode::ALL {
            let messages = build(mode, "T", "P", None, tricky);
            assert!(
                messages[1].content.contains(tricky),
                "mode {} altered snippet",
                mode
            );
            assert!(messages[1].content.contains("\"\"\"\n"));
        }
    }

    #[test]
    fn test_response_shape_in_every_system_message() {
        for (mode, messages) in build_all() {
            let system = &messages[0].content;
            assert!(system.contains(RESPONSE_SHAPE), "mode {}", mode);
            assert!(system.contains("Study: Checkout"));
            assert!(system.contains("Persona: Frequent online shoppers"));
        }
    }

    #[test]
    fn test_objective_placeholder() {
        let messages = build(PromptMode::Default, "T", "P", None, SNIPPET);
        assert!(messages[0].content.contains(DEFAULT_OBJECTIVE));

        let blank = build(PromptMode::Default, "T", "P", Some("   "), SNIPPET);
        assert_eq!(messages, blank);

        let custom = build(PromptMode::Default, "T", "P", Some("Reduce churn"), SNIPPET);
        assert!(custom[0].content.contains("Research objective: Reduce churn"));
        assert!(!custom[0].content.contains(DEFAULT_OBJECTIVE));
    }

    #[test]
    fn test_researcher_extends_base_system() {
        let default = build(PromptMode::Default, "T", "P", None, SNIPPET);
        let researcher = build(PromptMode::Researcher, "T", "P", None, SNIPPET);

        assert!(researcher[0].content.starts_with(&default[0].content));
        assert!(researcher[0].content.contains("faithful"));
        assert!(researcher[1].content.contains("exactly 2 sentences"));
        assert!(researcher[1].content.contains("Reject generic phrasing"));
    }

    #[test]
    fn test_stepwise_keeps_base_system() {
        let default = build(PromptMode::Default, "T", "P", None, SNIPPET);
        let stepwise = build(PromptMode::Stepwise, "T", "P", None, SNIPPET);

        assert_eq!(default[0], stepwise[0]);
        assert!(stepwise[1].content.contains("5-8 observations"));
        assert!(stepwise[1].content.contains("Do NOT include the observations"));
        assert!(stepwise[1].content.contains("JSON object only"));
    }

    #[test]
    fn test_modes_differ() {
        let all = build_all();
        assert_ne!(all[0].1, all[1].1);
        assert_ne!(all[0].1, all[2].1);
        assert_ne!(all[1].1, all[2].1);
    }

    #[test]
    fn test_build_for_study() {
        let study = Study::new("1", "Checkout", "desc", "Shoppers");
        assert_eq!(
            build_for_study(PromptMode::Researcher, &study, None, SNIPPET),
            build(PromptMode::Researcher, "Checkout", "Shoppers", None, SNIPPET)
        );
    }
}
