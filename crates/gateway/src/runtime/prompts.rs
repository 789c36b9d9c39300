//! Prompt construction for the three generation steps of a turn.

use mitra_domain::chat::{ChatMessage, Lang, Sender};
use mitra_domain::wellness::{MetricsSample, ScreeningSample};

/// Render the transcript as `user:`/`bot:` lines for the reply prompt.
fn render_history(transcript: &[ChatMessage]) -> String {
    transcript
        .iter()
        .map(|m| {
            let who = match m.sender {
                Sender::User => "user",
                Sender::Bot => "bot",
            };
            format!("{who}: {}", m.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Persona + full-history prompt for the conversational reply.
pub fn reply_prompt(transcript: &[ChatMessage], message: &str, lang: Lang) -> String {
    let language = lang.display_name();
    let history = render_history(transcript);
    format!(
        "You are a friendly, empathetic therapist chatbot. Respond in {language}.\n\
         \n\
         Context: You are helping with mental health support and emotional well-being.\n\
         User's language preference: {language}\n\
         \n\
         Conversation so far:\n\
         {history}\n\
         \n\
         User just said: \"{message}\"\n\
         \n\
         Guidelines:\n\
         - Be empathetic, supportive, and non-judgmental\n\
         - Use appropriate therapeutic language\n\
         - Keep responses concise but meaningful\n\
         - Ask follow-up questions when appropriate\n\
         - Provide practical suggestions when helpful\n\
         - Always maintain a professional yet warm tone\n\
         \n\
         Respond naturally and therapeutically in {language}:"
    )
}

/// Strict-JSON extraction prompt for metrics and screening estimates.
/// Deliberately sees only the latest user message, not the transcript.
pub fn metrics_prompt(message: &str) -> String {
    format!(
        "Analyze the user's emotional state and mental health indicators from their message.\n\
         User message: \"{message}\"\n\
         Respond ONLY in strict JSON format with exact keys:\n\
         {{\n\
           \"metrics\": {{\n\
             \"stress_level\": number (0-50),\n\
             \"happiness_level\": number (0-50),\n\
             \"anxiety_level\": number (0-50),\n\
             \"overall_mood_level\": number (0-50)\n\
           }},\n\
           \"screening\": {{\n\
             \"phq9_score\": number (0-27),\n\
             \"gad7_score\": number (0-21),\n\
             \"ghq_score\": number (0-36),\n\
             \"risk_level\": string (\"low\", \"moderate\", \"high\")\n\
           }}\n\
         }}"
    )
}

/// Task-suggestion prompt, fed the message plus the (possibly fallback)
/// metrics and screening output of the extraction step.
pub fn tasks_prompt(
    message: &str,
    metrics: &MetricsSample,
    screening: &ScreeningSample,
    lang: Lang,
) -> String {
    let language = lang.display_name();
    let metrics_json = serde_json::to_string(metrics).unwrap_or_else(|_| "{}".into());
    let screening_json = serde_json::to_string(screening).unwrap_or_else(|_| "{}".into());
    format!(
        "You are a wellness assistant.\n\
         Based on the conversation and mental health metrics, suggest 5-10 actionable, personalized tasks.\n\
         \n\
         User message: \"{message}\"\n\
         Metrics: {metrics_json}\n\
         Screening: {screening_json}\n\
         \n\
         Respond ONLY in strict JSON format:\n\
         {{\n\
           \"todos\": [\n\
             {{\n\
               \"title\": \"string (task description)\",\n\
               \"completed\": false,\n\
               \"priority\": \"low|medium|high\",\n\
               \"category\": \"self-care|mindfulness|social|physical|professional\"\n\
             }}\n\
           ]\n\
         }}\n\
         \n\
         Guidelines:\n\
         - Make tasks specific and actionable\n\
         - Consider the user's emotional state\n\
         - Include a mix of immediate and longer-term tasks\n\
         - Prioritize self-care and mental health\n\
         - Keep task titles concise but clear\n\
         - Use appropriate priority levels\n\
         - Respond in {language}"
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_prompt_contains_history_and_language() {
        let transcript = vec![
            ChatMessage::user("I can't sleep", Lang::Hi),
            ChatMessage::bot("Tell me more", Lang::Hi),
        ];
        let prompt = reply_prompt(&transcript, "I can't sleep", Lang::Hi);
        assert!(prompt.contains("user: I can't sleep"));
        assert!(prompt.contains("bot: Tell me more"));
        assert!(prompt.contains("Respond in Hindi"));
    }

    #[test]
    fn metrics_prompt_names_every_bounded_key() {
        let prompt = metrics_prompt("rough week");
        for key in [
            "stress_level",
            "happiness_level",
            "anxiety_level",
            "overall_mood_level",
            "phq9_score",
            "gad7_score",
            "ghq_score",
            "risk_level",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("rough week"));
    }

    #[test]
    fn tasks_prompt_embeds_extraction_output() {
        let metrics = MetricsSample {
            stress_level: 42.0,
            ..Default::default()
        };
        let screening = ScreeningSample::default();
        let prompt = tasks_prompt("overworked", &metrics, &screening, Lang::As);
        assert!(prompt.contains("42"));
        assert!(prompt.contains("Respond in Assamese"));
        assert!(prompt.contains("overworked"));
    }
}
