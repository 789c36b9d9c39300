//! Static localization catalog for the three supported languages.
//!
//! Strings the *backend* emits (greeting, canned apology, fallback task
//! titles, response labels) live here as typed accessors keyed on
//! [`Lang`]. Anything the model generates is localized by prompting, not
//! by this catalog.

use axum::http::HeaderMap;
use serde_json::{json, Value};

use mitra_domain::chat::Lang;
use mitra_domain::wellness::{TaskCategory, TaskItem, TaskPriority};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Language resolution
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolve the language for a request.
///
/// Priority: explicit `?lang=` parameter, then the session's stored
/// preference, then the `Accept-Language` header's first tag, then
/// English.
pub fn resolve_lang(
    query_lang: Option<&str>,
    session_lang: Option<Lang>,
    headers: &HeaderMap,
) -> Lang {
    if let Some(lang) = query_lang.and_then(Lang::from_tag) {
        return lang;
    }
    if let Some(lang) = session_lang {
        return lang;
    }
    headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(Lang::from_tag)
        .unwrap_or_default()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat strings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session-opening greeting from the bot.
pub fn greeting(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "Hello! I'm your therapist chatbot. How are you feeling today?",
        Lang::Hi => "नमस्ते! मैं आपका थेरेपिस्ट चैटबॉट हूं। आज आप कैसा महसूस कर रहे हैं?",
        Lang::As => "নমস্কাৰ! মই আপোনাৰ থেৰাপিষ্ট চেটবট। আজি আপুনি কেনেকৈ অনুভৱ কৰিছে?",
    }
}

/// Canned apology served when reply generation fails outright.
pub fn generation_error(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "Sorry, I couldn't process that message. Please try again.",
        Lang::Hi => "क्षमा करें, मैं उस संदेश को प्रोसेस नहीं कर सका। कृपया फिर से कोशिश करें।",
        Lang::As => "ক্ষমা কৰিব, মই সেই বাৰ্তাটো প্ৰচেছ কৰিব নোৱাৰিলোঁ। অনুগ্ৰহ কৰি পুনৰ চেষ্টা কৰক।",
    }
}

/// Validation error for an empty chat message.
pub fn empty_message(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "Message cannot be empty",
        Lang::Hi => "संदेश खाली नहीं हो सकता",
        Lang::As => "বাৰ্তা খালী হ'ব নোৱাৰে",
    }
}

/// Quick-start suggestion chips shown alongside the greeting.
pub fn suggestions(lang: Lang) -> Value {
    match lang {
        Lang::En => json!({
            "greeting": "Hi there! How can I help you today?",
            "stress": "I'm feeling stressed and overwhelmed",
            "anxiety": "I'm experiencing anxiety",
            "sadness": "I'm feeling sad and down",
            "sleep": "I'm having trouble sleeping",
            "relationships": "I'm struggling with relationships",
            "work": "I'm having work-related issues",
            "general": "I just need someone to talk to",
        }),
        Lang::Hi => json!({
            "greeting": "नमस्ते! आज मैं आपकी कैसे मदद कर सकता हूं?",
            "stress": "मैं तनावग्रस्त और अभिभूत महसूस कर रहा हूं",
            "anxiety": "मैं चिंता का अनुभव कर रहा हूं",
            "sadness": "मैं उदास और निराश महसूस कर रहा हूं",
            "sleep": "मुझे सोने में परेशानी हो रही है",
            "relationships": "मैं रिश्तों में संघर्ष कर रहा हूं",
            "work": "मुझे काम से जुड़ी समस्याएं हैं",
            "general": "मुझे बस किसी से बात करने की जरूरत है",
        }),
        Lang::As => json!({
            "greeting": "নমস্কাৰ! আজি মই আপোনাক কেনেকৈ সহায় কৰিব পাৰোঁ?",
            "stress": "মই মানসিক চাপ আৰু অতিৰিক্ত ভাৰ অনুভৱ কৰিছোঁ",
            "anxiety": "মই উদ্বেগৰ অভিজ্ঞতা লাভ কৰিছোঁ",
            "sadness": "মই দুখিত আৰু হতাশ অনুভৱ কৰিছোঁ",
            "sleep": "মোৰ টোপনিত সমস্যা হৈছে",
            "relationships": "মই সম্পৰ্কৰ সৈতে সংঘাত কৰিছোঁ",
            "work": "মোৰ কামৰ সৈতে জড়িত সমস্যা আছে",
            "general": "মোক কেৱল কাৰোবাৰ সৈতে কথা পাতিবলৈ প্ৰয়োজন",
        }),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Metric / screening labels
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Display labels attached to metric and screening payloads.
pub fn metric_labels(lang: Lang) -> Value {
    match lang {
        Lang::En => json!({
            "stressLevel": "Stress Level",
            "happinessLevel": "Happiness Level",
            "anxietyLevel": "Anxiety Level",
            "overallMood": "Overall Mood",
            "phq9Score": "Depression Score (PHQ-9)",
            "gad7Score": "Anxiety Score (GAD-7)",
            "ghqScore": "General Health Score (GHQ-12)",
            "riskLevel": "Risk Level",
            "low": "Low",
            "moderate": "Moderate",
            "high": "High",
        }),
        Lang::Hi => json!({
            "stressLevel": "तनाव स्तर",
            "happinessLevel": "खुशी स्तर",
            "anxietyLevel": "चिंता स्तर",
            "overallMood": "समग्र मनोदशा",
            "phq9Score": "अवसाद स्कोर (PHQ-9)",
            "gad7Score": "चिंता स्कोर (GAD-7)",
            "ghqScore": "सामान्य स्वास्थ्य स्कोर (GHQ-12)",
            "riskLevel": "जोखिम स्तर",
            "low": "कम",
            "moderate": "मध्यम",
            "high": "उच्च",
        }),
        Lang::As => json!({
            "stressLevel": "মানসিক চাপৰ স্তৰ",
            "happinessLevel": "সুখৰ স্তৰ",
            "anxietyLevel": "উদ্বেগৰ স্তৰ",
            "overallMood": "সামগ্ৰিক মেজাজ",
            "phq9Score": "বিষণ্নতা স্ক'ৰ (PHQ-9)",
            "gad7Score": "উদ্বেগ স্ক'ৰ (GAD-7)",
            "ghqScore": "সাধাৰণ স্বাস্থ্য স্ক'ৰ (GHQ-12)",
            "riskLevel": "ঝুঁকিৰ স্তৰ",
            "low": "কম",
            "moderate": "মধ্যম",
            "high": "উচ্চ",
        }),
    }
}

/// "No Data" placeholder for empty dashboard charts.
pub fn no_data(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "No Data",
        Lang::Hi => "कोई डेटा नहीं",
        Lang::As => "কোনো তথ্য নাই",
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Todo strings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn todos_generated(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "I've generated some helpful tasks for you based on our conversation.",
        Lang::Hi => "मैंने हमारी बातचीत के आधार पर आपके लिए कुछ उपयोगी कार्य उत्पन्न किए हैं।",
        Lang::As => "মই আমাৰ কথোপকথনৰ ভিত্তিত আপোনাৰ বাবে কিছুমান সহায়ক কাম উৎপাদন কৰিছোঁ।",
    }
}

pub fn todos_none(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "No tasks generated at this time.",
        Lang::Hi => "इस समय कोई कार्य उत्पन्न नहीं हुआ।",
        Lang::As => "এই সময়ত কোনো কাম উৎপাদন হোৱা নাই।",
    }
}

pub fn todo_labels(lang: Lang) -> Value {
    match lang {
        Lang::En => json!({
            "taskTitle": "Task",
            "completed": "Completed",
            "pending": "Pending",
        }),
        Lang::Hi => json!({
            "taskTitle": "कार्य",
            "completed": "पूर्ण",
            "pending": "लंबित",
        }),
        Lang::As => json!({
            "taskTitle": "কাম",
            "completed": "সম্পূৰ্ণ",
            "pending": "বিচাৰাধীন",
        }),
    }
}

/// The two canned tasks substituted when task generation fails.
pub fn fallback_tasks(lang: Lang) -> Vec<TaskItem> {
    let (first, second) = match lang {
        Lang::En => (
            "Take a short mindful walk outside",
            "Write down three things you are grateful for",
        ),
        Lang::Hi => (
            "बाहर थोड़ी देर सचेत होकर टहलें",
            "तीन चीजें लिखें जिनके लिए आप आभारी हैं",
        ),
        Lang::As => (
            "বাহিৰত অলপ সময় মনোযোগেৰে খোজ কাঢ়ক",
            "আপুনি কৃতজ্ঞ হোৱা তিনিটা কথা লিখক",
        ),
    };
    vec![
        TaskItem::new(first, TaskPriority::Medium, TaskCategory::SelfCare),
        TaskItem::new(second, TaskPriority::Medium, TaskCategory::Mindfulness),
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn query_param_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("accept-language", HeaderValue::from_static("as"));
        let lang = resolve_lang(Some("hi"), Some(Lang::As), &headers);
        assert_eq!(lang, Lang::Hi);
    }

    #[test]
    fn session_preference_beats_header() {
        let mut headers = HeaderMap::new();
        headers.insert("accept-language", HeaderValue::from_static("en-US,en;q=0.9"));
        let lang = resolve_lang(None, Some(Lang::Hi), &headers);
        assert_eq!(lang, Lang::Hi);
    }

    #[test]
    fn header_first_tag_used() {
        let mut headers = HeaderMap::new();
        headers.insert("accept-language", HeaderValue::from_static("as-IN,hi;q=0.8"));
        let lang = resolve_lang(None, None, &headers);
        assert_eq!(lang, Lang::As);
    }

    #[test]
    fn defaults_to_english() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_lang(None, None, &headers), Lang::En);

        let mut headers = HeaderMap::new();
        headers.insert("accept-language", HeaderValue::from_static("fr-FR"));
        assert_eq!(resolve_lang(Some("de"), None, &headers), Lang::En);
    }

    #[test]
    fn fallback_tasks_are_always_two() {
        for lang in Lang::all() {
            let tasks = fallback_tasks(lang);
            assert_eq!(tasks.len(), 2);
            assert_eq!(tasks[0].category, TaskCategory::SelfCare);
            assert_eq!(tasks[1].category, TaskCategory::Mindfulness);
            assert!(tasks.iter().all(|t| t.priority == TaskPriority::Medium));
        }
    }

    #[test]
    fn catalogs_are_distinct_per_language() {
        assert_ne!(greeting(Lang::En), greeting(Lang::Hi));
        assert_ne!(greeting(Lang::Hi), greeting(Lang::As));
        assert_ne!(generation_error(Lang::En), generation_error(Lang::As));
    }
}
