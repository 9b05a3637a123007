//! Tests for suggestion providers and the error-swallowing boundary

use super::*;
use crate::config::{OpenAiConfig, SuggestConfig};
use proptest::prelude::*;

fn canned() -> SuggestionProvider {
    SuggestionProvider::Canned(CannedProvider::default())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn suggest(text: &str) -> String {
    block_on(get_suggestion(&canned(), &SuggestionContext::new(text)))
}

#[test]
fn test_hello_completes_world() {
    assert_eq!(suggest("hello"), " world");
}

#[test]
fn test_uses_last_word_case_insensitively() {
    assert_eq!(suggest("Let me write an Intro"), "duction");
    assert_eq!(suggest("for EXAM"), "ple");
    assert_eq!(suggest("please write"), " more details");
}

#[test]
fn test_two_chars_is_empty() {
    assert_eq!(suggest("ab"), "");
}

#[test]
fn test_short_last_word_is_empty() {
    assert_eq!(suggest("hello a"), "");
}

#[test]
fn test_whitespace_only_is_empty() {
    assert_eq!(suggest("      "), "");
}

#[test]
fn test_unknown_word_gets_filler() {
    assert_eq!(suggest("something"), canned::GENERIC_FILLER);
}

#[test]
fn test_trailing_space_still_uses_last_word() {
    assert_eq!(suggest("hello "), " world");
}

#[test]
fn test_below_floor_counts_trimmed_chars() {
    assert!(below_floor("  ab  ", 3));
    assert!(!below_floor(" abc", 3));
    assert!(below_floor("", 3));
}

#[test]
fn test_from_config_canned_by_default() {
    let provider = SuggestionProvider::from_config(&SuggestConfig::default()).unwrap();
    assert!(matches!(provider, SuggestionProvider::Canned(_)));
}

#[test]
fn test_from_config_openai_with_key() {
    let config = SuggestConfig {
        provider: ProviderType::OpenAi,
        openai: OpenAiConfig {
            api_key: Some("sk-abc".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let provider = SuggestionProvider::from_config(&config).unwrap();
    match provider {
        SuggestionProvider::Completion(client) => assert_eq!(client.model(), "gpt-4o-mini"),
        other => panic!("expected completion client, got {:?}", other),
    }
}

#[test]
fn test_from_config_openai_empty_model_is_not_configured() {
    let config = SuggestConfig {
        provider: ProviderType::OpenAi,
        openai: OpenAiConfig {
            api_key: Some("sk-abc".to_string()),
            model: "  ".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = SuggestionProvider::from_config(&config).unwrap_err();
    assert!(matches!(err, SuggestError::NotConfigured(_)));
}

#[test]
fn test_provider_failure_becomes_empty_string() {
    let provider = SuggestionProvider::Completion(CompletionClient::new(
        "k".into(),
        "m".into(),
        Some("http://127.0.0.1:9".into()),
        8,
    ));
    let text = block_on(get_suggestion(
        &provider,
        &SuggestionContext::new("a long enough prompt"),
    ));
    assert_eq!(text, "");
}

#[test]
fn test_error_messages() {
    let err = SuggestError::Api {
        code: 401,
        message: "bad key".to_string(),
    };
    assert_eq!(err.to_string(), "API error (401): bad key");
    assert_eq!(
        SuggestError::Network("refused".into()).to_string(),
        "Network error: refused"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Input under the minimum length (after trimming) never produces a suggestion
    #[test]
    fn prop_short_input_is_empty(core in "[a-zA-Z]{0,2}", pad_left in " {0,4}", pad_right in " {0,4}") {
        let text = format!("{}{}{}", pad_left, core, pad_right);
        prop_assert_eq!(suggest(&text), "");
    }

    // The canned provider is total: it returns for any input without panicking
    #[test]
    fn prop_canned_is_total(text in "\\PC{0,40}") {
        let _ = suggest(&text);
    }
}
