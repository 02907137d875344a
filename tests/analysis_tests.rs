// Integration tests for the analysis client's response handling
// Network calls are not exercised; parsing and configuration are

use termscan::analysis::{parse_result_text, AnalysisClient, AnalysisError};

#[test]
fn well_formed_reply_parses_in_order() {
    let reply = r#"{
        "title": "Thermodynamics Basics",
        "summary": "Intro to heat and energy.",
        "definitions": [
            {"term": "Entropy", "definition": "A measure of disorder."},
            {"term": "Enthalpy", "definition": "Total heat content.", "context": "H = U + pV"}
        ]
    }"#;

    let result = parse_result_text(reply).expect("schema-conformant reply must parse");
    assert_eq!(result.title, "Thermodynamics Basics");
    assert_eq!(result.definitions.len(), 2);
    assert_eq!(result.definitions[0].term, "Entropy");
    assert_eq!(result.definitions[0].context, None);
    assert_eq!(result.definitions[1].context.as_deref(), Some("H = U + pV"));
}

#[test]
fn empty_definitions_array_is_valid() {
    let reply = r#"{"title": "Blank", "summary": "Nothing found.", "definitions": []}"#;
    let result = parse_result_text(reply).unwrap();
    assert!(result.definitions.is_empty());
}

#[test]
fn empty_reply_is_an_empty_response_error() {
    assert!(matches!(parse_result_text(""), Err(AnalysisError::EmptyResponse)));
    assert!(matches!(parse_result_text("  \n"), Err(AnalysisError::EmptyResponse)));
}

#[test]
fn non_json_reply_is_malformed() {
    let err = parse_result_text("I could not find any terms.").unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[test]
fn missing_required_field_is_malformed() {
    // No repair is attempted on a schema violation
    let reply = r#"{"title": "Only a title"}"#;
    let err = parse_result_text(reply).unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[test]
fn definition_missing_its_term_is_malformed() {
    let reply = r#"{
        "title": "T",
        "summary": "S",
        "definitions": [{"definition": "orphaned"}]
    }"#;
    assert!(matches!(
        parse_result_text(reply),
        Err(AnalysisError::MalformedResponse(_))
    ));
}

#[test]
fn empty_api_key_is_a_configuration_error() {
    let err = AnalysisClient::new(String::new()).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingApiKey));
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn configured_client_builds() {
    assert!(AnalysisClient::new("test-key".to_string()).is_ok());
}
