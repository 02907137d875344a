// Integration tests for the study guide exporter
// The produced bytes are parsed back with lopdf to verify the layout content

use lopdf::Document;

use termscan::export::{file_name, render_with_date, wrap_text};
use termscan::model::{AnalysisResult, Definition, Theme};

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        title: "Thermodynamics Basics".to_string(),
        summary: "Intro to heat and energy.".to_string(),
        definitions: vec![Definition {
            term: "Entropy".to_string(),
            definition: "A measure of disorder.".to_string(),
            context: Some("The entropy of the universe increases.".to_string()),
        }],
    }
}

fn extract_all_text(bytes: &[u8]) -> String {
    let doc = Document::load_mem(bytes).expect("exported bytes should be a valid PDF");
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages).expect("text extraction should succeed")
}

#[test]
fn file_name_collapses_whitespace_runs() {
    assert_eq!(file_name("Thermodynamics Basics"), "Thermodynamics_Basics_Study_Guide.pdf");
    assert_eq!(file_name("A  B"), "A_B_Study_Guide.pdf");
    assert_eq!(file_name("  padded  "), "_padded__Study_Guide.pdf");
    assert_eq!(file_name("tab\there"), "tab_here_Study_Guide.pdf");
}

#[test]
fn file_name_for_empty_title_keeps_the_suffix() {
    assert_eq!(file_name(""), "_Study_Guide.pdf");
}

#[test]
fn export_contains_header_title_date_and_rows() {
    let bytes = render_with_date(&sample_result(), Theme::Light, "Generated on May 1, 2026")
        .expect("render should succeed");
    let text = extract_all_text(&bytes);

    assert!(text.contains("TERMSCAN"));
    assert!(text.contains("Thermodynamics Basics"));
    assert!(text.contains("Generated on May 1, 2026"));
    assert!(text.contains("Intro to heat and energy."));
    assert!(text.contains("Term"));
    assert!(text.contains("Definition"));
    assert!(text.contains("Entropy"));
    assert!(text.contains("A measure of disorder."));
}

#[test]
fn context_never_leaks_into_the_export() {
    let bytes = render_with_date(&sample_result(), Theme::Light, "Generated on May 1, 2026")
        .expect("render should succeed");
    let text = extract_all_text(&bytes);

    assert!(!text.contains("entropy of the universe"));
}

#[test]
fn every_definition_appears_in_input_order() {
    let definitions: Vec<Definition> = (0..10)
        .map(|i| Definition {
            term: format!("Term{:02}", i),
            definition: format!("Meaning number {:02}.", i),
            context: None,
        })
        .collect();
    let result = AnalysisResult {
        title: "Ordered".to_string(),
        summary: "Order check.".to_string(),
        definitions,
    };

    let bytes = render_with_date(&result, Theme::Light, "Generated on May 1, 2026").unwrap();
    let text = extract_all_text(&bytes);

    let mut last = 0;
    for i in 0..10 {
        let pos = text
            .find(&format!("Term{:02}", i))
            .unwrap_or_else(|| panic!("Term{:02} missing from export", i));
        assert!(pos >= last, "rows must keep input order");
        last = pos;
    }
}

#[test]
fn empty_definitions_still_renders_a_document() {
    let result = AnalysisResult {
        title: "Blank".to_string(),
        summary: "Nothing found.".to_string(),
        definitions: Vec::new(),
    };

    let bytes = render_with_date(&result, Theme::Light, "Generated on May 1, 2026").unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn long_tables_paginate_and_repeat_the_header() {
    let definitions: Vec<Definition> = (0..80)
        .map(|i| Definition {
            term: format!("Concept {}", i),
            definition: "A reasonably short explanation line.".to_string(),
            context: None,
        })
        .collect();
    let result = AnalysisResult {
        title: "Long Set".to_string(),
        summary: "Many rows.".to_string(),
        definitions,
    };

    let bytes = render_with_date(&result, Theme::Dark, "Generated on May 1, 2026").unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert!(doc.get_pages().len() >= 2, "80 rows must not fit one page");

    // Header row repeats on the second page
    let second_page = doc.extract_text(&[2]).unwrap();
    assert!(second_page.contains("Term"));
    assert!(second_page.contains("Definition"));
}

#[test]
fn dark_theme_renders_a_parsable_document() {
    let bytes = render_with_date(&sample_result(), Theme::Dark, "Generated on May 1, 2026").unwrap();
    let text = extract_all_text(&bytes);
    assert!(text.contains("Entropy"));
}

#[test]
fn wrap_text_splits_on_the_estimated_width() {
    let lines = wrap_text("alpha beta gamma delta epsilon", 11.0, 80.0);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(!line.is_empty());
    }
    // Nothing lost in the wrap
    assert_eq!(lines.join(" "), "alpha beta gamma delta epsilon");
}

#[test]
fn wrap_text_keeps_an_oversized_word_on_its_own_line() {
    let lines = wrap_text("supercalifragilisticexpialidocious", 11.0, 20.0);
    assert_eq!(lines, vec!["supercalifragilisticexpialidocious".to_string()]);
}

#[test]
fn wrap_text_of_empty_string_is_empty() {
    assert!(wrap_text("", 11.0, 100.0).is_empty());
    assert!(wrap_text("   ", 11.0, 100.0).is_empty());
}
