use super::has_error_handling;
use crate::types::SourceContext;
use once_cell::sync::Lazy;
use regex::Regex;

static CONDITIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|elif)\b").expect("Invalid regex pattern"));

static FALLIBLE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bopen\s*\(|\brequests\.").expect("Invalid regex pattern"));

/// More conditionals than this prompt an edge-case question
const CONDITIONAL_LIMIT: usize = 3;

/// Questions a reviewer would ask the author, in a fixed order
pub fn generate(context: &SourceContext, documented: bool, short_name_threshold: usize) -> Vec<String> {
    let mut questions = Vec::new();
    let name = &context.entity_name;

    if name.chars().count() <= short_name_threshold {
        questions.push(format!(
            "The name '{name}' is quite short. What does it represent?"
        ));
    }

    if !documented {
        questions
            .push("This code lacks documentation. What is its intended purpose and usage?".to_string());
    }

    if has_many_conditionals(&context.source_text) {
        questions.push(
            "This code has multiple conditional branches. Are all edge cases handled correctly?"
                .to_string(),
        );
    }

    if has_unguarded_fallible_call(&context.source_text) {
        questions.push(
            "This code performs operations that might fail. Should error handling be added?"
                .to_string(),
        );
    }

    questions
}

pub fn has_many_conditionals(text: &str) -> bool {
    CONDITIONAL.find_iter(text).count() > CONDITIONAL_LIMIT
}

/// File or network access with no `try:` in sight
pub fn has_unguarded_fallible_call(text: &str) -> bool {
    FALLIBLE_CALL.is_match(text) && !has_error_handling(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::context;
    use pretty_assertions::assert_eq;

    #[test]
    fn asks_every_question_for_terse_code() {
        let code = "def f(p):\n    if p:\n        pass\n    elif p > 1:\n        pass\n    if p < 0:\n        pass\n    if p == 3:\n        open(p)\n";
        let questions = generate(&context(code, "f"), false, 3);
        assert_eq!(
            questions,
            vec![
                "The name 'f' is quite short. What does it represent?",
                "This code lacks documentation. What is its intended purpose and usage?",
                "This code has multiple conditional branches. Are all edge cases handled correctly?",
                "This code performs operations that might fail. Should error handling be added?",
            ]
        );
    }

    #[test]
    fn clean_documented_code_asks_nothing() {
        let code = "def add_numbers(a, b):\n    \"\"\"Add.\"\"\"\n    return a + b\n";
        assert!(generate(&context(code, "add_numbers"), true, 3).is_empty());
    }

    #[test]
    fn identifiers_containing_if_are_not_conditionals() {
        assert!(!has_many_conditionals("notify(); diff = iffy + modifier + clarify"));
    }
}
