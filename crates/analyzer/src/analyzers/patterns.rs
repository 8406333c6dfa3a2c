//! Design-pattern signatures found in raw text.

/// A textual signature and the pattern it indicates
struct Signature {
    pattern: &'static str,
    matches: fn(&str) -> bool,
}

const SIGNATURES: &[Signature] = &[
    Signature {
        pattern: "Constructor Pattern",
        matches: constructor,
    },
    Signature {
        pattern: "Property Pattern",
        matches: property,
    },
    Signature {
        pattern: "Context Manager Pattern",
        matches: context_manager,
    },
    Signature {
        pattern: "Generator Pattern",
        matches: generator,
    },
];

/// `__init__` that assigns instance state
pub fn constructor(text: &str) -> bool {
    text.contains("def __init__") && text.contains("self.")
}

pub fn property(text: &str) -> bool {
    text.contains("@property")
}

/// Both halves of the context-manager protocol
pub fn context_manager(text: &str) -> bool {
    text.contains("def __enter__") && text.contains("def __exit__")
}

pub fn generator(text: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word == "yield")
}

/// Patterns present in `text`, each listed once in a fixed order
pub fn detect(text: &str) -> Vec<String> {
    SIGNATURES
        .iter()
        .filter(|signature| (signature.matches)(text))
        .map(|signature| signature.pattern.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_each_pattern_once() {
        let code = r#"class Pool:
    def __init__(self):
        self.items = []

    def __enter__(self):
        return self

    def __exit__(self, *exc):
        self.items.clear()

    @property
    def size(self):
        return len(self.items)

    def drain(self):
        while self.items:
            yield self.items.pop()
        yield None
"#;
        assert_eq!(
            detect(code),
            vec![
                "Constructor Pattern",
                "Property Pattern",
                "Context Manager Pattern",
                "Generator Pattern"
            ]
        );
    }

    #[test]
    fn partial_signatures_do_not_match() {
        assert!(!constructor("def __init__(cls):\n    pass"));
        assert!(!context_manager("def __enter__(self):\n    return self"));
        assert!(!generator("yielded = 1"));
        assert!(detect("def f():\n    return 1").is_empty());
    }
}
