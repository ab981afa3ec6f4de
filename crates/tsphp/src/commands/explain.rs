//! Explain command - explain diagnostic codes

use anyhow::{anyhow, Result};
use clap::Args;

use crate::{Output, OutputFormat};

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Diagnostic code to explain (e.g., U101)
    pub code: String,
}

struct CodeExplanation {
    code: &'static str,
    title: &'static str,
    description: &'static str,
    example: Option<&'static str>,
    suggestion: Option<&'static str>,
    related: &'static [&'static str],
}

const EXPLANATIONS: &[CodeExplanation] = &[
    CodeExplanation {
        code: "P001",
        title: "Parse Error",
        description: "The TypeScript parser encountered invalid syntax. A fatal error stops the file from being transpiled; recoverable errors are reported as warnings.",
        example: Some("const x = ;  // Missing value"),
        suggestion: Some("Fix the syntax error; tsphp only accepts code that tsc would parse."),
        related: &[],
    },
    CodeExplanation {
        code: "U001",
        title: "Unsupported Statement",
        description: "This statement or declaration has no PHP translation and was skipped. Imports and export lists are reported as warnings since the module system is left to the PHP autoloader.",
        example: Some("enum Color { Red, Green }"),
        suggestion: Some("Replace enums with class constants and keep module wiring on the PHP side."),
        related: &["U002"],
    },
    CodeExplanation {
        code: "U002",
        title: "Unsupported Expression",
        description: "This expression has no PHP translation. `null` was written in its place so the rest of the file still prints.",
        example: Some("const re = /a+b/;"),
        suggestion: Some("Move the logic into a PHP helper, or rewrite it with supported constructs."),
        related: &["U001", "U003"],
    },
    CodeExplanation {
        code: "U003",
        title: "Unsupported Operator",
        description: "The operator has no PHP counterpart, or the `in` operator appeared where its value is discarded.",
        example: Some("const t = typeof value;"),
        suggestion: Some("Use an explicit check such as `value instanceof Foo` or a helper function."),
        related: &["U002"],
    },
    CodeExplanation {
        code: "U101",
        title: "Unsupported Object Method",
        description: r#"Only Object.assign, Object.keys, Object.values and Object.freeze are translated.

Plain objects become PHP associative arrays, so the supported statics map onto
array_merge, array_keys and array_values. Other Object statics have no array
equivalent that preserves their meaning."#,
        example: Some("const pairs = Object.entries(row);"),
        suggestion: Some(r#"Rewrite with the supported statics:

const pairs = Object.keys(row).map((k) => [k, row[k]]);"#),
        related: &["U102"],
    },
    CodeExplanation {
        code: "U102",
        title: "Prototype Access",
        description: "PHP classes have no prototype object, so reading or extending `X.prototype` cannot be translated.",
        example: Some("User.prototype.greet = function () { ... };"),
        suggestion: Some("Declare the method inside the class body."),
        related: &["U101"],
    },
    CodeExplanation {
        code: "I001",
        title: "Internal Error",
        description: "The transpiler hit a state it does not expect. This is a bug in tsphp.",
        example: None,
        suggestion: Some("Run again with -vvv and report the input that triggered it."),
        related: &[],
    },
];

fn paint(text: &str, ansi: &str, use_color: bool) -> String {
    if use_color {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn run(args: ExplainArgs, output: Output) -> Result<()> {
    let code = args.code.to_uppercase();

    let explanation = EXPLANATIONS
        .iter()
        .find(|e| e.code == code)
        .ok_or_else(|| anyhow!("Unknown diagnostic code: {}", code))?;

    match output.format {
        OutputFormat::Text => {
            let color = output.use_color;
            println!(
                "\n{}: {}\n{}",
                paint(&code, "1;36", color),
                paint(explanation.title, "1", color),
                "=".repeat(code.len() + explanation.title.len() + 2)
            );

            println!("\n{}\n", explanation.description);

            if let Some(example) = explanation.example {
                println!("{}:", paint("Example", "1", color));
                for line in example.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if let Some(suggestion) = explanation.suggestion {
                println!("{}:", paint("Suggestion", "1;32", color));
                for line in suggestion.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if !explanation.related.is_empty() {
                println!(
                    "{}: {}",
                    paint("Related", "2", color),
                    explanation.related.join(", ")
                );
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "code": explanation.code,
                "title": explanation.title,
                "description": explanation.description,
                "example": explanation.example,
                "suggestion": explanation.suggestion,
                "related": explanation.related,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsphp_diagnostics::DiagnosticCode;

    #[test]
    fn test_every_code_is_explained() {
        for code in DiagnosticCode::ALL {
            assert!(
                EXPLANATIONS.iter().any(|e| e.code == code.as_str()),
                "missing explanation for {}",
                code.as_str()
            );
        }
    }

    #[test]
    fn test_related_codes_exist() {
        for explanation in EXPLANATIONS {
            for related in explanation.related {
                assert!(DiagnosticCode::from_code_str(related).is_some(), "{related}");
            }
        }
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("x", "1", false), "x");
        assert_eq!(paint("x", "1", true), "\x1b[1mx\x1b[0m");
    }
}
