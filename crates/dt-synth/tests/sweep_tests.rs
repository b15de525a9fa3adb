#[cfg(test)]
mod sweep_tests {
    use dt_synth::{apply_edits, Documenter, Language, SkipReason, Span};

    const MODULE: &str = r#"import { x } from "y";

export class Greeter {
  private name: string;

  constructor(name: string) {
    this.name = name;
  }

  greet(greeting = "Hello"): string {
    return `${greeting}, ${this.name}`;
  }
}

export interface Named {
  name: string;
}

enum Mood {
  Happy,
  Sad,
}

const shout = (s: string) => s.toUpperCase();
"#;

    const MODULE_DOCUMENTED: &str = r#"import { x } from "y";

/**
 *
 * @class Greeter
 */
export class Greeter {
  /**
   *
   * @type {string}
   */
  private name: string;

  /**
   *
   * @param {string} name
   */
  constructor(name: string) {
    this.name = name;
  }

  /**
   *
   * @param [greeting="Hello"]
   * @returns {string}
   */
  greet(greeting = "Hello"): string {
    return `${greeting}, ${this.name}`;
  }
}

/**
 *
 * @interface Named
 */
export interface Named {
  /**
   *
   * @type {string}
   */
  name: string;
}

/**
 *
 * @enum
 */
enum Mood {
  /** */
  Happy,
  /** */
  Sad,
}

/**
 *
 * @param {string} s
 */
const shout = (s: string) => s.toUpperCase();
"#;

    #[test]
    fn whole_file_in_document_order() {
        let outcome = Documenter::default()
            .document_everything(MODULE, Language::TypeScript, None, false)
            .unwrap();
        assert_eq!(outcome.report.documented, 10);
        assert_eq!(outcome.report.total_skipped(), 0);
        let starts: Vec<_> = outcome.edits.iter().map(|e| e.start().line).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);

        let out = apply_edits(MODULE, &outcome.edits).unwrap();
        assert_eq!(out, MODULE_DOCUMENTED);
    }

    #[test]
    fn second_sweep_produces_nothing() {
        let documenter = Documenter::default();
        let outcome = documenter
            .document_everything(MODULE_DOCUMENTED, Language::TypeScript, None, true)
            .unwrap();
        assert!(outcome.edits.is_empty());
        assert_eq!(outcome.report.up_to_date, 10);

        let outcome = documenter
            .document_everything(MODULE_DOCUMENTED, Language::TypeScript, None, false)
            .unwrap();
        assert!(outcome.edits.is_empty());
        assert_eq!(outcome.report.skipped[&SkipReason::AlreadyDocumented], 10);
    }

    fn numbered_file() -> String {
        let mut lines: Vec<String> = (0..19).map(|i| format!("// line {i}")).collect();
        lines.extend(
            [
                "function inside(a) {",
                "  return a;",
                "  // straddles the end of the range",
                "}",
                "",
                "",
                "function outside(b) {",
                "  b += 1;",
                "  b += 2;",
                "  b += 3;",
                "  return b;",
                "}",
            ]
            .map(String::from),
        );
        lines.join("\n") + "\n"
    }

    #[test]
    fn bounds_include_only_nodes_starting_inside() {
        let source = numbered_file();
        let outcome = Documenter::default()
            .document_everything(&source, Language::JavaScript, Some(Span::lines(10, 20)), false)
            .unwrap();
        assert_eq!(outcome.edits.len(), 1);
        assert_eq!(outcome.edits[0].start().line, 19);
        assert_eq!(outcome.report.skipped[&SkipReason::OutsideBounds], 1);
    }

    #[test]
    fn bounds_far_away_produce_nothing() {
        let source = numbered_file();
        let outcome = Documenter::default()
            .document_everything(&source, Language::JavaScript, Some(Span::lines(0, 10)), false)
            .unwrap();
        assert!(outcome.edits.is_empty());
    }

    #[test]
    fn nodes_sharing_a_line_are_skipped() {
        let source = "function a() {} function b() {}\nconst f = () => 1, g = () => 2;\n";
        let outcome = Documenter::default()
            .document_everything(source, Language::JavaScript, None, false)
            .unwrap();
        assert_eq!(outcome.report.visited, 3);
        assert_eq!(outcome.report.documented, 2);
        assert_eq!(outcome.report.skipped[&SkipReason::SharedLine], 1);
    }

    #[test]
    fn overwrite_refreshes_stale_blocks() {
        let source = "/**\n * Old.\n * @param gone\n */\nfunction f(a) {}\n\n/** Fresh. */\nconst g = () => 1;\n";
        let documenter = Documenter::default();

        let keep = documenter
            .document_everything(source, Language::JavaScript, None, false)
            .unwrap();
        assert!(keep.edits.is_empty());

        let refreshed = documenter
            .document_everything(source, Language::JavaScript, None, true)
            .unwrap();
        assert_eq!(refreshed.report.documented, 1);
        assert_eq!(refreshed.report.up_to_date, 1);
        let out = apply_edits(source, &refreshed.edits).unwrap();
        assert_eq!(
            out,
            "/**\n * Old.\n * @param a\n */\nfunction f(a) {}\n\n/** Fresh. */\nconst g = () => 1;\n"
        );
    }

    #[test]
    fn anonymous_default_exports_are_documented() {
        let source = "export default class extends Base {\n  run(a) {}\n}\n";
        let outcome = Documenter::default()
            .document_everything(source, Language::JavaScript, None, false)
            .unwrap();
        assert_eq!(outcome.report.documented, 2);
        let out = apply_edits(source, &outcome.edits).unwrap();
        assert_eq!(
            out,
            "/**\n *\n * @class\n * @extends {Base}\n */\nexport default class extends Base {\n  /**\n   *\n   * @param a\n   */\n  run(a) {}\n}\n"
        );

        let source = "export default function (a, b) {}\n";
        let outcome = Documenter::default()
            .document_everything(source, Language::JavaScript, None, false)
            .unwrap();
        assert_eq!(outcome.report.visited, 1);
        assert_eq!(outcome.edits.len(), 1);
    }

    #[test]
    fn jsx_components() {
        let source = "export function App({ title }) {\n  return <h1>{title}</h1>;\n}\n";
        let outcome = Documenter::default()
            .document_everything(source, Language::JavaScriptReact, None, false)
            .unwrap();
        let out = apply_edits(source, &outcome.edits).unwrap();
        assert_eq!(out, format!("/**\n *\n * @param args\n */\n{source}"));
    }
}
