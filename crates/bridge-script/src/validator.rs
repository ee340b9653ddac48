use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One dialect-compatibility finding. Advisory only; the bridge never
/// refuses a script because of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialectFinding {
    pub kind: String,
    /// 1-based source line.
    pub line: usize,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub risk_level: RiskLevel,
    pub data_modifications: Vec<String>,
    pub system_access: Vec<String>,
    pub warnings: Vec<String>,
}

impl RiskAnalysis {
    pub fn modifies_data(&self) -> bool {
        !self.data_modifications.is_empty()
    }
}

/// Modern syntax the legacy remote runtime does not parse.
static DIALECT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("let declaration", Regex::new(r"\blet\s+[A-Za-z_$]").unwrap()),
        ("const declaration", Regex::new(r"\bconst\s+[A-Za-z_$]").unwrap()),
        ("arrow function", Regex::new(r"=>").unwrap()),
        ("template literal", Regex::new("`").unwrap()),
        (
            "for...of loop",
            Regex::new(r"\bfor\s*\(\s*(?:var\s+)?[A-Za-z_$][\w$]*\s+of\s").unwrap(),
        ),
        ("class declaration", Regex::new(r"\bclass\s+[A-Za-z_$]").unwrap()),
        ("spread/rest operator", Regex::new(r"\.\.\.[A-Za-z_$\[]").unwrap()),
        (
            "default parameter",
            Regex::new(r"\bfunction\s*[A-Za-z_$\w]*\s*\([^)]*=[^=)][^)]*\)").unwrap(),
        ),
    ]
});

/// Calls that write records on the remote platform.
static DATA_MODIFICATION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("record insert", Regex::new(r"\.insert\s*\(").unwrap()),
        ("record update", Regex::new(r"\.update\s*\(").unwrap()),
        ("multi-record update", Regex::new(r"\.updateMultiple\s*\(").unwrap()),
        ("record delete", Regex::new(r"\.deleteRecord\s*\(").unwrap()),
        ("multi-record delete", Regex::new(r"\.deleteMultiple\s*\(").unwrap()),
        ("field write", Regex::new(r"\.setValue\s*\(").unwrap()),
    ]
});

static SYSTEM_ACCESS_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("system property write", Regex::new(r"\bsys\.setProperty\s*\(").unwrap()),
        ("system property read", Regex::new(r"\bsys\.getProperty\s*\(").unwrap()),
        ("impersonation", Regex::new(r"\bsys\.impersonate\s*\(").unwrap()),
        ("event queue", Regex::new(r"\bsys\.eventQueue\s*\(").unwrap()),
    ]
});

/// Constructs that escalate to HIGH unconditionally.
static DANGEROUS_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("dynamic code evaluation (eval)", Regex::new(r"\beval\s*\(").unwrap()),
        (
            "dynamically constructed function",
            Regex::new(r"\bnew\s+Function\s*\(").unwrap(),
        ),
        (
            "workflow bypass (setWorkflow(false))",
            Regex::new(r"\.setWorkflow\s*\(\s*false\s*\)").unwrap(),
        ),
    ]
});

static UNBOUNDED_LOOP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bwhile\s*\(\s*true\s*\)").unwrap());
static CURSOR_ADVANCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.next\s*\(").unwrap());

/// Flag modern ECMAScript syntax the remote runtime cannot parse.
/// Returns one finding per (pattern, line) hit, in source order.
pub fn check_dialect(script: &str) -> Vec<DialectFinding> {
    let mut findings = Vec::new();
    for (line_no, line) in script.lines().enumerate() {
        for (kind, re) in DIALECT_PATTERNS.iter() {
            if re.is_match(line) {
                findings.push(DialectFinding {
                    kind: (*kind).to_string(),
                    line: line_no + 1,
                    snippet: line.trim().to_string(),
                });
            }
        }
    }
    findings
}

/// Classify the script's risk before submission.
///
/// Any data-mutating call raises the floor to MEDIUM; any dangerous
/// construct forces HIGH regardless of other content; an unbounded
/// `while (true)` loop that also advances a record cursor raises the
/// floor to MEDIUM.
pub fn analyze_risk(script: &str) -> RiskAnalysis {
    let mut data_modifications = Vec::new();
    let mut system_access = Vec::new();
    let mut warnings = Vec::new();

    for (kind, re) in DATA_MODIFICATION_PATTERNS.iter() {
        if re.is_match(script) {
            data_modifications.push((*kind).to_string());
        }
    }
    for (kind, re) in SYSTEM_ACCESS_PATTERNS.iter() {
        if re.is_match(script) {
            system_access.push((*kind).to_string());
        }
    }

    let mut dangerous = false;
    for (kind, re) in DANGEROUS_PATTERNS.iter() {
        if re.is_match(script) {
            dangerous = true;
            warnings.push(format!("Dangerous construct: {}", kind));
        }
    }

    let unbounded_cursor_loop =
        UNBOUNDED_LOOP.is_match(script) && CURSOR_ADVANCE.is_match(script);
    if unbounded_cursor_loop {
        warnings.push(
            "Unbounded while(true) loop with cursor advance; may never terminate".to_string(),
        );
    }

    let risk_level = if dangerous {
        RiskLevel::High
    } else if !data_modifications.is_empty() || unbounded_cursor_loop {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskAnalysis {
        risk_level,
        data_modifications,
        system_access,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_script_is_low() {
        let analysis = analyze_risk("var x = 1 + 1;\nreturn x;");
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert!(analysis.data_modifications.is_empty());
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn data_mutation_raises_floor_to_medium() {
        let analysis = analyze_risk("var r = table('incident'); r.field = 'x'; r.update();");
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.data_modifications, vec!["record update"]);
    }

    #[test]
    fn dangerous_construct_is_always_high() {
        // HIGH even when nothing else is suspicious.
        let analysis = analyze_risk("eval('1 + 1');");
        assert_eq!(analysis.risk_level, RiskLevel::High);

        // HIGH even alongside mutation (which alone would be MEDIUM).
        let analysis = analyze_risk("r.update(); new Function('return 1')();");
        assert_eq!(analysis.risk_level, RiskLevel::High);

        let analysis = analyze_risk("r.setWorkflow(false); r.update();");
        assert_eq!(analysis.risk_level, RiskLevel::High);
    }

    #[test]
    fn unbounded_cursor_loop_is_medium() {
        let analysis = analyze_risk("while (true) { cursor.next(); }");
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.warnings.len(), 1);
    }

    #[test]
    fn bounded_loop_alone_stays_low() {
        let analysis = analyze_risk("while (cursor.next()) { count++; }");
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn dialect_findings_carry_line_numbers() {
        let script = "var a = 1;\nlet b = 2;\nvar f = (x) => x;\n";
        let findings = check_dialect(script);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].kind, "let declaration");
        assert_eq!(findings[0].line, 2);
        assert_eq!(findings[0].snippet, "let b = 2;");
        assert_eq!(findings[1].kind, "arrow function");
        assert_eq!(findings[1].line, 3);
    }

    #[test]
    fn es5_script_has_no_findings() {
        let script = "var a = 1;\nfor (var i = 0; i < 10; i++) { a += i; }\nreturn a;";
        assert!(check_dialect(script).is_empty());
    }

    #[test]
    fn template_literal_and_for_of_flagged() {
        let findings = check_dialect("for (item of list) { sys.print(`x`); }");
        let kinds: Vec<_> = findings.iter().map(|f| f.kind.as_str()).collect();
        assert!(kinds.contains(&"for...of loop"));
        assert!(kinds.contains(&"template literal"));
    }

    #[test]
    fn risk_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::High).unwrap(),
            "\"HIGH\""
        );
    }
}
