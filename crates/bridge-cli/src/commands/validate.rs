use bridge_script::{analyze_risk, check_dialect};
use std::path::PathBuf;

/// Local-only validation: dialect findings plus the risk report, no
/// remote calls.
pub fn run(script: Option<String>, file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let script = super::read_script(script, file)?;

    let findings = check_dialect(&script);
    let analysis = analyze_risk(&script);

    if json {
        let report = serde_json::json!({
            "dialect_findings": findings,
            "risk_analysis": analysis,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Risk level: {}", analysis.risk_level);
    for m in &analysis.data_modifications {
        println!("  data modification: {}", m);
    }
    for s in &analysis.system_access {
        println!("  system access: {}", s);
    }
    for w in &analysis.warnings {
        println!("  warning: {}", w);
    }

    if findings.is_empty() {
        println!("No dialect findings.");
    } else {
        println!("Dialect findings (advisory):");
        for f in &findings {
            println!("  line {}: {} -> {}", f.line, f.kind, f.snippet);
        }
    }
    Ok(())
}
