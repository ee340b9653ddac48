pub mod validator;
pub mod wrapper;

pub use validator::{
    analyze_risk, check_dialect, DialectFinding, RiskAnalysis, RiskLevel,
};
pub use wrapper::{escape_js_string, wrap_script, COMPLETION_SENTINEL};
