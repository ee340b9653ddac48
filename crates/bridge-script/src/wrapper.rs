/// Suffix of the final log line the wrapper emits once the result
/// marker is written. For human log-reading only; the poller keys off
/// the property itself.
pub const COMPLETION_SENTINEL: &str = ".complete";

/// Escape a value for inclusion inside a single-quoted string literal
/// in the generated script. Interpolating caller content into code is
/// an injection boundary; everything that is not script body goes
/// through here.
pub fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a user script with output-capture instrumentation and the
/// result-marker write.
///
/// The wrapper saves the four output primitives, swaps in capturing
/// variants that record `{level, message, timestamp}` in emission
/// order and forward to the originals, runs the user script inside an
/// isolated function scope so its return value and thrown errors are
/// captured without leaking identifiers, restores the originals in a
/// `finally`, then serializes the full report under
/// `key_prefix + execution_id`.
pub fn wrap_script(
    script: &str,
    description: &str,
    execution_id: &str,
    key_prefix: &str,
) -> String {
    let id = escape_js_string(execution_id);
    let key = escape_js_string(&format!("{}{}", key_prefix, execution_id));
    let desc = escape_js_string(description);

    format!(
        r#"(function() {{
    var description = '{desc}';
    var captured = [];
    var originals = {{
        print: sys.print,
        info: sys.info,
        warn: sys.warn,
        error: sys.error
    }};
    function capturing(level) {{
        return function(message) {{
            captured.push({{
                level: level,
                message: '' + message,
                timestamp: new Date().toISOString()
            }});
            originals[level].call(sys, message);
        }};
    }}
    var report = {{
        executionId: '{id}',
        success: false,
        result: null,
        error: null,
        output: captured,
        executionTimeMs: 0,
        completedAt: ''
    }};
    var startedAt = new Date().getTime();
    sys.print = capturing('print');
    sys.info = capturing('info');
    sys.warn = capturing('warn');
    sys.error = capturing('error');
    try {{
        report.result = (function() {{
{script}
        }})();
        report.success = true;
    }} catch (e) {{
        report.error = '' + e;
    }} finally {{
        sys.print = originals.print;
        sys.info = originals.info;
        sys.warn = originals.warn;
        sys.error = originals.error;
    }}
    report.executionTimeMs = new Date().getTime() - startedAt;
    report.completedAt = new Date().toISOString();
    sys.setProperty('{key}', JSON.stringify(report), description);
    sys.info('{key}{sentinel}');
}})();
"#,
        desc = desc,
        id = id,
        key = key,
        script = script,
        sentinel = COMPLETION_SENTINEL,
    )
}
