use anyhow::Result;
use serde::Serialize;

use crate::workflow::Decision;

/// Wire format the hook host parses from stdout
#[derive(Debug, Serialize)]
struct HookResponse<'a> {
    decision: &'a str,
    reason: &'a str,
}

/// Fail-open response written when the hook itself malfunctions
const FAIL_OPEN_RESPONSE: &str = r#"{
  "decision": "approve",
  "reason": "Hook execution failed"
}"#;

/// Pretty-printed response JSON for a decision
pub fn render(decision: &Decision) -> Result<String> {
    let response = HookResponse {
        decision: decision.verdict(),
        reason: decision.reason(),
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

/// Write the decision to stdout (the only bytes the host parses) and exit 0.
/// Approve and block are both successful hook executions.
pub fn emit(decision: &Decision) -> ! {
    match render(decision) {
        Ok(json) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", json);
            }
            tracing::info!(
                decision = decision.verdict(),
                reason = decision.reason(),
                "hook decision"
            );
            std::process::exit(0);
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize decision");
            emit_failure()
        }
    }
}

/// Write the best-effort fail-open approve and exit 2, signalling a hook
/// malfunction to the host while still leaving well-formed JSON on stdout.
pub fn emit_failure() -> ! {
    #[allow(clippy::print_stdout)]
    {
        println!("{}", FAIL_OPEN_RESPONSE);
    }
    std::process::exit(2);
}
