use crate::config::Workflow;
use crate::transcript::Warning;

/// Maximum number of warning excerpts quoted in a block reason
const MAX_QUOTED_WARNINGS: usize = 3;

/// The hook's verdict: let the host proceed, or halt and relay the reason
/// as the corrective next instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve(String),
    Block(String),
}

impl Decision {
    /// Lowercase verdict for the JSON response
    pub fn verdict(&self) -> &'static str {
        match self {
            Decision::Approve(_) => "approve",
            Decision::Block(_) => "block",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Decision::Approve(reason) | Decision::Block(reason) => reason,
        }
    }
}

/// Decide how far the staged workflow has progressed.
///
/// An ordered cascade over set membership of the three stage labels; the
/// first matching rule wins. Repetition in the history is ignored. Pure
/// function of its arguments, so identical transcripts always produce
/// identical decisions.
pub fn decide(workflow: &Workflow, history: &[String], warnings: &[Warning]) -> Decision {
    let ran = |stage: &str| history.iter().any(|agent| agent == stage);

    if !history.iter().any(|agent| workflow.matches_family(agent)) {
        return Decision::Approve(format!("Not a {} workflow", workflow.name));
    }

    if ran(&workflow.creator) && !ran(&workflow.auditor) {
        return Decision::Block(format!(
            "{} finished.\nNext: Task({}, \"verify the newly created content\")",
            workflow.creator, workflow.auditor
        ));
    }

    if ran(&workflow.auditor) && !ran(&workflow.reviewer) {
        if !warnings.is_empty() {
            return Decision::Block(warning_report(workflow, warnings));
        }
        return Decision::Block(format!(
            "{} passed.\nNext: Task({}, \"run the final review\")",
            workflow.auditor, workflow.reviewer
        ));
    }

    if ran(&workflow.reviewer) {
        return Decision::Approve("Three-stage validation complete".to_string());
    }

    // Reachable when a family agent ran but none of the named stages did
    Decision::Approve("Workflow check passed".to_string())
}

fn warning_report(workflow: &Workflow, warnings: &[Warning]) -> String {
    let quoted: Vec<String> = warnings
        .iter()
        .take(MAX_QUOTED_WARNINGS)
        .map(Warning::to_string)
        .collect();

    format!(
        "{} found {} warning(s).\nFix the findings and re-run {}.\n\nFindings:\n{}",
        workflow.auditor,
        warnings.len(),
        workflow.auditor,
        quoted.join("\n")
    )
}
