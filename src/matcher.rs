//! Matching incoming lines against the current step's expected outcomes.

use crate::script::TARGET_PLACEHOLDER;
use crate::state::ExecutionState;
use tracing::{debug, warn};

/// Check `line` against the parse rules of the current step.
///
/// Rules are tried in order and the first match wins: its `moveNextWhen`
/// becomes the awaited trigger and its `moveNextNow` flag is raised. Returns
/// `false` without touching the state when nothing matches.
pub fn match_expected_parse(state: &mut ExecutionState, line: &str) -> bool {
    if state.command_list.is_empty() {
        warn!("parse check with an empty command list");
        return false;
    }
    let Some(step) = state.current_step() else {
        warn!(index = state.current_cmd_index, "parse check past the end of the command list");
        return false;
    };

    let Some(rule) = step
        .parse
        .iter()
        .find(|rule| match_outcome(line, &rule.outcome, &state.target))
        .cloned()
    else {
        return false;
    };

    debug!(outcome = %rule.outcome, "expected outcome matched");
    if rule.move_next_now {
        state.move_next_now = true;
    }
    state.current_move_next_when = rule.move_next_when;
    true
}

/// True when `line` contains any `|`-delimited alternative of `outcome`.
///
/// `<target>` in an alternative is replaced with `target` before comparing and
/// each alternative is trimmed. Alternatives that end up empty match nothing.
pub fn match_outcome(line: &str, outcome: &str, target: &str) -> bool {
    outcome
        .split('|')
        .map(|alt| alt.replace(TARGET_PLACEHOLDER, target))
        .any(|alt| {
            let alt = alt.trim();
            !alt.is_empty() && line.contains(alt)
        })
}
