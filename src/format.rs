//! Rendering the command that should be sent next.

use crate::script::TARGET_PLACEHOLDER;
use crate::state::ExecutionState;

/// The command for the current step, or the active override.
///
/// An override is returned verbatim; whoever sets one substitutes the target
/// up front. Otherwise `<target>` is replaced in the step command, or the
/// target is appended unless the step opts out with `targetRequired: false`.
/// Returns an empty string when there is no step to format.
pub fn formatted_command(state: &ExecutionState) -> String {
    let Some(step) = state.current_step() else {
        return String::new();
    };

    if let Some(cmd) = state.command_override.as_deref().filter(|c| !c.is_empty()) {
        return cmd.to_string();
    }

    if step.command.contains(TARGET_PLACEHOLDER) {
        step.command.replace(TARGET_PLACEHOLDER, &state.target)
    } else if step.target_required && !state.target.is_empty() {
        format!("{} {}", step.command, state.target)
    } else {
        step.command.clone()
    }
}
