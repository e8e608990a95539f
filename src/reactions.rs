//! Special-case reactions to combat text.
//!
//! Server output is a stream of loosely structured events and several of them
//! can be true at once, so reactions are independent `(applies, react)` pairs
//! evaluated in table order, every cycle. A rule sees the state left behind by
//! the rules before it; order matters where rules share the command override.

use crate::dispatch::{Dispatcher, Job};
use crate::format::formatted_command;
use crate::script::WEAPON_PLACEHOLDER;
use crate::state::ExecutionState;
use std::time::Duration;
use tracing::debug;

/// Extra delay for sends that must not land on top of the previous command.
pub const SHORT_EXTRA_DELAY: Duration = Duration::from_millis(400);
/// Extra delay after giving up on the current command.
pub const SKIP_EXTRA_DELAY: Duration = Duration::from_millis(850);

/// Something entering the room, for scripts that wait for targets to show up.
pub const WALK_IN_PHRASES: &[&str] = &[
    "walks in",
    " in from a",
    " arrives.",
    " charges in",
    " charge in",
    " rushes in",
    " rush in",
    " lopes in",
    " and onto your boat",
    " steps out of the nearby shadows.",
];

/// One line of server output being reacted to.
pub struct Cycle<'a> {
    pub line: &'a str,
    pub state: &'a mut ExecutionState,
    pub dispatcher: &'a mut Dispatcher,
}

impl Cycle<'_> {
    fn next_command(&mut self, additional: Duration) {
        self.dispatcher.send_next_command(self.state, additional);
    }

    fn send_after_delay(&mut self, command: String) {
        self.dispatcher
            .send_after_delay(self.state, Job::Send(command), Duration::ZERO);
    }

    fn send_delayed(&mut self, commands: Vec<String>) {
        self.dispatcher.send_delayed_commands(self.state, commands);
    }

    /// `get` and `wield` the weapon, and the shield when one is tracked, then
    /// retry the current command.
    fn rearm_and_retry(&mut self) {
        let weapon = &self.state.weapon_item_name;
        let mut cmds = vec![format!("get {weapon}"), format!("wield {weapon}")];
        let shield = &self.state.shield_item_name;
        if !shield.is_empty() {
            cmds.push(format!("get {shield}"));
            cmds.push(format!("wield {shield}"));
        }
        cmds.push(formatted_command(self.state));
        self.send_delayed(cmds);
    }
}

pub struct Reaction {
    pub name: &'static str,
    pub applies: fn(&str, &ExecutionState) -> bool,
    pub react: fn(&mut Cycle<'_>),
}

/// Run every rule of `table` whose trigger holds, in order.
pub fn apply(table: &[Reaction], cycle: &mut Cycle<'_>) {
    for reaction in table {
        if (reaction.applies)(cycle.line, cycle.state) {
            debug!(reaction = reaction.name, "reaction fired");
            (reaction.react)(cycle);
        }
    }
}

fn contains_any(line: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| line.contains(p))
}

/// Empty needles never match.
fn contains_some(line: &str, needle: &str) -> bool {
    !needle.is_empty() && line.contains(needle)
}

fn hit_or_miss(line: &str) -> bool {
    line.contains("You hit") || line.contains("You miss")
}

/// Rules that finish off an unconscious target. Only consulted when the
/// script runs with `shouldKill`.
pub static KILL_RULES: &[Reaction] = &[
    Reaction {
        name: "kill-opportunity",
        applies: |line, s| {
            line.contains("falls unconscious")
                || (s.attempting_kill && (hit_or_miss(line) || !s.custom_kill_command.is_empty()))
        },
        react: |c| {
            c.state.attempting_kill = true;
            c.state.command_override = Some(c.state.kill_command());
        },
    },
    Reaction {
        name: "kill-refused",
        applies: |line, _| line.contains("must be unconscious first"),
        react: |c| {
            c.state.clear_override();
            c.state.attempting_kill = false;
            c.next_command(Duration::ZERO);
        },
    },
    Reaction {
        name: "advanced-in-range",
        applies: |line, s| s.config.use_melee_advance && line.contains("You advance toward"),
        react: |c| {
            if c.state.advancing_to_kill {
                c.state.command_override = Some(c.state.kill_command());
                c.state.advancing_to_kill = false;
            } else {
                c.state.clear_override();
            }
        },
    },
    Reaction {
        name: "kill-landed",
        applies: |line, s| {
            (contains_some(line, &s.should_kill_parse) && s.override_contains("kill"))
                || (contains_some(line, &s.custom_kill_command_parse)
                    && s.override_contains(&s.custom_kill_command))
        },
        react: |c| {
            c.state.attempting_kill = false;
            c.state.clear_override();
        },
    },
];

/// Reactions evaluated on every combat line.
pub static COMBAT_REACTIONS: &[Reaction] = &[
    Reaction {
        name: "posture-recovered",
        applies: |line, _| line.contains("You are once again able to change combat postures"),
        react: |c| c.next_command(Duration::ZERO),
    },
    Reaction {
        name: "attack-override-cleared",
        applies: |line, s| s.override_contains("att") && hit_or_miss(line),
        react: |c| c.state.clear_override(),
    },
    Reaction {
        name: "knocked-down",
        applies: |line, _| {
            contains_any(
                line,
                &[
                    "You must be standing",
                    "You cannot do that right now",
                    "You have disabled fighting while prone",
                ],
            )
        },
        react: |c| {
            let stand = c.state.config.stand_command().to_string();
            c.send_after_delay(stand);
        },
    },
    Reaction {
        name: "stun-recovered",
        applies: |line, _| line.contains("You are no longer stunned"),
        react: |c| c.next_command(Duration::ZERO),
    },
    Reaction {
        name: "fumbled",
        applies: |line, _| contains_any(line, &["You fumble! You drop a", "You fumble, dropping"]),
        react: |c| {
            let item = if contains_some(c.line, &c.state.weapon_item_name) {
                c.state.weapon_item_name.clone()
            } else if contains_some(c.line, &c.state.shield_item_name) {
                c.state.shield_item_name.clone()
            } else {
                return;
            };
            // Picking it up has to wait for the fumble's round time anyway.
            c.state.command_override = Some(format!("get {item}"));
            c.state.recovering_weapon = true;
        },
    },
    Reaction {
        name: "fumbled-and-fell",
        applies: |line, _| line.contains("You fumble, falling"),
        react: |c| c.state.command_override = Some("stand".to_string()),
    },
    Reaction {
        name: "item-recovered",
        applies: |line, s| {
            s.recovering_weapon
                && contains_any(line, &["You take a", "You are already carrying"])
        },
        react: |c| {
            let mut cmds = Vec::new();
            if contains_some(c.line, &c.state.weapon_item_name) {
                cmds.push(format!("wield {}", c.state.weapon_item_name));
            } else if contains_some(c.line, &c.state.shield_item_name) {
                cmds.push(format!("wield {}", c.state.shield_item_name));
            }
            c.state.clear_override();
            cmds.push(formatted_command(c.state));
            c.send_delayed(cmds);
            c.state.recovering_weapon = false;
        },
    },
    Reaction {
        name: "cannot-act",
        applies: |line, _| line.contains("You can't do that right now"),
        react: |c| c.rearm_and_retry(),
    },
    Reaction {
        name: "not-wielding",
        applies: |line, _| {
            contains_any(
                line,
                &[
                    "You must be carrying something to wield it",
                    "You need to be wielding",
                    "You must be wielding",
                    "You are not wielding",
                ],
            )
        },
        react: |c| c.rearm_and_retry(),
    },
    Reaction {
        name: "two-handed",
        applies: |line, _| line.contains("You must be wielding your weapon in two hands"),
        react: |c| {
            let cmds = vec![
                format!("wield {}", c.state.weapon_item_name),
                formatted_command(c.state),
            ];
            c.send_delayed(cmds);
        },
    },
    Reaction {
        name: "shield-required",
        applies: |line, _| line.contains("You must be wielding a shield to"),
        react: |c| {
            let shield = &c.state.shield_item_name;
            let cmds = vec![
                format!("get {shield}"),
                format!("wield {shield}"),
                formatted_command(c.state),
            ];
            c.send_delayed(cmds);
        },
    },
    Reaction {
        name: "entangled",
        applies: |line, _| {
            contains_any(
                line,
                &[
                    "You cannot attack with an entangled weapon",
                    "You cannot attempt this maneuver with an entangled",
                    "You cannot use that action while grappling",
                    "You are unable to do that,",
                    "You must be free of entanglements",
                ],
            )
        },
        react: |c| {
            if c.state.entangled_command.is_empty() {
                let cmds = vec!["free".to_string(), formatted_command(c.state)];
                c.send_delayed(cmds);
            } else {
                // Sent on its own: a delayed sequence would drop a pending kill override.
                let cmd = c
                    .state
                    .entangled_command
                    .replace(WEAPON_PLACEHOLDER, &c.state.weapon_item_name);
                c.send_after_delay(cmd);
            }
        },
    },
    Reaction {
        name: "out-of-range",
        applies: |line, _| line.contains("is not close enough"),
        react: |c| {
            let verb = c.state.config.approach_verb().to_string();
            if c.state.config.use_melee_advance && c.state.override_contains("kill") {
                c.state.advancing_to_kill = true;
            }
            let job = Job::Approach {
                command: format!("{verb} {}", c.state.target),
                follow_up: verb.contains("engage"),
            };
            c.dispatcher.send_after_delay(c.state, job, Duration::ZERO);
        },
    },
    Reaction {
        name: "advance-failed",
        applies: |line, s| s.config.use_melee_advance && line.contains("but can't get close"),
        react: |c| {
            if c.state.override_contains("kill") {
                c.state.advancing_to_kill = true;
            }
            c.state.command_override = Some(format!("advance {}", c.state.target));
        },
    },
    Reaction {
        name: "redundant-state",
        applies: |line, _| {
            contains_any(
                line,
                &[
                    "You are already engaging",
                    "is too close.",
                    "You are already standing",
                ],
            )
        },
        react: |c| {
            c.state.clear_override();
            c.next_command(SKIP_EXTRA_DELAY);
        },
    },
    Reaction {
        name: "retreat-required",
        applies: |line, _| line.contains("You'll have to retreat first"),
        react: |c| {
            if c.state.config.use_melee_advance {
                let cmd = format!("advance {}", c.state.target);
                c.send_after_delay(cmd);
            } else {
                // The distance may sort itself out.
                c.next_command(Duration::ZERO);
            }
        },
    },
    Reaction {
        name: "wrong-stance",
        applies: |line, s| !s.stance.is_empty() && line.contains("You are not in the correct stance"),
        react: |c| {
            let stance = c.state.stance.clone();
            c.send_delayed(vec![stance]);
        },
    },
    Reaction {
        name: "stance-stuck",
        applies: |line, _| {
            contains_any(
                line,
                &[
                    "You are already in a berserk stance",
                    "You are already in a defensive stance",
                ],
            )
        },
        react: |c| c.send_delayed(vec!["normal".to_string()]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::CommandStep;

    fn combat_state() -> ExecutionState {
        let mut state = ExecutionState::default();
        state.target = "rat".into();
        state.weapon_item_name = "sword".into();
        state.command_list = vec![CommandStep::new("slash", Vec::new())];
        state
    }

    fn run(table: &[Reaction], state: &mut ExecutionState, d: &mut Dispatcher, line: &str) {
        let mut cycle = Cycle {
            line,
            state,
            dispatcher: d,
        };
        apply(table, &mut cycle);
    }

    /// Run the single rule called `name`, from either table.
    fn run_rule(name: &str, state: &mut ExecutionState, d: &mut Dispatcher, line: &str) {
        let rule = KILL_RULES
            .iter()
            .chain(COMBAT_REACTIONS)
            .find(|r| r.name == name)
            .unwrap();
        run(std::slice::from_ref(rule), state, d, line);
    }

    async fn drain(d: &mut Dispatcher) -> Vec<Job> {
        tokio::time::advance(Duration::from_secs(30)).await;
        std::iter::from_fn(|| d.pop_due()).collect()
    }

    #[test]
    fn test_rule_names_unique() {
        let mut names: Vec<_> = KILL_RULES
            .iter()
            .chain(COMBAT_REACTIONS)
            .map(|r| r.name)
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconscious_sets_kill_override() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(KILL_RULES, &mut state, &mut d, "The rat falls unconscious.");
        assert_eq!(state.command_override.as_deref(), Some("kill rat"));
        assert!(state.attempting_kill);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_kill_command() {
        let mut state = combat_state();
        state.custom_kill_command = "behead".into();
        let mut d = Dispatcher::new();
        run(KILL_RULES, &mut state, &mut d, "The rat falls unconscious.");
        assert_eq!(state.command_override.as_deref(), Some("behead rat"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_echo_clears_override() {
        let mut state = combat_state();
        state.should_kill_parse = "You slit".into();
        let mut d = Dispatcher::new();
        run(KILL_RULES, &mut state, &mut d, "The rat falls unconscious.");
        run(KILL_RULES, &mut state, &mut d, "You slit the rat's throat.");
        assert!(state.command_override.is_none());
        assert!(!state.attempting_kill);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_refused_schedules_next() {
        let mut state = combat_state();
        state.command_override = Some("kill rat".into());
        state.attempting_kill = true;
        let mut d = Dispatcher::new();
        run(KILL_RULES, &mut state, &mut d, "The rat must be unconscious first.");
        assert!(state.command_override.is_none());
        assert!(!state.attempting_kill);
        assert!(d.has_pending_next_command());
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_restores_kill() {
        let mut state = combat_state();
        state.config.use_melee_advance = true;
        state.command_override = Some("kill rat".into());
        let mut d = Dispatcher::new();

        run(COMBAT_REACTIONS, &mut state, &mut d, "You try to advance on the rat, but can't get close.");
        assert_eq!(state.command_override.as_deref(), Some("advance rat"));
        assert!(state.advancing_to_kill);

        run(KILL_RULES, &mut state, &mut d, "You advance toward the rat.");
        assert_eq!(state.command_override.as_deref(), Some("kill rat"));
        assert!(!state.advancing_to_kill);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fumble_weapon() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You fumble! You drop a sword.");
        assert_eq!(state.command_override.as_deref(), Some("get sword"));
        assert!(state.recovering_weapon);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fumble_unrelated_item_ignored() {
        let mut state = combat_state();
        state.shield_item_name = "buckler".into();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You fumble! You drop a torch.");
        assert!(state.command_override.is_none());
        assert!(!state.recovering_weapon);

        run(COMBAT_REACTIONS, &mut state, &mut d, "You fumble, dropping a buckler.");
        assert_eq!(state.command_override.as_deref(), Some("get buckler"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_continuation() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You fumble! You drop a sword.");
        run(COMBAT_REACTIONS, &mut state, &mut d, "You take a sword.");
        assert!(state.command_override.is_none());
        assert!(!state.recovering_weapon);
        assert_eq!(
            drain(&mut d).await,
            vec![
                Job::Send("wield sword".into()),
                Job::Send("slash rat".into())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_wielding_rearms_with_shield() {
        let mut state = combat_state();
        state.shield_item_name = "buckler".into();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are not wielding anything.");
        assert_eq!(
            drain(&mut d).await,
            vec![
                Job::Send("get sword".into()),
                Job::Send("wield sword".into()),
                Job::Send("get buckler".into()),
                Job::Send("wield buckler".into()),
                Job::Send("slash rat".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_knockdown_uses_configured_rise() {
        let mut state = combat_state();
        state.config.use_backwards_rise_to_stand = true;
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You must be standing to do that.");
        assert_eq!(drain(&mut d).await, vec![Job::Send("brise".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entangled_custom_command() {
        let mut state = combat_state();
        state.entangled_command = "fling <weapon>".into();
        state.command_override = Some("kill rat".into());
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You cannot attack with an entangled weapon.");
        assert_eq!(state.command_override.as_deref(), Some("kill rat"));
        assert_eq!(drain(&mut d).await, vec![Job::Send("fling sword".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entangled_default_frees() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You must be free of entanglements first.");
        assert_eq!(
            drain(&mut d).await,
            vec![Job::Send("free".into()), Job::Send("slash rat".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_engage() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "The rat is not close enough.");
        assert_eq!(
            drain(&mut d).await,
            vec![Job::Approach {
                command: "engage rat".into(),
                follow_up: true
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_melee_advance_keeps_kill() {
        let mut state = combat_state();
        state.config.use_melee_advance = true;
        state.command_override = Some("kill rat".into());
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "The rat is not close enough.");
        assert!(state.advancing_to_kill);
        assert_eq!(
            drain(&mut d).await,
            vec![Job::Approach {
                command: "advance rat".into(),
                follow_up: false
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_state_skips_ahead() {
        let mut state = combat_state();
        state.command_override = Some("stand".into());
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are already standing.");
        assert!(state.command_override.is_none());
        assert!(d.has_pending_next_command());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stance_rules() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are not in the correct stance.");
        assert_eq!(d.pending(), 0);

        state.stance = "stance offensive".into();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are not in the correct stance.");
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are already in a berserk stance.");
        assert_eq!(
            drain(&mut d).await,
            vec![
                Job::Send("stance offensive".into()),
                Job::Send("normal".into())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_attack_override_cleared_on_swing() {
        let mut state = combat_state();
        state.command_override = Some("att rat".into());
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You miss the rat.");
        assert!(state.command_override.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_continues_on_swing() {
        let mut state = combat_state();
        state.attempting_kill = true;
        let mut d = Dispatcher::new();
        run(KILL_RULES, &mut state, &mut d, "You hit the rat.");
        assert_eq!(state.command_override.as_deref(), Some("kill rat"));

        state.clear_override();
        run(KILL_RULES, &mut state, &mut d, "You miss the rat.");
        assert_eq!(state.command_override.as_deref(), Some("kill rat"));

        state.attempting_kill = false;
        state.clear_override();
        run(KILL_RULES, &mut state, &mut d, "You hit the rat.");
        assert!(state.command_override.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_continues_with_custom_command() {
        let mut state = combat_state();
        state.attempting_kill = true;
        state.custom_kill_command = "behead".into();
        let mut d = Dispatcher::new();
        run(KILL_RULES, &mut state, &mut d, "The rat snarls.");
        assert_eq!(state.command_override.as_deref(), Some("behead rat"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_posture_recovered_sends_next() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are once again able to change combat postures.");
        assert!(d.has_pending_next_command());
        assert_eq!(d.pending(), 1);
        assert_eq!(drain(&mut d).await, vec![Job::NextCommand]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stun_recovered_sends_next() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You are no longer stunned.");
        assert_eq!(drain(&mut d).await, vec![Job::NextCommand]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fumbled_and_fell_stands() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You fumble, falling to the ground!");
        assert_eq!(state.command_override.as_deref(), Some("stand"));
        assert!(!state.recovering_weapon);
        assert_eq!(d.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cannot_act_rearms() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You can't do that right now.");
        assert_eq!(
            drain(&mut d).await,
            vec![
                Job::Send("get sword".into()),
                Job::Send("wield sword".into()),
                Job::Send("slash rat".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_handed_rewields() {
        let mut state = combat_state();
        state.command_override = Some("kill rat".into());
        let mut d = Dispatcher::new();
        run_rule("two-handed", &mut state, &mut d, "You must be wielding your weapon in two hands.");
        assert!(state.command_override.is_none());
        assert_eq!(
            drain(&mut d).await,
            vec![Job::Send("wield sword".into()), Job::Send("kill rat".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_handed_also_fires_not_wielding() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You must be wielding your weapon in two hands.");
        // Both sequences start 2s out, one second apart, and interleave.
        assert_eq!(
            drain(&mut d).await,
            vec![
                Job::Send("get sword".into()),
                Job::Send("wield sword".into()),
                Job::Send("wield sword".into()),
                Job::Send("slash rat".into()),
                Job::Send("slash rat".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shield_required_fetches_shield() {
        let mut state = combat_state();
        state.shield_item_name = "buckler".into();
        let mut d = Dispatcher::new();
        run_rule("shield-required", &mut state, &mut d, "You must be wielding a shield to bash.");
        assert_eq!(
            drain(&mut d).await,
            vec![
                Job::Send("get buckler".into()),
                Job::Send("wield buckler".into()),
                Job::Send("slash rat".into()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retreat_required_with_melee_advance() {
        let mut state = combat_state();
        state.config.use_melee_advance = true;
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You'll have to retreat first.");
        assert!(!d.has_pending_next_command());
        assert_eq!(drain(&mut d).await, vec![Job::Send("advance rat".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retreat_required_without_melee_advance() {
        let mut state = combat_state();
        let mut d = Dispatcher::new();
        run(COMBAT_REACTIONS, &mut state, &mut d, "You'll have to retreat first.");
        assert_eq!(drain(&mut d).await, vec![Job::NextCommand]);
    }
}
