mod auth_hash;
mod current;
mod edit_scripts;
mod help;
mod list_scripts;
mod pause;
mod repeat;
mod start;
mod stop;

pub use auth_hash::AuthHash;
pub use current::Current;
pub use edit_scripts::EditScripts;
pub use help::Help;
pub use list_scripts::ListScripts;
pub use pause::{Pause, Resume};
pub use repeat::{Repeat, RepeatNlb};
pub use start::Start;
pub use stop::Stop;

#[cfg(test)]
pub(crate) mod testing {
    use crate::client::{MemoryClient, Transcript};
    use crate::config::Config;
    use crate::script::Script;
    use crate::sequencer::Sequencer;
    use std::sync::{Arc, Mutex};

    pub fn chop_script() -> Script {
        serde_json::from_value(serde_json::json!({
            "scriptName": "myScript",
            "scriptFriendlyName": "Axe chopping",
            "scriptType": "combat",
            "commandList": [
                {"command": "chop", "parse": {"outcome": "You raise your", "moveNextWhen": "You are no longer busy."}}
            ],
        }))
        .unwrap()
    }

    pub fn sequencer() -> (Sequencer, Arc<Mutex<Transcript>>) {
        let client = MemoryClient::with_auth_hash("abc123");
        let transcript = client.transcript();
        (
            Sequencer::new(client, vec![chop_script()], Config::default()),
            transcript,
        )
    }

    pub fn displayed(t: &Arc<Mutex<Transcript>>) -> Vec<String> {
        t.lock().unwrap().displayed.clone()
    }
}
