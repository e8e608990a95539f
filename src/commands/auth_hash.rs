//! [`AuthHash`] command: shows the session's auth hash.
//!
//! Syntax: `/authhash`

use crate::command::{Outcome, SlashCommand, SlashLine};
use crate::sequencer::Sequencer;
use anyhow::Result;

pub struct AuthHash;

impl AuthHash {
    pub const NAME: &'static str = "authhash";
}

impl SlashCommand for AuthHash {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(_line: &SlashLine) -> Result<Self> {
        Ok(Self)
    }

    fn execute(&self, seq: &mut Sequencer) -> Outcome {
        let hash = seq
            .auth_hash()
            .unwrap_or_else(|| "unavailable".to_string());
        seq.display(&format!("Auth hash: {hash}"));
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use crate::client::MemoryClient;
    use crate::commands::testing;
    use crate::config::Config;
    use crate::parser::interpret;
    use crate::sequencer::Sequencer;

    #[test]
    fn test_known_hash() {
        let (mut seq, t) = testing::sequencer();
        interpret("/authhash", &mut seq);
        assert_eq!(testing::displayed(&t), vec!["Auth hash: abc123"]);
    }

    #[test]
    fn test_unknown_hash() {
        let client = MemoryClient::new();
        let t = client.transcript();
        let mut seq = Sequencer::new(client, Vec::new(), Config::default());
        interpret("/authhash", &mut seq);
        assert_eq!(testing::displayed(&t), vec!["Auth hash: unavailable"]);
    }
}
