//! Acting-agent identity resolution for CLI commands.
//!
//! Every mutating command records an actor id with the signal it appends;
//! read commands only need one for `--exclude-me`. The id comes from the
//! first source that yields a non-empty value: the `--agent` flag, then
//! the env vars in [`ENV_CHAIN`], then `USER` when stdin is interactive.

use std::env;

/// Env vars consulted after the `--agent` flag, in precedence order.
const ENV_CHAIN: &[&str] = &["BATON_AGENT", "AGENT"];

/// Consulted last, and only when stdin is a terminal. Batch callers must
/// identify themselves explicitly.
const TTY_FALLBACK_VAR: &str = "USER";

/// Error returned when no agent identity could be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResolutionError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: &'static str,
}

impl std::fmt::Display for AgentResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AgentResolutionError {}

/// Environment access seam so the chain is testable without touching
/// process state.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

fn resolve_agent_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<String> {
    if let Some(flagged) = cli_flag.filter(|v| !v.is_empty()) {
        return Some(flagged.to_string());
    }

    for var in ENV_CHAIN {
        if let Some(val) = env.get(var) {
            return Some(val);
        }
    }

    if env.is_tty() {
        return env.get(TTY_FALLBACK_VAR);
    }

    None
}

/// Resolve the acting agent: `--agent` flag, `BATON_AGENT`, `AGENT`, then
/// `USER` for interactive sessions. Blank values never match.
///
/// Returns `None` if no source yields an identity.
#[must_use]
pub fn resolve_agent(cli_flag: Option<&str>) -> Option<String> {
    resolve_agent_with(cli_flag, &RealEnv)
}

/// Resolve the acting agent, erroring when no source yields one. Mutating
/// commands call this before touching the store.
///
/// # Errors
///
/// Returns an error if no identity could be resolved.
pub fn require_agent(cli_flag: Option<&str>) -> Result<String, AgentResolutionError> {
    resolve_agent(cli_flag).ok_or_else(|| AgentResolutionError {
        message: "Agent identity required for this command. \
                  Set --agent, BATON_AGENT, or AGENT environment variable."
            .to_string(),
        code: "missing_agent",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EnvFixture {
        vars: Vec<(&'static str, &'static str)>,
        tty: bool,
    }

    impl EnvFixture {
        fn with(vars: &[(&'static str, &'static str)]) -> Self {
            Self {
                vars: vars.to_vec(),
                tty: false,
            }
        }

        fn interactive(mut self) -> Self {
            self.tty = true;
            self
        }
    }

    impl EnvReader for EnvFixture {
        fn get(&self, key: &str) -> Option<String> {
            self.vars
                .iter()
                .find(|(k, v)| *k == key && !v.is_empty())
                .map(|(_, v)| (*v).to_string())
        }

        fn is_tty(&self) -> bool {
            self.tty
        }
    }

    const FULL_ENV: &[(&str, &str)] = &[
        ("BATON_AGENT", "from-baton-env"),
        ("AGENT", "from-agent-env"),
        ("USER", "from-user"),
    ];

    #[test]
    fn flag_beats_every_env_source() {
        let env = EnvFixture::with(FULL_ENV).interactive();
        let got = resolve_agent_with(Some("from-flag"), &env);
        assert_eq!(got.as_deref(), Some("from-flag"));
    }

    #[test]
    fn sources_drop_out_in_precedence_order() {
        let cases: [(&[(&'static str, &'static str)], &str); 3] = [
            (FULL_ENV, "from-baton-env"),
            (&FULL_ENV[1..], "from-agent-env"),
            (&FULL_ENV[2..], "from-user"),
        ];
        for (vars, expected) in cases {
            let env = EnvFixture::with(vars).interactive();
            assert_eq!(resolve_agent_with(None, &env).as_deref(), Some(expected));
        }
    }

    #[test]
    fn blank_flag_and_blank_env_values_are_skipped() {
        let env = EnvFixture::with(&[("BATON_AGENT", ""), ("AGENT", "real-agent")]);
        assert_eq!(
            resolve_agent_with(Some(""), &env).as_deref(),
            Some("real-agent")
        );
    }

    #[test]
    fn user_requires_interactive_stdin() {
        let vars = [("USER", "alice")];
        assert_eq!(resolve_agent_with(None, &EnvFixture::with(&vars)), None);
        assert_eq!(
            resolve_agent_with(None, &EnvFixture::with(&vars).interactive()).as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn empty_environment_resolves_to_none() {
        assert_eq!(resolve_agent_with(None, &EnvFixture::with(&[])), None);
    }

    #[test]
    fn require_agent_reports_missing_agent() {
        let err = AgentResolutionError {
            message: "no identity".to_string(),
            code: "missing_agent",
        };
        assert_eq!(err.code, "missing_agent");
        assert_eq!(err.to_string(), "no identity");
        let _: Box<dyn std::error::Error> = Box::new(err);
    }

    #[test]
    fn require_agent_passes_flag_through() {
        let got = require_agent(Some("cli-agent"));
        assert_eq!(got.expect("flag resolves"), "cli-agent");
    }
}
