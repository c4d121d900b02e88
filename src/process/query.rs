use crate::error::Result;
use crate::exec;
use std::path::Path;

/// One row of the host's process table.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pub pid: u32,
    pub argv: Vec<String>,
}

/// Exact command-line matcher. A handle matches when its program's base
/// name and its full argument vector equal this signature; substrings of
/// unrelated command lines (log tails, editors with the script open) never
/// match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSignature {
    program: String,
    args: Vec<String>,
}

impl CommandSignature {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn matches(&self, argv: &[String]) -> bool {
        let Some(first) = argv.first() else {
            return false;
        };
        let lhs = Path::new(first).file_name();
        let rhs = Path::new(&self.program).file_name();
        matches!((lhs, rhs), (Some(a), Some(b)) if a == b) && argv[1..] == self.args[..]
    }
}

/// Capture the process table.
pub async fn snapshot() -> Result<Vec<ProcessHandle>> {
    let output = exec::run_capture("ps", ps_args(), None).await?;
    Ok(parse_table(&output))
}

/// All live processes matching `signature`, excluding the calling process.
pub async fn find(signature: &CommandSignature) -> Result<Vec<ProcessHandle>> {
    let own = std::process::id();
    Ok(snapshot()
        .await?
        .into_iter()
        .filter(|handle| handle.pid != own && signature.matches(&handle.argv))
        .collect())
}

#[cfg(target_os = "macos")]
fn ps_args() -> &'static [&'static str] {
    &["-axo", "pid=,args="]
}

#[cfg(not(target_os = "macos"))]
fn ps_args() -> &'static [&'static str] {
    &["-eo", "pid=,args="]
}

fn parse_table(raw: &str) -> Vec<ProcessHandle> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let pid = fields.next()?.parse().ok()?;
            let argv: Vec<String> = fields.map(str::to_string).collect();
            if argv.is_empty() {
                return None;
            }
            Some(ProcessHandle { pid, argv })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_pid_and_argv() {
        let table = parse_table("  101 /usr/bin/python3 hidyBot.py\n  202 sleep 300\nnot-a-row\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].pid, 101);
        assert_eq!(table[0].argv, argv(&["/usr/bin/python3", "hidyBot.py"]));
        assert_eq!(table[1].pid, 202);
    }

    #[test]
    fn matches_on_basename_and_full_argv() {
        let sig = CommandSignature::new("python3", argv(&["hidyBot.py"]));
        assert!(sig.matches(&argv(&["python3", "hidyBot.py"])));
        assert!(sig.matches(&argv(&["/usr/bin/python3", "hidyBot.py"])));
    }

    #[test]
    fn rejects_substring_lookalikes() {
        let sig = CommandSignature::new("python3", argv(&["hidyBot.py"]));
        // A log tail mentioning the script is not the bot.
        assert!(!sig.matches(&argv(&["tail", "-f", "hidyBot.py.log"])));
        // Extra arguments mean a different invocation.
        assert!(!sig.matches(&argv(&["python3", "hidyBot.py", "--debug"])));
        // Same script under a different interpreter.
        assert!(!sig.matches(&argv(&["python2", "hidyBot.py"])));
        assert!(!sig.matches(&[]));
    }

    #[tokio::test]
    async fn snapshot_contains_this_process() {
        let own = std::process::id();
        let table = snapshot().await.unwrap();
        assert!(table.iter().any(|h| h.pid == own));
    }
}
