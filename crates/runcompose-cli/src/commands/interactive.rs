//! `runcompose interactive`: read commands from the terminal.

use std::io::{self, BufRead, Write};

use runcompose_common::config::ConverterConfig;
use runcompose_common::constants::COMMAND_PREFIX;

use super::convert::run_conversion;

/// Executes the interactive session.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written, or if no
/// entered command translates.
pub fn execute(config: &ConverterConfig) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    writeln!(
        stderr,
        "Enter docker run commands, one per line. Submit an empty line to finish."
    )?;

    let commands = read_commands(stdin.lock(), &mut stderr)?;
    if commands.is_empty() {
        writeln!(stderr, "No commands entered.")?;
        return Ok(());
    }
    run_conversion(&commands, config, None, true)
}

/// Reads lines until an empty one, prompting with `[n] docker run ` and
/// restoring the prefix when the user left it out.
///
/// # Errors
///
/// Returns an error if reading or prompting fails.
pub fn read_commands<R: BufRead, W: Write>(input: R, mut prompt: W) -> io::Result<Vec<String>> {
    let mut commands = Vec::new();
    let mut lines = input.lines();
    loop {
        write!(prompt, "[{}] {COMMAND_PREFIX} ", commands.len() + 1)?;
        prompt.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        commands.push(with_prefix(line));
    }
    Ok(commands)
}

fn with_prefix(line: &str) -> String {
    if line.starts_with(COMMAND_PREFIX) {
        line.to_owned()
    } else {
        format!("{COMMAND_PREFIX} {line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_until_empty_line() {
        let input = "-d redis\ndocker run nginx\n\nignored\n";
        let mut prompt = Vec::new();
        let commands = read_commands(input.as_bytes(), &mut prompt).expect("should read");
        assert_eq!(commands, vec!["docker run -d redis", "docker run nginx"]);

        let prompt = String::from_utf8(prompt).expect("utf8");
        assert!(prompt.starts_with("[1] docker run "));
        assert!(prompt.contains("[3] docker run "));
    }

    #[test]
    fn end_of_input_finishes_session() {
        let commands = read_commands("postgres".as_bytes(), Vec::new()).expect("should read");
        assert_eq!(commands, vec!["docker run postgres"]);
    }
}
