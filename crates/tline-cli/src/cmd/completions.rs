//! `tline completions <shell>`

use clap::CommandFactory;

/// Write the completion script for `shell` to stdout.
pub fn completions(shell: clap_complete::Shell) {
    let mut cmd = crate::Cli::command();
    clap_complete::generate(shell, &mut cmd, "tline", &mut std::io::stdout());
}
