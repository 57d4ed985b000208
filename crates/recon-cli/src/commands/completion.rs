// Dweve Recon - Data Reconciliation Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shell completion generation

use crate::error::CliError;
use clap::Command;
use clap_complete::{generate, Generator};
use std::io;

/// Write the completion script for `cmd` to stdout.
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::shells::Bash;
/// use recon_cli::commands::generate_completion_for_command;
///
/// let mut cmd = Command::new("recon");
/// generate_completion_for_command(Bash, &mut cmd).unwrap();
/// ```
pub fn generate_completion_for_command<G: Generator>(
    generator: G,
    cmd: &mut Command,
) -> Result<(), CliError> {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
    Ok(())
}

/// Shell-specific instructions for installing the completion script.
///
/// ```
/// use recon_cli::commands::print_installation_instructions;
///
/// assert!(print_installation_instructions("zsh").contains("zsh"));
/// assert_eq!(print_installation_instructions("tcsh"), "Unsupported shell");
/// ```
pub fn print_installation_instructions(shell: &str) -> String {
    match shell.to_lowercase().as_str() {
        "bash" => {
            r#"# Bash completion installation:

# For current session only:
eval "$(recon completion bash)"

# For persistent installation, add to your ~/.bashrc:
echo 'eval "$(recon completion bash)"' >> ~/.bashrc
"#
        }
        "zsh" => {
            r#"# Zsh completion installation:

# For current session only:
eval "$(recon completion zsh)"

# Or save to a directory in $fpath:
recon completion zsh > ~/.zsh/completions/_recon
"#
        }
        "fish" => {
            r#"# Fish completion installation:

recon completion fish > ~/.config/fish/completions/recon.fish
"#
        }
        "powershell" | "pwsh" => {
            r#"# PowerShell completion installation:

# Add this line to your $PROFILE:
recon completion powershell | Out-String | Invoke-Expression
"#
        }
        "elvish" => {
            r#"# Elvish completion installation:

# Add to your ~/.elvish/rc.elv:
eval (recon completion elvish)
"#
        }
        _ => "Unsupported shell",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installation_instructions() {
        for shell in ["bash", "zsh", "fish", "elvish"] {
            let instructions = print_installation_instructions(shell);
            assert!(instructions.contains(shell), "{}", shell);
            assert!(instructions.contains("recon completion"));
        }
        assert!(print_installation_instructions("PWSH").contains("Invoke-Expression"));
    }
}
