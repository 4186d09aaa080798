use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::config::InstallCommand;

/// Cargo feature that provides LAZ decompression.
pub const BACKEND_FEATURE: &str = "laz";

/// Whether this build can decompress LAZ.
pub fn backend_compiled_in() -> bool {
    cfg!(feature = "laz")
}

/// Run the configured install command and wait for it to finish.
///
/// The running binary does not pick up the new backend; the user has to
/// restart the app afterwards.
pub fn install_backend(command: &InstallCommand) -> Result<()> {
    log::info!("Installing LAZ backend: {}", command.display());

    let status = Command::new(&command.program)
        .args(&command.args)
        .status()
        .with_context(|| format!("failed to launch `{}`", command.program))?;

    if !status.success() {
        bail!("`{}` exited with {status}", command.display());
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn command(program: &str) -> InstallCommand {
        InstallCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[test]
    fn successful_command_is_ok() {
        assert!(install_backend(&command("true")).is_ok());
    }

    #[test]
    fn failing_command_reports_exit_status() {
        let err = install_backend(&command("false")).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn missing_program_reports_launch_failure() {
        let err = install_backend(&command("definitely-not-a-real-installer")).unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }
}
