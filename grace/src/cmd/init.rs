//! `grace init` command — write a demo configuration for `grace run`.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use super::error::CliError;
use crate::config::{parse_config, render_config};

/// Execute the `init` command.
///
/// Renders the template for `workers` heartbeat workers and an optional
/// forced-stop `timeout_secs`, checks that `grace run` would accept it, then
/// writes it to `output`. An existing file is only replaced with `force`.
///
/// # Errors
///
/// Returns an error if the rendered configuration is rejected, the file
/// already exists (without `--force`), or writing fails.
#[allow(clippy::print_stderr)]
pub fn run(
    output: &Path,
    force: bool,
    workers: usize,
    timeout_secs: Option<u64>,
) -> Result<(), CliError> {
    if workers == 0 {
        return Err(CliError::Config(
            "at least one worker is needed to demonstrate shutdown".to_owned(),
        ));
    }
    let content = render_config(workers, timeout_secs);
    let config = parse_config(&content)?;

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options.open(output).map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            CliError::Config(format!(
                "'{}' already exists, pass --force to replace it",
                output.display()
            ))
        } else {
            CliError::config(format!("cannot create '{}'", output.display()), e)
        }
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| CliError::config(format!("cannot write '{}'", output.display()), e))?;

    eprintln!(
        "Wrote {} ({} workers, {})",
        output.display(),
        config.workers(),
        config
            .timeout()
            .map_or_else(|| "stop on signal".to_owned(), |t| format!("stop after {t:?}")),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use super::*;
    use crate::config::load_config;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("grace-init-{}-{name}", std::process::id()))
    }

    #[test]
    fn writes_a_config_run_accepts() {
        let path = scratch_path("fresh.toml");
        let _ = fs::remove_file(&path);

        run(&path, false, 3, Some(10)).expect("written");
        let config = load_config(&path).expect("template loads");
        assert_eq!(config.workers(), 3);
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn refuses_to_replace_without_force() {
        let path = scratch_path("existing.toml");
        fs::write(&path, "workers = 9\n").expect("seed file");

        let err = run(&path, false, 2, None).expect_err("must refuse");
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(fs::read_to_string(&path).expect("read"), "workers = 9\n");

        run(&path, true, 2, None).expect("forced");
        assert_eq!(load_config(&path).expect("loads").workers(), 2);
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn zero_workers_is_rejected_before_touching_disk() {
        let path = scratch_path("zero.toml");
        let _ = fs::remove_file(&path);

        assert!(run(&path, false, 0, None).is_err());
        assert!(!path.exists());
    }
}
