//! Shared fixtures for the CLI runtime tests.

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tfutility_config::Config;

use crate::{AppError, ConfigLoader, run_with_loader};

pub(super) const DECORATOR_LINE: &str = r#"# @sourceswap(remote_source="git::https://x/y.git", remote_version="1.2.0", local_source="./modules/m")"#;

/// Skips layered configuration so tests never read the host environment.
pub(super) struct DefaultConfigLoader;

impl ConfigLoader for DefaultConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(Config::default())
    }
}

/// Captured result of one CLI invocation.
#[derive(Debug)]
pub(super) struct Invocation {
    pub(super) exit_code: ExitCode,
    pub(super) stdout: String,
    pub(super) stderr: String,
}

pub(super) fn invoke<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let arguments = std::iter::once(OsString::from("tfutility"))
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    let exit_code = run_with_loader(arguments, &mut stdout, &mut stderr, &DefaultConfigLoader);
    Invocation {
        exit_code,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

/// A decorated module in its local form.
pub(super) fn local_module(name: &str) -> String {
    format!("{DECORATOR_LINE}\nmodule \"{name}\" {{\n  source = \"./modules/m\"\n}}\n")
}

/// A decorated module in its remote form.
pub(super) fn remote_module(name: &str) -> String {
    format!(
        "{DECORATOR_LINE}\nmodule \"{name}\" {{\n  source = \"git::https://x/y.git\"\n  version = \"1.2.0\"\n}}\n"
    )
}

/// Scratch directory holding Terraform files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write(&self, relative: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    pub(super) fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("read file")
    }
}
