#![allow(dead_code)]

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Instant;

use assert_cmd::Command;
use tempfile::TempDir;

/// Captured result of one `tb` invocation.
#[derive(Debug)]
pub struct TbRun {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
    pub transcript: PathBuf,
}

impl TbRun {
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Scratch directory used as both the working directory and `HOME`, so no
/// user or project config leaks into a run.
pub struct TbWorkspace {
    _dir: TempDir,
    pub root: PathBuf,
    transcripts: PathBuf,
}

impl TbWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = dir.path().to_path_buf();
        let transcripts = root.join("transcripts");
        fs::create_dir_all(&transcripts).expect("transcript dir");
        Self {
            _dir: dir,
            root,
            transcripts,
        }
    }
}

/// A `tb` command rooted in `workspace`, for `assert()`-style checks.
pub fn tb_command(workspace: &TbWorkspace) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tb"));
    cmd.current_dir(&workspace.root)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("HOME", &workspace.root);
    cmd
}

pub fn run_tb<I, S>(workspace: &TbWorkspace, args: I, label: &str) -> TbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_tb_with_env(workspace, args, std::iter::empty::<(&str, &str)>(), label)
}

/// Run the binary and keep a transcript under the workspace for debugging
/// failed assertions.
pub fn run_tb_with_env<I, S, E, K, V>(
    workspace: &TbWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> TbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();

    let mut cmd = tb_command(workspace);
    cmd.args(&args).envs(env_vars);

    let started = Instant::now();
    let output = cmd.output().expect("run tb");
    let elapsed = started.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    let transcript = workspace.transcripts.join(format!("{label}.txt"));
    fs::write(
        &transcript,
        format!(
            "$ tb {args:?}\n[{} in {elapsed:?}]\n--- stdout\n{stdout}\n--- stderr\n{stderr}\n",
            output.status
        ),
    )
    .expect("write transcript");

    TbRun {
        stdout,
        stderr,
        status: output.status,
        transcript,
    }
}

/// The JSON document in `stdout`, skipping any leading non-JSON lines.
pub fn extract_json_payload(stdout: &str) -> String {
    let start = stdout
        .lines()
        .position(|line| {
            let line = line.trim_start();
            line.starts_with('{') || line.starts_with('[')
        })
        .unwrap_or(0);
    stdout
        .lines()
        .skip(start)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
