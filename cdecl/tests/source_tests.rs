use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::{env, fs, io};
use walkdir::WalkDir;

fn main() {
    let args = libtest_mimic::Arguments::from_args();

    std::env::set_current_dir("..").unwrap();

    let tests = find_source_files("tests").map(extract_script_test).collect();

    libtest_mimic::run(&args, tests).exit();
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
struct Config {
    #[serde(default = "DEFAULT_IGNORE")]
    ignore: bool,
    #[serde(default = "DEFAULT_EXIT_CODE")]
    exit_code: i32,
    /// Extra command line arguments, e.g. `["--language=c++17"]`
    #[serde(default = "DEFAULT_ARGS")]
    args: Vec<String>,
    #[serde(skip)]
    update_snapshots: bool,
}

const DEFAULT_IGNORE: fn() -> bool = || false;
const DEFAULT_EXIT_CODE: fn() -> i32 = || 0;
const DEFAULT_ARGS: fn() -> Vec<String> = Vec::new;

struct TestFailure {
    name: &'static str,
    details: Vec<(&'static str, String)>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
struct SnapshotData {
    stdout: String,
    stderr: String,
}

#[derive(Debug)]
struct Snapshot {
    path: PathBuf,
    expected: Option<SnapshotData>,
    actual: SnapshotData,
}

#[derive(Eq, PartialEq, Debug)]
enum SnapshotOutcome {
    Equal,
    Different,
    Missing,
}

/// Recursively walk over command scripts under a file path.
pub fn find_source_files(root: impl AsRef<Path>) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| matches!(entry.path().extension(), Some(ext) if ext == "cdecl"))
        .map(|entry| entry.into_path())
}

fn extract_script_test(path: PathBuf) -> libtest_mimic::Trial {
    let name = path.display().to_string();
    match read_config(&path) {
        Ok(config) => {
            let is_ignored = config.ignore;
            libtest_mimic::Trial::test(name, move || run_test(&config, &path)).with_ignored_flag(is_ignored)
        }
        Err(failure) => libtest_mimic::Trial::test(name, move || failures_to_outcome(&[failure])),
    }
}

fn read_config(input_file: &Path) -> Result<Config, TestFailure> {
    use itertools::Itertools;

    const CONFIG_COMMENT_START: &str = "//~";

    let input_source = match std::fs::read_to_string(input_file) {
        Ok(source) => source,
        Err(error) => {
            return Err(TestFailure {
                name: "unexpected test read error",
                details: vec![("std::io::Error", error.to_string())],
            })
        }
    };
    // Collect the lines with CONFIG_COMMENT_START prefix, stripping the prefix in the process
    let config_source = input_source
        .lines()
        .filter_map(|line| line.split(CONFIG_COMMENT_START).nth(1))
        .join("\n");

    // Parse those lines as TOML
    match toml::from_str::<Config>(&config_source) {
        Ok(mut config) => {
            config.update_snapshots = env::var_os("CDECL_UPDATE_SNAP").is_some();
            Ok(config)
        }
        Err(error) => Err(TestFailure {
            name: "config parse error",
            details: vec![("toml::de::Error", error.to_string())],
        }),
    }
}

fn run_test(config: &Config, input_file: &Path) -> Result<(), libtest_mimic::Failed> {
    let mut failures = Vec::new();

    match run_script(config, input_file) {
        Ok(mut test_failures) => failures.append(&mut test_failures),
        Err(error) => {
            failures.push(TestFailure {
                name: "unexpected test command error",
                details: vec![("std::io::Error", error.to_string())],
            });
        }
    }

    failures_to_outcome(&failures)
}

fn failures_to_outcome(failures: &[TestFailure]) -> Result<(), libtest_mimic::Failed> {
    if failures.is_empty() {
        return Ok(());
    }

    let mut msg = String::new();

    writeln!(msg).unwrap();
    for failure in failures {
        writeln!(msg, "    {}:", failure.name).unwrap();
        for (name, data) in &failure.details {
            writeln!(msg, "        ---- {} ----", name).unwrap();
            for line in data.lines() {
                writeln!(msg, "        {}", line).unwrap();
            }
        }
        writeln!(msg).unwrap();
    }
    writeln!(msg).unwrap();
    writeln!(msg, "    failures:").unwrap();
    for failure in failures {
        writeln!(msg, "        {}", failure.name).unwrap();
    }

    Err(msg.into())
}

/// Run a script with the `cdecl` binary and compare what it printed with
/// the snapshot next to the script.
fn run_script(config: &Config, input_file: &Path) -> Result<Vec<TestFailure>, io::Error> {
    let mut failures = Vec::new();
    let mut exe = process::Command::new(env!("CARGO_BIN_EXE_cdecl"));
    exe.arg("--no-config")
        .arg("--color=never")
        .args(&config.args)
        .arg("--file")
        .arg(input_file);

    let output = match exe.output() {
        Ok(output) => output,
        Err(error) => {
            failures.push(TestFailure {
                name: "unexpected command error",
                details: vec![("std::io::Error", error.to_string())],
            });
            return Ok(failures);
        }
    };

    let mut snapshot = Snapshot::new(input_file, &output)?;

    // Update if requested
    if config.update_snapshots && snapshot.outcome() != SnapshotOutcome::Equal {
        snapshot.update()?;
    }

    match snapshot.outcome() {
        SnapshotOutcome::Equal => {}
        SnapshotOutcome::Different => {
            let mut details = vec![("path", snapshot.path.to_string_lossy().into_owned())];
            if let Some(diff) = snapshot.stdout_diff() {
                details.push(("stdout diff", diff));
            }
            if let Some(diff) = snapshot.stderr_diff() {
                details.push(("stderr diff", diff));
            }

            failures.push(TestFailure {
                name: "snapshot mismatch",
                details,
            });
        }
        SnapshotOutcome::Missing => {
            let mut details = vec![("path", snapshot.path.to_string_lossy().into_owned())];
            if !snapshot.stdout().is_empty() {
                details.push(("stdout", snapshot.stdout().to_string()));
            }
            if !snapshot.stderr().is_empty() {
                details.push(("stderr", snapshot.stderr().to_string()));
            }

            failures.push(TestFailure {
                name: "snapshot missing",
                details,
            });
        }
    }

    if output.status.code() != Some(config.exit_code) {
        let mut details = vec![
            ("command", format!("{:?}", exe)),
            ("status", output.status.to_string()),
        ];
        if !snapshot.stderr().is_empty() {
            details.push(("stderr", snapshot.stderr().to_string()));
        }
        failures.push(TestFailure {
            name: "unexpected exit status",
            details,
        });
    }

    Ok(failures)
}

impl Snapshot {
    fn new(test_path: &Path, output: &process::Output) -> Result<Snapshot, io::Error> {
        let path = test_path.with_extension("snap");
        let actual = SnapshotData {
            stdout: String::from_utf8_lossy(&output.stdout).into(),
            stderr: String::from_utf8_lossy(&output.stderr).into(),
        };
        let expected = match fs::read_to_string(&path) {
            Ok(snap) => toml::from_str(&snap)
                .map(Some)
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?,
            // Snapshot is missing and needs to be generated
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };
        Ok(Snapshot {
            path,
            expected,
            actual,
        })
    }

    fn stdout(&self) -> &str {
        &self.actual.stdout
    }

    fn stderr(&self) -> &str {
        &self.actual.stderr
    }

    fn update(&mut self) -> Result<(), io::Error> {
        let serialised = toml::to_string_pretty(&self.actual)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        fs::write(&self.path, serialised)?;
        self.expected = Some(self.actual.clone());
        Ok(())
    }

    fn outcome(&self) -> SnapshotOutcome {
        match &self.expected {
            Some(expected) if *expected == self.actual => SnapshotOutcome::Equal,
            Some(_) => SnapshotOutcome::Different,
            None => SnapshotOutcome::Missing,
        }
    }

    fn stdout_diff(&self) -> Option<String> {
        self.expected
            .as_ref()
            .and_then(|expected| make_diff(&self.actual.stdout, &expected.stdout))
    }

    fn stderr_diff(&self) -> Option<String> {
        self.expected
            .as_ref()
            .and_then(|expected| make_diff(&self.actual.stderr, &expected.stderr))
    }
}

fn make_diff(actual: &str, expected: &str) -> Option<String> {
    let mut diff = String::new();
    let mut left_line_number = 0;
    let mut right_line_number = 0;
    let line_width = (actual.lines().count().max(expected.lines().count()) as f32)
        .log10()
        .ceil() as usize;
    for result in diff::lines(expected, actual) {
        match result {
            diff::Result::Left(l) => {
                left_line_number += 1;
                diff.push_str(&diff_line('-', left_line_number, line_width, l));
            }
            diff::Result::Both(_l, _r) => {
                left_line_number += 1;
                right_line_number += 1;
            }
            diff::Result::Right(r) => {
                right_line_number += 1;
                diff.push_str(&diff_line('+', right_line_number, line_width, r));
            }
        }
    }
    if diff.is_empty() {
        None
    } else {
        Some(diff)
    }
}

fn diff_line(sign: char, line_number: usize, line_width: usize, line: &str) -> String {
    format!(
        "{:>width$}| {} {}\n",
        line_number,
        sign,
        line,
        width = line_width
    )
}
