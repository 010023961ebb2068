//! Unit tests for the CLI runner.

use std::process::ExitCode;

use rstest::{fixture, rstest};

use super::support::{Workspace, invoke, local_module, remote_module};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

#[test]
fn missing_direction_is_reported() {
    let result = invoke(["sourceswap"]);
    assert_eq!(result.exit_code, ExitCode::FAILURE);
    assert_eq!(
        result.stderr,
        "Please use --switch-to argument with the keywords local or remote\n"
    );
}

#[rstest]
#[case::help(&["--help"])]
#[case::subcommand_help(&["sourceswap", "--help"])]
#[case::version(&["--version"])]
fn help_and_version_go_to_stdout(#[case] args: &[&str]) {
    let result = invoke(args.iter().copied());
    assert_eq!(result.exit_code, ExitCode::SUCCESS);
    assert!(!result.stdout.is_empty());
    assert!(result.stderr.is_empty());
}

#[rstest]
#[case::unknown_direction(&["sourceswap", "--switch-to", "sideways"])]
#[case::unknown_command(&["plan"])]
#[case::no_command(&[])]
fn usage_errors_fail(#[case] args: &[&str]) {
    let result = invoke(args.iter().copied());
    assert_eq!(result.exit_code, ExitCode::FAILURE);
    assert!(result.stdout.is_empty());
    assert!(!result.stderr.is_empty());
}

#[rstest]
fn swaps_every_file_under_a_directory(workspace: Workspace) {
    workspace.write("main.tf", &local_module("a"));
    workspace.write("nested/other.tf", &local_module("b"));

    let result = invoke(["sourceswap", "-s", "remote", workspace.root().as_str()]);

    assert_eq!(result.exit_code, ExitCode::SUCCESS, "stderr: {}", result.stderr);
    assert_eq!(workspace.read("main.tf"), remote_module("a"));
    assert_eq!(workspace.read("nested/other.tf"), remote_module("b"));
}

#[rstest]
fn explicit_file_arguments_limit_the_run(workspace: Workspace) {
    let chosen = workspace.write("chosen.tf", &remote_module("a"));
    workspace.write("ignored.tf", &remote_module("b"));

    let result = invoke(["sourceswap", "--switch-to=local", chosen.as_str()]);

    assert_eq!(result.exit_code, ExitCode::SUCCESS, "stderr: {}", result.stderr);
    assert_eq!(workspace.read("chosen.tf"), local_module("a"));
    assert_eq!(workspace.read("ignored.tf"), remote_module("b"));
}

#[rstest]
fn invalid_block_leaves_the_file_untouched(workspace: Workspace) {
    let broken = "# @sourceswap(remote_source=\"git::https://x/y.git\")\nmodule \"m\" {\n  source = \"./m\"\n}\n";
    workspace.write("main.tf", broken);

    let result = invoke(["sourceswap", "-s", "r", workspace.root().as_str()]);

    assert_eq!(result.exit_code, ExitCode::FAILURE);
    assert!(
        result.stderr.is_empty(),
        "swap failures are only logged: {}",
        result.stderr
    );
    assert_eq!(workspace.read("main.tf"), broken);
}

#[rstest]
fn missing_path_is_reported(workspace: Workspace) {
    let absent = workspace.root().join("absent");
    let result = invoke(["sourceswap", "-s", "local", absent.as_str()]);
    assert_eq!(result.exit_code, ExitCode::FAILURE);
    assert!(result.stderr.contains("does not exist"), "stderr: {}", result.stderr);
}
