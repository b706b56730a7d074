use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;

// Helper function to get the path to the compiled binary
fn argot_cmd() -> Command {
    let mut cmd = Command::cargo_bin("argot").expect("Failed to find argot binary");
    cmd.env_remove("ARGOT_LOG");
    cmd
}

#[test]
fn test_default_command_joins_inputs() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["-i", "foo", "-i", "bar", "-s", " "])
        .assert()
        .success()
        .stdout("foo bar\n");
    Ok(())
}

#[test]
fn test_default_command_interleaved_aliases() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["--inputs", "a", "-i", "b", "--inputs", "c", "-s", ",", "--separator", "+"])
        .assert()
        .success()
        .stdout("a+b+c\n");
    Ok(())
}

#[test]
fn test_default_command_flag() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["--inputs", "quiet", "please", "-u"])
        .assert()
        .success()
        .stdout("QUIET PLEASE\n");
    Ok(())
}

#[test]
fn test_concat() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["concat", "-i", "one", "two", "three", "-s", ", "])
        .assert()
        .success()
        .stdout("one, two, three\n");
    Ok(())
}

#[test]
fn test_divide() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["div", "-D", "24", "-d", "8"])
        .assert()
        .success()
        .stdout("3\n");
    Ok(())
}

#[test]
fn test_divide_prints_fractional_quotient() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["div", "-D", "7", "-d", "2"])
        .assert()
        .success()
        .stdout("3.5\n");
    Ok(())
}

#[test]
fn test_divide_by_zero_fails() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["div", "-D", "1", "-d", "0"])
        .assert()
        .code(2)
        .stderr(contains("Division by zero"));
    Ok(())
}

#[test]
fn test_version() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("v{}\n", env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn test_root_help_lists_commands() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Argot").and(contains("concat")).and(contains("math")))
        .stdout(contains("math add").not());
    Ok(())
}

#[test]
fn test_every_command_has_help() -> Result<(), Box<dyn Error>> {
    for name in ["concat", "div", "exc", "math", "math add", "math elapsed"] {
        let mut args: Vec<&str> = name.split(' ').collect();
        args.push("-h");
        argot_cmd()
            .args(&args)
            .assert()
            .success()
            .stdout(contains("Usage"));
    }
    Ok(())
}

#[test]
fn test_preview_skips_validation() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["concat", "[preview]", "-o", "value"])
        .assert()
        .success()
        .stdout(contains("concat").and(contains("-o value")));
    Ok(())
}

#[test]
fn test_command_exit_code_and_message() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["exc", "-m", "foo bar", "-c", "66"])
        .assert()
        .code(66)
        .stderr("foo bar\n");
    Ok(())
}

#[test]
fn test_command_exit_code_zero_is_still_a_failure() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["exc", "-m", "boom", "-c", "0"])
        .assert()
        .code(1)
        .stderr("boom\n");
    Ok(())
}

#[test]
fn test_unknown_command_suggests_siblings() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["math", "mul"])
        .assert()
        .failure()
        .stderr(contains("math mul").and(contains("math add")));
    Ok(())
}

#[test]
fn test_invalid_value_is_reported() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .args(["math", "add", "-v", "1", "two"])
        .assert()
        .code(1)
        .stderr(contains("Can't convert value 'two'"));
    Ok(())
}

#[test]
fn test_logging_goes_to_stderr() -> Result<(), Box<dyn Error>> {
    argot_cmd()
        .env("ARGOT_LOG", "debug")
        .args(["div", "-D", "9", "-d", "3"])
        .assert()
        .success()
        .stdout("3\n")
        .stderr(contains("Stage"));
    Ok(())
}
