use assert_cmd::Command;
use predicates::prelude::*;

/// Without any configuration and with a piped (non-interactive) stdin, the
/// process must exit non-zero before any network activity, naming the first
/// missing variable.
#[test]
fn download_fails_fast_without_configuration() {
    let mut cmd = Command::cargo_bin("confluence-export").expect("Binary exists");

    cmd.arg("download")
        .env_remove("CONFLUENCE_URL")
        .env_remove("CONFLUENCE_USERNAME")
        .env_remove("CONFLUENCE_API_TOKEN")
        .env_remove("CONFLUENCE_SPACE_KEY")
        .env_remove("CONFLUENCE_PAGE_LIMIT")
        .write_stdin("");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("CONFLUENCE_URL"));
}

#[test]
fn help_describes_the_download_command() {
    let mut cmd = Command::cargo_bin("confluence-export").expect("Binary exists");

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Download every page of a Confluence space"));
}
