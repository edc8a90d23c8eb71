//! Integration tests for the declassify CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn declassify() -> Command {
    Command::cargo_bin("declassify").unwrap()
}

/// Drop placeholder launcher/jar files so pre-flight checks pass in tests
/// that never reach an actual invocation.
fn write_dummy_tool(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let jar = dir.join("vineflower.jar");
    fs::write(&jar, "jar").unwrap();
    let java = dir.join("java");
    fs::write(&java, "").unwrap();
    (jar, java)
}

#[test]
fn cli_help() {
    declassify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decompilation orchestrator"));
}

#[test]
fn cli_version() {
    declassify()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("declassify"));
}

#[test]
fn missing_input_fails_fast() {
    let temp = TempDir::new().unwrap();
    declassify()
        .current_dir(temp.path())
        .arg("does-not-exist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn unrecognized_input_kind_fails_fast() {
    let temp = TempDir::new().unwrap();
    let (jar, java) = write_dummy_tool(temp.path());
    let input = temp.path().join("readme.txt");
    fs::write(&input, "hello").unwrap();
    declassify()
        .arg(&input)
        .arg("--decompiler-jar")
        .arg(&jar)
        .arg("--java")
        .arg(&java)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input must be"));
}

#[test]
fn empty_directory_is_a_clean_run() {
    let temp = TempDir::new().unwrap();
    let (jar, java) = write_dummy_tool(temp.path());
    let input = temp.path().join("in");
    fs::create_dir_all(&input).unwrap();
    declassify()
        .arg(&input)
        .arg("-o")
        .arg(temp.path().join("out"))
        .arg("--decompiler-jar")
        .arg(&jar)
        .arg("--java")
        .arg(&java)
        .assert()
        .success()
        .stdout(predicate::str::contains("no decompilable files found"));
}

#[test]
fn invalid_option_syntax_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (jar, java) = write_dummy_tool(temp.path());
    let input = temp.path().join("in");
    fs::create_dir_all(&input).unwrap();
    declassify()
        .arg(&input)
        .arg("--decompiler-jar")
        .arg(&jar)
        .arg("--java")
        .arg(&java)
        .arg("--option")
        .arg("no-equals-sign")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[cfg(unix)]
mod with_fake_decompiler {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// A stand-in java launcher: the real invocation is
    /// `java -jar <jar> -<opts>... <source> <dest>`, so the last argument is
    /// the destination directory and the one before it the class file.
    fn write_fake_java(dir: &Path) -> PathBuf {
        let script = dir.join("fake-java.sh");
        fs::write(
            &script,
            "#!/bin/sh\n\
             eval dst=\\${$#}\n\
             eval src=\\${$(($# - 1))}\n\
             base=$(basename \"$src\" .class)\n\
             echo \"class $base {}\" > \"$dst/$base.java\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[test]
    fn decompiles_a_directory_end_to_end() {
        let temp = TempDir::new().unwrap();
        let (jar, _) = write_dummy_tool(temp.path());
        let java = write_fake_java(temp.path());
        let input = temp.path().join("in");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("Foo.class"), b"\xca\xfe\xba\xbe").unwrap();
        fs::write(input.join("Bar_3.class"), b"\xca\xfe\xba\xbe").unwrap();
        let out = temp.path().join("out");

        declassify()
            .arg(&input)
            .arg("-o")
            .arg(&out)
            .arg("--decompiler-jar")
            .arg(&jar)
            .arg("--java")
            .arg(&java)
            .assert()
            .success()
            .stdout(predicate::str::contains("decompiled 2 of 2"));

        assert!(out.join("Foo.java").is_file());
        assert!(out.join("Bar_3.java").is_file());
    }

    #[test]
    fn delete_flag_removes_the_working_copy_only() {
        let temp = TempDir::new().unwrap();
        let (jar, _) = write_dummy_tool(temp.path());
        let java = write_fake_java(temp.path());
        let input = temp.path().join("Foo.class");
        fs::write(&input, b"\xca\xfe\xba\xbe").unwrap();
        let out = temp.path().join("out");

        declassify()
            .arg(&input)
            .arg("-o")
            .arg(&out)
            .arg("--decompiler-jar")
            .arg(&jar)
            .arg("--java")
            .arg(&java)
            .arg("--delete-class-files")
            .assert()
            .success();

        assert!(out.join("Foo.java").is_file());
        // The copy scheduled for decompilation is deleted after the verified
        // success; the original input is never touched.
        assert!(!out.join("Foo.class").exists());
        assert!(input.exists());
    }

    #[test]
    fn tool_failures_do_not_stop_the_batch() {
        let temp = TempDir::new().unwrap();
        let (jar, _) = write_dummy_tool(temp.path());
        // Fails for Bad.class, writes output for everything else.
        let java = temp.path().join("fake-java.sh");
        fs::write(
            &java,
            "#!/bin/sh\n\
             eval dst=\\${$#}\n\
             eval src=\\${$(($# - 1))}\n\
             base=$(basename \"$src\" .class)\n\
             if [ \"$base\" = Bad ]; then echo 'corrupt class' >&2; exit 1; fi\n\
             echo \"class $base {}\" > \"$dst/$base.java\"\n",
        )
        .unwrap();
        fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();

        let input = temp.path().join("in");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("Good.class"), b"\xca\xfe").unwrap();
        fs::write(input.join("Bad.class"), b"\xca\xfe").unwrap();
        let out = temp.path().join("out");

        declassify()
            .arg(&input)
            .arg("-o")
            .arg(&out)
            .arg("--decompiler-jar")
            .arg(&jar)
            .arg("--java")
            .arg(&java)
            .assert()
            .success()
            .stdout(predicate::str::contains("decompiled 1 of 2"));

        assert!(out.join("Good.java").is_file());
        assert!(!out.join("Bad.java").exists());
        // The failed unit's class file survives.
        assert!(out.join("Bad.class").is_file());
    }
}
