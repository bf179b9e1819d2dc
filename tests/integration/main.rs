//! Integration tests for Kiln

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn kiln() -> Command {
        cargo_bin_cmd!("kiln")
    }

    /// Write a config whose host cache lives in the temp dir and whose
    /// device bridge cannot be launched
    fn write_config(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        let cache_dir = dir.path().join("cache");
        let content = format!(
            "[tools]\nadb = \"{}\"\n\n[cache]\nhost_dir = \"{}\"\n",
            dir.path().join("no-such-adb").display(),
            cache_dir.display()
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        kiln()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Android SDK test-harness helper"));
    }

    #[test]
    fn version_displays() {
        kiln()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("kiln"));
    }

    #[test]
    fn config_path() {
        kiln()
            .args(["config", "path"])
            .env_remove("KILN_CONFIG")
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_path_honours_override() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        kiln()
            .args(["--config", config.to_str().unwrap(), "config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(config.to_str().unwrap()));
    }

    #[test]
    fn config_show() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        kiln()
            .args(["--config", config.to_str().unwrap(), "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[tools]"))
            .stdout(predicate::str::contains("mount_timeout_secs = 300"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = TempDir::new().unwrap();
        let config = write_file(
            dir.path(),
            "config.toml",
            b"[device]\npoll_interval_ms = \"x\"\n",
        );

        kiln()
            .args(["--config", config.to_str().unwrap(), "config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn cache_key_is_stable() {
        let dir = TempDir::new().unwrap();
        let jar = write_file(dir.path(), "core.jar", b"core classes");

        let first = kiln()
            .args(["cache", "key", jar.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("dex-"))
            .get_output()
            .stdout
            .clone();
        let second = kiln()
            .args(["cache", "key", jar.to_str().unwrap()])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        assert_eq!(first, second);
    }

    #[test]
    fn cache_key_ignores_file_names() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.jar", b"same classes");
        let b = write_file(dir.path(), "b.jar", b"same classes");

        let key_a = kiln()
            .args(["cache", "key", "--kind", "pushed", a.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("pushed-"))
            .get_output()
            .stdout
            .clone();
        let key_b = kiln()
            .args(["cache", "key", "--kind", "pushed", b.to_str().unwrap()])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        assert_eq!(key_a, key_b);
    }

    #[test]
    fn cache_key_reports_uncacheable_inputs() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.jar");

        kiln()
            .args(["cache", "key", missing.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("not cacheable"));
    }

    #[test]
    fn cache_key_json() {
        let dir = TempDir::new().unwrap();
        let jar = write_file(dir.path(), "core.jar", b"core classes");

        kiln()
            .args(["cache", "key", "--format", "json", jar.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kind\": \"dex\""))
            .stdout(predicate::str::contains("\"sha256\""));
    }

    #[test]
    fn cache_list_empty() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        kiln()
            .args(["--config", config.to_str().unwrap(), "cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache entries found"));
    }

    #[test]
    fn cache_list_and_clear() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        let cache_dir = dir.path().join("cache");
        std::fs::create_dir_all(&cache_dir).unwrap();
        let key = format!("dex-{}", "0123456789abcdef".repeat(4));
        write_file(&cache_dir, &key, b"dex!");
        write_file(&cache_dir, "notes.txt", b"not a cache entry");

        kiln()
            .args(["--config", config.to_str().unwrap(), "cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains(key.as_str()))
            .stdout(predicate::str::contains("notes.txt").not())
            .stdout(predicate::str::contains("Total: 1 entry"));

        kiln()
            .args(["--config", config.to_str().unwrap(), "cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cleared 1 cache entry"));

        assert!(!cache_dir.join(&key).exists());
        assert!(cache_dir.join("notes.txt").exists());
    }

    #[test]
    fn config_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("nested/kiln/config.toml");

        kiln()
            .args(["--config", config.to_str().unwrap(), "config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));

        let written = std::fs::read_to_string(&config).unwrap();
        assert!(written.contains("[device]"));
        assert!(written.contains("mount_timeout_secs = 300"));

        kiln()
            .args(["--config", config.to_str().unwrap(), "config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn config_init_force_replaces_invalid_file() {
        let dir = TempDir::new().unwrap();
        let config = write_file(dir.path(), "config.toml", b"[device\n");

        kiln()
            .args([
                "--config",
                config.to_str().unwrap(),
                "config",
                "init",
                "--force",
            ])
            .assert()
            .success();

        kiln()
            .args(["--config", config.to_str().unwrap(), "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[tools]"));
    }

    #[test]
    fn ensure_dir_without_bridge_fails_with_hint() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        kiln()
            .args([
                "--config",
                config.to_str().unwrap(),
                "ensure-dir",
                "/data/local/tmp",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command failed"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn push_missing_local_file_fails() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        let missing = dir.path().join("missing.jar");

        kiln()
            .args([
                "--config",
                config.to_str().unwrap(),
                "push",
                missing.to_str().unwrap(),
                "/data/local/tmp/missing.jar",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }
}
