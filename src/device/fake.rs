//! In-memory device filesystem for tests

use crate::command::fake::ScriptedExecutor;
use crate::command::CommandOutput;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Device files by absolute path
pub(crate) type DeviceFiles = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

fn missing(path: &str) -> CommandOutput {
    CommandOutput {
        lines: vec![format!("{}: No such file or directory", path)],
        code: 1,
    }
}

/// Executor that answers `adb` commands against an in-memory filesystem.
///
/// Understands `shell ls`, `shell mkdir -p`, `shell cat a > b` and `push`.
pub(crate) fn fake_device() -> (Arc<ScriptedExecutor>, DeviceFiles) {
    let files: DeviceFiles = Arc::new(Mutex::new(BTreeMap::new()));
    let device = files.clone();

    let executor = ScriptedExecutor::new(move |spec| {
        let args: Vec<&str> = spec.args.iter().map(String::as_str).collect();
        let mut files = device.lock().unwrap();
        let output = match args.as_slice() {
            ["shell", "ls", path] => {
                if files.contains_key(*path) {
                    CommandOutput::from_lines([*path])
                } else {
                    let prefix = format!("{}/", path.trim_end_matches('/'));
                    let children: Vec<String> = files
                        .keys()
                        .filter_map(|k| k.strip_prefix(&prefix))
                        .map(|rest| rest.split('/').next().unwrap_or(rest).to_string())
                        .collect();
                    if children.is_empty() {
                        missing(path)
                    } else {
                        CommandOutput::from_lines(children)
                    }
                }
            }
            ["shell", "cat", source, ">", destination] => match files.get(*source).cloned() {
                Some(bytes) => {
                    files.insert(destination.to_string(), bytes);
                    CommandOutput::default()
                }
                None => missing(source),
            },
            ["push", local, remote] => {
                let bytes = std::fs::read(local).unwrap();
                files.insert(remote.to_string(), bytes);
                CommandOutput::from_lines([format!("{}: 1 file pushed", local)])
            }
            _ => CommandOutput::default(),
        };
        Ok(output)
    });

    (Arc::new(executor), files)
}
