use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pymol_cmd::{
    CmdError, CommandExecutor, FeedbackMask, FeedbackModule, OutputBuffer, OutputKind,
};
use pymol_settings::SettingError;

fn executor() -> (CommandExecutor, OutputBuffer) {
    let buffer = OutputBuffer::new();
    let executor = CommandExecutor::new().with_console(Arc::new(buffer.clone()));
    (executor, buffer)
}

/// Write a script under the system temp directory with a unique name
fn write_script(body: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "pymol_cmd_test_{}_{}.pml",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, body).unwrap();
    path
}

fn get(executor: &CommandExecutor, line: &str) -> String {
    executor
        .do_(&format!("get {}", line))
        .unwrap()
        .result
        .unwrap()
}

#[test]
fn set_and_get_global_setting() {
    let (executor, buffer) = executor();

    let out = executor.do_("set sphere_scale, 0.5").unwrap();
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![" Setting: sphere_scale set to 0.50000."]
    );

    let out = executor.do_("get sphere_s").unwrap();
    assert_eq!(out.result.as_deref(), Some("0.50000"));
    assert_eq!(
        buffer.lines().last().map(String::as_str),
        Some(" get: sphere_scale = 0.50000")
    );
}

#[test]
fn set_value_defaults_to_on() {
    let (executor, _) = executor();
    executor.do_("set orthoscopic").unwrap();
    assert_eq!(get(&executor, "orthoscopic"), "on");

    executor.do_("unset orthoscopic").unwrap();
    assert_eq!(get(&executor, "orthoscopic"), "off");
}

#[test]
fn float3_and_legacy_names() {
    let (executor, _) = executor();
    executor.do_("set light, [0, -1, -1]").unwrap();
    assert_eq!(get(&executor, "light"), "[ 0.00000, -1.00000, -1.00000 ]");

    executor.do_("set ray_shadows, off").unwrap();
    assert_eq!(get(&executor, "ray_shadow"), "off");
}

#[test]
fn object_and_state_scopes() {
    let (executor, buffer) = executor();
    executor.lock_core().add_object("prot");

    executor.do_("set sphere_scale, 2, prot").unwrap();
    executor.do_("set sphere_scale, 3, prot, 2").unwrap();

    assert_eq!(get(&executor, "sphere_scale"), "1.00000");
    assert_eq!(get(&executor, "sphere_scale, prot"), "2.00000");
    assert_eq!(get(&executor, "sphere_scale, prot, 2"), "3.00000");
    assert_eq!(get(&executor, "sphere_scale, prot, 3"), "2.00000");
    assert_eq!(
        buffer.lines().last().map(String::as_str),
        Some(" get: sphere_scale = 2.00000 in object prot state 3")
    );

    executor.do_("unset sphere_scale, prot").unwrap();
    assert_eq!(get(&executor, "sphere_scale, prot"), "1.00000");
    assert_eq!(get(&executor, "sphere_scale, prot, 2"), "3.00000");
}

#[test]
fn unknown_object_is_rejected() {
    let (executor, _) = executor();
    let err = executor.do_("set sphere_scale, 2, ghost").unwrap_err();
    assert!(matches!(err, CmdError::InvalidArgument { ref name, .. } if name == "selection"));
}

#[test]
fn global_only_setting_cannot_be_scoped() {
    let (executor, _) = executor();
    executor.lock_core().add_object("prot");
    let err = executor.do_("set orthoscopic, on, prot").unwrap_err();
    assert!(matches!(
        err,
        CmdError::Setting(SettingError::LevelMismatch { .. })
    ));
}

#[test]
fn setting_name_errors() {
    let (executor, _) = executor();

    let err = executor.do_("set no_such_setting, 1").unwrap_err();
    assert!(matches!(err, CmdError::Setting(SettingError::NotFound(_))));

    let err = executor.do_("get cartoon_").unwrap_err();
    assert!(matches!(err, CmdError::Setting(SettingError::Ambiguous { .. })));

    let err = executor.do_("set sphere_scale, big").unwrap_err();
    assert_eq!(err.to_string(), "invalid value: 'big'");
}

#[test]
fn long_values_are_truncated_when_shown() {
    let (executor, buffer) = executor();
    let long = "x".repeat(250);
    executor
        .do_(&format!("set session_file, {}", long))
        .unwrap();

    let out = executor.do_("get session_file").unwrap();
    assert_eq!(out.result.as_deref(), Some(long.as_str()));

    let shown = buffer.lines().pop().unwrap();
    let expected = format!(" get: session_file = {}... (truncated)", "x".repeat(185));
    assert_eq!(shown, expected);
}

#[test]
fn quiet_follows_results_feedback() {
    let (executor, _) = executor();

    let out = executor.do_("set sphere_scale, 0.7").unwrap();
    assert!(!out.is_empty());

    executor
        .feedback()
        .disable(FeedbackModule::Cmd, FeedbackMask::RESULTS);
    let out = executor.do_("set sphere_scale, 0.8").unwrap();
    assert!(out.is_empty());

    // an explicit quiet wins over the feedback flag
    let out = executor.do_("get sphere_scale, quiet=0").unwrap();
    assert_eq!(out.lines().collect::<Vec<_>>(), vec![" get: sphere_scale = 0.80000"]);
}

#[test]
fn blank_value_and_bad_quiet_are_rejected() {
    let (executor, _) = executor();

    let err = executor.do_("set orthoscopic,,").unwrap_err();
    assert!(matches!(err, CmdError::InvalidArgument { ref name, .. } if name == "value"));
    assert_eq!(get(&executor, "orthoscopic"), "off");

    let err = executor.do_("get orthoscopic, quiet=banana").unwrap_err();
    assert!(matches!(err, CmdError::InvalidArgument { ref name, .. } if name == "quiet"));
}

#[test]
fn too_many_arguments_prints_usage() {
    let (executor, buffer) = executor();
    let err = executor.do_("unset a, b, c, d, e, f").unwrap_err();
    assert!(err.is_quiet());

    let messages = buffer.take();
    assert_eq!(
        messages[0].text,
        "Error: too many arguments for unset; 1 to 5 expected, 6 found."
    );
    assert_eq!(messages[0].kind, OutputKind::Error);
    assert_eq!(messages[1].text, "Usage: unset name [, selection [, state [, quiet ]]]");
    assert_eq!(messages[1].kind, OutputKind::Info);
}

#[test]
fn binder_errors_are_reported_once() {
    let (executor, buffer) = executor();

    assert!(executor.do_("get").unwrap_err().is_quiet());
    assert_eq!(
        buffer.lines(),
        vec!["Parsing-Error: missing required argument in function get : name"]
    );
    buffer.clear();

    assert!(executor.do_("get orthoscopic, colour=red").unwrap_err().is_quiet());
    assert_eq!(
        buffer.lines(),
        vec!["Parsing-Error: invalid argument name in function get : colour"]
    );
}

#[test]
fn help_lists_and_describes_commands() {
    let (executor, _) = executor();

    let out = executor.do_("help").unwrap();
    let text = out.lines().collect::<Vec<_>>().join("\n");
    for keyword in ["set", "get", "unset", "run", "spawn", "feedback", "help", "@"] {
        assert!(text.contains(keyword), "missing {}", keyword);
    }

    let out = executor.do_("help set").unwrap();
    assert!(out.lines().any(|l| l.contains("set name [, value [, selection [, state ]]]")));

    let out = executor.do_("help nothing_here").unwrap();
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![" Sorry, no help available on \"nothing_here\"."]
    );
}

#[test]
fn feedback_command_changes_masks() {
    let (executor, _) = executor();

    executor.do_("feedback enable, parser, debugging").unwrap();
    assert!(executor
        .feedback()
        .mask(FeedbackModule::Parser)
        .contains(FeedbackMask::DEBUGGING));

    executor.do_("feedback set, cmd, errors+warnings").unwrap();
    assert_eq!(
        executor.feedback().mask(FeedbackModule::Cmd),
        FeedbackMask::ERRORS | FeedbackMask::WARNINGS
    );

    let out = executor.do_("feedback").unwrap();
    assert_eq!(out.messages.len(), 4);

    let err = executor.do_("feedback toggle, cmd, results").unwrap_err();
    assert!(matches!(err, CmdError::InvalidArgument { ref name, .. } if name == "action"));
}

#[test]
fn do_multi_stops_at_first_error() {
    let (executor, _) = executor();
    let err = executor
        .do_multi("set sphere_scale, 0.3; bogus_cmd; set sphere_scale, 0.9")
        .unwrap_err();
    assert!(matches!(err, CmdError::UnknownCommand(ref name) if name == "bogus_cmd"));
    assert_eq!(get(&executor, "sphere_scale"), "0.30000");

    let out = executor
        .do_multi("set orthoscopic, on\nget orthoscopic")
        .unwrap();
    assert_eq!(out.result.as_deref(), Some("on"));
}

#[test]
fn run_executes_script_lines() {
    let (executor, _) = executor();
    let path = write_script(
        "# setup\nset sphere_scale, \\\n  0.4\n\nset orthoscopic, on\n",
    );

    executor
        .do_(&format!("run {}", path.display()))
        .unwrap();
    assert_eq!(get(&executor, "sphere_scale"), "0.40000");
    assert_eq!(get(&executor, "orthoscopic"), "on");

    let script = path.to_string_lossy().into_owned();
    assert_eq!(
        executor.environments().pymol().get("__script__"),
        Some(script)
    );
    std::fs::remove_file(path).unwrap();
}

#[test]
fn run_reports_failing_line() {
    let (executor, _) = executor();
    let path = write_script("set orthoscopic, on\nset sphere_scale, huge\n");

    let err = executor
        .do_(&format!("@{}", path.display()))
        .unwrap_err();
    match err {
        CmdError::Script { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("invalid value: 'huge'"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(get(&executor, "orthoscopic"), "on");
    std::fs::remove_file(path).unwrap();
}

#[test]
fn run_passes_quiet_errors_through() {
    let (executor, buffer) = executor();
    let path = write_script("set sphere_scale, 1, 2, 3, 4, 5, 6\n");

    let err = executor
        .do_(&format!("run {}", path.display()))
        .unwrap_err();
    assert!(err.is_quiet());
    assert!(buffer.lines()[0].starts_with("Error: too many arguments for set;"));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn run_module_namespace_is_released() {
    let (executor, _) = executor();
    let path = write_script("set orthoscopic, on\n");
    let name = pymol_cmd::module_name(&path.to_string_lossy());

    executor
        .do_(&format!("run {}, module", path.display()))
        .unwrap();
    assert!(executor.environments().module(&name).is_none());

    let err = executor
        .do_(&format!("run {}, elsewhere", path.display()))
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid namespace \"elsewhere\"");
    std::fs::remove_file(path).unwrap();
}

#[test]
fn spawn_runs_on_a_worker_thread() {
    let (executor, _) = executor();
    let path = write_script("set sphere_scale, 0.25\n");
    let name = pymol_cmd::module_name(&path.to_string_lossy());

    executor
        .do_(&format!("spawn {}", path.display()))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while get(&executor, "sphere_scale") != "0.25000" {
        assert!(Instant::now() < deadline, "spawned script did not finish");
        std::thread::sleep(Duration::from_millis(10));
    }

    // spawned module environments stay registered
    let module = executor.environments().module(&name).unwrap();
    assert_eq!(
        module.get("__script__"),
        Some(path.to_string_lossy().into_owned())
    );
    std::fs::remove_file(path).unwrap();
}
