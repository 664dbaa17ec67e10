use sane_core::{start_containers, stop_containers, CoreError};
use sane_runtime::{MockRuntime, RuntimeCall};
use sane_schema::{parse_descriptor_with, ContainerSpec, Descriptor, DockerDescriptor};

fn spec(name: &str) -> ContainerSpec {
    ContainerSpec::new(name, format!("{name}:latest"))
}

fn ordered(name: &str, start: i64) -> ContainerSpec {
    let mut c = spec(name);
    c.start_order = start;
    c
}

fn run(name: &str) -> RuntimeCall {
    RuntimeCall::Run(name.to_owned())
}

fn stop(name: &str) -> RuntimeCall {
    RuntimeCall::Stop(name.to_owned())
}

fn rm(name: &str) -> RuntimeCall {
    RuntimeCall::Remove(name.to_owned())
}

#[test]
fn explicit_start_order_runs_first() {
    let desc = DockerDescriptor {
        containers: vec![ordered("three", 3), ordered("one", 1), spec("unset")],
    };
    let mock = MockRuntime::new();

    let started = start_containers(&mock, &desc).unwrap();
    assert_eq!(started, ["one", "three", "unset"]);
    assert_eq!(mock.calls(), vec![run("one"), run("three"), run("unset")]);
}

#[test]
fn start_order_from_sanefile() {
    let yaml = "\
mode: docker
containers:
  web:
    image: nginx
    start: 3
  db:
    image: postgres
    start: 1
  cache:
    image: redis
";
    let Descriptor::Docker(desc) = parse_descriptor_with(yaml, "linux", |_| None).unwrap() else {
        panic!("expected docker mode");
    };
    let mock = MockRuntime::new();
    start_containers(&mock, &desc).unwrap();
    assert_eq!(mock.started(), ["db", "web", "cache"]);
}

#[test]
fn second_start_failure_rolls_back_first_only() {
    let desc = DockerDescriptor {
        containers: vec![ordered("a", 1), ordered("b", 2), ordered("c", 3)],
    };
    let mock = MockRuntime::new().failing_run("b");

    let err = start_containers(&mock, &desc).unwrap_err();
    match err {
        CoreError::ContainerStartFailed {
            name,
            rollback_warnings,
            ..
        } => {
            assert_eq!(name, "b");
            assert!(rollback_warnings.is_empty());
        }
        other => panic!("expected ContainerStartFailed, got {other:?}"),
    }
    assert_eq!(mock.calls(), vec![run("a"), run("b"), stop("a"), rm("a")]);
}

#[test]
fn first_start_failure_needs_no_rollback() {
    let desc = DockerDescriptor {
        containers: vec![ordered("a", 1), ordered("b", 2)],
    };
    let mock = MockRuntime::new().failing_run("a");
    assert!(start_containers(&mock, &desc).is_err());
    assert_eq!(mock.calls(), vec![run("a")]);
}

#[test]
fn rollback_continues_past_failures() {
    let desc = DockerDescriptor {
        containers: vec![ordered("a", 1), ordered("b", 2), ordered("c", 3)],
    };
    let mock = MockRuntime::new()
        .failing_run("c")
        .failing_stop("a")
        .failing_remove("b");

    let Err(CoreError::ContainerStartFailed {
        rollback_warnings, ..
    }) = start_containers(&mock, &desc)
    else {
        panic!("expected ContainerStartFailed");
    };
    assert_eq!(rollback_warnings.len(), 2);
    assert_eq!(
        mock.calls(),
        vec![
            run("a"),
            run("b"),
            run("c"),
            stop("a"),
            rm("a"),
            stop("b"),
            rm("b")
        ]
    );
}

#[test]
fn stop_fails_fast() {
    let desc = DockerDescriptor {
        containers: vec![spec("A"), spec("B"), spec("C")],
    };
    let mock = MockRuntime::new().failing_stop("B");

    let err = stop_containers(&mock, &desc).unwrap_err();
    assert!(matches!(err, CoreError::ContainerStopFailed { ref name, .. } if name == "B"));

    let calls = mock.calls();
    assert_eq!(&calls[..3], &[stop("A"), rm("A"), stop("B")]);
    assert!(!calls.contains(&stop("C")));
    assert!(!calls.contains(&rm("C")));
}

#[test]
fn stop_rerun_makes_progress() {
    let desc = DockerDescriptor {
        containers: vec![spec("A"), spec("B")],
    };
    assert!(stop_containers(&MockRuntime::new().failing_stop("A"), &desc).is_err());

    let mock = MockRuntime::new();
    assert_eq!(stop_containers(&mock, &desc).unwrap(), ["A", "B"]);
}
