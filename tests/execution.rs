//! End-to-end traversal tests: routing, streaming, and error propagation.

use flowgraph::app::{CompiledGraph, ExecutionError};
use flowgraph::graphs::GraphBuilder;
use flowgraph::progress::Progress;
use flowgraph::task::Task;
use serde_json::{json, Value};

fn as_i64(v: &Value) -> i64 {
    v.as_i64().expect("workflow data is a number here")
}

/// The parity workflow: addition -> is_even_check -> even/odd handler.
///
/// Data is JSON so the final output can be a string while intermediate
/// values are numbers.
fn parity_graph() -> CompiledGraph<Value, bool> {
    GraphBuilder::<Value, bool>::new()
        .add_node(
            "addition",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = as_i64(&v);
                progress.emit(format!("Added 1: {x} -> {}", x + 1));
                Ok(json!(x + 1))
            }),
        )
        .unwrap()
        .add_node(
            "is_even_check",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = as_i64(&v);
                progress.emit(format!("is_even: {x} -> {}", x % 2 == 0));
                Ok(v)
            }),
        )
        .unwrap()
        .add_node(
            "even_handler",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = as_i64(&v);
                progress.emit(format!("Handling even number: {x}"));
                Ok(json!(format!("Even: {x}")))
            }),
        )
        .unwrap()
        .add_node(
            "odd_handler",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = as_i64(&v);
                progress.emit(format!("Handling odd number: {x}"));
                Ok(json!(format!("Odd: {x}")))
            }),
        )
        .unwrap()
        .set_entry_point("addition")
        .add_edge("addition", "is_even_check")
        .add_conditional_edges(
            "is_even_check",
            |v: &Value| as_i64(v) % 2 == 0,
            [(true, "even_handler"), (false, "odd_handler")],
        )
        .set_finish_point("even_handler")
        .set_finish_point("odd_handler")
        .compile()
        .unwrap()
}

#[tokio::test]
async fn parity_workflow_routes_even() {
    let graph = parity_graph();
    let output = graph.execute(json!(5)).await.unwrap();
    assert_eq!(output, json!("Even: 6"));
}

#[tokio::test]
async fn parity_workflow_routes_odd() {
    let graph = parity_graph();
    let output = graph.execute(json!(4)).await.unwrap();
    assert_eq!(output, json!("Odd: 5"));
}

#[tokio::test]
async fn parity_workflow_streams_messages_in_order() {
    let graph = parity_graph();
    let (progress, rx) = Progress::channel();
    let output = graph.execute_with_progress(json!(5), progress).await.unwrap();
    assert_eq!(output, json!("Even: 6"));
    let recorded: Vec<String> = rx.iter().collect();
    assert_eq!(
        recorded,
        vec![
            "Added 1: 5 -> 6",
            "is_even: 6 -> true",
            "Handling even number: 6",
        ]
    );
}

#[tokio::test]
async fn linear_chain_mixing_sync_and_async() {
    // addition(+1) -> multiplication(*2) -> async_multiplication(*3)
    let graph = GraphBuilder::<i64>::new()
        .add_node("addition", Task::from_fn(|x| Ok(x + 1)))
        .unwrap()
        .add_node("multiplication", Task::from_fn(|x| Ok(x * 2)))
        .unwrap()
        .add_node(
            "async_multiplication",
            Task::from_async(|x| async move { Ok(x * 3) }),
        )
        .unwrap()
        .set_entry_point("addition")
        .add_edge("addition", "multiplication")
        .add_edge("multiplication", "async_multiplication")
        .set_finish_point("async_multiplication")
        .compile()
        .unwrap();

    assert_eq!(graph.execute(5).await.unwrap(), 36);
}

#[tokio::test]
async fn unconditional_chain_visits_each_node_once_in_edge_order() {
    fn visit(name: &'static str) -> Task<i64> {
        Task::from_fn_with_progress(move |x, progress: &Progress| {
            progress.emit(name);
            Ok(x)
        })
    }

    let graph = GraphBuilder::<i64>::new()
        .add_node("first", visit("first"))
        .unwrap()
        .add_node("second", visit("second"))
        .unwrap()
        .add_node("third", visit("third"))
        .unwrap()
        .set_entry_point("first")
        .add_edge("first", "second")
        .add_edge("second", "third")
        .set_finish_point("third")
        .compile()
        .unwrap();

    let (progress, rx) = Progress::channel();
    graph.execute_with_progress(0, progress).await.unwrap();
    assert_eq!(rx.iter().collect::<Vec<_>>(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn decision_function_sees_pre_task_input() {
    // The task rewrites the data; routing still keys off the value the
    // task was handed, so key 5 must match even though the result is 105.
    let graph = GraphBuilder::<i64, i64>::new()
        .add_node("transform", Task::from_fn(|x| Ok(x + 100)))
        .unwrap()
        .add_node("sink", Task::from_fn(Ok))
        .unwrap()
        .set_entry_point("transform")
        .add_conditional_edges("transform", |x: &i64| *x, [(5, "sink")])
        .set_finish_point("sink")
        .compile()
        .unwrap();

    assert_eq!(graph.execute(5).await.unwrap(), 105);
}

#[tokio::test]
async fn unmapped_decision_key_fails_with_routing_error() {
    let graph = GraphBuilder::<i64, i64>::new()
        .add_node("transform", Task::from_fn(|x| Ok(x + 100)))
        .unwrap()
        .add_node("sink", Task::from_fn(Ok))
        .unwrap()
        .set_entry_point("transform")
        .add_conditional_edges("transform", |x: &i64| *x, [(5, "sink")])
        .set_finish_point("sink")
        .compile()
        .unwrap();

    let err = graph.execute(7).await.unwrap_err();
    match err {
        ExecutionError::Routing { node, key } => {
            assert_eq!(node.as_str(), "transform");
            assert_eq!(key, "7");
        }
        other => panic!("expected routing error, got {other:?}"),
    }
}

#[tokio::test]
async fn task_failure_propagates_with_node_context() {
    let graph = GraphBuilder::<i64>::new()
        .add_node("boom", Task::from_fn(|_| Err("synthetic task failure".into())))
        .unwrap()
        .set_entry_point("boom")
        .set_finish_point("boom")
        .compile()
        .unwrap();

    let err = graph.execute(1).await.unwrap_err();
    match err {
        ExecutionError::Task { node, source } => {
            assert_eq!(node.as_str(), "boom");
            assert_eq!(source.to_string(), "synthetic task failure");
        }
        other => panic!("expected task error, got {other:?}"),
    }
}

#[tokio::test]
async fn sync_and_async_tasks_are_equivalent() {
    fn build(multiply_async: bool) -> CompiledGraph<i64> {
        let multiply = if multiply_async {
            Task::from_async(|x| async move { Ok(x * 2) })
        } else {
            Task::from_fn(|x| Ok(x * 2))
        };
        GraphBuilder::<i64>::new()
            .add_node("add", Task::from_fn(|x| Ok(x + 1)))
            .unwrap()
            .add_node("multiply", multiply)
            .unwrap()
            .set_entry_point("add")
            .add_edge("add", "multiply")
            .set_finish_point("multiply")
            .compile()
            .unwrap()
    }

    let sync_graph = build(false);
    let async_graph = build(true);
    for input in [-3, 0, 5, 41] {
        assert_eq!(
            sync_graph.execute(input).await.unwrap(),
            async_graph.execute(input).await.unwrap()
        );
    }
}

#[tokio::test]
async fn cyclic_graph_loops_until_the_exit_branch() {
    // inc -> check, check loops back to inc until the value reaches 3.
    let graph = GraphBuilder::<i64, bool>::new()
        .add_node("inc", Task::from_fn(|x| Ok(x + 1)))
        .unwrap()
        .add_node("check", Task::from_fn(Ok))
        .unwrap()
        .add_node("out", Task::from_fn(Ok))
        .unwrap()
        .set_entry_point("inc")
        .add_edge("inc", "check")
        .add_conditional_edges("check", |x: &i64| *x >= 3, [(true, "out"), (false, "inc")])
        .set_finish_point("out")
        .compile()
        .unwrap();

    assert_eq!(graph.execute(0).await.unwrap(), 3);
}

#[tokio::test]
async fn concurrent_executions_share_one_compiled_graph() {
    let graph = parity_graph();
    let (even, odd) = tokio::join!(graph.execute(json!(5)), graph.execute(json!(4)));
    assert_eq!(even.unwrap(), json!("Even: 6"));
    assert_eq!(odd.unwrap(), json!("Odd: 5"));
}

#[tokio::test]
async fn progress_channels_stay_isolated_per_execution() {
    let graph = parity_graph();
    let (progress_a, rx_a) = Progress::channel();
    let (progress_b, rx_b) = Progress::channel();
    let (a, b) = tokio::join!(
        graph.execute_with_progress(json!(5), progress_a),
        graph.execute_with_progress(json!(4), progress_b),
    );
    a.unwrap();
    b.unwrap();
    let recorded_a: Vec<String> = rx_a.iter().collect();
    let recorded_b: Vec<String> = rx_b.iter().collect();
    assert_eq!(recorded_a.last().unwrap(), "Handling even number: 6");
    assert_eq!(recorded_b.last().unwrap(), "Handling odd number: 5");
}

#[tokio::test]
async fn missing_callback_discards_messages() {
    // Tasks emit unconditionally; with no observer attached the messages
    // are dropped and execution still succeeds.
    let graph = parity_graph();
    assert_eq!(graph.execute(json!(5)).await.unwrap(), json!("Even: 6"));
}
