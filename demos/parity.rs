//! Parity workflow: add one, then branch on whether the result is even.
//!
//! Run with: cargo run --example parity

use flowgraph::graphs::GraphBuilder;
use flowgraph::progress::Progress;
use flowgraph::task::Task;
use serde_json::{json, Value};

fn number(v: &Value) -> i64 {
    v.as_i64().unwrap_or_default()
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    flowgraph::telemetry::init();

    let graph = GraphBuilder::<Value, bool>::new()
        .add_node(
            "addition",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = number(&v);
                progress.emit(format!("Added 1: {x} -> {}", x + 1));
                Ok(json!(x + 1))
            }),
        )?
        .add_node(
            "is_even_check",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = number(&v);
                progress.emit(format!("is_even: {x} -> {}", x % 2 == 0));
                Ok(v)
            }),
        )?
        .add_node(
            "even_handler",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = number(&v);
                progress.emit(format!("Handling even number: {x}"));
                Ok(json!(format!("Even: {x}")))
            }),
        )?
        .add_node(
            "odd_handler",
            Task::from_fn_with_progress(|v: Value, progress: &Progress| {
                let x = number(&v);
                progress.emit(format!("Handling odd number: {x}"));
                Ok(json!(format!("Odd: {x}")))
            }),
        )?
        .set_entry_point("addition")
        .add_edge("addition", "is_even_check")
        .add_conditional_edges(
            "is_even_check",
            |v: &Value| number(v) % 2 == 0,
            [(true, "even_handler"), (false, "odd_handler")],
        )
        .set_finish_point("even_handler")
        .set_finish_point("odd_handler")
        .compile()?;

    for input in [5, 4] {
        println!("--- input: {input} ---");
        let output = graph
            .execute_with_progress(json!(input), Progress::stdout())
            .await?;
        println!("result: {output}");
    }

    Ok(())
}
