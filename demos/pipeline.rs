//! Linear pipeline mixing sync and async tasks: (x + 1) * 2 * 3.
//!
//! Run with: cargo run --example pipeline

use std::time::Duration;

use flowgraph::graphs::GraphBuilder;
use flowgraph::progress::Progress;
use flowgraph::task::Task;

#[tokio::main]
async fn main() -> miette::Result<()> {
    flowgraph::telemetry::init();

    let graph = GraphBuilder::<i64>::new()
        .add_node(
            "addition",
            Task::from_fn_with_progress(|x, progress: &Progress| {
                progress.emit(format!("addition: {x} -> {}", x + 1));
                Ok(x + 1)
            }),
        )?
        .add_node(
            "multiplication",
            Task::from_fn_with_progress(|x, progress: &Progress| {
                progress.emit(format!("multiplication: {x} -> {}", x * 2));
                Ok(x * 2)
            }),
        )?
        .add_node(
            "async_multiplication",
            Task::from_async_with_progress(|x, progress: Progress| async move {
                // Stand-in for real I/O.
                tokio::time::sleep(Duration::from_millis(50)).await;
                progress.emit(format!("async_multiplication: {x} -> {}", x * 3));
                Ok(x * 3)
            }),
        )?
        .set_entry_point("addition")
        .add_edge("addition", "multiplication")
        .add_edge("multiplication", "async_multiplication")
        .set_finish_point("async_multiplication")
        .compile()?;

    let output = graph.execute_with_progress(5, Progress::stdout()).await?;
    println!("result: {output}");

    Ok(())
}
