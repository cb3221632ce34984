//! Output sink and the Logger task.
//!
//! The Logger drains the log queue in order and hands each record to the
//! output collaborator. Emission is best-effort and never acknowledged.

use core::convert::Infallible;

use crate::pipeline::Pipeline;

/// Output collaborator: accepts one record per call, in arrival order.
pub trait Sink {
    fn emit(&mut self, line: &str);
}

/// Writes every record through the `log` facade (serial on the device).
pub struct LogSink;

impl Sink for LogSink {
    fn emit(&mut self, line: &str) {
        log::info!("{}", line);
    }
}

/// Logger task. Runs forever.
pub async fn logger_task(pipeline: &Pipeline, sink: &mut impl Sink) -> Infallible {
    log::info!("Logger task started");

    let records = pipeline.records.receiver();

    loop {
        let record = records.receive().await;

        match core::str::from_utf8(&record) {
            Ok(line) => {
                sink.emit(line.trim_end());
                pipeline.stats.emitted();
            }
            Err(_) => log::warn!("Logger: dropped record that is not UTF-8"),
        }
    }
}
